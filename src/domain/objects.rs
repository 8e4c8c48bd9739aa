//! Environment objects and the world snapshot.
//!
//! Every reactive thing the player can collide with is an [`EnvObject`]:
//! position, a broad-phase radius, and a kind. Kind-specific parameters live
//! inside the kind variant, so a rule only ever sees its own numbers.
//!
//! The [`WorldSnapshot`] is the single registry of objects. World generation
//! mutates it between frames through registration commands; the frame loop
//! only reads it. After any mutation the spatial grid must be rebuilt.

use std::collections::HashMap;

pub type ObjectId = u32;

// Kind codes on the wire (registration calls and the interop snapshot table).
pub const KIND_PLATFORM: u8 = 0;
pub const KIND_TRAMPOLINE: u8 = 1;
pub const KIND_WATER_GATE: u8 = 2;
pub const KIND_TETHER_ANCHOR: u8 = 3;
pub const KIND_CLIMBABLE: u8 = 4;
pub const KIND_OBSTACLE: u8 = 5;
pub const KIND_COUNT: usize = 6;

/// Object kind plus its kind-specific parameters.
///
/// The wire format carries `(code, param_a, param_b)`; the meaning of the two
/// params depends on the code, which is exactly what the variants encode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectKind {
    /// `half_extent`: half width of the square footprint. `top_offset`:
    /// height of the walkable top above the object origin.
    Platform { half_extent: f32, top_offset: f32 },
    /// `bounce_force`: upward impulse on a bounce. `threshold_offset`:
    /// height of the bounce threshold above the object origin.
    Trampoline { bounce_force: f32, threshold_offset: f32 },
    /// `push_strength`: outward horizontal acceleration while inside.
    WaterGate { push_strength: f32 },
    /// `length`: maximum tether length (also the attach range).
    TetherAnchor { length: f32 },
    /// `grip_height`: climbable extent above the object origin.
    Climbable { grip_height: f32 },
    Obstacle,
}

impl ObjectKind {
    pub fn from_wire(code: u8, param_a: f32, param_b: f32) -> Option<Self> {
        match code {
            KIND_PLATFORM => Some(ObjectKind::Platform {
                half_extent: param_a,
                top_offset: param_b,
            }),
            KIND_TRAMPOLINE => Some(ObjectKind::Trampoline {
                bounce_force: param_a,
                threshold_offset: param_b,
            }),
            KIND_WATER_GATE => Some(ObjectKind::WaterGate {
                push_strength: param_a,
            }),
            KIND_TETHER_ANCHOR => Some(ObjectKind::TetherAnchor { length: param_a }),
            KIND_CLIMBABLE => Some(ObjectKind::Climbable {
                grip_height: param_a,
            }),
            KIND_OBSTACLE => Some(ObjectKind::Obstacle),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            ObjectKind::Platform { .. } => KIND_PLATFORM,
            ObjectKind::Trampoline { .. } => KIND_TRAMPOLINE,
            ObjectKind::WaterGate { .. } => KIND_WATER_GATE,
            ObjectKind::TetherAnchor { .. } => KIND_TETHER_ANCHOR,
            ObjectKind::Climbable { .. } => KIND_CLIMBABLE,
            ObjectKind::Obstacle => KIND_OBSTACLE,
        }
    }

    /// Flat `(param_a, param_b)` view for the interop snapshot table.
    pub fn wire_params(&self) -> (f32, f32) {
        match *self {
            ObjectKind::Platform {
                half_extent,
                top_offset,
            } => (half_extent, top_offset),
            ObjectKind::Trampoline {
                bounce_force,
                threshold_offset,
            } => (bounce_force, threshold_offset),
            ObjectKind::WaterGate { push_strength } => (push_strength, 0.0),
            ObjectKind::TetherAnchor { length } => (length, 0.0),
            ObjectKind::Climbable { grip_height } => (grip_height, 0.0),
            ObjectKind::Obstacle => (0.0, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EnvObject {
    pub id: ObjectId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    pub kind: ObjectKind,
}

/// Read-mostly object registry, owned by the world core.
///
/// Iteration order is registration order; the resolver re-sorts its candidate
/// set by distance every frame, so order here carries no meaning.
pub struct WorldSnapshot {
    objects: Vec<EnvObject>,
    index_by_id: HashMap<ObjectId, usize>,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            index_by_id: HashMap::new(),
        }
    }

    /// Add or replace an object. Rejects non-finite positions and
    /// non-positive radii; the caller decides whether to warn.
    pub fn register(&mut self, obj: EnvObject) -> Result<(), &'static str> {
        if !(obj.x.is_finite() && obj.y.is_finite() && obj.z.is_finite()) {
            return Err("non-finite position");
        }
        if !(obj.radius > 0.0) || !obj.radius.is_finite() {
            return Err("radius must be > 0");
        }
        match self.index_by_id.get(&obj.id) {
            Some(&idx) => {
                // Kind is immutable once registered; replacing position and
                // parameters of the same kind is allowed between frames.
                if self.objects[idx].kind.code() != obj.kind.code() {
                    return Err("kind is immutable after registration");
                }
                self.objects[idx] = obj;
            }
            None => {
                self.index_by_id.insert(obj.id, self.objects.len());
                self.objects.push(obj);
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(idx) = self.index_by_id.remove(&id) else {
            return false;
        };
        self.objects.swap_remove(idx);
        if let Some(moved) = self.objects.get(idx) {
            self.index_by_id.insert(moved.id, idx);
        }
        true
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.index_by_id.clear();
    }

    pub fn get(&self, id: ObjectId) -> Option<&EnvObject> {
        self.index_by_id.get(&id).map(|&idx| &self.objects[idx])
    }

    /// Dense index of an object, stable until the next remove. Matches the
    /// slot layout of the interop snapshot table.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvObject> {
        self.objects.iter()
    }

    /// Largest registered broad-phase radius (0 when empty). The grid checks
    /// this against its cell size on rebuild.
    pub fn max_radius(&self) -> f32 {
        self.objects.iter().fold(0.0f32, |m, o| m.max(o.radius))
    }
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(id: ObjectId, x: f32, z: f32) -> EnvObject {
        EnvObject {
            id,
            x,
            y: 0.0,
            z,
            radius: 2.0,
            kind: ObjectKind::Platform {
                half_extent: 2.0,
                top_offset: 0.5,
            },
        }
    }

    #[test]
    fn register_lookup_remove() {
        let mut snap = WorldSnapshot::new();
        snap.register(platform(7, 1.0, 2.0)).unwrap();
        snap.register(platform(8, 3.0, 4.0)).unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get(7).unwrap().x, 1.0);

        assert!(snap.remove(7));
        assert!(snap.get(7).is_none());
        // swap_remove must keep the survivor addressable
        assert_eq!(snap.get(8).unwrap().z, 4.0);
    }

    #[test]
    fn rejects_bad_input() {
        let mut snap = WorldSnapshot::new();
        let mut bad = platform(1, f32::NAN, 0.0);
        assert!(snap.register(bad).is_err());
        bad.x = 0.0;
        bad.radius = 0.0;
        assert!(snap.register(bad).is_err());
    }

    #[test]
    fn kind_is_immutable() {
        let mut snap = WorldSnapshot::new();
        snap.register(platform(1, 0.0, 0.0)).unwrap();
        let changed = EnvObject {
            kind: ObjectKind::Obstacle,
            ..platform(1, 0.0, 0.0)
        };
        assert!(snap.register(changed).is_err());
    }

    #[test]
    fn wire_round_trip() {
        let kind = ObjectKind::Trampoline {
            bounce_force: 12.0,
            threshold_offset: 1.0,
        };
        let (a, b) = kind.wire_params();
        assert_eq!(ObjectKind::from_wire(kind.code(), a, b), Some(kind));
        assert_eq!(ObjectKind::from_wire(200, 0.0, 0.0), None);
    }
}

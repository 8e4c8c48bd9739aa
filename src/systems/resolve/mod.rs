//! Narrow phase - per-kind contact rules over the broad-phase candidate set.
//!
//! Each object kind has one rule; the registry dispatches on the kind enum,
//! so adding a kind means adding a rule module and one match arm. Rules never
//! move the player: they accumulate contact effects into [`Contacts`] and the
//! state machine applies them in precedence order (tether enablement,
//! trampoline, platform support, water push-back, obstacle slide).
//!
//! Candidates arrive sorted nearest-first, which is how same-kind conflicts
//! resolve: the first qualifying object of a kind wins its contact channel.

mod climb;
mod obstacle;
mod platform;
mod tether;
mod trampoline;
mod water;

pub use climb::ClimbRule;
pub use obstacle::ObstacleRule;
pub use platform::PlatformRule;
pub use tether::TetherRule;
pub use trampoline::TrampolineRule;
pub use water::WaterGateRule;

use crate::domain::objects::{EnvObject, ObjectId, ObjectKind, WorldSnapshot};
use crate::domain::tuning::Tuning;

/// Obstacle contacts applied per frame; more than this in one spot is a
/// world-generation bug, and the nearest ones matter most.
pub const MAX_OBSTACLE_HITS: usize = 8;

/// Immutable per-frame view of the player for the rules.
pub struct ResolveContext<'a> {
    pub tuning: &'a Tuning,
    pub dt: f32,
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub player_radius: f32,
}

impl ResolveContext<'_> {
    /// Squared horizontal distance from the player to an object.
    #[inline]
    pub fn horizontal_dist2(&self, obj: &EnvObject) -> f32 {
        let dx = self.px - obj.x;
        let dz = self.pz - obj.z;
        dx * dx + dz * dz
    }
}

/// Contact effects accumulated by one resolver pass.
#[derive(Clone, Copy)]
pub struct Contacts {
    /// Nearest anchor in range. Enables attach; does not itself move the player.
    pub tether_anchor: Option<ObjectId>,
    /// Nearest trampoline crossed this frame, with its jittered impulse.
    pub bounce: Option<(ObjectId, f32)>,
    /// Nearest supporting platform and its top height.
    pub support: Option<(ObjectId, f32)>,
    /// Nearest climbable the player is gripping.
    pub climb: Option<ObjectId>,
    /// Accumulated outward water-gate acceleration.
    pub push_x: f32,
    pub push_z: f32,
    /// Obstacle push-out vectors: (normal_x, normal_z, penetration depth).
    pub obstacle_hits: [(f32, f32, f32); MAX_OBSTACLE_HITS],
    pub obstacle_count: usize,
    /// Bitmask of kind codes present in the candidate set this frame.
    pub kinds_seen: u32,
}

impl Contacts {
    pub fn new() -> Self {
        Contacts {
            tether_anchor: None,
            bounce: None,
            support: None,
            climb: None,
            push_x: 0.0,
            push_z: 0.0,
            obstacle_hits: [(0.0, 0.0, 0.0); MAX_OBSTACLE_HITS],
            obstacle_count: 0,
            kinds_seen: 0,
        }
    }

    pub fn clear(&mut self) {
        *self = Contacts::new();
    }
}

impl Default for Contacts {
    fn default() -> Self {
        Self::new()
    }
}

/// One rule per object kind.
pub trait ContactRule {
    fn apply(&self, ctx: &ResolveContext, obj: &EnvObject, rng: &mut u32, out: &mut Contacts);
}

/// Dispatch table keyed by object kind.
pub struct RuleRegistry {
    tether: TetherRule,
    trampoline: TrampolineRule,
    platform: PlatformRule,
    water: WaterGateRule,
    climb: ClimbRule,
    obstacle: ObstacleRule,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            tether: TetherRule,
            trampoline: TrampolineRule,
            platform: PlatformRule,
            water: WaterGateRule,
            climb: ClimbRule,
            obstacle: ObstacleRule,
        }
    }

    /// One pass over the candidate set. `candidates` must be sorted
    /// nearest-first; all different-kind effects accumulate together.
    pub fn resolve(
        &self,
        ctx: &ResolveContext,
        snapshot: &WorldSnapshot,
        candidates: &[ObjectId],
        rng: &mut u32,
        out: &mut Contacts,
    ) {
        out.clear();
        for &id in candidates {
            let Some(obj) = snapshot.get(id) else {
                continue;
            };
            out.kinds_seen |= 1 << obj.kind.code();
            match obj.kind {
                ObjectKind::TetherAnchor { .. } => self.tether.apply(ctx, obj, rng, out),
                ObjectKind::Trampoline { .. } => self.trampoline.apply(ctx, obj, rng, out),
                ObjectKind::Platform { .. } => self.platform.apply(ctx, obj, rng, out),
                ObjectKind::WaterGate { .. } => self.water.apply(ctx, obj, rng, out),
                ObjectKind::Climbable { .. } => self.climb.apply(ctx, obj, rng, out),
                ObjectKind::Obstacle => self.obstacle.apply(ctx, obj, rng, out),
            }
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::objects::{EnvObject, ObjectKind, WorldSnapshot};

    fn ctx<'a>(tuning: &'a Tuning, py: f32, vy: f32) -> ResolveContext<'a> {
        ResolveContext {
            tuning,
            dt: 1.0 / 60.0,
            px: 10.0,
            py,
            pz: 10.0,
            vx: 0.0,
            vy,
            vz: 0.0,
            player_radius: tuning.player_radius,
        }
    }

    fn world_with(objects: &[EnvObject]) -> WorldSnapshot {
        let mut snap = WorldSnapshot::new();
        for &o in objects {
            snap.register(o).unwrap();
        }
        snap
    }

    #[test]
    fn different_kinds_accumulate_in_one_pass() {
        let tuning = Tuning::default();
        let snap = world_with(&[
            EnvObject {
                id: 1,
                x: 10.0,
                y: 0.0,
                z: 10.0,
                radius: 2.0,
                kind: ObjectKind::WaterGate { push_strength: 5.0 },
            },
            EnvObject {
                id: 2,
                x: 10.5,
                y: 8.0,
                z: 10.0,
                radius: 3.0,
                kind: ObjectKind::TetherAnchor { length: 10.0 },
            },
        ]);
        let registry = RuleRegistry::new();
        let mut rng = 1u32;
        let mut out = Contacts::new();
        let c = ctx(&tuning, 1.0, 0.0);
        registry.resolve(&c, &snap, &[1, 2], &mut rng, &mut out);

        assert_eq!(out.tether_anchor, Some(2));
        assert!(out.push_x != 0.0 || out.push_z != 0.0);
        assert!(out.kinds_seen & (1 << ObjectKind::WaterGate { push_strength: 0.0 }.code()) != 0);
    }

    #[test]
    fn same_kind_resolves_nearest_first() {
        let tuning = Tuning::default();
        // Both anchors in range; candidate order encodes distance order.
        let snap = world_with(&[
            EnvObject {
                id: 1,
                x: 11.0,
                y: 6.0,
                z: 10.0,
                radius: 2.0,
                kind: ObjectKind::TetherAnchor { length: 12.0 },
            },
            EnvObject {
                id: 2,
                x: 14.0,
                y: 6.0,
                z: 10.0,
                radius: 2.0,
                kind: ObjectKind::TetherAnchor { length: 12.0 },
            },
        ]);
        let registry = RuleRegistry::new();
        let mut rng = 1u32;
        let mut out = Contacts::new();
        let c = ctx(&tuning, 1.0, 0.0);
        registry.resolve(&c, &snap, &[1, 2], &mut rng, &mut out);
        assert_eq!(out.tether_anchor, Some(1));
    }
}

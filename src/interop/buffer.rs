//! InteropBuffer - fixed-capacity struct-of-arrays frame transport.
//!
//! Allocated once at world init, lives for the process lifetime, and is
//! never grown during per-frame use. The host writes the command slots,
//! issues one advance call, then reads the result slots, the event tables
//! and the per-candidate animation deltas straight out of linear memory -
//! three boundary crossings per frame, no per-object round trips.
//!
//! Layout is parallel flat arrays per field (struct-of-arrays), because the
//! numeric kernels walk flat typed memory without per-record headers.

use crate::core::console;
use crate::domain::objects::WorldSnapshot;

/// Object-snapshot table capacity. Registration past this excludes the
/// object with a one-time warning; it is never a fatal error.
pub const SNAPSHOT_CAPACITY: usize = 4096;

/// Per-frame candidate table capacity (objects in the 3x3 neighborhood).
pub const CANDIDATE_CAPACITY: usize = 256;

/// Per-frame event table capacity.
pub const EVENT_CAPACITY: usize = 64;

pub const COMMAND_SLOTS: usize = 8;
pub const RESULT_SLOTS: usize = 16;

// Command slot indices.
pub const CMD_DT: usize = 0;
pub const CMD_MOVE_X: usize = 1;
pub const CMD_MOVE_Z: usize = 2;
pub const CMD_FACING_X: usize = 3;
pub const CMD_FACING_Z: usize = 4;
pub const CMD_BEAT: usize = 5;

// Command flag bits (discrete input edges).
pub const FLAG_JUMP: u32 = 1;
pub const FLAG_DASH: u32 = 1 << 1;
pub const FLAG_ATTACH: u32 = 1 << 2;
pub const FLAG_DETACH: u32 = 1 << 3;

// Result slot indices.
pub const RES_POS_X: usize = 0;
pub const RES_POS_Y: usize = 1;
pub const RES_POS_Z: usize = 2;
pub const RES_VEL_X: usize = 3;
pub const RES_VEL_Y: usize = 4;
pub const RES_VEL_Z: usize = 5;
pub const RES_MODE: usize = 6;
pub const RES_GROUNDED_TICKS: usize = 7;
pub const RES_TETHER_ACTIVE: usize = 8;
pub const RES_TETHER_ANGLE: usize = 9;
pub const RES_TETHER_ANGVEL: usize = 10;
pub const RES_TETHER_LENGTH: usize = 11;
pub const RES_TETHER_ANCHOR_X: usize = 12;
pub const RES_TETHER_ANCHOR_Y: usize = 13;
pub const RES_TETHER_ANCHOR_Z: usize = 14;

pub struct InteropBuffer {
    // Object snapshot table (packed from the world snapshot on rebuild).
    pub obj_id: Vec<u32>,
    pub obj_x: Vec<f32>,
    pub obj_y: Vec<f32>,
    pub obj_z: Vec<f32>,
    pub obj_radius: Vec<f32>,
    pub obj_kind: Vec<u8>,
    pub obj_param_a: Vec<f32>,
    pub obj_param_b: Vec<f32>,
    pub obj_count: usize,

    // Per-frame candidate table: snapshot slots from the broad phase plus
    // gathered positions and interaction radii for the distance cull.
    pub cand_slot: Vec<u32>,
    pub cand_x: Vec<f32>,
    pub cand_y: Vec<f32>,
    pub cand_z: Vec<f32>,
    pub cand_radius: Vec<f32>,
    pub cand_flags: Vec<u8>,
    pub cand_count: usize,

    // Per-candidate animation deltas (beat-reactive bobbing), parallel to
    // `cand_slot[..cand_count]`.
    pub anim_delta: Vec<f32>,

    // Command and result tables.
    pub commands: [f32; COMMAND_SLOTS],
    pub command_flags: u32,
    pub results: [f32; RESULT_SLOTS],

    // Event tables.
    pub event_kind: [u32; EVENT_CAPACITY],
    pub event_object: [u32; EVENT_CAPACITY],
    pub event_x: [f32; EVENT_CAPACITY],
    pub event_y: [f32; EVENT_CAPACITY],
    pub event_z: [f32; EVENT_CAPACITY],
    pub event_count: usize,

    dropped_events: u32,
    warned_event_overflow: bool,
}

impl InteropBuffer {
    pub fn new() -> Self {
        Self {
            obj_id: vec![0; SNAPSHOT_CAPACITY],
            obj_x: vec![0.0; SNAPSHOT_CAPACITY],
            obj_y: vec![0.0; SNAPSHOT_CAPACITY],
            obj_z: vec![0.0; SNAPSHOT_CAPACITY],
            obj_radius: vec![0.0; SNAPSHOT_CAPACITY],
            obj_kind: vec![0; SNAPSHOT_CAPACITY],
            obj_param_a: vec![0.0; SNAPSHOT_CAPACITY],
            obj_param_b: vec![0.0; SNAPSHOT_CAPACITY],
            obj_count: 0,

            cand_slot: vec![0; CANDIDATE_CAPACITY],
            cand_x: vec![0.0; CANDIDATE_CAPACITY],
            cand_y: vec![0.0; CANDIDATE_CAPACITY],
            cand_z: vec![0.0; CANDIDATE_CAPACITY],
            cand_radius: vec![0.0; CANDIDATE_CAPACITY],
            cand_flags: vec![0; CANDIDATE_CAPACITY],
            cand_count: 0,

            anim_delta: vec![0.0; CANDIDATE_CAPACITY],

            commands: [0.0; COMMAND_SLOTS],
            command_flags: 0,
            results: [0.0; RESULT_SLOTS],

            event_kind: [0; EVENT_CAPACITY],
            event_object: [0; EVENT_CAPACITY],
            event_x: [0.0; EVENT_CAPACITY],
            event_y: [0.0; EVENT_CAPACITY],
            event_z: [0.0; EVENT_CAPACITY],
            event_count: 0,

            dropped_events: 0,
            warned_event_overflow: false,
        }
    }

    /// Pack the snapshot into the flat tables. Slot i corresponds to the
    /// snapshot's i-th object; called on grid rebuild, never mid-frame.
    pub fn sync_snapshot(&mut self, snapshot: &WorldSnapshot) {
        let mut n = 0usize;
        for obj in snapshot.iter().take(SNAPSHOT_CAPACITY) {
            let (a, b) = obj.kind.wire_params();
            hot!(self.obj_id, [n] = obj.id);
            hot!(self.obj_x, [n] = obj.x);
            hot!(self.obj_y, [n] = obj.y);
            hot!(self.obj_z, [n] = obj.z);
            hot!(self.obj_radius, [n] = obj.radius);
            hot!(self.obj_kind, [n] = obj.kind.code());
            hot!(self.obj_param_a, [n] = a);
            hot!(self.obj_param_b, [n] = b);
            n += 1;
        }
        self.obj_count = n;
    }

    /// Reset the per-frame tables. Capacity is untouched; nothing allocates.
    pub fn begin_frame(&mut self) {
        self.cand_count = 0;
        self.event_count = 0;
    }

    /// Append a broad-phase candidate (snapshot slot + gathered position).
    /// Returns false when the candidate table is full; the extra candidate
    /// is dropped for this frame.
    #[inline]
    pub fn push_candidate(&mut self, slot: usize) -> bool {
        if self.cand_count >= CANDIDATE_CAPACITY || slot >= self.obj_count {
            return false;
        }
        let n = self.cand_count;
        let (x, y, z, radius) = (
            *hot!(self.obj_x, [slot]),
            *hot!(self.obj_y, [slot]),
            *hot!(self.obj_z, [slot]),
            *hot!(self.obj_radius, [slot]),
        );
        hot!(self.cand_slot, [n] = slot as u32);
        hot!(self.cand_x, [n] = x);
        hot!(self.cand_y, [n] = y);
        hot!(self.cand_z, [n] = z);
        hot!(self.cand_radius, [n] = radius);
        self.cand_count = n + 1;
        true
    }

    /// Drop candidates whose cull flag is 0, compacting the table in place.
    pub fn retain_flagged_candidates(&mut self) {
        let mut kept = 0usize;
        for i in 0..self.cand_count {
            if *hot!(self.cand_flags, [i]) != 0 {
                if kept != i {
                    let slot = *hot!(self.cand_slot, [i]);
                    let (x, y, z, radius) = (
                        *hot!(self.cand_x, [i]),
                        *hot!(self.cand_y, [i]),
                        *hot!(self.cand_z, [i]),
                        *hot!(self.cand_radius, [i]),
                    );
                    hot!(self.cand_slot, [kept] = slot);
                    hot!(self.cand_x, [kept] = x);
                    hot!(self.cand_y, [kept] = y);
                    hot!(self.cand_z, [kept] = z);
                    hot!(self.cand_radius, [kept] = radius);
                }
                kept += 1;
            }
        }
        self.cand_count = kept;
    }

    pub fn push_event(&mut self, kind: u32, object: u32, x: f32, y: f32, z: f32) {
        if self.event_count >= EVENT_CAPACITY {
            self.dropped_events += 1;
            if !self.warned_event_overflow {
                self.warned_event_overflow = true;
                console::warn("interop: event table full, dropping events this frame");
            }
            return;
        }
        let n = self.event_count;
        self.event_kind[n] = kind;
        self.event_object[n] = object;
        self.event_x[n] = x;
        self.event_y[n] = y;
        self.event_z[n] = z;
        self.event_count = n + 1;
    }

    pub fn dropped_events(&self) -> u32 {
        self.dropped_events
    }

    /// Fraction of the snapshot table in use.
    pub fn snapshot_usage(&self) -> f32 {
        self.obj_count as f32 / SNAPSHOT_CAPACITY as f32
    }

    // Pointer surface for zero-copy host readback.

    pub fn commands_ptr(&self) -> *const f32 {
        self.commands.as_ptr()
    }

    pub fn results_ptr(&self) -> *const f32 {
        self.results.as_ptr()
    }

    pub fn event_kind_ptr(&self) -> *const u32 {
        self.event_kind.as_ptr()
    }

    pub fn event_object_ptr(&self) -> *const u32 {
        self.event_object.as_ptr()
    }

    pub fn event_x_ptr(&self) -> *const f32 {
        self.event_x.as_ptr()
    }

    pub fn event_y_ptr(&self) -> *const f32 {
        self.event_y.as_ptr()
    }

    pub fn event_z_ptr(&self) -> *const f32 {
        self.event_z.as_ptr()
    }

    pub fn cand_slot_ptr(&self) -> *const u32 {
        self.cand_slot.as_ptr()
    }

    pub fn anim_delta_ptr(&self) -> *const f32 {
        self.anim_delta.as_ptr()
    }
}

impl Default for InteropBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::objects::{EnvObject, ObjectKind, WorldSnapshot};

    fn snapshot_with(n: u32) -> WorldSnapshot {
        let mut snap = WorldSnapshot::new();
        for i in 0..n {
            snap.register(EnvObject {
                id: i,
                x: i as f32,
                y: 1.0,
                z: -(i as f32),
                radius: 2.0,
                kind: ObjectKind::Trampoline {
                    bounce_force: 12.0,
                    threshold_offset: 1.0,
                },
            })
            .unwrap();
        }
        snap
    }

    #[test]
    fn sync_packs_soa_in_snapshot_order() {
        let mut buf = InteropBuffer::new();
        buf.sync_snapshot(&snapshot_with(3));
        assert_eq!(buf.obj_count, 3);
        assert_eq!(buf.obj_id[2], 2);
        assert_eq!(buf.obj_x[2], 2.0);
        assert_eq!(buf.obj_z[2], -2.0);
        assert_eq!(buf.obj_kind[2], crate::domain::objects::KIND_TRAMPOLINE);
        assert_eq!(buf.obj_param_a[2], 12.0);
    }

    #[test]
    fn candidate_push_and_retain() {
        let mut buf = InteropBuffer::new();
        buf.sync_snapshot(&snapshot_with(4));
        buf.begin_frame();
        for slot in 0..4 {
            assert!(buf.push_candidate(slot));
        }
        buf.cand_flags[0] = 1;
        buf.cand_flags[1] = 0;
        buf.cand_flags[2] = 1;
        buf.cand_flags[3] = 0;
        buf.retain_flagged_candidates();
        assert_eq!(buf.cand_count, 2);
        assert_eq!(buf.cand_slot[0], 0);
        assert_eq!(buf.cand_slot[1], 2);
        assert_eq!(buf.cand_x[1], 2.0);
        assert_eq!(buf.cand_radius[1], 2.0);
    }

    #[test]
    fn candidate_table_bounds() {
        let mut buf = InteropBuffer::new();
        buf.sync_snapshot(&snapshot_with(4));
        buf.begin_frame();
        assert!(!buf.push_candidate(99)); // out of snapshot range
        for _ in 0..CANDIDATE_CAPACITY {
            buf.push_candidate(0);
        }
        assert!(!buf.push_candidate(1)); // table full, dropped not fatal
        assert_eq!(buf.cand_count, CANDIDATE_CAPACITY);
    }

    #[test]
    fn event_overflow_drops_without_panic() {
        let mut buf = InteropBuffer::new();
        buf.begin_frame();
        for i in 0..(EVENT_CAPACITY as u32 + 5) {
            buf.push_event(1, i, 0.0, 0.0, 0.0);
        }
        assert_eq!(buf.event_count, EVENT_CAPACITY);
        assert_eq!(buf.dropped_events(), 5);
    }
}

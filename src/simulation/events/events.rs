//! Frame event emission.
//!
//! Events are facts about what physics did this frame, written into the
//! interop event tables for the host to turn into sound and particles. The
//! engine never renders; it only reports.

use crate::domain::objects::KIND_COUNT;
use crate::systems::player::StepResult;

use super::WorldCore;

// Event kind codes on the wire.
pub const EVT_BOUNCED: u32 = 1;
pub const EVT_TETHERED: u32 = 2;
pub const EVT_DETACHED: u32 = 3;
/// First time a given object kind enters the player's candidate set.
pub const EVT_DISCOVERED: u32 = 4;

pub(super) fn emit_frame_events(world: &mut WorldCore, outcome: &StepResult) {
    let (px, py, pz) = (world.player.x, world.player.y, world.player.z);

    if let Some(id) = outcome.bounced {
        let (x, y, z) = object_pos(world, id, px, py, pz);
        world.interop.push_event(EVT_BOUNCED, id, x, y, z);
    }
    if let Some(id) = outcome.attached {
        let (x, y, z) = object_pos(world, id, px, py, pz);
        world.interop.push_event(EVT_TETHERED, id, x, y, z);
    }
    if outcome.detached || world.pending_detach {
        world.interop.push_event(EVT_DETACHED, 0, px, py, pz);
        world.pending_detach = false;
    }

    // Discovery: one event per kind code, ever. The object field carries the
    // kind code, not an object id.
    let fresh = world.contacts.kinds_seen & !world.kinds_discovered;
    if fresh != 0 {
        for code in 0..KIND_COUNT as u32 {
            if fresh & (1 << code) != 0 {
                world.interop.push_event(EVT_DISCOVERED, code, px, py, pz);
            }
        }
        world.kinds_discovered |= fresh;
    }
}

fn object_pos(world: &WorldCore, id: u32, px: f32, py: f32, pz: f32) -> (f32, f32, f32) {
    match world.snapshot.get(id) {
        Some(obj) => (obj.x, obj.y, obj.z),
        None => (px, py, pz),
    }
}

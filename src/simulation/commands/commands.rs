use crate::core::console;
use crate::domain::objects::{EnvObject, ObjectId, ObjectKind};
use crate::interop::{
    CMD_BEAT, CMD_DT, CMD_FACING_X, CMD_FACING_Z, CMD_MOVE_X, CMD_MOVE_Z, SNAPSHOT_CAPACITY,
};
use crate::systems::player::{Mode, PlayerState};

use super::WorldCore;

#[allow(clippy::too_many_arguments)]
pub(super) fn register_object(
    world: &mut WorldCore,
    id: ObjectId,
    kind_code: u8,
    x: f32,
    y: f32,
    z: f32,
    radius: f32,
    param_a: f32,
    param_b: f32,
) -> bool {
    let Some(kind) = ObjectKind::from_wire(kind_code, param_a, param_b) else {
        console::warn(&format!("world: unknown object kind code {kind_code}"));
        return false;
    };

    // Capacity gate: a new id past the snapshot table size is excluded, the
    // world keeps running. Updates to existing ids always go through.
    if world.snapshot.len() >= SNAPSHOT_CAPACITY && !world.snapshot.contains(id) {
        if !world.warned_snapshot_full {
            world.warned_snapshot_full = true;
            console::warn(&format!(
                "world: object table full ({SNAPSHOT_CAPACITY}), excluding new registrations"
            ));
        }
        return false;
    }

    // An anchor's interaction range is its rope, not its body: its broad
    // phase radius must cover the full length or distant-but-in-range
    // attach points would be culled away.
    let radius = match kind {
        ObjectKind::TetherAnchor { length } => radius.max(length),
        _ => radius,
    };
    let obj = EnvObject {
        id,
        x,
        y,
        z,
        radius,
        kind,
    };
    match world.snapshot.register(obj) {
        Ok(()) => {
            world.grid_dirty = true;
            true
        }
        Err(why) => {
            console::warn(&format!("world: rejected object {id}: {why}"));
            false
        }
    }
}

pub(super) fn remove_object(world: &mut WorldCore, id: ObjectId) -> bool {
    let removed = world.snapshot.remove(id);
    if removed {
        world.grid_dirty = true;
        // A vanished anchor releases the rope without a launch impulse; the
        // host still gets told on the next step.
        if world
            .player
            .tether
            .map(|p| p.anchor_id == id)
            .unwrap_or(false)
        {
            world.player.tether = None;
            world.player.mode = Mode::Airborne;
            world.pending_detach = true;
        }
    }
    removed
}

pub(super) fn clear_objects(world: &mut WorldCore) {
    world.snapshot.clear();
    world.grid_dirty = true;
    world.warned_snapshot_full = false;
    world.kinds_discovered = 0;
    if world.player.tether.is_some() {
        world.player.tether = None;
        world.player.mode = Mode::Airborne;
        world.pending_detach = true;
    }
}

pub(super) fn set_player_position(world: &mut WorldCore, x: f32, y: f32, z: f32) {
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        console::warn("world: ignoring non-finite player teleport");
        return;
    }
    let mut fresh = PlayerState::new(x, y, z);
    fresh.facing_x = world.player.facing_x;
    fresh.facing_z = world.player.facing_z;
    world.player = fresh;
}

pub(super) fn rebuild_spatial_index(world: &mut WorldCore) {
    world.grid.rebuild(&world.snapshot);
    world.interop.sync_snapshot(&world.snapshot);
    world.grid_dirty = false;
}

pub(super) fn set_frame_input(
    world: &mut WorldCore,
    dt: f32,
    move_x: f32,
    move_z: f32,
    facing_x: f32,
    facing_z: f32,
    beat: f32,
) {
    world.interop.commands[CMD_DT] = dt;
    world.interop.commands[CMD_MOVE_X] = move_x;
    world.interop.commands[CMD_MOVE_Z] = move_z;
    world.interop.commands[CMD_FACING_X] = facing_x;
    world.interop.commands[CMD_FACING_Z] = facing_z;
    world.interop.commands[CMD_BEAT] = beat;
}

use crate::domain::objects::{ObjectId, WorldSnapshot};
use crate::interop::{
    CMD_BEAT, CMD_DT, CMD_FACING_X, CMD_FACING_Z, CMD_MOVE_X, CMD_MOVE_Z, FLAG_ATTACH, FLAG_DASH,
    FLAG_DETACH, FLAG_JUMP, RES_GROUNDED_TICKS, RES_MODE, RES_POS_X, RES_POS_Y, RES_POS_Z,
    RES_TETHER_ACTIVE, RES_TETHER_ANCHOR_X, RES_TETHER_ANCHOR_Y, RES_TETHER_ANCHOR_Z,
    RES_TETHER_ANGLE, RES_TETHER_ANGVEL, RES_TETHER_LENGTH, RES_VEL_X, RES_VEL_Y, RES_VEL_Z,
};
use crate::systems::player::{advance, FrameInput};
use crate::systems::resolve::ResolveContext;

use super::{events, PerfTimer, WorldCore};

pub(super) fn step(world: &mut WorldCore) {
    let perf_on = world.perf_enabled;
    if perf_on {
        world.perf_stats.reset();
        world.perf_stats.object_count = world.snapshot.len() as u32;
    }
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

    // === COMMANDS ===
    // dt comes from the host clock; a tab-switch spike or garbage value must
    // not explode the integrator, so it is clamped to max_dt.
    let raw_dt = world.interop.commands[CMD_DT];
    let dt = if raw_dt.is_finite() && raw_dt > 0.0 {
        raw_dt.min(world.tuning.max_dt)
    } else {
        (1.0 / 60.0f32).min(world.tuning.max_dt)
    };
    let beat = {
        let b = world.interop.commands[CMD_BEAT];
        if b.is_finite() { b } else { 0.0 }
    };
    let flags = world.interop.command_flags;
    world.interop.command_flags = 0; // edges are consumed by this step
    let input = FrameInput {
        move_x: world.interop.commands[CMD_MOVE_X],
        move_z: world.interop.commands[CMD_MOVE_Z],
        facing_x: world.interop.commands[CMD_FACING_X],
        facing_z: world.interop.commands[CMD_FACING_Z],
        jump: flags & FLAG_JUMP != 0,
        dash: flags & FLAG_DASH != 0,
        attach: flags & FLAG_ATTACH != 0,
        detach: flags & FLAG_DETACH != 0,
    }
    .sanitized();
    world.time += dt;

    // === REBUILD (only after registration changes) ===
    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    if world.grid_dirty {
        world.grid.rebuild(&world.snapshot);
        world.interop.sync_snapshot(&world.snapshot);
        world.grid_dirty = false;
    }
    if let Some(t) = t0 {
        world.perf_stats.rebuild_ms = t.elapsed_ms();
    }

    world.interop.begin_frame();

    // === BROAD PHASE ===
    // 3x3 cell neighborhood around the player. The reach never exceeds the
    // cell size, which is what makes the neighborhood sufficient.
    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    let reach = world.tuning.query_reach.min(world.tuning.cell_size);
    let mut ids = std::mem::take(&mut world.candidate_ids);
    world
        .grid
        .query_into(world.player.x, world.player.z, reach, &mut ids);
    for &id in &ids {
        if let Some(slot) = world.snapshot.index_of(id) {
            world.interop.push_candidate(slot);
        }
    }
    if let Some(t) = t0 {
        world.perf_stats.broad_ms = t.elapsed_ms();
        world.perf_stats.broad_candidates = world.interop.cand_count as u32;
    }

    // === BATCH CULL ===
    // One batched pass over the gathered candidate positions trims the 3x3
    // overshoot. Each candidate keeps its own interaction radius as an
    // allowance on top of the reach, so long-range objects (an anchor whose
    // rope exceeds the reach) stay in while still in range.
    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    {
        let n = world.interop.cand_count;
        let interop = &mut world.interop;
        world.kernel.cull_within(
            &interop.cand_x[..n],
            &interop.cand_y[..n],
            &interop.cand_z[..n],
            &interop.cand_radius[..n],
            &mut interop.cand_flags[..n],
            world.player.x,
            world.player.y,
            world.player.z,
            reach,
        );
        interop.retain_flagged_candidates();
    }
    if let Some(t) = t0 {
        world.perf_stats.cull_ms = t.elapsed_ms();
        world.perf_stats.culled_candidates = world.interop.cand_count as u32;
    }

    // === NARROW PHASE ===
    // Survivors resolve nearest-first so same-kind conflicts pick the
    // closest object deterministically.
    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    ids.clear();
    for i in 0..world.interop.cand_count {
        let slot = world.interop.cand_slot[i] as usize;
        ids.push(world.interop.obj_id[slot]);
    }
    let (px, py, pz) = (world.player.x, world.player.y, world.player.z);
    {
        let snapshot = &world.snapshot;
        ids.sort_unstable_by(|&a, &b| {
            dist2(snapshot, a, px, py, pz).total_cmp(&dist2(snapshot, b, px, py, pz))
        });
    }
    let ctx = ResolveContext {
        tuning: &world.tuning,
        dt,
        px,
        py,
        pz,
        vx: world.player.vx,
        vy: world.player.vy,
        vz: world.player.vz,
        player_radius: world.tuning.player_radius,
    };
    world.rules.resolve(
        &ctx,
        &world.snapshot,
        &ids,
        &mut world.rng_state,
        &mut world.contacts,
    );
    if let Some(t) = t0 {
        world.perf_stats.resolve_ms = t.elapsed_ms();
    }

    // === PLAYER ===
    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    let outcome = advance(
        &mut world.player,
        &input,
        dt,
        &world.contacts,
        &world.snapshot,
        &world.tuning,
        &world.kernel,
    );
    if let Some(t) = t0 {
        world.perf_stats.player_ms = t.elapsed_ms();
    }

    // === EVENTS ===
    events::emit_frame_events(world, &outcome);

    // === ANIMATION DELTAS ===
    // Bob offsets for every surviving candidate, phase-shifted by the host's
    // beat clock. Pure output; physics never reads these back.
    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    {
        let n = world.interop.cand_count;
        let interop = &mut world.interop;
        world.kernel.wave_deltas(
            &mut interop.anim_delta[..n],
            world.time + beat,
            world.tuning.anim_wave_freq,
            world.tuning.anim_wave_amp,
        );
    }
    if let Some(t) = t0 {
        world.perf_stats.anim_ms = t.elapsed_ms();
    }

    write_results(world);

    world.candidate_ids = ids;
    world.frame += 1;

    if perf_on {
        world.perf_stats.event_count = world.interop.event_count as u32;
        world.perf_stats.dropped_events = world.interop.dropped_events();
        world.perf_stats.snapshot_usage = world.interop.snapshot_usage();
        world.perf_stats.grid_cells = world.grid.cell_count() as u32;
        if let Some(start) = step_start {
            world.perf_stats.step_ms = start.elapsed_ms();
        }
    }
}

fn dist2(snapshot: &WorldSnapshot, id: ObjectId, px: f32, py: f32, pz: f32) -> f32 {
    match snapshot.get(id) {
        Some(obj) => {
            let dx = obj.x - px;
            let dy = obj.y - py;
            let dz = obj.z - pz;
            dx * dx + dy * dy + dz * dz
        }
        None => f32::INFINITY,
    }
}

fn write_results(world: &mut WorldCore) {
    let p = &world.player;
    let r = &mut world.interop.results;
    r[RES_POS_X] = p.x;
    r[RES_POS_Y] = p.y;
    r[RES_POS_Z] = p.z;
    r[RES_VEL_X] = p.vx;
    r[RES_VEL_Y] = p.vy;
    r[RES_VEL_Z] = p.vz;
    r[RES_MODE] = p.mode.code() as f32;
    r[RES_GROUNDED_TICKS] = p.grounded_ticks as f32;
    match p.tether {
        Some(t) => {
            r[RES_TETHER_ACTIVE] = 1.0;
            r[RES_TETHER_ANGLE] = t.angle;
            r[RES_TETHER_ANGVEL] = t.angular_vel;
            r[RES_TETHER_LENGTH] = t.length;
            r[RES_TETHER_ANCHOR_X] = t.anchor_x;
            r[RES_TETHER_ANCHOR_Y] = t.anchor_y;
            r[RES_TETHER_ANCHOR_Z] = t.anchor_z;
        }
        None => {
            r[RES_TETHER_ACTIVE] = 0.0;
            r[RES_TETHER_ANGLE] = 0.0;
            r[RES_TETHER_ANGVEL] = 0.0;
            r[RES_TETHER_LENGTH] = 0.0;
            r[RES_TETHER_ANCHOR_X] = 0.0;
            r[RES_TETHER_ANCHOR_Y] = 0.0;
            r[RES_TETHER_ANCHOR_Z] = 0.0;
        }
    }
}

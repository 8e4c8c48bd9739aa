//! Per-frame advance of the player state machine.
//!
//! Contacts come in already resolved; this module owns precedence. Order
//! inside a frame: tether handling first (it replaces linear motion
//! entirely), then ability edges, forces, linear integration, obstacle
//! push-out, floor clamp, and finally the mode transition checks.

use super::pendulum::Pendulum;
use super::{FrameInput, Mode, PlayerState, StepResult};
use crate::compute::Kernel;
use crate::domain::objects::{ObjectKind, WorldSnapshot};
use crate::domain::tuning::Tuning;
use crate::systems::resolve::Contacts;

/// Supported position may sit a hair above the clamp height after a frame
/// of gravity; within this band the player still counts as grounded.
const GROUND_EPSILON: f32 = 0.02;

/// Advance the player by one (already dt-clamped) frame.
pub fn advance(
    player: &mut PlayerState,
    input: &FrameInput,
    dt: f32,
    contacts: &Contacts,
    snapshot: &WorldSnapshot,
    tuning: &Tuning,
    kernel: &Kernel,
) -> StepResult {
    let mut result = StepResult::default();

    player.dash_cooldown = (player.dash_cooldown - dt).max(0.0);
    let facing2 = input.facing_x * input.facing_x + input.facing_z * input.facing_z;
    if facing2 > 1e-6 {
        let inv = 1.0 / facing2.sqrt();
        player.facing_x = input.facing_x * inv;
        player.facing_z = input.facing_z * inv;
    }

    if player.mode == Mode::Tethered {
        if let Some(mut pendulum) = player.tether {
            pendulum.step(dt, tuning.gravity, tuning.pendulum_damping);
            let over_limit = pendulum.angle.abs() > tuning.max_swing_angle;
            if input.detach || over_limit {
                if over_limit {
                    pendulum.angle = tuning.max_swing_angle.copysign(pendulum.angle);
                }
                detach(player, &pendulum, tuning);
                result.detached = true;
                // Fall through: the rest of the frame runs airborne.
            } else {
                let (x, y, z) = pendulum.position();
                let (vx, vy, vz) = pendulum.linear_velocity();
                player.x = x;
                player.y = y;
                player.z = z;
                player.vx = vx;
                player.vy = vy;
                player.vz = vz;
                player.tether = Some(pendulum);
                player.grounded_ticks = 0;
                player.remember_good_position();
                return result;
            }
        } else {
            // Tethered without a pendulum cannot happen through the public
            // surface; recover rather than poison the state.
            player.mode = Mode::Airborne;
        }
    }

    if input.attach && player.mode != Mode::Tethered {
        if let Some(anchor_id) = contacts.tether_anchor {
            if let Some(anchor) = snapshot.get(anchor_id) {
                if let ObjectKind::TetherAnchor { length } = anchor.kind {
                    let pendulum = Pendulum::attach(
                        anchor_id,
                        (anchor.x, anchor.y, anchor.z),
                        (player.x, player.y, player.z),
                        (player.vx, player.vy, player.vz),
                        (player.facing_x, player.facing_z),
                        length,
                        tuning.min_tether_length,
                    );
                    player.tether = Some(pendulum);
                    player.mode = Mode::Tethered;
                    player.grounded_ticks = 0;
                    result.attached = Some(anchor_id);
                    player.remember_good_position();
                    return result;
                }
            }
        }
    }

    // Horizontal control. Full authority on the ground, reduced in air,
    // sluggish in water.
    let control = match player.mode {
        Mode::Grounded => 1.0,
        Mode::Swimming => 0.6,
        _ => tuning.air_control,
    };
    let prev_speed = player.horizontal_speed();
    player.vx += input.move_x * tuning.move_accel * control * dt;
    player.vz += input.move_z * tuning.move_accel * control * dt;

    // Input never accelerates past move_speed_max, but an existing overspeed
    // (dash, detach fling) is preserved and left to friction.
    let speed = player.horizontal_speed();
    let cap = tuning.move_speed_max.max(prev_speed);
    if speed > cap && speed > 0.0 {
        let scale = cap / speed;
        player.vx *= scale;
        player.vz *= scale;
    }

    let has_move_input = input.move_x != 0.0 || input.move_z != 0.0;
    if player.mode == Mode::Grounded && !has_move_input {
        let decay = 1.0 - (tuning.ground_friction * dt).min(1.0);
        player.vx *= decay;
        player.vz *= decay;
    }

    if input.dash && player.dash_cooldown <= 0.0 {
        player.vx += player.facing_x * tuning.dash_impulse;
        player.vz += player.facing_z * tuning.dash_impulse;
        player.dash_cooldown = tuning.dash_cooldown;
    }

    if let Some((id, impulse)) = contacts.bounce {
        player.vy = impulse;
        player.mode = Mode::Airborne;
        result.bounced = Some(id);
    }

    let gripping = contacts.climb.is_some();
    if input.jump {
        match player.mode {
            Mode::Grounded => {
                player.vy = tuning.jump_force;
                player.mode = Mode::Airborne;
            }
            Mode::Airborne if gripping => {
                // Wall jump off a climbable does not spend the air jump.
                player.vy = tuning.jump_force;
            }
            Mode::Airborne if !player.air_jump_used => {
                player.vy = tuning.double_jump_force;
                player.air_jump_used = true;
            }
            Mode::Swimming => {
                player.vy = tuning.jump_force * 0.6;
            }
            _ => {}
        }
    }

    // Forces.
    if player.mode == Mode::Swimming {
        if player.y < tuning.water_level - tuning.swim_depth {
            player.vy += tuning.buoyancy_accel * dt;
        } else {
            player.vy -= tuning.gravity * 0.25 * dt;
        }
        let drag = 1.0 / (1.0 + tuning.water_drag * dt);
        player.vx *= drag;
        player.vy *= drag;
        player.vz *= drag;
    } else {
        player.vy -= tuning.gravity * dt;
    }

    // Gripping a climbable caps the slide and re-arms the air jump.
    if gripping {
        if player.vy < -tuning.climb_slide_speed {
            player.vy = -tuning.climb_slide_speed;
        }
        player.air_jump_used = false;
    }

    player.vx += contacts.push_x * dt;
    player.vz += contacts.push_z * dt;

    player.x += player.vx * dt;
    player.y += player.vy * dt;
    player.z += player.vz * dt;

    // Obstacle push-out, then kill the inward velocity component so the
    // tangential part survives (slide, not stick).
    for i in 0..contacts.obstacle_count {
        let (nx, nz, depth) = contacts.obstacle_hits[i];
        player.x += nx * depth;
        player.z += nz * depth;
        let inward = player.vx * nx + player.vz * nz;
        if inward < 0.0 {
            player.vx -= inward * nx;
            player.vz -= inward * nz;
        }
    }

    // Floor: procedural terrain, possibly raised by a supporting platform.
    let terrain = kernel.ground_height(player.x, player.z);
    let floor = match contacts.support {
        Some((_, top)) => terrain.max(top),
        None => terrain,
    };

    if player.y <= floor + GROUND_EPSILON && player.vy <= 0.0 {
        player.y = floor;
        player.vy = 0.0;
        if player.mode != Mode::Swimming {
            player.mode = Mode::Grounded;
        }
        player.air_jump_used = false;
    } else if player.mode == Mode::Grounded && player.y > floor + GROUND_EPSILON {
        player.mode = Mode::Airborne;
    }

    // Water immersion beats Grounded/Airborne when deep enough and not
    // standing on the bottom.
    let submerged = player.y < tuning.water_level - tuning.swim_depth;
    if submerged && player.y > floor + GROUND_EPSILON {
        player.mode = Mode::Swimming;
    } else if player.mode == Mode::Swimming && !submerged {
        player.mode = if player.y <= floor + GROUND_EPSILON {
            Mode::Grounded
        } else {
            Mode::Airborne
        };
    }

    if player.mode == Mode::Grounded {
        player.grounded_ticks = player.grounded_ticks.saturating_add(1);
    } else {
        player.grounded_ticks = 0;
    }

    if player.x.is_finite() && player.y.is_finite() && player.z.is_finite() {
        player.remember_good_position();
    } else {
        player.restore_good_position();
        player.mode = Mode::Airborne;
        result.sanitized = true;
    }

    result
}

fn detach(player: &mut PlayerState, pendulum: &Pendulum, tuning: &Tuning) {
    let (x, y, z) = pendulum.position();
    let (vx, vy, vz) = pendulum.linear_velocity();
    player.x = x;
    player.y = y;
    player.z = z;
    player.vx = vx;
    player.vy = vy + tuning.detach_boost;
    player.vz = vz;
    player.tether = None;
    player.mode = Mode::Airborne;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Kernel;
    use crate::domain::objects::{EnvObject, ObjectId, WorldSnapshot};

    const DT: f32 = 1.0 / 60.0;

    fn world() -> WorldSnapshot {
        WorldSnapshot::new()
    }

    fn anchor_world(id: ObjectId, x: f32, y: f32, z: f32, length: f32) -> WorldSnapshot {
        let mut snap = WorldSnapshot::new();
        snap.register(EnvObject {
            id,
            x,
            y,
            z,
            radius: 1.0,
            kind: ObjectKind::TetherAnchor { length },
        })
        .unwrap();
        snap
    }

    fn grounded_player(kernel: &Kernel, x: f32, z: f32) -> PlayerState {
        let mut p = PlayerState::new(x, kernel.ground_height(x, z), z);
        p.mode = Mode::Grounded;
        p
    }

    #[test]
    fn double_jump_budget_is_one_per_airtime() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let contacts = Contacts::new();
        let mut p = grounded_player(&kernel, 0.0, 0.0);

        let jump = FrameInput {
            jump: true,
            ..Default::default()
        };
        advance(&mut p, &jump, DT, &contacts, &snap, &tuning, &kernel);
        assert_eq!(p.mode, Mode::Airborne);
        let after_first = p.vy;
        assert!(after_first > 0.0);

        advance(&mut p, &jump, DT, &contacts, &snap, &tuning, &kernel);
        assert!(p.air_jump_used);
        let after_second = p.vy;
        assert!(after_second > 0.0);

        // Third press in the same airtime changes nothing but gravity.
        advance(&mut p, &jump, DT, &contacts, &snap, &tuning, &kernel);
        assert!(p.vy < after_second);
    }

    #[test]
    fn landing_rearms_the_air_jump() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let contacts = Contacts::new();
        let mut p = grounded_player(&kernel, 0.0, 0.0);
        p.air_jump_used = true;
        p.y += 0.5;
        p.vy = -3.0;
        p.mode = Mode::Airborne;

        let idle = FrameInput::default();
        for _ in 0..60 {
            advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
            if p.mode == Mode::Grounded {
                break;
            }
        }
        assert_eq!(p.mode, Mode::Grounded);
        assert!(!p.air_jump_used);
        assert!(p.grounded_ticks > 0);
    }

    #[test]
    fn dash_respects_cooldown() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let contacts = Contacts::new();
        let mut p = grounded_player(&kernel, 0.0, 0.0);

        let dash = FrameInput {
            dash: true,
            facing_x: 1.0,
            ..Default::default()
        };
        advance(&mut p, &dash, DT, &contacts, &snap, &tuning, &kernel);
        let boosted = p.horizontal_speed();
        assert!(boosted > tuning.move_speed_max);
        assert!(p.dash_cooldown > 0.0);

        // A second press inside the cooldown adds no impulse.
        let before = p.horizontal_speed();
        advance(&mut p, &dash, DT, &contacts, &snap, &tuning, &kernel);
        assert!(p.horizontal_speed() <= before);
    }

    #[test]
    fn input_cannot_exceed_speed_cap() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let contacts = Contacts::new();
        let mut p = grounded_player(&kernel, 0.0, 0.0);

        let run = FrameInput {
            move_x: 1.0,
            ..Default::default()
        };
        for _ in 0..240 {
            advance(&mut p, &run, DT, &contacts, &snap, &tuning, &kernel);
        }
        assert!(p.horizontal_speed() <= tuning.move_speed_max + 1e-3);
    }

    #[test]
    fn attach_then_detach_converts_swing_to_launch() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = anchor_world(7, 0.0, 30.0, 0.0, 12.0);
        let mut contacts = Contacts::new();
        contacts.tether_anchor = Some(7);

        let mut p = PlayerState::new(4.0, 22.0, 0.0);
        p.vx = 6.0;

        let attach = FrameInput {
            attach: true,
            ..Default::default()
        };
        let r = advance(&mut p, &attach, DT, &contacts, &snap, &tuning, &kernel);
        assert_eq!(r.attached, Some(7));
        assert_eq!(p.mode, Mode::Tethered);

        // Swing for a while, then release.
        let idle = FrameInput::default();
        for _ in 0..30 {
            advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        }
        assert_eq!(p.mode, Mode::Tethered);
        let angvel = p.tether.unwrap().angular_vel;

        let release = FrameInput {
            detach: true,
            ..Default::default()
        };
        let r = advance(&mut p, &release, DT, &contacts, &snap, &tuning, &kernel);
        assert!(r.detached);
        assert_eq!(p.mode, Mode::Airborne);
        assert!(p.tether.is_none());
        // Launch velocity reflects the swing plus the upward boost.
        assert!(angvel.abs() > 0.0);
        assert!(p.vy > 0.0 || p.horizontal_speed() > 0.0);
    }

    #[test]
    fn overswing_force_detaches() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = anchor_world(7, 0.0, 30.0, 0.0, 12.0);
        let contacts = Contacts::new();

        let mut p = PlayerState::new(0.0, 22.0, 0.0);
        p.mode = Mode::Tethered;
        p.tether = Some(Pendulum {
            anchor_id: 7,
            anchor_x: 0.0,
            anchor_y: 30.0,
            anchor_z: 0.0,
            length: 8.0,
            plane_x: 1.0,
            plane_z: 0.0,
            angle: tuning.max_swing_angle - 0.01,
            angular_vel: 5.0,
        });

        let idle = FrameInput::default();
        let r = advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        assert!(r.detached);
        assert_eq!(p.mode, Mode::Airborne);
    }

    #[test]
    fn climb_grip_caps_slide_speed() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let mut contacts = Contacts::new();
        contacts.climb = Some(3);

        let mut p = PlayerState::new(0.0, 40.0, 0.0);
        p.mode = Mode::Airborne;
        p.vy = -12.0;
        p.air_jump_used = true;

        let idle = FrameInput::default();
        advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        assert!(p.vy >= -tuning.climb_slide_speed - 1e-5);
        assert!(!p.air_jump_used);
    }

    #[test]
    fn deep_water_switches_to_swimming_and_buoyancy_lifts() {
        let kernel = Kernel::fallback();
        let mut tuning = Tuning::default();
        tuning.water_level = 50.0; // everything is deep below the surface
        let snap = world();
        let contacts = Contacts::new();

        let mut p = PlayerState::new(0.0, 30.0, 0.0);
        p.mode = Mode::Airborne;
        p.vy = -2.0;

        let idle = FrameInput::default();
        advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        assert_eq!(p.mode, Mode::Swimming);

        // Buoyancy must carry the player up toward the surface.
        for _ in 0..600 {
            advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        }
        assert!(p.y > 40.0, "buoyancy should lift, got y={}", p.y);
    }

    #[test]
    fn non_finite_position_rolls_back() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let contacts = Contacts::new();

        let mut p = grounded_player(&kernel, 2.0, 3.0);
        let good = (p.x, p.y, p.z);
        p.vx = f32::NAN;

        let idle = FrameInput::default();
        let r = advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        assert!(r.sanitized);
        assert_eq!((p.x, p.y, p.z), good);
        assert_eq!(p.vx, 0.0);
    }

    #[test]
    fn bounce_contact_sets_upward_velocity() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let mut contacts = Contacts::new();
        contacts.bounce = Some((9, 12.4));

        let mut p = PlayerState::new(0.0, 20.0, 0.0);
        p.mode = Mode::Airborne;
        p.vy = -8.0;

        let idle = FrameInput::default();
        let r = advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        assert_eq!(r.bounced, Some(9));
        assert!(p.vy > 10.0);
    }

    #[test]
    fn obstacle_hit_slides_instead_of_sticking() {
        let kernel = Kernel::fallback();
        let tuning = Tuning::default();
        let snap = world();
        let mut contacts = Contacts::new();
        contacts.obstacle_hits[0] = (1.0, 0.0, 0.3);
        contacts.obstacle_count = 1;

        let mut p = PlayerState::new(0.0, 20.0, 0.0);
        p.mode = Mode::Airborne;
        p.vx = -5.0;
        p.vz = 2.0;

        let idle = FrameInput::default();
        advance(&mut p, &idle, DT, &contacts, &snap, &tuning, &kernel);
        // Inward component gone, tangential survives.
        assert!(p.vx >= 0.0);
        assert!(p.vz > 1.5);
    }
}

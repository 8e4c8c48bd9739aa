//! Player physics state machine.
//!
//! Four exclusive modes: Grounded, Airborne, Swimming, Tethered. The first
//! three share the linear integrator in [`integrate`]; Tethered hands the
//! position over to the [`pendulum`] sub-model entirely, with linear
//! velocity reconstructed from arc motion each tick so readback stays
//! meaningful.

pub mod integrate;
pub mod pendulum;

pub use integrate::advance;
pub use pendulum::Pendulum;

use crate::domain::objects::ObjectId;

/// Mode codes are part of the result-table wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Grounded = 0,
    Airborne = 1,
    Swimming = 2,
    Tethered = 3,
}

impl Mode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Host input for one frame. Ability fields are edges (pressed this frame),
/// not levels; movement and facing are levels.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub move_x: f32,
    pub move_z: f32,
    pub facing_x: f32,
    pub facing_z: f32,
    pub jump: bool,
    pub dash: bool,
    pub attach: bool,
    pub detach: bool,
}

impl FrameInput {
    /// Non-finite analog values become zero and movement is clamped to the
    /// unit disc, so a corrupt host frame cannot inject energy.
    pub fn sanitized(mut self) -> FrameInput {
        for v in [
            &mut self.move_x,
            &mut self.move_z,
            &mut self.facing_x,
            &mut self.facing_z,
        ] {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        let m2 = self.move_x * self.move_x + self.move_z * self.move_z;
        if m2 > 1.0 {
            let inv = 1.0 / m2.sqrt();
            self.move_x *= inv;
            self.move_z *= inv;
        }
        self
    }
}

/// What one frame did, for event emission by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepResult {
    pub bounced: Option<ObjectId>,
    pub attached: Option<ObjectId>,
    pub detached: bool,
    /// Position was non-finite and got rolled back to the last good one.
    pub sanitized: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub mode: Mode,
    /// Consecutive frames spent grounded; resets on leaving the ground.
    pub grounded_ticks: u32,
    pub air_jump_used: bool,
    pub dash_cooldown: f32,
    /// Last horizontal look direction, unit length. Dash goes this way.
    pub facing_x: f32,
    pub facing_z: f32,
    pub tether: Option<Pendulum>,
    last_good: (f32, f32, f32),
}

impl PlayerState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        PlayerState {
            x,
            y,
            z,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            mode: Mode::Airborne,
            grounded_ticks: 0,
            air_jump_used: false,
            dash_cooldown: 0.0,
            facing_x: 1.0,
            facing_z: 0.0,
            tether: None,
            last_good: (x, y, z),
        }
    }

    pub(crate) fn remember_good_position(&mut self) {
        self.last_good = (self.x, self.y, self.z);
    }

    pub(crate) fn restore_good_position(&mut self) {
        let (x, y, z) = self.last_good;
        self.x = x;
        self.y = y;
        self.z = z;
        self.vx = 0.0;
        self.vy = 0.0;
        self.vz = 0.0;
    }

    pub fn horizontal_speed(&self) -> f32 {
        (self.vx * self.vx + self.vz * self.vz).sqrt()
    }
}

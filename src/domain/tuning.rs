//! Tuning bundle - every feel-tuned constant in one place.
//!
//! These numbers are configuration, not invariants: the host may load a JSON
//! bundle at startup (or between sessions) to re-tune movement feel without
//! an engine rebuild. Compiled-in defaults match the shipped world.

use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Gravity and ground movement
    pub gravity: f32,
    pub move_accel: f32,
    pub move_speed_max: f32,
    pub ground_friction: f32,
    pub air_control: f32,

    // Abilities
    pub jump_force: f32,
    pub double_jump_force: f32,
    pub dash_impulse: f32,
    pub dash_cooldown: f32,

    // Trampolines
    pub bounce_jitter: f32,

    // Water
    pub water_level: f32,
    pub swim_depth: f32,
    pub buoyancy_accel: f32,
    pub water_drag: f32,

    // Tether / pendulum
    pub pendulum_damping: f32,
    pub max_swing_angle: f32,
    pub detach_boost: f32,
    pub min_tether_length: f32,

    // Climbables
    pub climb_slide_speed: f32,

    // Frame stepping and spatial layout
    pub max_dt: f32,
    pub cell_size: f32,
    pub player_radius: f32,
    pub query_reach: f32,

    // Ambient object animation (beat-reactive bobbing)
    pub anim_wave_freq: f32,
    pub anim_wave_amp: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            gravity: 18.0,
            move_accel: 40.0,
            move_speed_max: 9.0,
            ground_friction: 10.0,
            air_control: 0.35,

            jump_force: 8.5,
            double_jump_force: 7.0,
            dash_impulse: 14.0,
            dash_cooldown: 0.8,

            bounce_jitter: 0.75,

            water_level: 0.0,
            swim_depth: 1.2,
            buoyancy_accel: 6.0,
            water_drag: 2.2,

            pendulum_damping: 0.995,
            max_swing_angle: 2.4,
            detach_boost: 2.5,
            min_tether_length: 1.0,

            climb_slide_speed: 1.5,

            max_dt: 1.0 / 20.0,
            cell_size: 16.0,
            player_radius: 0.6,
            query_reach: 8.0,

            anim_wave_freq: 2.0,
            anim_wave_amp: 0.25,
        }
    }
}

impl Tuning {
    pub fn from_bundle_json(json: &str) -> Result<Self, String> {
        let tuning: Tuning = serde_json::from_str(json).map_err(|e| e.to_string())?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn manifest_json(&self) -> String {
        // A Tuning always serializes; fall back to an empty object rather
        // than propagating (the manifest is debug surface, not state).
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.cell_size > 0.0) {
            return Err("cell_size must be > 0".to_string());
        }
        if !(self.max_dt > 0.0) {
            return Err("max_dt must be > 0".to_string());
        }
        if !(self.pendulum_damping > 0.0 && self.pendulum_damping < 1.0) {
            return Err("pendulum_damping must be in (0, 1)".to_string());
        }
        if !(self.player_radius > 0.0) {
            return Err("player_radius must be > 0".to_string());
        }
        Ok(())
    }
}

//! ObstacleRule - slide-along push-out.
//!
//! Obstacles are impassable: the player is pushed out along the shortest
//! horizontal vector to the surface and loses the velocity component along
//! that vector, which leaves the tangential component intact - sliding,
//! not sticking.

use super::{ContactRule, Contacts, ResolveContext, MAX_OBSTACLE_HITS};
use crate::domain::objects::{EnvObject, ObjectKind};

pub struct ObstacleRule;

impl ContactRule for ObstacleRule {
    fn apply(&self, ctx: &ResolveContext, obj: &EnvObject, _rng: &mut u32, out: &mut Contacts) {
        if obj.kind != ObjectKind::Obstacle {
            return;
        }
        // Vertical band: the player can pass above or below the blocker.
        if (ctx.py - obj.y).abs() > obj.radius {
            return;
        }
        let dx = ctx.px - obj.x;
        let dz = ctx.pz - obj.z;
        let d2 = dx * dx + dz * dz;
        let min_dist = obj.radius + ctx.player_radius;
        if d2 >= min_dist * min_dist {
            return;
        }
        if out.obstacle_count >= MAX_OBSTACLE_HITS {
            return;
        }
        let d = d2.sqrt();
        let (nx, nz) = if d > 1e-4 { (dx / d, dz / d) } else { (1.0, 0.0) };
        out.obstacle_hits[out.obstacle_count] = (nx, nz, min_dist - d);
        out.obstacle_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::Tuning;

    #[test]
    fn records_push_out_normal_and_depth() {
        let tuning = Tuning::default();
        let rock = EnvObject {
            id: 8,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            radius: 1.0,
            kind: ObjectKind::Obstacle,
        };
        let mut rng = 0u32;
        let mut out = Contacts::new();
        let ctx = ResolveContext {
            tuning: &tuning,
            dt: 1.0 / 60.0,
            px: 1.2,
            py: 0.0,
            pz: 0.0,
            vx: -3.0,
            vy: 0.0,
            vz: 1.0,
            player_radius: 0.6,
        };
        ObstacleRule.apply(&ctx, &rock, &mut rng, &mut out);
        assert_eq!(out.obstacle_count, 1);
        let (nx, nz, depth) = out.obstacle_hits[0];
        assert!((nx - 1.0).abs() < 1e-5);
        assert_eq!(nz, 0.0);
        assert!((depth - 0.4).abs() < 1e-5); // 1.6 min dist - 1.2 actual
    }

    #[test]
    fn ignores_player_above_the_blocker() {
        let tuning = Tuning::default();
        let rock = EnvObject {
            id: 8,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            radius: 1.0,
            kind: ObjectKind::Obstacle,
        };
        let mut rng = 0u32;
        let mut out = Contacts::new();
        let ctx = ResolveContext {
            tuning: &tuning,
            dt: 1.0 / 60.0,
            px: 0.5,
            py: 3.0,
            pz: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            player_radius: 0.6,
        };
        ObstacleRule.apply(&ctx, &rock, &mut rng, &mut out);
        assert_eq!(out.obstacle_count, 0);
    }
}

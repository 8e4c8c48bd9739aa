//! PlatformRule - one-way support surfaces.
//!
//! A platform clamps the player to its top while the player is horizontally
//! inside the square footprint and moving downward (or resting). It never
//! applies while ascending, so jumping up through a platform from below is
//! never blocked.

use super::{ContactRule, Contacts, ResolveContext};
use crate::domain::objects::{EnvObject, ObjectKind};

/// How far below the top a falling player may already be and still get
/// caught this frame (fast falls cross several units per frame).
const CATCH_SLACK: f32 = 0.05;

pub struct PlatformRule;

impl ContactRule for PlatformRule {
    fn apply(&self, ctx: &ResolveContext, obj: &EnvObject, _rng: &mut u32, out: &mut Contacts) {
        let ObjectKind::Platform {
            half_extent,
            top_offset,
        } = obj.kind
        else {
            return;
        };

        let dx = (ctx.px - obj.x).abs();
        let dz = (ctx.pz - obj.z).abs();
        if dx > half_extent || dz > half_extent {
            return;
        }
        // One-way: never interferes with upward motion.
        if ctx.vy > 0.0 {
            return;
        }

        let top = obj.y + top_offset;
        let next_y = ctx.py + ctx.vy * ctx.dt;
        let supported = ctx.py >= top - CATCH_SLACK && next_y <= top + 1e-3;
        if supported && out.support.is_none() {
            out.support = Some((obj.id, top));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::Tuning;

    fn platform() -> EnvObject {
        EnvObject {
            id: 3,
            x: 0.0,
            y: 2.0,
            z: 0.0,
            radius: 3.0,
            kind: ObjectKind::Platform {
                half_extent: 2.0,
                top_offset: 0.5,
            },
        }
    }

    fn ctx(tuning: &Tuning, py: f32, vy: f32) -> ResolveContext<'_> {
        ResolveContext {
            tuning,
            dt: 1.0 / 60.0,
            px: 0.5,
            py,
            pz: -0.5,
            vx: 0.0,
            vy,
            vz: 0.0,
            player_radius: 0.6,
        }
    }

    #[test]
    fn supports_a_descending_player_at_the_top() {
        let tuning = Tuning::default();
        let mut rng = 0u32;
        let mut out = Contacts::new();
        // top = 2.5; falling from just above it
        PlatformRule.apply(&ctx(&tuning, 2.52, -4.0), &platform(), &mut rng, &mut out);
        assert_eq!(out.support, Some((3, 2.5)));
    }

    #[test]
    fn keeps_supporting_while_resting() {
        let tuning = Tuning::default();
        let mut rng = 0u32;
        let mut out = Contacts::new();
        PlatformRule.apply(&ctx(&tuning, 2.5, 0.0), &platform(), &mut rng, &mut out);
        assert_eq!(out.support, Some((3, 2.5)));
    }

    #[test]
    fn never_blocks_ascent_from_below() {
        let tuning = Tuning::default();
        let mut rng = 0u32;
        let mut out = Contacts::new();
        PlatformRule.apply(&ctx(&tuning, 1.0, 9.0), &platform(), &mut rng, &mut out);
        assert!(out.support.is_none());
    }

    #[test]
    fn ignores_player_outside_footprint() {
        let tuning = Tuning::default();
        let mut rng = 0u32;
        let mut out = Contacts::new();
        let mut c = ctx(&tuning, 2.52, -4.0);
        c.px = 2.5; // beyond half_extent 2.0
        PlatformRule.apply(&c, &platform(), &mut rng, &mut out);
        assert!(out.support.is_none());
    }
}

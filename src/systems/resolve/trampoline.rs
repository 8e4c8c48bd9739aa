//! TrampolineRule - vertical impulse on a strictly descending crossing.
//!
//! The bounce fires only when the player is moving downward AND would cross
//! the bounce threshold during this frame. Zero vertical velocity exactly at
//! the threshold never fires; once launched upward the rule cannot re-trigger
//! until the player descends through the threshold again. That strict-descent
//! requirement is what kills re-trigger jitter while the player is still
//! inside the trampoline's radius.

use super::{ContactRule, Contacts, ResolveContext};
use crate::core::rand::signed_unit;
use crate::domain::objects::{EnvObject, ObjectKind};

pub struct TrampolineRule;

impl ContactRule for TrampolineRule {
    fn apply(&self, ctx: &ResolveContext, obj: &EnvObject, rng: &mut u32, out: &mut Contacts) {
        let ObjectKind::Trampoline {
            bounce_force,
            threshold_offset,
        } = obj.kind
        else {
            return;
        };

        if ctx.horizontal_dist2(obj) > obj.radius * obj.radius {
            return;
        }
        // Strict descent: vy == 0 at the threshold must not fire.
        if ctx.vy >= 0.0 {
            return;
        }

        let threshold = obj.y + threshold_offset;
        let next_y = ctx.py + ctx.vy * ctx.dt;
        let crossing = ctx.py > threshold && next_y <= threshold;
        if crossing && out.bounce.is_none() {
            let jitter = signed_unit(rng) * ctx.tuning.bounce_jitter;
            out.bounce = Some((obj.id, bounce_force + jitter));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::Tuning;

    fn trampoline() -> EnvObject {
        EnvObject {
            id: 9,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            radius: 2.0,
            kind: ObjectKind::Trampoline {
                bounce_force: 12.0,
                threshold_offset: 1.0,
            },
        }
    }

    fn ctx(tuning: &Tuning, py: f32, vy: f32) -> ResolveContext<'_> {
        ResolveContext {
            tuning,
            dt: 1.0 / 60.0,
            px: 0.0,
            py,
            pz: 0.0,
            vx: 0.0,
            vy,
            vz: 0.0,
            player_radius: 0.6,
        }
    }

    #[test]
    fn fires_on_descending_crossing_with_bounded_jitter() {
        let tuning = Tuning::default();
        let mut rng = 7u32;
        let mut out = Contacts::new();
        // descending through y=1 threshold this frame
        TrampolineRule.apply(&ctx(&tuning, 1.05, -8.0), &trampoline(), &mut rng, &mut out);
        let (id, impulse) = out.bounce.expect("bounce should fire");
        assert_eq!(id, 9);
        assert!(impulse >= 12.0 - tuning.bounce_jitter);
        assert!(impulse <= 12.0 + tuning.bounce_jitter);
    }

    #[test]
    fn never_fires_while_ascending_or_hovering() {
        let tuning = Tuning::default();
        let mut rng = 7u32;
        let mut out = Contacts::new();
        TrampolineRule.apply(&ctx(&tuning, 1.0, 6.0), &trampoline(), &mut rng, &mut out);
        assert!(out.bounce.is_none());
        // exactly zero vy at the threshold: strict descent says no
        TrampolineRule.apply(&ctx(&tuning, 1.0, 0.0), &trampoline(), &mut rng, &mut out);
        assert!(out.bounce.is_none());
    }

    #[test]
    fn no_fire_outside_radius() {
        let tuning = Tuning::default();
        let mut rng = 7u32;
        let mut out = Contacts::new();
        let mut c = ctx(&tuning, 1.05, -8.0);
        c.px = 5.0; // outside radius 2
        TrampolineRule.apply(&c, &trampoline(), &mut rng, &mut out);
        assert!(out.bounce.is_none());
    }
}

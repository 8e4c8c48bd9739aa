//! WaterGateRule - deterrent push-back.
//!
//! While the player is inside a gate's radius, an outward horizontal
//! acceleration accumulates. Gates deter traversal; they never damage and
//! never touch vertical motion, so a determined player can still power
//! through against the push.

use super::{ContactRule, Contacts, ResolveContext};
use crate::domain::objects::{EnvObject, ObjectKind};

pub struct WaterGateRule;

impl ContactRule for WaterGateRule {
    fn apply(&self, ctx: &ResolveContext, obj: &EnvObject, _rng: &mut u32, out: &mut Contacts) {
        let ObjectKind::WaterGate { push_strength } = obj.kind else {
            return;
        };
        let dx = ctx.px - obj.x;
        let dz = ctx.pz - obj.z;
        let d2 = dx * dx + dz * dz;
        if d2 >= obj.radius * obj.radius {
            return;
        }
        let d = d2.sqrt();
        // Dead center has no outward direction; pick a stable one.
        let (nx, nz) = if d > 1e-4 { (dx / d, dz / d) } else { (1.0, 0.0) };
        out.push_x += nx * push_strength;
        out.push_z += nz * push_strength;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::Tuning;

    #[test]
    fn pushes_outward_inside_only() {
        let tuning = Tuning::default();
        let gate = EnvObject {
            id: 1,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            radius: 4.0,
            kind: ObjectKind::WaterGate { push_strength: 6.0 },
        };
        let mut rng = 0u32;
        let mut out = Contacts::new();
        let inside = ResolveContext {
            tuning: &tuning,
            dt: 1.0 / 60.0,
            px: 2.0,
            py: 0.0,
            pz: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            player_radius: 0.6,
        };
        WaterGateRule.apply(&inside, &gate, &mut rng, &mut out);
        // straight out along +x
        assert!((out.push_x - 6.0).abs() < 1e-5);
        assert_eq!(out.push_z, 0.0);

        out.clear();
        let outside = ResolveContext { px: 5.0, ..inside };
        WaterGateRule.apply(&outside, &gate, &mut rng, &mut out);
        assert_eq!(out.push_x, 0.0);
    }
}

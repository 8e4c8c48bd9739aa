//! ClimbRule - grip detection on climbable surfaces.
//!
//! Gripping slows a fall and re-arms the jump; the actual velocity shaping
//! happens in the state machine. Grip holds while the player is within the
//! climbable's radius and between its base and its grip height.

use super::{ContactRule, Contacts, ResolveContext};
use crate::domain::objects::{EnvObject, ObjectKind};

pub struct ClimbRule;

impl ContactRule for ClimbRule {
    fn apply(&self, ctx: &ResolveContext, obj: &EnvObject, _rng: &mut u32, out: &mut Contacts) {
        let ObjectKind::Climbable { grip_height } = obj.kind else {
            return;
        };
        let reach = obj.radius + ctx.player_radius;
        if ctx.horizontal_dist2(obj) > reach * reach {
            return;
        }
        if ctx.py < obj.y || ctx.py > obj.y + grip_height {
            return;
        }
        if out.climb.is_none() {
            out.climb = Some(obj.id);
        }
    }
}

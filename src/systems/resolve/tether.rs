//! TetherRule - anchor proximity.
//!
//! Being in range of an anchor only ENABLES attach; it never moves the
//! player. The state machine attaches when the attach edge arrives while a
//! candidate anchor is recorded here.

use super::{ContactRule, Contacts, ResolveContext};
use crate::domain::objects::{EnvObject, ObjectKind};

pub struct TetherRule;

impl ContactRule for TetherRule {
    fn apply(&self, ctx: &ResolveContext, obj: &EnvObject, _rng: &mut u32, out: &mut Contacts) {
        let ObjectKind::TetherAnchor { length } = obj.kind else {
            return;
        };
        let dx = obj.x - ctx.px;
        let dy = obj.y - ctx.py;
        let dz = obj.z - ctx.pz;
        let dist2 = dx * dx + dy * dy + dz * dz;
        if dist2 <= length * length && out.tether_anchor.is_none() {
            out.tether_anchor = Some(obj.id);
        }
    }
}

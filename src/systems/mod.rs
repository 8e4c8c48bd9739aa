//! Systems: narrow-phase contact resolution and the player state machine.

pub mod player;
pub mod resolve;

//! Domain model: the environment-object taxonomy and the tuning bundle.

pub mod objects;
pub mod tuning;

//! Spatial partitioning over the ground plane.

pub mod grid;

pub use grid::SpatialGrid;

//! Shared helpers
//!
//! - Geometry: points, centroids, circle areas and overlaps

pub mod geometry;

pub use geometry::{centroid, circle_overlap, radius_from_area, Point};

//! Engine data structures: transforms, quads, vertices and textures.
//!
//! - `transform` holds per-quad location, Euler rotation and scale
//! - `geometry` is the unit quad template (corners, UVs, index pattern)
//! - `quad` contains the pending quad descriptor and the GPU vertex
//! - `texture` contains texture handles and the GPU texture wrapper

pub mod geometry;
pub mod quad;
pub mod texture;
pub mod transform;

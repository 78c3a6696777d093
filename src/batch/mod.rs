//! Batch storage and vertex generation.
//!
//! - `slots` maps bound textures to sampler slots for the current batch
//! - `buffer` stores pending quads and the vertex scratch they expand into
//! - `builder` expands pending quads into vertices across worker threads
//!
//! The flush policy that ties these together lives in
//! [`BatchRenderer`](crate::renderer::BatchRenderer).

pub mod buffer;
pub mod builder;
pub mod slots;

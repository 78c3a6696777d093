//! Render pipelines.
//!
//! - `quad` is the batched quad pipeline: per-vertex colour, UV and texture
//!   slot, sampled from one of sixteen slot bindings

pub mod quad;

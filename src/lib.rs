//! batch-ngin
//!
//! A 2D quad batching renderer. Quads are queued between `begin_scene` and
//! `end_scene`, accumulated into a fixed-capacity batch and submitted with one
//! indexed draw call per batch. Up to sixteen textures share a batch through
//! texture slots; vertex expansion is spread across worker threads.
//!
//! High-level modules
//! - `backend`: the draw and uniform traits a renderer submits to
//! - `batch`: quad buffer, texture-slot table and parallel vertex builder
//! - `camera`: view and projection for a scene
//! - `config`: batch capacities and thread count
//! - `context`: GPU adapter/device/queue setup
//! - `data_structures`: transforms, quad geometry, vertices and textures
//! - `pipelines`: the wgpu quad pipeline and its shader
//! - `render`: the wgpu implementation of the backend traits
//! - `renderer`: scene lifecycle and flush scheduling
//! - `resources`: helpers to load textures from disk
//!

pub mod backend;
pub mod batch;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod pipelines;
pub mod render;
pub mod renderer;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use backend::{DrawBackend, UniformSink};
pub use camera::Camera;
pub use cgmath::{Deg, Matrix4, Vector3};
pub use config::RendererConfig;
pub use data_structures::{texture::TextureHandle, transform::Transform};
pub use renderer::{BatchRenderer, FrameStats, SceneState};

/// Installs `env_logger` as the global logger, configured through `RUST_LOG`.
/// Safe to call more than once.
pub fn init_logger() {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };
}

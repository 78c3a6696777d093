//! Loading texture files from disk into a [`WgpuBackend`].

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{data_structures::texture::TextureHandle, render::WgpuBackend};

/// Resolves `file_name` against the `assets` directory of the working dir.
pub fn asset_path(file_name: &str) -> PathBuf {
    Path::new("./").join("assets").join(file_name)
}

pub fn load_binary(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Reads and decodes an image file, using its extension as the format hint,
/// and registers it with `backend`.
pub fn load_texture(
    backend: &mut WgpuBackend,
    path: impl AsRef<Path>,
) -> anyhow::Result<TextureHandle> {
    let path = path.as_ref();
    let data = load_binary(path)?;
    let label = path.to_string_lossy();
    let handle = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => backend.load_texture_with_format(&data, &label, ext)?,
        None => backend.load_texture(&data, &label)?,
    };
    log::info!(
        "loaded texture {} as id {} ({}x{}, {} channels)",
        label,
        handle.id(),
        handle.width(),
        handle.height(),
        handle.channels()
    );
    Ok(handle)
}

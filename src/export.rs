//! PNG screenshots of the framebuffer.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::CodefallResult;
use crate::render::surface::Surface;

/// Write `surface` to `path` as straight-alpha RGBA PNG, creating parent directories.
#[tracing::instrument(skip(surface), fields(width = surface.width(), height = surface.height()))]
pub fn write_png(surface: &Surface, path: &Path) -> CodefallResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &surface.to_straight_rgba8(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// `dir/frame_00042.png`.
pub fn frame_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use tracing::debug;

use crate::assemble::sink::{FrameRgba, FrameSink, SinkConfig};
use crate::foundation::error::{SplashError, SplashResult};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Decode the image at `path` into straight RGBA8.
pub fn decode_frame(path: &Path) -> SplashResult<FrameRgba> {
    let img = image::open(path)
        .map_err(|e| SplashError::image(format!("decode '{}': {e}", path.display())))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(FrameRgba {
        width,
        height,
        data: img.into_raw(),
    })
}

/// Decode `paths` in order and push each as one frame into `sink`.
///
/// Single pass: each image is decoded right before it is pushed. The first decode or encode
/// failure aborts the sequence. Returns the number of frames written.
pub fn assemble(
    paths: &[PathBuf],
    frame_delay: Duration,
    sink: &mut dyn FrameSink,
) -> SplashResult<usize> {
    if paths.is_empty() {
        return Err(SplashError::no_data("no frames to assemble"));
    }

    sink.begin(SinkConfig {
        frame_delay,
        frame_count: paths.len(),
    })?;
    for (idx, path) in paths.iter().enumerate() {
        let frame = decode_frame(path)?;
        debug!(idx, path = %path.display(), "appending frame");
        sink.push_frame(idx, &frame)?;
    }
    sink.end()?;

    Ok(paths.len())
}

/// Image files directly inside `dir`, sorted by file name.
///
/// Only `png`, `jpg`, `jpeg` and `gif` files are considered (extension match is
/// case-insensitive).
pub fn collect_folder_frames(dir: &Path) -> SplashResult<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read directory '{}'", dir.display()))?
            .path();
        let is_frame = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_frame {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/sequence.rs"]
mod tests;

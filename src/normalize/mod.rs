use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::foundation::error::{SplashError, SplashResult};

/// Target frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Construct a resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject zero-area resolutions.
    pub fn validate(&self) -> SplashResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SplashError::validation(
                "target width/height must be non-zero",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = SplashError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1977x946`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SplashError::validation(format!("expected WIDTHxHEIGHT, got '{s}'"));
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(bad)?;
        let res = Self::new(
            w.trim().parse().map_err(|_| bad())?,
            h.trim().parse().map_err(|_| bad())?,
        );
        res.validate()?;
        Ok(res)
    }
}

/// Sibling file the resized image is encoded into before it replaces the original.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.resizing"))
}

/// Resample the image at `path` to exactly `target` and overwrite it.
///
/// Uses Lanczos3 filtering and keeps the format implied by the file extension. An image that
/// already has the target size is left as is. The result is encoded into a sibling file and
/// renamed over the original, so on error the file on disk is unchanged.
pub fn resize_in_place(path: &Path, target: Resolution) -> SplashResult<()> {
    target.validate()?;

    let format = ImageFormat::from_path(path)
        .map_err(|e| SplashError::image(format!("format of '{}': {e}", path.display())))?;
    let img = image::open(path)
        .map_err(|e| SplashError::image(format!("decode '{}': {e}", path.display())))?;

    if img.width() == target.width && img.height() == target.height {
        debug!(path = %path.display(), "already at target size");
        return Ok(());
    }

    let resized = img.resize_exact(target.width, target.height, FilterType::Lanczos3);
    let staging = staging_path(path);
    let replaced = resized
        .save_with_format(&staging, format)
        .map_err(|e| SplashError::image(format!("write '{}': {e}", staging.display())))
        .and_then(|()| {
            std::fs::rename(&staging, path).map_err(|e| {
                SplashError::image(format!("replace '{}': {e}", path.display()))
            })
        });
    if let Err(e) = replaced {
        match std::fs::remove_file(&staging) {
            Ok(()) => {}
            Err(rm) if rm.kind() == std::io::ErrorKind::NotFound => {}
            Err(rm) => warn!(path = %staging.display(), error = %rm, "failed to remove staging file"),
        }
        return Err(e);
    }

    info!(path = %path.display(), %target, "resized image");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/resize.rs"]
mod tests;

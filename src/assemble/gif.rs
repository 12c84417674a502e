use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use tracing::{info, warn};

use crate::assemble::sink::{FrameRgba, FrameSink, SinkConfig};
use crate::foundation::error::{SplashError, SplashResult};

/// NeuQuant sampling factor (1 = best quality, 30 = fastest). 10 is the encoder's own default.
const GIF_SPEED: i32 = 10;

fn ensure_parent_dir(path: &Path) -> SplashResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Output state between `begin` and `end`. The logical screen size is only known once the first
/// frame arrives, so the encoder is built lazily on top of the already created file.
enum Output {
    Idle,
    Opened(BufWriter<File>),
    Encoding(gif::Encoder<BufWriter<File>>),
}

/// Writes frames to an infinitely looping animated GIF.
///
/// The output file is created in `begin`, so a sink that is never started leaves no file
/// behind. Once the file exists it is only kept if `end` succeeds: a sink dropped before that
/// removes its partial output. All frames must share the size of the first one; mixed sizes are
/// rejected.
pub struct GifSink {
    out_path: PathBuf,
    output: Output,
    /// True from file creation until `end` has written and flushed everything.
    unfinished: bool,
    delay: Duration,
    size: Option<(u32, u32)>,
    written: usize,
}

impl GifSink {
    /// Create a sink writing to `out_path` (parent directories are created on `begin`).
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            output: Output::Idle,
            unfinished: false,
            delay: Duration::ZERO,
            size: None,
            written: 0,
        }
    }

    /// Output path.
    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    /// GIF delays are counted in hundredths of a second.
    fn delay_centis(&self) -> u16 {
        u16::try_from(self.delay.as_millis() / 10).unwrap_or(u16::MAX)
    }

    fn encoder(
        &mut self,
        width: u16,
        height: u16,
    ) -> SplashResult<&mut gif::Encoder<BufWriter<File>>> {
        self.output = match std::mem::replace(&mut self.output, Output::Idle) {
            Output::Opened(writer) => {
                let mut encoder = gif::Encoder::new(writer, width, height, &[])
                    .map_err(|e| SplashError::image(format!("write gif header: {e}")))?;
                encoder
                    .set_repeat(gif::Repeat::Infinite)
                    .map_err(|e| SplashError::image(format!("configure gif encoder: {e}")))?;
                Output::Encoding(encoder)
            }
            other => other,
        };
        match &mut self.output {
            Output::Encoding(encoder) => Ok(encoder),
            _ => Err(SplashError::validation("gif sink was not started")),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> SplashResult<()> {
        ensure_parent_dir(&self.out_path)?;
        let file = File::create(&self.out_path)
            .with_context(|| format!("create gif '{}'", self.out_path.display()))?;

        self.output = Output::Opened(BufWriter::new(file));
        self.unfinished = true;
        self.delay = cfg.frame_delay;
        self.size = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &FrameRgba) -> SplashResult<()> {
        if let Output::Idle = self.output {
            return Err(SplashError::validation("gif sink was not started"));
        }

        let size = (frame.width, frame.height);
        match self.size {
            None => self.size = Some(size),
            Some(first) if first != size => {
                return Err(SplashError::validation(format!(
                    "frame {idx} is {}x{}, expected {}x{} (enable resizing for mixed sizes)",
                    size.0, size.1, first.0, first.1
                )));
            }
            Some(_) => {}
        }

        let (Ok(width), Ok(height)) = (u16::try_from(frame.width), u16::try_from(frame.height))
        else {
            return Err(SplashError::validation(format!(
                "frame {idx} is {}x{}, larger than a GIF can hold",
                frame.width, frame.height
            )));
        };
        let expected = usize::from(width) * usize::from(height) * 4;
        if expected == 0 || frame.data.len() != expected {
            return Err(SplashError::validation(
                "frame data size mismatch with width*height*4",
            ));
        }

        let delay = self.delay_centis();
        let mut pixels = frame.data.clone();
        let mut gif_frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, GIF_SPEED);
        gif_frame.delay = delay;

        self.encoder(width, height)?
            .write_frame(&gif_frame)
            .map_err(|e| SplashError::image(format!("encode frame {idx}: {e}")))?;

        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> SplashResult<()> {
        let encoder = match std::mem::replace(&mut self.output, Output::Idle) {
            Output::Encoding(encoder) => encoder,
            Output::Opened(_) => {
                return Err(SplashError::no_data("no frames were written to the gif"));
            }
            Output::Idle => return Err(SplashError::validation("gif sink was not started")),
        };

        let writer = encoder
            .into_inner()
            .map_err(|e| SplashError::image(format!("write gif trailer: {e}")))?;
        writer.into_inner().map_err(|e| {
            SplashError::image(format!("flush '{}': {}", self.out_path.display(), e.error()))
        })?;

        self.unfinished = false;
        info!(path = %self.out_path.display(), frames = self.written, "GIF created");
        Ok(())
    }
}

impl Drop for GifSink {
    fn drop(&mut self) {
        self.output = Output::Idle;
        if !self.unfinished {
            return;
        }
        // Only regular files are ours to remove; device or fifo targets are left alone.
        let is_file = std::fs::symlink_metadata(&self.out_path)
            .is_ok_and(|m| m.file_type().is_file());
        if is_file && let Err(e) = std::fs::remove_file(&self.out_path) {
            warn!(path = %self.out_path.display(), error = %e, "failed to remove partial gif");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/gif.rs"]
mod tests;

use std::time::Duration;

use crate::foundation::error::SplashResult;

/// One decoded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight (non-premultiplied) RGBA8, row-major, tightly packed.
    pub data: Vec<u8>,
}

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Display time of every frame.
    pub frame_delay: Duration,
    /// Number of frames that will be pushed.
    pub frame_count: usize,
}

/// Sink contract for consuming frames in sequence order.
///
/// `begin` is called once, then `push_frame` with `idx` = 0, 1, 2, ..., then `end`. A sink is
/// never started for an empty sequence.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SplashResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: usize, frame: &FrameRgba) -> SplashResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SplashResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<FrameRgba>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if the sink was started.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[FrameRgba] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SplashResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, _idx: usize, frame: &FrameRgba) -> SplashResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> SplashResult<()> {
        self.finished = true;
        Ok(())
    }
}

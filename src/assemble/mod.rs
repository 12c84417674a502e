//! Frame assembly: decode ordered images and stream them into a sink.

/// Animated GIF sink.
pub mod gif;
/// Decoding and ordering of frame sources.
pub mod sequence;
/// Frame sink trait and the in-memory sink.
pub mod sink;

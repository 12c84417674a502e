//! splashgif turns a repository's release history into an animated GIF.
//!
//! A run walks the repository's tags (or release branches), downloads one splash image per
//! release, optionally resizes every image to a common resolution, and streams the images into a
//! [`FrameSink`] in ascending version order.
//!
//! # Pipeline overview
//!
//! 1. **Enumerate**: a [`VersionSource`] lists candidate tags page by page.
//! 2. **Order**: records are de-duplicated by [`Version`] and sorted numerically.
//! 3. **Fetch**: [`AssetFetcher`] downloads each release's image into the output directory.
//! 4. **Normalize** (optional): [`resize_in_place`] rescales each image to a fixed resolution.
//! 5. **Assemble**: [`assemble`] decodes the images in order and pushes them into a sink
//!    ([`GifSink`] writes the animated GIF).
//! 6. **Cleanup**: downloaded images are removed (best-effort).
//!
//! Everything runs on the calling thread. Network access goes through the [`HttpTransport`]
//! seam so the whole pipeline can be driven offline with [`StaticTransport`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assemble;
mod enumerate;
mod fetch;
mod foundation;
mod http;
mod normalize;
mod pipeline;

pub use assemble::gif::GifSink;
pub use assemble::sequence::{assemble, collect_folder_frames, decode_frame};
pub use assemble::sink::{FrameRgba, FrameSink, InMemorySink, SinkConfig};
pub use enumerate::branches::BranchListingSource;
pub use enumerate::tags::TagApiSource;
pub use enumerate::VersionSource;
pub use fetch::{AssetFetcher, AssetFile, asset_file_name};
pub use foundation::error::{SplashError, SplashResult};
pub use foundation::version::{
    Version, VersionPattern, VersionRecord, dedup_versions, sort_versions,
};
pub use http::link::next_link;
pub use http::transport::{HttpResponse, HttpTransport, ReqwestTransport, StaticTransport};
pub use normalize::{Resolution, resize_in_place};
pub use pipeline::config::{PipelineConfig, SourceMode};
pub use pipeline::driver::{Pipeline, RunReport, Stage};

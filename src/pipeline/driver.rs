use std::path::PathBuf;

use anyhow::Context as _;
use tracing::{error, info, warn};

use crate::assemble::sequence::assemble;
use crate::assemble::sink::FrameSink;
use crate::enumerate::VersionSource;
use crate::enumerate::branches::BranchListingSource;
use crate::enumerate::tags::TagApiSource;
use crate::fetch::AssetFetcher;
use crate::foundation::error::SplashResult;
use crate::foundation::version::{VersionPattern, VersionRecord, dedup_versions, sort_versions};
use crate::http::transport::HttpTransport;
use crate::normalize::resize_in_place;
use crate::pipeline::config::{PipelineConfig, SourceMode};

/// Pipeline states, in the order a complete run visits them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    Start,
    /// Listing versions from the remote.
    Enumerating,
    /// Downloading assets.
    Downloading,
    /// Resizing downloaded assets.
    Normalizing,
    /// Streaming frames into the sink.
    Assembling,
    /// Removing downloaded assets.
    Cleanup,
    /// Run finished.
    Done,
}

/// Outcome of [`Pipeline::run`].
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Stages visited, in order.
    pub stages: Vec<Stage>,
    /// De-duplicated versions in ascending order.
    pub enumerated: Vec<VersionRecord>,
    /// Versions whose asset was downloaded and queued as a frame, in frame order.
    pub assembled: Vec<VersionRecord>,
    /// Versions whose download failed.
    pub skipped: Vec<VersionRecord>,
    /// Frames written to the sink.
    pub frames_written: usize,
}

impl RunReport {
    fn enter(&mut self, stage: Stage) {
        if !self.stages.contains(&stage) {
            self.stages.push(stage);
        }
    }
}

/// Runs enumerate → order → fetch → normalize → assemble → cleanup once, sequentially.
pub struct Pipeline<'a> {
    cfg: &'a PipelineConfig,
    transport: &'a dyn HttpTransport,
}

impl<'a> Pipeline<'a> {
    /// Validate `cfg` and bind it to `transport` for the duration of the run.
    pub fn new(cfg: &'a PipelineConfig, transport: &'a dyn HttpTransport) -> SplashResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg, transport })
    }

    /// Version source selected by the configured mode.
    pub fn source(&self) -> SplashResult<Box<dyn VersionSource + 'a>> {
        let cfg = self.cfg;
        let source: Box<dyn VersionSource + 'a> = match cfg.mode {
            SourceMode::Tags => Box::new(TagApiSource::new(
                self.transport,
                &cfg.tags_api_url,
                cfg.per_page,
                cfg.tag_marker.as_str(),
                VersionPattern::tag(&cfg.tag_prefix)?,
            )),
            SourceMode::Branches => Box::new(BranchListingSource::new(
                self.transport,
                cfg.branches_url.as_str(),
                &cfg.branch_prefix,
                VersionPattern::branch(&cfg.branch_prefix)?,
                cfg.max_pages,
            )),
        };
        Ok(source)
    }

    /// Execute the run, streaming frames into `sink`.
    ///
    /// Finding no versions or downloading no assets is not an error: the run ends early, `sink`
    /// is never started and the report says why. Failed downloads and failed resizes are logged
    /// and skipped. Only a failure while assembling frames is returned as `Err`, after cleanup.
    pub fn run(&self, sink: &mut dyn FrameSink) -> SplashResult<RunReport> {
        let cfg = self.cfg;
        let mut report = RunReport::default();
        report.enter(Stage::Start);

        report.enter(Stage::Enumerating);
        let source = self.source()?;
        let mut records = dedup_versions(source.versions());
        if records.is_empty() {
            warn!("no release versions found, aborting");
            report.enter(Stage::Done);
            return Ok(report);
        }
        info!(count = records.len(), "found release versions");
        for r in &records {
            info!(tag = %r.raw_tag, version = %r.version, "found");
        }
        sort_versions(&mut records);
        report.enumerated = records.clone();

        report.enter(Stage::Downloading);
        std::fs::create_dir_all(&cfg.output_dir).with_context(|| {
            format!(
                "failed to create download directory '{}'",
                cfg.output_dir.display()
            )
        })?;
        let fetcher = AssetFetcher::new(
            self.transport,
            &cfg.raw_content_base,
            &cfg.asset_subpath,
            &cfg.output_dir,
        );

        let mut paths = Vec::new();
        for record in records {
            let asset = match fetcher.fetch(&record) {
                Ok(asset) => asset,
                Err(_) => {
                    report.skipped.push(record);
                    continue;
                }
            };
            if let Some(target) = cfg.target_resolution {
                report.enter(Stage::Normalizing);
                if let Err(e) = resize_in_place(&asset.local_path, target) {
                    warn!(path = %asset.local_path.display(), error = %e, "resize skipped, keeping original");
                }
            }
            paths.push(asset.local_path);
            report.assembled.push(asset.version);
        }

        if paths.is_empty() {
            warn!("no images downloaded, GIF creation skipped");
            report.enter(Stage::Done);
            return Ok(report);
        }

        report.enter(Stage::Assembling);
        let assembled = assemble(&paths, cfg.frame_delay(), sink);

        if !cfg.keep_downloads {
            report.enter(Stage::Cleanup);
            cleanup(&paths);
        }
        report.enter(Stage::Done);

        match assembled {
            Ok(frames) => {
                report.frames_written = frames;
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "assembly failed");
                Err(e)
            }
        }
    }
}

/// Best-effort removal; files that are already gone are fine.
fn cleanup(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove download"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;

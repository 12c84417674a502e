use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{SplashError, SplashResult};
use crate::normalize::Resolution;

/// Where release versions are enumerated from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Paginated JSON tags API (`Link` header pagination).
    #[default]
    Tags,
    /// Scraped HTML branch listing (`?page=N` pagination).
    Branches,
}

/// Immutable configuration of one pipeline run.
///
/// Every field has a default targeting the QGIS repository on GitHub, so an empty JSON object is
/// a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Enumeration mode.
    pub mode: SourceMode,

    /// Tags API endpoint (without query string).
    pub tags_api_url: String,
    /// Page size requested from the tags API.
    pub per_page: u32,
    /// Substring a tag must contain to be considered.
    pub tag_marker: String,
    /// Tag prefix before `-<major>_<minor>_<patch>`.
    pub tag_prefix: String,

    /// HTML branch listing endpoint (without query string).
    pub branches_url: String,
    /// Branch prefix before `-<major>_<minor>`.
    pub branch_prefix: String,
    /// Upper bound on listing pages read in branch mode.
    pub max_pages: u32,

    /// Raw content host; assets live at `<raw_content_base>/<tag>/<asset_subpath>`.
    pub raw_content_base: String,
    /// Path of the asset inside a tagged tree.
    pub asset_subpath: String,

    /// Directory downloaded assets are written to.
    pub output_dir: PathBuf,
    /// Animated GIF output path.
    pub output_path: PathBuf,
    /// Resize every asset to this resolution before assembly.
    pub target_resolution: Option<Resolution>,
    /// Display time of each frame in milliseconds.
    pub frame_delay_ms: u64,
    /// Keep downloaded assets after the run.
    pub keep_downloads: bool,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Bearer token for the hosting API. Never read from or written to config files.
    #[serde(skip)]
    pub auth_token: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Tags,
            tags_api_url: "https://api.github.com/repos/qgis/QGIS/tags".to_string(),
            per_page: 100,
            tag_marker: "final".to_string(),
            tag_prefix: "final".to_string(),
            branches_url: "https://github.com/qgis/QGIS/branches/all".to_string(),
            branch_prefix: "release".to_string(),
            max_pages: 100,
            raw_content_base: "https://raw.githubusercontent.com/qgis/QGIS".to_string(),
            asset_subpath: "images/splash/splash.png".to_string(),
            output_dir: PathBuf::from("splash_images"),
            output_path: PathBuf::from("qgis_splash.gif"),
            target_resolution: Some(Resolution::new(1977, 946)),
            frame_delay_ms: 500,
            keep_downloads: false,
            request_timeout_secs: 10,
            user_agent: "splashgif".to_string(),
            auth_token: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> SplashResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SplashError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SplashResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SplashError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges.
    pub fn validate(&self) -> SplashResult<()> {
        if self.per_page == 0 {
            return Err(SplashError::validation("per_page must be non-zero"));
        }
        if self.max_pages == 0 {
            return Err(SplashError::validation("max_pages must be non-zero"));
        }
        if self.frame_delay_ms == 0 {
            return Err(SplashError::validation("frame_delay_ms must be non-zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(SplashError::validation(
                "request_timeout_secs must be non-zero",
            ));
        }
        if self.tag_prefix.is_empty() || self.branch_prefix.is_empty() {
            return Err(SplashError::validation("version prefixes must be non-empty"));
        }
        if let Some(res) = self.target_resolution {
            res.validate()?;
        }
        Ok(())
    }

    /// Per-frame display time.
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;

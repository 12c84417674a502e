use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::{info, warn};

use crate::foundation::error::{SplashError, SplashResult};
use crate::foundation::version::{Version, VersionRecord};
use crate::http::transport::HttpTransport;

/// A downloaded asset on local disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetFile {
    /// Release the asset belongs to.
    pub version: VersionRecord,
    /// Where the asset bytes were written.
    pub local_path: PathBuf,
}

/// File name used for a version's downloaded asset: `splash_<major>.<minor>.png`.
pub fn asset_file_name(version: Version) -> String {
    format!("splash_{version}.png")
}

/// Downloads one asset per release from `<raw_content_base>/<raw_tag>/<asset_subpath>`.
pub struct AssetFetcher<'a> {
    transport: &'a dyn HttpTransport,
    raw_content_base: String,
    asset_subpath: String,
    output_dir: PathBuf,
}

impl<'a> AssetFetcher<'a> {
    /// Create a fetcher writing into `output_dir`.
    pub fn new(
        transport: &'a dyn HttpTransport,
        raw_content_base: &str,
        asset_subpath: &str,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transport,
            raw_content_base: raw_content_base.trim_end_matches('/').to_string(),
            asset_subpath: asset_subpath.trim_start_matches('/').to_string(),
            output_dir: output_dir.into(),
        }
    }

    /// Download URL for `record`.
    pub fn asset_url(&self, record: &VersionRecord) -> String {
        format!(
            "{}/{}/{}",
            self.raw_content_base, record.raw_tag, self.asset_subpath
        )
    }

    /// Local path `record`'s asset is written to.
    pub fn local_path(&self, record: &VersionRecord) -> PathBuf {
        self.output_dir.join(asset_file_name(record.version))
    }

    /// Download `record`'s asset.
    ///
    /// Returns [`SplashError::Fetch`] on network failure, non-success status, or when the bytes
    /// cannot be written. Nothing is written unless the request succeeded.
    pub fn fetch(&self, record: &VersionRecord) -> SplashResult<AssetFile> {
        let url = self.asset_url(record);
        let resp = self.transport.get(&url).inspect_err(|e| {
            warn!(tag = %record.raw_tag, error = %e, "asset request failed");
        })?;

        if !resp.is_success() {
            warn!(%url, status = resp.status, "failed to download asset");
            return Err(SplashError::fetch(format!(
                "download {url}: HTTP {}",
                resp.status
            )));
        }

        let local_path = self.local_path(record);
        write_asset(&local_path, &resp.body).map_err(|e| {
            warn!(path = %local_path.display(), error = %e, "failed to store asset");
            SplashError::fetch(format!("store {}: {e:#}", local_path.display()))
        })?;

        info!(tag = %record.raw_tag, version = %record.version, "downloaded splash image");
        Ok(AssetFile {
            version: record.clone(),
            local_path,
        })
    }
}

fn write_asset(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/fetch.rs"]
mod tests;

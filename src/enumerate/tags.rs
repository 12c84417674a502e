use serde::Deserialize;
use tracing::{debug, warn};

use crate::enumerate::VersionSource;
use crate::foundation::version::{VersionPattern, VersionRecord};
use crate::http::link::next_link;
use crate::http::transport::HttpTransport;

/// Tag object as returned by the tags API. Only the name is used.
#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Lists release tags from a GitHub-style JSON tags API.
///
/// The first page is `<api_url>?per_page=<n>`; further pages follow the `rel="next"` entry of
/// the `Link` header.
pub struct TagApiSource<'a> {
    transport: &'a dyn HttpTransport,
    first_page: String,
    marker: String,
    pattern: VersionPattern,
}

impl<'a> TagApiSource<'a> {
    /// Create a source for `api_url`. Tags must contain `marker` and match `pattern`.
    pub fn new(
        transport: &'a dyn HttpTransport,
        api_url: &str,
        per_page: u32,
        marker: impl Into<String>,
        pattern: VersionPattern,
    ) -> Self {
        Self {
            transport,
            first_page: format!("{api_url}?per_page={per_page}"),
            marker: marker.into(),
            pattern,
        }
    }

    fn accept(&self, name: &str) -> Option<VersionRecord> {
        if !name.contains(self.marker.as_str()) {
            return None;
        }
        let record = self.pattern.record(name);
        if record.is_none() {
            debug!(tag = name, "not a release tag");
        }
        record
    }
}

impl VersionSource for TagApiSource<'_> {
    fn versions(&self) -> Box<dyn Iterator<Item = VersionRecord> + '_> {
        let pages = TagPages {
            transport: self.transport,
            next_url: Some(self.first_page.clone()),
        };
        Box::new(
            pages
                .flatten()
                .filter_map(move |tag| self.accept(&tag.name)),
        )
    }
}

/// Lazily walks `Link`-paginated tag pages.
struct TagPages<'a> {
    transport: &'a dyn HttpTransport,
    next_url: Option<String>,
}

impl Iterator for TagPages<'_> {
    type Item = Vec<TagEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.next_url.take()?;
        debug!(%url, "fetching tag page");

        let resp = match self.transport.get(&url) {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "tag listing aborted");
                return None;
            }
        };
        if !resp.is_success() {
            warn!(%url, status = resp.status, "failed to fetch tags");
            return None;
        }

        let tags: Vec<TagEntry> = match serde_json::from_slice(&resp.body) {
            Ok(tags) => tags,
            Err(e) => {
                warn!(%url, error = %e, "malformed tag page");
                return None;
            }
        };

        self.next_url = resp.link.as_deref().and_then(next_link);
        Some(tags)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/enumerate/tags.rs"]
mod tests;

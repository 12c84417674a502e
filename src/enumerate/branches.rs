use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::enumerate::VersionSource;
use crate::foundation::version::{VersionPattern, VersionRecord};
use crate::http::transport::HttpTransport;

/// `<a ... class="... branch-name ..." ...>text</a>`, capturing the inner text.
static BRANCH_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bclass\s*=\s*"[^"]*\bbranch-name\b[^"]*"[^>]*>(.*?)</a>"#)
        .expect("valid regex")
});

static INNER_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Text of every branch-name anchor in a listing page, in document order.
pub(crate) fn branch_names(html: &str) -> Vec<String> {
    BRANCH_ANCHOR_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| INNER_TAG_RE.replace_all(m.as_str(), "").trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Lists release branches by scraping a paginated HTML branch listing.
///
/// Pages are requested as `<listing_url>?page=1`, `?page=2`, ... until a page contains no
/// branch-name anchors at all, or `max_pages` pages have been read.
pub struct BranchListingSource<'a> {
    transport: &'a dyn HttpTransport,
    listing_url: String,
    prefix: String,
    pattern: VersionPattern,
    max_pages: u32,
}

impl<'a> BranchListingSource<'a> {
    /// Create a source for `listing_url` keeping branches named `<prefix>-...`.
    pub fn new(
        transport: &'a dyn HttpTransport,
        listing_url: impl Into<String>,
        prefix: &str,
        pattern: VersionPattern,
        max_pages: u32,
    ) -> Self {
        Self {
            transport,
            listing_url: listing_url.into(),
            prefix: format!("{prefix}-"),
            pattern,
            max_pages,
        }
    }

    fn accept(&self, name: &str) -> Option<VersionRecord> {
        if !name.starts_with(self.prefix.as_str()) {
            return None;
        }
        let record = self.pattern.record(name);
        if record.is_none() {
            debug!(branch = name, "not a release branch");
        }
        record
    }
}

impl VersionSource for BranchListingSource<'_> {
    fn versions(&self) -> Box<dyn Iterator<Item = VersionRecord> + '_> {
        let pages = BranchPages {
            source: self,
            page: 1,
            done: false,
        };
        Box::new(
            pages
                .flatten()
                .filter_map(move |name| self.accept(&name)),
        )
    }
}

/// Lazily walks listing pages; yields the raw branch names of each page.
struct BranchPages<'s, 'a> {
    source: &'s BranchListingSource<'a>,
    page: u32,
    done: bool,
}

impl Iterator for BranchPages<'_, '_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.page > self.source.max_pages {
            warn!(
                max_pages = self.source.max_pages,
                "branch listing page limit reached"
            );
            self.done = true;
            return None;
        }

        let url = format!("{}?page={}", self.source.listing_url, self.page);
        debug!(%url, "fetching branch page");

        let html = match self.source.transport.get(&url) {
            Ok(resp) if resp.is_success() => String::from_utf8_lossy(&resp.body).into_owned(),
            Ok(resp) => {
                warn!(%url, status = resp.status, "failed to fetch branch listing");
                self.done = true;
                return None;
            }
            Err(e) => {
                warn!(error = %e, "branch listing aborted");
                self.done = true;
                return None;
            }
        };

        let names = branch_names(&html);
        if names.is_empty() {
            self.done = true;
            return None;
        }
        self.page += 1;
        Some(names)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/enumerate/branches.rs"]
mod tests;

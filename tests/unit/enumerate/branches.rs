use super::*;
use crate::foundation::version::Version;
use crate::http::transport::{HttpResponse, StaticTransport};

const LISTING: &str = "https://host.test/o/r/branches/all";

fn html(names: &[&str]) -> Vec<u8> {
    let mut out = String::from("<html><body><ul>");
    for n in names {
        out.push_str(&format!(
            "<li><a class=\"branch-name css-truncate-target v-align-baseline\" href=\"/o/r/tree/{n}\">\n  {n}\n</a></li>"
        ));
    }
    out.push_str("<a class=\"other\" href=\"#\">release-9_9</a></ul></body></html>");
    out.into_bytes()
}

fn source(t: &StaticTransport, max_pages: u32) -> BranchListingSource<'_> {
    BranchListingSource::new(
        t,
        LISTING,
        "release",
        VersionPattern::branch("release").unwrap(),
        max_pages,
    )
}

#[test]
fn branch_names_reads_anchor_text() {
    let page = r#"<a href="/x" class="branch-name"><span>release-3_4</span></a>
<a class='branch-name'>ignored single quotes</a>
<A CLASS="Branch-Name">master</A>"#;
    assert_eq!(branch_names(page), ["release-3_4", "master"]);
}

#[test]
fn walks_pages_until_one_is_empty() {
    let t = StaticTransport::new()
        .route(
            format!("{LISTING}?page=1"),
            HttpResponse::ok(html(&["master", "release-3_10", "release-3_2"])),
        )
        .route(
            format!("{LISTING}?page=2"),
            HttpResponse::ok(html(&["feature-x", "release-10_0"])),
        )
        .route(format!("{LISTING}?page=3"), HttpResponse::ok(html(&[])));

    let got: Vec<Version> = source(&t, 100).versions().map(|r| r.version).collect();
    assert_eq!(
        got,
        [Version::new(3, 10), Version::new(3, 2), Version::new(10, 0)]
    );
    assert_eq!(t.requests().len(), 3);
}

#[test]
fn page_without_releases_does_not_end_listing() {
    let t = StaticTransport::new()
        .route(format!("{LISTING}?page=1"), HttpResponse::ok(html(&["main"])))
        .route(
            format!("{LISTING}?page=2"),
            HttpResponse::ok(html(&["release-3_0"])),
        );

    let got: Vec<String> = source(&t, 100).versions().map(|r| r.raw_tag).collect();
    assert_eq!(got, ["release-3_0"]);
}

#[test]
fn error_status_and_page_cap_end_listing() {
    let t = StaticTransport::new()
        .route(
            format!("{LISTING}?page=1"),
            HttpResponse::ok(html(&["release-3_0"])),
        )
        .route(format!("{LISTING}?page=2"), HttpResponse::status(500));
    assert_eq!(source(&t, 100).versions().count(), 1);

    let capped = StaticTransport::new()
        .route(
            format!("{LISTING}?page=1"),
            HttpResponse::ok(html(&["release-3_0"])),
        )
        .route(
            format!("{LISTING}?page=2"),
            HttpResponse::ok(html(&["release-3_2"])),
        );
    assert_eq!(source(&capped, 1).versions().count(), 1);
    assert_eq!(capped.requests().len(), 1);
}

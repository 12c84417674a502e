use super::*;

#[test]
fn picks_next_among_several_relations() {
    let header = r#"<https://api.github.com/repositories/1/tags?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/tags?per_page=100&page=9>; rel="last""#;
    assert_eq!(
        next_link(header).as_deref(),
        Some("https://api.github.com/repositories/1/tags?per_page=100&page=2")
    );
}

#[test]
fn next_need_not_come_first() {
    let header = r#"<https://x/tags?page=1>; rel="prev", <https://x/tags?page=3>; rel="next""#;
    assert_eq!(next_link(header).as_deref(), Some("https://x/tags?page=3"));
}

#[test]
fn last_page_has_no_next() {
    let header = r#"<https://x/tags?page=1>; rel="first", <https://x/tags?page=8>; rel="prev""#;
    assert_eq!(next_link(header), None);
    assert_eq!(next_link(""), None);
}

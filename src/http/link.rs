/// Return the `rel="next"` target of an HTTP `Link` header, if any.
///
/// `<https://api.example/tags?page=2>; rel="next", <...>; rel="last"` yields
/// `https://api.example/tags?page=2`.
pub fn next_link(header: &str) -> Option<String> {
    header
        .split(',')
        .find(|entry| entry.contains(r#"rel="next""#))
        .and_then(|entry| entry.split(';').next())
        .map(|target| {
            target
                .trim_matches(|c: char| c == '<' || c == '>' || c.is_whitespace())
                .to_string()
        })
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/http/link.rs"]
mod tests;

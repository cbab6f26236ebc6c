use std::sync::OnceLock;

use regex::Regex;

/// Visible text of an HTML fragment: tags removed, entities decoded and
/// whitespace collapsed.
pub fn strip_tags(fragment: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("Invalid tag regex"));

    let stripped = tag.replace_all(fragment, " ");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<div>hello</div>", "hello")]
    #[case("<p>a <b>bold</b> &amp; more</p>", "a bold & more")]
    #[case("<br/>", "")]
    #[case("plain", "plain")]
    fn strips(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_tags(input), expected);
    }
}

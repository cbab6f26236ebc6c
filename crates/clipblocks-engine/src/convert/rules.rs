//! Normalization tables shared by both converters.

use clipblocks_syntax::kinds::media::{self, AUDIO_EXTENSIONS};

/// Name of the default color in the target API.
pub const DEFAULT_COLOR: &str = "default";

/// Heading level from an explicit value or a type name suffix.
///
/// The explicit level wins. Otherwise `heading_N`, `headingN` and `hN` are
/// read from the type name. Anything else is level 1. Always within 1..=3.
pub fn heading_level(explicit: Option<u8>, type_name: &str) -> u8 {
    let level = explicit.or_else(|| {
        let name = type_name.trim().to_ascii_lowercase();
        let digits = name
            .strip_prefix("heading_")
            .or_else(|| name.strip_prefix("heading"))
            .or_else(|| name.strip_prefix('h'))?;
        digits.parse::<u8>().ok()
    });
    level.unwrap_or(1).clamp(1, 3)
}

/// Canonical code-block language name.
///
/// Common aliases map to the target's language list; unknown names pass
/// through trimmed and lower-cased. Empty input is `plain text`.
pub fn normalize_language(language: &str) -> String {
    let lang = language.trim().to_ascii_lowercase();
    let canonical = match lang.as_str() {
        "" | "txt" | "text" | "plain" | "plaintext" => "plain text",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" | "cjs" | "node" => "javascript",
        "py" | "python3" => "python",
        "rs" => "rust",
        "sh" | "bash" | "zsh" | "shell" | "console" => "shell",
        "ps" | "ps1" | "pwsh" => "powershell",
        "cpp" | "cc" | "cxx" | "hpp" => "c++",
        "cs" | "csharp" => "c#",
        "fs" | "fsharp" => "f#",
        "yml" => "yaml",
        "md" => "markdown",
        "rb" => "ruby",
        "kt" | "kts" => "kotlin",
        "golang" => "go",
        "objc" | "objectivec" => "objective-c",
        "htm" | "xhtml" => "html",
        "tex" | "latex" => "latex",
        "dockerfile" => "docker",
        "proto" => "protobuf",
        "vb" => "visual basic",
        "gql" => "graphql",
        "hs" => "haskell",
        "ex" | "exs" => "elixir",
        "erl" => "erlang",
        "ml" => "ocaml",
        "pl" => "perl",
        "scss" | "sass" => "scss",
        "sql" | "mysql" | "postgres" | "postgresql" => "sql",
        other => return other.to_string(),
    };
    canonical.to_string()
}

/// Color names the target API accepts, with common aliases.
fn color_name(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_ascii_lowercase();
    let base = lower.strip_suffix("_background").unwrap_or(&lower);
    match base {
        "gray" | "grey" => Some("gray"),
        "brown" => Some("brown"),
        "orange" => Some("orange"),
        "yellow" => Some("yellow"),
        "green" => Some("green"),
        "blue" => Some("blue"),
        "purple" | "violet" => Some("purple"),
        "pink" => Some("pink"),
        "red" => Some("red"),
        _ => None,
    }
}

/// Target color for a foreground/background pair.
///
/// A mapped background wins and yields `<name>_background`; otherwise a
/// mapped foreground yields `<name>`. Unmapped or absent colors are
/// `default`.
pub fn resolve_color(fg: Option<&str>, bg: Option<&str>) -> String {
    if let Some(name) = bg.and_then(color_name) {
        return format!("{name}_background");
    }
    match fg.and_then(color_name) {
        Some(name) => name.to_string(),
        None => DEFAULT_COLOR.to_string(),
    }
}

/// Placeholder domains. Subdomains of these are placeholders too.
const PLACEHOLDER_HOSTS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "test.com",
    "localhost",
];
/// Reserved top-level names that never resolve publicly.
const PLACEHOLDER_SUFFIXES: &[&str] = &[".example", ".test", ".localhost"];

/// True for an absolute http(s) URL with an audio extension on a real host.
pub fn is_valid_audio_url(raw: &str) -> bool {
    let Ok(parsed) = url::Url::parse(raw.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let real_host = match parsed.host() {
        Some(url::Host::Domain(domain)) => !is_placeholder_domain(&domain.to_ascii_lowercase()),
        Some(url::Host::Ipv4(ip)) => !ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => !ip.is_loopback(),
        None => false,
    };
    real_host && media::has_extension(parsed.path(), AUDIO_EXTENSIONS)
}

fn is_placeholder_domain(domain: &str) -> bool {
    PLACEHOLDER_HOSTS.iter().any(|h| {
        domain == *h
            || domain
                .strip_suffix(h)
                .is_some_and(|rest| rest.ends_with('.'))
    }) || PLACEHOLDER_SUFFIXES.iter().any(|s| domain.ends_with(s))
}

/// PDFs are recognised by extension or mime type.
pub fn is_pdf(url: &str, mime: Option<&str>) -> bool {
    mime.is_some_and(|m| m.trim().eq_ignore_ascii_case("application/pdf"))
        || media::extension(url).is_some_and(|ext| ext == "pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some(2), "heading_3", 2)]
    #[case(None, "heading_3", 3)]
    #[case(None, "heading2", 2)]
    #[case(None, "h1", 1)]
    #[case(None, "heading", 1)]
    #[case(Some(6), "heading", 3)]
    #[case(Some(0), "heading", 1)]
    #[case(None, "h9", 3)]
    fn heading_levels(#[case] explicit: Option<u8>, #[case] name: &str, #[case] level: u8) {
        assert_eq!(heading_level(explicit, name), level);
    }

    #[rstest]
    #[case("TS", "typescript")]
    #[case(" ts ", "typescript")]
    #[case("typescript", "typescript")]
    #[case("py", "python")]
    #[case("zsh", "shell")]
    #[case("cpp", "c++")]
    #[case("cs", "c#")]
    #[case("yml", "yaml")]
    #[case("", "plain text")]
    #[case("txt", "plain text")]
    #[case(" Haxe ", "haxe")]
    fn languages(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_language(input), expected);
    }

    #[rstest]
    #[case(None, None, "default")]
    #[case(Some("red"), None, "red")]
    #[case(None, Some("blue"), "blue_background")]
    #[case(Some("red"), Some("blue"), "blue_background")]
    #[case(Some("red"), Some("default"), "red")]
    #[case(Some("grey"), None, "gray")]
    #[case(Some("#ff0000"), None, "default")]
    #[case(None, Some("yellow_background"), "yellow_background")]
    fn colors(#[case] fg: Option<&str>, #[case] bg: Option<&str>, #[case] expected: &str) {
        assert_eq!(resolve_color(fg, bg), expected);
    }

    #[rstest]
    #[case("https://cdn.site.io/a.mp3", true)]
    #[case("https://cdn.site.io/a.MP3?x=1#t", true)]
    #[case("https://example.com/test.mp3", false)]
    #[case("http://localhost/a.wav", false)]
    #[case("https://music.test/a.ogg", false)]
    #[case("https://cdn.example.com/a.mp3", false)]
    #[case("https://www.example.com/a.mp3", false)]
    #[case("https://sub.test.com/a.mp3", false)]
    #[case("http://127.0.0.1/a.mp3", false)]
    #[case("http://127.0.0.2/a.mp3", false)]
    #[case("http://[::1]/a.mp3", false)]
    #[case("https://notexample.com/a.mp3", true)]
    #[case("https://cdn.site.io/a.mp4", false)]
    #[case("ftp://cdn.site.io/a.mp3", false)]
    #[case("a.mp3", false)]
    fn audio_urls(#[case] url: &str, #[case] valid: bool) {
        assert_eq!(is_valid_audio_url(url), valid);
    }

    #[test]
    fn pdf_detection() {
        assert!(is_pdf("https://x.io/doc.PDF?dl=1", None));
        assert!(is_pdf("https://x.io/download", Some("application/pdf")));
        assert!(!is_pdf("https://x.io/doc.docx", None));
    }
}

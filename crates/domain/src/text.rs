//! Pure text rules: excerpts, heading markers, slugs

use regex::Regex;
use std::sync::LazyLock;

/// Default excerpt length used by the feed
pub const DEFAULT_EXCERPT_CHARS: usize = 200;

/// Titles longer than this are shortened in listings
pub const TITLE_MAX_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"));

/// Shorten content to at most `max_chars` characters plus an ellipsis.
///
/// Content within the limit is returned unchanged. Longer content is cut at
/// the last whitespace at or before `max_chars`, so a word is never split.
/// When no such whitespace exists the excerpt is just the ellipsis.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }

    let cut = content
        .char_indices()
        .take(max_chars + 1)
        .filter(|(_, c)| c.is_whitespace())
        .map(|(idx, _)| idx)
        .last()
        .unwrap_or(0);

    format!("{}{}", &content[..cut], ELLIPSIS)
}

/// Shorten a title for listings
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_MAX_CHARS {
        let head: String = title.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}{}", head, ELLIPSIS)
    } else {
        title.to_string()
    }
}

/// Derive a URL-safe slug from a title.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen and strips leading/trailing hyphens. Collisions are not
/// checked.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// The three kinds of body line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `# ` prefix, marker stripped
    Title(&'a str),
    /// `## ` prefix, marker stripped
    Subtitle(&'a str),
    Plain(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("# ") {
        LineKind::Title(rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        LineKind::Subtitle(rest)
    } else {
        LineKind::Plain(line)
    }
}

/// A rendered body line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub emphasized: bool,
}

/// Render one line; every rendered line ends with a single trailing space
pub fn render_line(line: &str) -> RenderedLine {
    match classify_line(line) {
        LineKind::Title(rest) => RenderedLine {
            text: format!("{} ", rest.to_uppercase()),
            emphasized: true,
        },
        LineKind::Subtitle(rest) => RenderedLine {
            text: format!("{} ", rest),
            emphasized: true,
        },
        LineKind::Plain(rest) => RenderedLine {
            text: format!("{} ", rest),
            emphasized: false,
        },
    }
}

/// Render a body line by line
pub fn render_lines(content: &str) -> Vec<RenderedLine> {
    content.split('\n').map(render_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_content_unchanged() {
        assert_eq!(excerpt("Bonjour le monde", 200), "Bonjour le monde");
        let exact = "a".repeat(200);
        assert_eq!(excerpt(&exact, 200), exact);
    }

    #[test]
    fn test_excerpt_cuts_at_last_space() {
        // 50 words of 4 letters + space = 250 chars
        let content = "abcd ".repeat(50);
        let content = content.trim_end();
        assert!(content.chars().count() > 200);

        let result = excerpt(content, 200);
        assert!(result.ends_with("..."));
        assert!(result.chars().count() <= 203);

        let body = result.trim_end_matches("...");
        // Every kept word is whole
        assert!(body.split(' ').all(|w| w == "abcd"));
        // Space at index 199 is the last one at or before 200
        assert_eq!(body.chars().count(), 199);
    }

    #[test]
    fn test_excerpt_space_exactly_at_limit() {
        let content = format!("{} tail", "x".repeat(10));
        assert_eq!(excerpt(&content, 10), format!("{}...", "x".repeat(10)));
    }

    #[test]
    fn test_excerpt_never_splits_words() {
        let content = "Le journalisme automatique transforme profondément les rédactions";
        for limit in 1..content.chars().count() {
            let result = excerpt(content, limit);
            let body = result.trim_end_matches("...");
            assert!(
                content.starts_with(body),
                "excerpt must be a prefix for limit {}",
                limit
            );
            let next = content[body.len()..].chars().next();
            assert!(
                body.is_empty() || next.is_some_and(char::is_whitespace),
                "cut must land on whitespace for limit {}",
                limit
            );
        }
    }

    #[test]
    fn test_excerpt_single_long_word() {
        assert_eq!(excerpt("anticonstitutionnellement", 5), "...");
    }

    #[test]
    fn test_excerpt_multibyte() {
        let content = "éèà ùûü ôöî çœæ";
        let result = excerpt(content, 8);
        assert_eq!(result, "éèà ùûü...");
    }

    #[test]
    fn test_heading_rules() {
        assert_eq!(render_line("# Hello").text, "HELLO ");
        assert!(render_line("# Hello").emphasized);
        assert_eq!(render_line("## World").text, "World ");
        assert!(render_line("## World").emphasized);
        assert_eq!(render_line("plain text").text, "plain text ");
        assert!(!render_line("plain text").emphasized);
    }

    #[test]
    fn test_classify_line_requires_space_after_marker() {
        assert_eq!(classify_line("#hashtag"), LineKind::Plain("#hashtag"));
        assert_eq!(classify_line("### Deep"), LineKind::Plain("### Deep"));
        assert_eq!(classify_line(""), LineKind::Plain(""));
    }

    #[test]
    fn test_render_lines_splits_on_newline() {
        let lines = render_lines("# Titre\n## Sous-titre\nCorps");
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["TITRE ", "Sous-titre ", "Corps "]);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("AI & Machine Learning!"), "ai-machine-learning");
        assert_eq!(
            slugify("Latest Technology Trends in 2025"),
            "latest-technology-trends-in-2025"
        );
        assert_eq!(slugify("  --Hello--  "), "hello");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Court"), "Court");
        let long = "t".repeat(60);
        let result = truncate_title(&long);
        assert_eq!(result.chars().count(), 53);
        assert!(result.ends_with("..."));
    }
}

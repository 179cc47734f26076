//! Plain-text normalization of assistant replies.
//!
//! Assistant messages arrive as lightweight markdown with file-search
//! citations such as `【4:0†source】`. Chat channels downstream render plain
//! text only, so every completed reply goes through [`sanitize`].

use std::sync::OnceLock;

use regex::Regex;

struct Patterns {
    heading: Regex,
    bold: Regex,
    link: Regex,
    citation: Regex,
    whitespace: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        heading: compile(r"(?m)^#+\s*"),
        bold: compile(r"\*\*(.*?)\*\*"),
        link: compile(r"\[.*?\]\((.*?)\)"),
        citation: compile(r"【.*?†.*?】"),
        whitespace: compile(r"\s+"),
    })
}

// Only called with the literal patterns above.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("sanitizer patterns are valid")
}

/// Normalize assistant markup into a single line of plain text.
///
/// Each pass strips headings, unwraps bold, collapses links to their target,
/// drops citation markers and collapses whitespace. Removing one marker can
/// expose another (`"*【a†b】*x*【c†d】*"` becomes `"**x**"`), so passes repeat
/// until the text stops changing. Every pass only deletes characters or turns
/// whitespace into spaces, which bounds the loop.
pub fn sanitize(text: &str) -> String {
    let mut current = sanitize_pass(text);
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(text: &str) -> String {
    let p = patterns();
    let text = p.heading.replace_all(text, "");
    let text = p.bold.replace_all(&text, "${1}");
    let text = p.link.replace_all(&text, "${1}");
    let text = p.citation.replace_all(&text, "");
    normalize_whitespace(&text)
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    patterns()
        .whitespace
        .replace_all(text, " ")
        .trim()
        .to_string()
}

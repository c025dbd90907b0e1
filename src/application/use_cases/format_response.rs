use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)#{1,6}\s+").expect("valid heading regex"));
static BOLD_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[*+-]\s+").expect("valid bullet regex"));

const FENCE: &str = "```";

/// Normalize model output for display in a plain-text chat list.
///
/// Markdown decorations the terminal cannot render are stripped (heading
/// markers, `**bold**` markers), list bullets become `•`, trailing whitespace and
/// repeated blank lines are removed. Fenced code blocks are kept verbatim.
pub fn format_response(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut in_fence = false;
    let mut previous_blank = false;

    for line in normalized.lines() {
        if line.trim_start().starts_with(FENCE) {
            in_fence = !in_fence;
            lines.push(line.trim_end().to_string());
            previous_blank = false;
            continue;
        }

        if in_fence {
            lines.push(line.to_string());
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
            continue;
        }
        previous_blank = false;

        lines.push(format_line(line));
    }

    lines.join("\n").trim().to_string()
}

fn format_line(line: &str) -> String {
    let line = HEADING.replace(line, "$1");
    let line = BOLD_STARS.replace_all(&line, "$1");
    BULLET.replace(&line, "$1• ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(format_response("Hi there"), "Hi there");
    }

    #[test]
    fn test_strips_bold_and_headings() {
        let raw = "## Summary\nThis is **important** and __init__ stays.";
        assert_eq!(
            format_response(raw),
            "Summary\nThis is important and __init__ stays."
        );
    }

    #[test]
    fn test_bullets_become_dots() {
        let raw = "* **First** item\n- second\n  + nested";
        assert_eq!(format_response(raw), "• First item\n• second\n  • nested");
    }

    #[test]
    fn test_collapses_blank_runs_and_trims() {
        let raw = "\n\nOne   \n\n\n\nTwo\r\n\r\n";
        assert_eq!(format_response(raw), "One\n\nTwo");
    }

    #[test]
    fn test_code_fence_contents_are_kept() {
        let raw = "Code:\n```rust\n* not a bullet  \n\n\nlet x = **y;\n```\n**done**";
        assert_eq!(
            format_response(raw),
            "Code:\n```rust\n* not a bullet  \n\n\nlet x = **y;\n```\ndone"
        );
    }

    #[test]
    fn test_horizontal_rule_is_not_a_bullet() {
        assert_eq!(format_response("a\n---\nb"), "a\n---\nb");
    }
}

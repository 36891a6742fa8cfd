//! Greedy word wrapping for failure messages
//!
//! A document is a sequence of paragraphs separated by blank lines.
//!
//! - Prose paragraphs are re-flowed into one line, then wrapped.
//! - List paragraphs (lines starting with `* `, `- ` or `1. `) keep one
//!   item per line. Each wrapped item gets a hanging indent under its text.
//!
//! Widths are counted in characters, and every output line includes the
//! indent. A word longer than the width is placed on its own line
//! unbroken.

/// Default terminal width.
pub const TERMINAL_WIDTH: usize = 72;

/// Wrap `document` to `width` columns, indenting every line by `indent`.
///
/// ```
/// use assay::word_wrap;
///
/// let wrapped = word_wrap("one two three four", 9, 2);
/// assert_eq!(wrapped, "  one two\n  three\n  four");
/// ```
#[must_use]
pub fn word_wrap(document: &str, width: usize, indent: usize) -> String {
    let pad = " ".repeat(indent);
    document
        .split("\n\n")
        .map(|paragraph| wrap_paragraph(paragraph, width, &pad))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn wrap_paragraph(paragraph: &str, width: usize, pad: &str) -> String {
    let lines: Vec<&str> = paragraph.lines().collect();
    let is_list = lines.first().is_some_and(|l| list_marker(l.trim_start()).is_some());
    if is_list {
        lines
            .iter()
            .map(|line| {
                let line = line.trim_start();
                let hang = list_marker(line).unwrap_or(0);
                let rest = format!("{pad}{}", " ".repeat(hang));
                wrap_line(line, width, pad, &rest)
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        let joined = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        wrap_line(&joined, width, pad, pad)
    }
}

/// Width of a list marker including its trailing space.
fn list_marker(line: &str) -> Option<usize> {
    if line.starts_with("* ") || line.starts_with("- ") {
        return Some(2);
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && line[digits..].starts_with(". ") {
        return Some(digits + 2);
    }
    None
}

fn wrap_line(text: &str, width: usize, first_prefix: &str, rest_prefix: &str) -> String {
    let mut out = Vec::new();
    let mut current = first_prefix.to_string();
    let mut current_len = first_prefix.chars().count();
    let mut empty = true;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_len = word.chars().count();
        if empty {
            current.push_str(word);
            current_len += word_len;
            empty = false;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            out.push(current);
            current = format!("{rest_prefix}{word}");
            current_len = rest_prefix.chars().count() + word_len;
        }
    }
    out.push(current);
    out.join("\n")
}

//! Terminal styling for tasknote output.
//!
//! Search hits carry highlight fragments as HTML: matched terms are wrapped in
//! `<mark>` tags and the surrounding text is entity-escaped. This crate turns those
//! fragments into ANSI-styled terminal text, and provides the small set of styles
//! the CLI uses for headers and status lines.

#![warn(missing_docs)]

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for warnings and matches).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Opening tag around a matched term in a fragment.
pub const MARK_OPEN: &str = "<mark>";

/// Closing tag around a matched term in a fragment.
pub const MARK_CLOSE: &str = "</mark>";

/// Entities produced by the fragment escaper, with their plain-text replacements.
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a success message (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Formats text as an error (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", colors::RED, text, colors::RESET)
}

/// Renders an HTML highlight fragment for the terminal.
///
/// `<mark>` spans become bold yellow, and escaped entities are restored.
pub fn render_fragment(fragment: &str) -> String {
    let styled = fragment
        .replace(MARK_OPEN, &format!("{}{}", colors::BOLD, colors::YELLOW))
        .replace(MARK_CLOSE, colors::RESET);
    unescape(&styled)
}

/// Strips `<mark>` tags from a fragment and restores escaped entities.
pub fn plain_fragment(fragment: &str) -> String {
    unescape(&fragment.replace(MARK_OPEN, "").replace(MARK_CLOSE, ""))
}

/// Replaces HTML entities with the characters they stand for.
///
/// `&amp;` is handled last so that `&amp;lt;` decodes to `&lt;`, not `<`.
fn unescape(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

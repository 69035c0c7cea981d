//! Terminal utility functions

/// ANSI reset sequence
pub const RESET: &str = "\x1b[0m";

/// ANSI bold
pub const BOLD: &str = "\x1b[1m";

/// ANSI dim gray (used for secondary text)
pub const GRAY: &str = "\x1b[90m";

/// ANSI red (errors)
pub const RED: &str = "\x1b[31m";

/// Wrap text in an ANSI style when colour output is enabled
pub fn paint(text: &str, style: &str, enabled: bool) -> String {
    if enabled && !style.is_empty() {
        format!("{}{}{}", style, text, RESET)
    } else {
        text.to_string()
    }
}

/// Format a URL as a clickable terminal hyperlink if supported.
///
/// Uses OSC 8 escape sequences for terminals that support hyperlinks.
/// Falls back to plain colored text on unsupported terminals, and to the
/// bare URL when colour output is disabled.
pub fn terminal_link(url: &str, color: bool) -> String {
    if !color {
        return url.to_string();
    }
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        // OSC 8 hyperlink: \x1b]8;;URL\x07TEXT\x1b]8;;\x07
        format!("\x1b]8;;{}\x07\x1b[36m{}\x1b[0m\x1b]8;;\x07", url, url)
    } else {
        format!("\x1b[36m{}\x1b[0m", url)
    }
}

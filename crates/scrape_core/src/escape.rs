use std::borrow::Cow;

const MARKUP_CHARS: &[char] = &['&', '<', '>', '"', '\''];

/// Escape `& < > " '` for interpolation into markup. All other characters pass through.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(MARKUP_CHARS) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

use std::cmp::Ordering;

/// Splits `file.html#anchor` into the page and the anchor.
pub fn split_anchor(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((file, anchor)) => (file, Some(anchor)),
        None => (url, None),
    }
}

/// Orders strings by UTF-16 code units, as JavaScript's `<` does.
///
/// Differs from `str` ordering only when one side has a character at or
/// above U+E000 and the other a supplementary-plane character at the same
/// position.
pub fn js_cmp(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        return a.cmp(b);
    }
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Writes `value` as a JavaScript string literal delimited by `quote`.
pub fn js_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

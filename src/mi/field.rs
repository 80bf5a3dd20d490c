//! Extraction of `key=<delimited value>` fields from MI text.
//!
//! Values are located by key and cut out as the balanced span between a pair of delimiters.
//! Structural spans (`{...}`, `[...]`) are returned as-is, so they can be searched again
//! for nested keys. Quoted values are the leaves of the grammar and are returned
//! unescaped. This way every escape sequence of a record is decoded exactly once.

use std::borrow::Cow;

/// Pair of delimiters surrounding a field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// `"..."`, C-like string constant.
    Quote,
    /// `{...}`, tuple.
    Brace,
    /// `[...]`, list.
    Bracket,
}

impl Delimiter {
    fn open(self) -> u8 {
        match self {
            Delimiter::Quote => b'"',
            Delimiter::Brace => b'{',
            Delimiter::Bracket => b'[',
        }
    }

    fn close(self) -> u8 {
        match self {
            Delimiter::Quote => b'"',
            Delimiter::Brace => b'}',
            Delimiter::Bracket => b']',
        }
    }
}

/// Return a value of the first `key` followed by a balanced `delim` span.
/// Return [`None`] if there is no such key or if the value is not balanced.
///
/// # Arguments
///
/// * `text`: source text
/// * `key`: key literal including trailing `=`, for example `frame=`
/// * `delim`: delimiters around the value
pub fn first<'a>(text: &'a str, key: &str, delim: Delimiter) -> Option<Cow<'a, str>> {
    spans(text, key, delim, Some(1))
        .into_iter()
        .next()
        .map(|(start, end)| value(&text[start..end], delim))
}

/// Return values of all `key` occurrences followed by a balanced `delim` span, in text order.
/// Scanning stops at the first unbalanced value.
pub fn all<'a>(text: &'a str, key: &str, delim: Delimiter) -> Vec<Cow<'a, str>> {
    spans(text, key, delim, None)
        .into_iter()
        .map(|(start, end)| value(&text[start..end], delim))
        .collect()
}

/// Return unescaped content of a quoted `key`, or an empty string if there is no such key.
pub fn string<'a>(text: &'a str, key: &str) -> Cow<'a, str> {
    first(text, key, Delimiter::Quote).unwrap_or_default()
}

fn value(raw: &str, delim: Delimiter) -> Cow<'_, str> {
    match delim {
        Delimiter::Quote => unescape(raw),
        Delimiter::Brace | Delimiter::Bracket => Cow::Borrowed(raw),
    }
}

fn is_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Find inner ranges (without delimiters) of values for `key`.
/// Keys inside string constants are ignored, as are keys that are a suffix of a longer key.
fn spans(text: &str, key: &str, delim: Delimiter, limit: Option<usize>) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let key = key.as_bytes();
    let mut result = vec![];

    if key.is_empty() {
        return result;
    }

    let mut in_string = false;
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];

        if in_string {
            match b {
                b'\\' => pos += 2,
                b'"' => {
                    in_string = false;
                    pos += 1;
                }
                _ => pos += 1,
            }
            continue;
        }

        let at_boundary = pos == 0 || !is_key_char(bytes[pos - 1]);
        if at_boundary && bytes[pos..].starts_with(key) {
            let mut open = pos + key.len();
            while open < bytes.len() && bytes[open].is_ascii_whitespace() {
                open += 1;
            }

            if open < bytes.len() && bytes[open] == delim.open() {
                let Some(close) = balanced_close(bytes, open, delim) else {
                    log::debug!(target: "mi", "unbalanced value for key {:?}", String::from_utf8_lossy(key));
                    break;
                };

                result.push((open + 1, close));
                if limit.is_some_and(|limit| result.len() >= limit) {
                    break;
                }
                pos = close + 1;
                continue;
            }
        }

        if b == b'"' {
            in_string = true;
        }
        pos += 1;
    }

    result
}

/// Return position of the delimiter closing the one at `open`.
fn balanced_close(bytes: &[u8], open: usize, delim: Delimiter) -> Option<usize> {
    let mut in_string = false;
    let mut depth = 0usize;
    let mut pos = open;

    if delim == Delimiter::Quote {
        pos += 1;
        while pos < bytes.len() {
            match bytes[pos] {
                b'\\' => pos += 2,
                b'"' => return Some(pos),
                _ => pos += 1,
            }
        }
        return None;
    }

    while pos < bytes.len() {
        let b = bytes[pos];
        if in_string {
            match b {
                b'\\' => {
                    pos += 2;
                    continue;
                }
                b'"' => in_string = false,
                _ => {}
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == delim.open() {
            depth += 1;
        } else if b == delim.close() {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
        }
        pos += 1;
    }

    None
}

/// Decode C-style escape sequences (`\"`, `\\`, `\n`, `\t`, `\r`, octal `\NNN`, ...).
/// Unknown escapes are replaced by the escaped character itself.
/// Octal escapes above `\377` don't fit a byte and are kept as written.
pub fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b != b'\\' || pos + 1 == bytes.len() {
            out.push(b);
            pos += 1;
            continue;
        }

        let escaped = bytes[pos + 1];
        pos += 2;
        match escaped {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'e' => out.push(0x1b),
            b'0'..=b'7' => {
                let start = pos - 2;
                let mut code = (escaped - b'0') as u32;
                let mut digits = 1;
                while digits < 3 && pos < bytes.len() && (b'0'..=b'7').contains(&bytes[pos]) {
                    code = code * 8 + (bytes[pos] - b'0') as u32;
                    pos += 1;
                    digits += 1;
                }
                match u8::try_from(code) {
                    Ok(byte) => out.push(byte),
                    Err(_) => out.extend_from_slice(&bytes[start..pos]),
                }
            }
            other => out.push(other),
        }
    }

    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

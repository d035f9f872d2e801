//! Content-derived resource keys.
//!
//! Keys are a pure function of the *cleaned* source text, so two spans that
//! only differ in whitespace or escaping share one key and one translation.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[btnfr]").expect("escape regex is valid"));

static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\x0C]+").expect("whitespace regex is valid"));

/// Largest prime below 2^30.
const HASH_MODULUS: u64 = 1_073_741_789;

/// Largest prime below 2^16, co-prime with [`HASH_MODULUS`].
const HASH_MULTIPLIER: u64 = 65_521;

/// Build the key for a piece of source text.
///
/// # Examples
///
/// ```
/// use mdl10n::core::make_key;
///
/// assert_eq!(make_key("This is a test"), "r654479252");
/// assert_eq!(make_key("  This   is a\ntest "), "r654479252");
/// ```
pub fn make_key(source: &str) -> String {
    hash_key(&clean_string(source))
}

/// Hash already-cleaned text into an `r<digits>` key.
///
/// The hash runs over UTF-16 code units so keys stay compatible with
/// translation memories produced by other tooling.
pub fn hash_key(cleaned: &str) -> String {
    let hash = cleaned.encode_utf16().fold(0u64, |hash, unit| {
        (hash + u64::from(unit)) * HASH_MULTIPLIER % HASH_MODULUS
    });
    format!("r{}", hash)
}

/// Normalize text before hashing: unescape, turn whitespace escapes into
/// spaces, collapse whitespace runs and trim.
pub fn clean_string(text: &str) -> String {
    let unescaped = unescape_string(text);
    let spaced = WHITESPACE_ESCAPE_RE.replace_all(&unescaped, " ");
    WHITESPACE_RUN_RE.replace_all(&spaced, " ").trim_matches(' ').to_string()
}

/// Resolve backslash escapes that denote a literal character.
///
/// Handles `\uXXXX` (including surrogate pairs), octal `\NNN`, `\\`, `\'` and
/// `\"`. Whitespace escapes such as `\n` are left for [`clean_string`].
pub fn unescape_string(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' || i + 1 >= chars.len() {
            out.push(c);
            i += 1;
            continue;
        }

        let next = chars[i + 1];
        match next {
            '\\' | '\'' | '"' => {
                out.push(next);
                i += 2;
            }
            'u' => match read_hex_unit(&chars, i + 2) {
                Some(high) if (0xD800..0xDC00).contains(&high) => {
                    let low = (chars.get(i + 6) == Some(&'\\') && chars.get(i + 7) == Some(&'u'))
                        .then(|| read_hex_unit(&chars, i + 8))
                        .flatten()
                        .filter(|low| (0xDC00..0xE000).contains(low));
                    match low {
                        Some(low) => {
                            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                            out.extend(char::from_u32(code));
                            i += 12;
                        }
                        None => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            i += 6;
                        }
                    }
                }
                Some(unit) => {
                    out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
                    i += 6;
                }
                None => {
                    out.push(c);
                    i += 1;
                }
            },
            '0'..='7' => {
                let mut value = 0u32;
                let mut len = 0;
                while len < 3 {
                    match chars.get(i + 1 + len).and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            len += 1;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
                i += 1 + len;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn read_hex_unit(chars: &[char], start: usize) -> Option<u32> {
    let digits = chars.get(start..start + 4)?;
    digits
        .iter()
        .try_fold(0u32, |acc, d| d.to_digit(16).map(|v| acc * 16 + v))
}

//! Splitting raw post text into lowercase word tokens.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

fn url_re() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| {
        Regex::new(
            r"(?xi)
            ^(?:
                (?:https?|ftp)://\S+
              | www\.\S+
              | [\w-]+(?:\.[\w-]+)*\.(?:de|com|org|net|eu|be|info|io|ly|me|tv|gl)(?:/\S*)?
            )$",
        )
        .unwrap()
    })
}

fn punctuation_re() -> &'static Regex {
    static PUNCT_RE: OnceLock<Regex> = OnceLock::new();
    PUNCT_RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

/// Replace every character that is neither a word character nor whitespace
/// with a single space.
pub fn strip_punctuation(text: &str) -> String {
    punctuation_re().replace_all(text, " ").into_owned()
}

/// True for chunks such as `https://spd.de/x`, `www.cdu.de` or `youtu.be/abc`.
pub fn is_url_like(chunk: &str) -> bool {
    url_re().is_match(chunk)
}

/// Tokenize `text` into lowercase tokens.
///
/// Whitespace-separated chunks that look like URLs are dropped whole. The rest
/// are split at Unicode word boundaries, so punctuation survives as separate
/// tokens; whitespace-only pieces never appear in the output.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        if is_url_like(chunk) {
            continue;
        }
        for piece in chunk.split_word_bounds() {
            if piece.trim().is_empty() {
                continue;
            }
            tokens.push(piece.to_lowercase());
        }
    }
    tokens
}

//! Text helpers for catalog search and slugs.
//!
//! Matching in the catalog is accent- and case-insensitive, so "Camperón" and
//! "camperon" produce the same search terms.

use unicode_normalization::UnicodeNormalization;

/// Characters of context kept on each side of a match by [`snippet`].
pub const SNIPPET_CONTEXT: usize = 30;

/// Default maximum length of a snippet without a match.
pub const SNIPPET_MAX_LEN: usize = 100;

const ELLIPSIS: &str = "...";

/// Combining diacritical marks block (U+0300..=U+036F).
const fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}')
}

/// Lowercase, decompose (NFD) and drop combining marks.
///
/// ```
/// use darccuir_core::text::normalize_text;
///
/// assert_eq!(normalize_text("Camperón CUERO"), "camperon cuero");
/// assert_eq!(normalize_text("Ñandú"), "nandu");
/// ```
#[must_use]
pub fn normalize_text(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Normalized search terms, split on whitespace.
#[must_use]
pub fn search_terms(s: &str) -> Vec<String> {
    normalize_text(s)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Char index of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(a, b)| chars_eq_ignore_case(*a, *b))
    })
}

/// Short excerpt of `text` around the first occurrence of `query`.
///
/// Without a match the first `max_len` characters are returned, followed by
/// `...` when the text was cut. With a match the excerpt spans
/// [`SNIPPET_CONTEXT`] characters on each side, with `...` marking whichever
/// ends were cut. Lengths are counted in characters.
///
/// ```
/// use darccuir_core::text::snippet;
///
/// assert_eq!(snippet("Bolso de cuero", "CUERO", 100), "Bolso de cuero");
/// ```
#[must_use]
pub fn snippet(text: &str, query: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let query: Vec<char> = query.chars().collect();

    let Some(index) = find_ignore_case(&chars, &query) else {
        let mut out: String = chars.iter().take(max_len).collect();
        if chars.len() > max_len {
            out.push_str(ELLIPSIS);
        }
        return out;
    };

    let start = index.saturating_sub(SNIPPET_CONTEXT);
    let end = (index + query.len() + SNIPPET_CONTEXT).min(chars.len());

    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.extend(chars.get(start..end).unwrap_or_default());
    if end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

/// URL slug for a subrubro name.
///
/// ```
/// use darccuir_core::text::slugify;
///
/// assert_eq!(slugify("Camperas de Cuero"), "camperas-de-cuero");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in normalize_text(name).chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize_text("ÁÉÍÓÚ áéíóú ü"), "aeiou aeiou u");
        assert_eq!(normalize_text("Pingüino"), "pinguino");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_keeps_other_characters() {
        assert_eq!(normalize_text("SKU-12/B"), "sku-12/b");
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms("  Bolso   Matero "), vec!["bolso", "matero"]);
        assert!(search_terms("   ").is_empty());
        assert_eq!(search_terms("Riñonera"), vec!["rinonera"]);
    }

    #[test]
    fn test_snippet_without_match_short_text() {
        assert_eq!(snippet("Cinto de cuero", "mochila", 100), "Cinto de cuero");
    }

    #[test]
    fn test_snippet_without_match_truncates() {
        let text = "a".repeat(150);
        let out = snippet(&text, "zzz", 100);
        assert_eq!(out, format!("{}...", "a".repeat(100)));
    }

    #[test]
    fn test_snippet_match_in_middle() {
        let text = format!("{}cuero{}", "x".repeat(50), "y".repeat(50));
        let out = snippet(&text, "CUERO", 100);
        assert_eq!(
            out,
            format!("...{}cuero{}...", "x".repeat(30), "y".repeat(30))
        );
    }

    #[test]
    fn test_snippet_match_at_start() {
        let text = format!("Cuero{}", "z".repeat(40));
        let out = snippet(&text, "cuero", 100);
        assert_eq!(out, format!("Cuero{}...", "z".repeat(30)));
    }

    #[test]
    fn test_snippet_match_near_end() {
        let text = format!("{}billetera", "w".repeat(40));
        let out = snippet(&text, "billetera", 100);
        assert_eq!(out, format!("...{}billetera", "w".repeat(30)));
    }

    #[test]
    fn test_snippet_counts_chars_not_bytes() {
        let text = format!("{}ñandú{}", "é".repeat(35), "ó".repeat(35));
        let out = snippet(&text, "ÑANDÚ", 100);
        assert_eq!(
            out,
            format!("...{}ñandú{}...", "é".repeat(30), "ó".repeat(30))
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Carteras"), "carteras");
        assert_eq!(slugify("  Bolsos & Mochilas  "), "bolsos-mochilas");
        assert_eq!(slugify("Línea Niños 2024"), "linea-ninos-2024");
        assert_eq!(slugify("--ya--"), "ya");
        assert_eq!(slugify("!!!"), "");
    }
}

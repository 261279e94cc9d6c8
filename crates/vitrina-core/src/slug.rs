//! URL slugs derived from display names.
//!
//! ```rust
//! use vitrina_core::slug::slugify;
//!
//! assert_eq!(slugify("Café & Té"), "cafe-te");
//! assert_eq!(slugify("  Ropa   de Niños "), "ropa-de-ninos");
//! ```

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derives a URL-safe slug.
///
/// Lowercases, strips diacritics, drops every character outside
/// `[a-z0-9 -]`, turns whitespace runs into `-`, collapses repeated `-` and
/// trims `-` from both ends. May return an empty string when nothing
/// survives (e.g. `"&&"`).
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    let letters = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase);

    for c in letters {
        let mut buf = [0u8; 4];
        let chars: &str = match fold_letter(c) {
            Some(folded) => folded,
            None => c.encode_utf8(&mut buf),
        };

        for c in chars.chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            } else if c == '-' || c.is_whitespace() {
                pending_dash = true;
            }
            // anything else is removed without acting as a separator
        }
    }

    slug
}

/// Latin letters with no canonical decomposition.
fn fold_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'ø' => "o",
        'ł' => "l",
        'đ' => "d",
        'ħ' => "h",
        'ŧ' => "t",
        'ı' => "i",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics_and_symbols() {
        assert_eq!(slugify("Café & Té"), "cafe-te");
        assert_eq!(slugify("Señorita Drinks"), "senorita-drinks");
        assert_eq!(slugify("Électronique"), "electronique");
        assert_eq!(slugify("Über-Größe"), "uber-grosse");
    }

    #[test]
    fn test_folds_diacritics_outside_latin1() {
        assert_eq!(slugify("Phở Bò"), "pho-bo");
        assert_eq!(slugify("Bánh mì đặc biệt"), "banh-mi-dac-biet");
        assert_eq!(slugify("Łódź Smørrebrød"), "lodz-smorrebrod");
        assert_ne!(slugify("Phở"), slugify("Ph"));
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(slugify("  Ropa   de  Niños "), "ropa-de-ninos");
        assert_eq!(slugify("a - - b"), "a-b");
        assert_eq!(slugify("--hola--"), "hola");
        assert_eq!(slugify("Uncle Arnie's"), "uncle-arnies");
    }

    #[test]
    fn test_keeps_digits_and_handles_empty() {
        assert_eq!(slugify("Top 10 Ofertas 2024"), "top-10-ofertas-2024");
        assert_eq!(slugify("&&"), "");
        assert_eq!(slugify(""), "");
    }
}

// Player name lookup keys.

use unicode_normalization::UnicodeNormalization;

/// Build a case-, accent- and whitespace-insensitive lookup key for a name.
///
/// The name is decomposed (NFKD) so accented letters split into a base letter
/// plus combining marks, every non-ASCII code point is dropped, and the rest is
/// lowercased and trimmed. A name made only of non-ASCII characters yields an
/// empty key.
pub fn normalize_name(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    ascii.to_ascii_lowercase().trim().to_string()
}

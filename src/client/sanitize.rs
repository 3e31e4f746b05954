//! Reduces lightweight markup in model answers to plain prose.

use once_cell::sync::Lazy;
use regex::Regex;

/// Emphasis, heading, quote, bullet and rule characters.
static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_#>\-]").expect("valid markup pattern"));
static NEWLINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid newline pattern"));

/// Strips markup so text reads well on screen and through speech synthesis.
///
/// Removes every `*`, `_`, `#`, `>` and `-`, replaces each run of line breaks
/// with a single space and trims both ends. All other characters keep their
/// order. Applying it twice gives the same result as applying it once.
///
/// ```
/// use samvad::client::sanitize;
///
/// assert_eq!(
///     sanitize("**Dengue** causes *fever*\n\nand rash."),
///     "Dengue causes fever and rash."
/// );
/// ```
pub fn sanitize(text: &str) -> String {
    let without_markup = MARKUP.replace_all(text, "");
    NEWLINE_RUNS
        .replace_all(&without_markup, " ")
        .trim()
        .to_string()
}

//! Utility functions for label escaping in Newick strings.
//!
//! Labels written by this crate (e.g. tagged trees) are escaped so that
//! they can be read back by [NewickParser](crate::newick::NewickParser).

/// Characters that force a label to be single-quoted.
const SPECIAL_CHARACTERS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use segsim::parser::utils::is_single_quoted;
/// assert_eq!(is_single_quoted("Pukeko"), false);
/// assert_eq!(is_single_quoted("'Swamp hen'"), true);
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.starts_with('\'') && label.ends_with('\'') && label.len() >= 2
}

/// Checks if a label can be written as is:
/// - wrapped in single quotes and each internal single quote doubled, or
/// - no space and special characters
///
/// # Examples
/// ```
/// # use segsim::parser::utils::is_escaped;
/// assert_eq!(is_escaped("Pukeko"), true);
/// assert_eq!(is_escaped("Pu[ke]ko"), false);
/// assert_eq!(is_escaped("Australasian Swamphen"), false);
/// assert_eq!(is_escaped("'Baillon''s_Crake'"), true);
/// assert_eq!(is_escaped("'Baillon's Crake'"), false);
/// ```
pub fn is_escaped(label: &str) -> bool {
    if is_single_quoted(label) {
        // Every internal quote must be part of a doubled pair
        let inner = &label[1..label.len() - 1];
        inner.replace("''", "").find('\'').is_none()
    } else {
        !label.contains(' ') && !label.contains(SPECIAL_CHARACTERS)
    }
}

/// Escapes a label for safe use in Newick strings.
///
/// Labels containing special characters are wrapped in single quotes with
/// internal single quotes doubled. Spaces in otherwise plain labels are
/// replaced with underscores.
///
/// # Examples
/// ```
/// # use segsim::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "Australasian_Swamphen");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if is_escaped(label) {
        return label.to_string();
    }

    if label.contains(SPECIAL_CHARACTERS) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.replace(' ', "_")
    }
}

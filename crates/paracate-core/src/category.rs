//! Category name validation.
//!
//! The predicate lives here, next to the store, so every caller applies the
//! same rule instead of re-implementing it in the UI.

use crate::error::StoreError;

/// Maximum accepted name length, in characters.
pub const MAX_NAME_LEN: usize = 50;

fn allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || matches!(c, '-' | '_' | '.')
}

/// Validate a raw category name and return its canonical form.
///
/// Surrounding whitespace is trimmed; all lookups downstream compare the
/// trimmed form byte-exactly. A name is valid iff it is non-empty, at most
/// [`MAX_NAME_LEN`] characters, and contains only ASCII alphanumerics,
/// whitespace, `-`, `_`, and `.`.
///
/// # Examples
/// ```
/// use paracate_core::validate_name;
/// assert_eq!(validate_name("  Fieldwork  ").unwrap(), "Fieldwork");
/// assert!(validate_name("bad;name").is_err());
/// ```
pub fn validate_name(input: &str) -> Result<String, StoreError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("name is empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(StoreError::Validation(format!(
            "name exceeds {} characters",
            MAX_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| !allowed_char(*c)) {
        return Err(StoreError::Validation(format!(
            "disallowed character {:?}",
            c
        )));
    }
    Ok(name.to_string())
}

//! Identifier classification and canonicalization.
//!
//! Raw input is classified as a phone number, email or @handle by three pattern
//! matches tried in fixed order; the first match wins. Canonicalization is
//! deliberately narrow: only the first character is lowercased and only the
//! first space is removed, matching what the registration flow applies before
//! hashing. Handle resolution to a numeric platform ID is asynchronous and
//! lives on the client, not here.

use crate::error::Error;
use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+\(?\d{1,4}\s?)\)?-?\.?\s?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").unwrap()
});

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\d.A-Za-z-]+\.[A-Za-z]{2,}").unwrap());

static TWITTER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@\S+").unwrap());

/// The shape of a human-readable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Phone,
    Email,
    Twitter,
}

/// Classify raw input, trying phone, then email, then @handle.
pub fn classify(input: &str) -> Result<IdentifierKind, Error> {
    if PHONE_PATTERN.is_match(input) {
        Ok(IdentifierKind::Phone)
    } else if EMAIL_PATTERN.is_match(input) {
        Ok(IdentifierKind::Email)
    } else if TWITTER_PATTERN.is_match(input) {
        Ok(IdentifierKind::Twitter)
    } else {
        Err(Error::InvalidIdentifier)
    }
}

/// Lowercase the first character and drop the first space, nothing more.
pub fn canonicalize(input: &str) -> String {
    let mut chars = input.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    if let Some(pos) = out.find(' ') {
        out.remove(pos);
    }
    out
}

/// Reduce a phone identifier to `+` followed by its alphanumeric characters.
///
/// Letters are kept because a secret word may be concatenated after the number
/// in some registration flows.
pub fn convert_phone(input: &str) -> String {
    let kept: String = input.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("+{kept}")
}

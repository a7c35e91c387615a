//! Search term classification.

use std::sync::LazyLock;

use regex::Regex;

use super::error::{ContactError, Result};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile")
});

/// Brazilian phone: optional parenthesized area code, optional leading 9,
/// optional dash.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?[1-9]{2}\)?\s?9?\d{4}-?\d{4}$").expect("phone pattern must compile")
});

/// A validated contact search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Matches the users' `email` field.
    Email(String),
    /// Matches the users' `phone` field.
    Phone(String),
}

impl SearchTerm {
    /// Classifies a raw search term. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidSearchTerm`] if the term is neither an
    /// email nor a phone number.
    pub fn parse(raw: &str) -> Result<Self> {
        let term = raw.trim();
        if term.is_empty() {
            return Err(ContactError::InvalidSearchTerm("Digite um email ou telefone".to_string()));
        }

        if EMAIL.is_match(term) {
            Ok(Self::Email(term.to_string()))
        } else if PHONE.is_match(term) {
            Ok(Self::Phone(term.to_string()))
        } else {
            Err(ContactError::InvalidSearchTerm(term.to_string()))
        }
    }

    /// Name of the user record field this term is matched against.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
        }
    }

    /// The term itself.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Email(value) | Self::Phone(value) => value,
        }
    }
}

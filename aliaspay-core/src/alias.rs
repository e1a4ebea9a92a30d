//! Alias syntax: classification and validation
//!
//! An alias is a human-readable identifier mapped to a payout target.
//! Classification is a fixed lexical rule over the raw string:
//!
//! - starts with `@` -> handle
//! - starts with `+` -> phone (E.164)
//! - contains `@` elsewhere -> email
//!
//! Classification is purely syntactic. It says nothing about whether the
//! channel has been verified; verification flags are tracked separately on
//! [`crate::AliasRecord`].
//!
//! # Examples
//!
//! ```
//! use aliaspay_core::{Alias, AliasKind};
//!
//! let email = Alias::parse("alice@example.com").unwrap();
//! assert_eq!(email.kind(), AliasKind::Email);
//!
//! let phone = Alias::parse("+14155552671").unwrap();
//! assert_eq!(phone.kind(), AliasKind::Phone);
//!
//! let handle = Alias::parse("@alice").unwrap();
//! assert_eq!(handle.kind(), AliasKind::Handle);
//!
//! assert!(Alias::parse("not an alias").is_err());
//! ```

use crate::AliasPayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three syntactic kinds of alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasKind {
    Email,
    Phone,
    Handle,
}

impl fmt::Display for AliasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasKind::Email => write!(f, "email"),
            AliasKind::Phone => write!(f, "phone"),
            AliasKind::Handle => write!(f, "handle"),
        }
    }
}

/// A validated alias string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alias(String);

impl Alias {
    /// Validate and wrap an alias string.
    ///
    /// Accepted forms:
    /// - email: `local@domain` with a non-empty local part and a dotted domain
    /// - phone: `+` followed by 2-15 digits, no leading zero (E.164)
    /// - handle: `@` followed by 3-20 of `a-z`, `0-9`, `.`, `_`, `-`
    pub fn parse(s: &str) -> Result<Self, AliasPayError> {
        if let Some(rest) = s.strip_prefix('@') {
            let ok = (3..=20).contains(&rest.len())
                && rest
                    .bytes()
                    .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-'));
            if !ok {
                return Err(AliasPayError::InvalidAlias(format!(
                    "handle must be @ followed by 3-20 of a-z, 0-9, '.', '_', '-': {s}"
                )));
            }
        } else if let Some(rest) = s.strip_prefix('+') {
            let ok = (2..=15).contains(&rest.len())
                && rest.bytes().all(|b| b.is_ascii_digit())
                && !rest.starts_with('0');
            if !ok {
                return Err(AliasPayError::InvalidAlias(format!(
                    "phone must be in E.164 format: {s}"
                )));
            }
        } else if let Some((local, domain)) = s.split_once('@') {
            let ok = !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.contains(char::is_whitespace);
            if !ok {
                return Err(AliasPayError::InvalidAlias(format!(
                    "invalid email address: {s}"
                )));
            }
        } else {
            return Err(AliasPayError::InvalidAlias(format!(
                "must be an email, E.164 phone, or @handle: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Classify this alias. Total over valid aliases.
    pub fn kind(&self) -> AliasKind {
        if self.0.starts_with('@') {
            AliasKind::Handle
        } else if self.0.starts_with('+') {
            AliasKind::Phone
        } else {
            AliasKind::Email
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Alias {
    type Err = AliasPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_classification() {
        let alias = Alias::parse("alice@example.com").unwrap();
        assert_eq!(alias.kind(), AliasKind::Email);
        assert_eq!(alias.as_str(), "alice@example.com");
    }

    #[test]
    fn test_phone_classification() {
        let alias = Alias::parse("+14155552671").unwrap();
        assert_eq!(alias.kind(), AliasKind::Phone);
    }

    #[test]
    fn test_handle_classification() {
        let alias = Alias::parse("@hack-team").unwrap();
        assert_eq!(alias.kind(), AliasKind::Handle);
    }

    #[test]
    fn test_rejects_malformed_emails() {
        assert!(Alias::parse("@@").is_err());
        assert!(Alias::parse("alice@").is_err());
        assert!(Alias::parse("@example.com ").is_err());
        assert!(Alias::parse("alice@nodot").is_err());
        assert!(Alias::parse("alice@.com").is_err());
        assert!(Alias::parse("a lice@example.com").is_err());
    }

    #[test]
    fn test_rejects_malformed_phones() {
        assert!(Alias::parse("+").is_err());
        assert!(Alias::parse("+0123").is_err());
        assert!(Alias::parse("+1").is_err());
        assert!(Alias::parse("+1234567890123456").is_err());
        assert!(Alias::parse("+1-415-555").is_err());
    }

    #[test]
    fn test_rejects_malformed_handles() {
        assert!(Alias::parse("@ab").is_err());
        assert!(Alias::parse("@UPPER").is_err());
        assert!(Alias::parse("@way-too-long-handle-name-here").is_err());
        assert!(Alias::parse("@with space").is_err());
    }

    #[test]
    fn test_rejects_unclassifiable() {
        assert!(Alias::parse("").is_err());
        assert!(Alias::parse("plainstring").is_err());
        assert!(Alias::parse("12345").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let alias = Alias::parse("@alice").unwrap();
        let json = serde_json::to_string(&alias).unwrap();
        assert_eq!(json, "\"@alice\"");
        let parsed: Alias = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, alias);
    }
}

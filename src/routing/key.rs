//! Routing key type.

use std::fmt;

/// Lowercase token naming a backend service, taken from a subdomain label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutingKey(String);

impl RoutingKey {
    /// Build a key from a single host label.
    ///
    /// Returns `None` for empty labels or labels containing dots or whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.is_empty() || label.contains('.') || label.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self(label.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_lowercases() {
        assert_eq!(RoutingKey::from_label("Billing").unwrap().as_str(), "billing");
    }

    #[test]
    fn test_from_label_rejects_bad_tokens() {
        assert!(RoutingKey::from_label("").is_none());
        assert!(RoutingKey::from_label("a b").is_none());
        assert!(RoutingKey::from_label("a.b").is_none());
    }
}

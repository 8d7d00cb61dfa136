use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque record identifier
///
/// Either assigned by the store on insert (`Integer`) or generated on the
/// client before the first save (`Token`). Which one a record type uses is
/// fixed by its [`IdPolicy`](crate::schema::IdPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Integer(i64),
    Token(String),
}

impl Identifier {
    /// Generate a fresh client-side token (UUID v4)
    pub fn generate() -> Self {
        Identifier::Token(Uuid::new_v4().to_string())
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Identifier::Token(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Integer(i) => write!(f, "{}", i),
            Identifier::Token(t) => f.write_str(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = Identifier::generate();
        let b = Identifier::generate();
        assert!(a.is_token());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        assert_eq!(Identifier::Integer(42).to_string(), "42");
        assert_eq!(Identifier::Token("abc".to_string()).to_string(), "abc");
    }
}

//! Core type definitions for schema trees.

use serde::{Deserialize, Serialize};

/// Primitive type tags carried by leaf nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// UTF-8 string.
    String,
    /// Floating point or arbitrary number.
    Number,
    /// Integral number.
    Integer,
    /// Arbitrary precision integer.
    BigInt,
    /// Boolean value.
    Boolean,
    /// Calendar date or timestamp.
    Date,
    /// Explicit null.
    Null,
    /// Accepts any value.
    Any,
}

impl PrimitiveType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveType::Number | PrimitiveType::Integer | PrimitiveType::BigInt
        )
    }

    /// Check whether existing values of `self` remain valid, possibly after a
    /// lossless conversion, when the field is retyped to `to`.
    ///
    /// Only widening conversions qualify. Every pair not listed here is
    /// treated as non-coercible.
    pub fn coerces_to(&self, to: &PrimitiveType) -> bool {
        if self == to {
            return true;
        }

        match (self, to) {
            (_, PrimitiveType::Any) => true,
            (PrimitiveType::Integer, PrimitiveType::Number) => true,
            (PrimitiveType::Integer, PrimitiveType::BigInt) => true,
            (PrimitiveType::Date, PrimitiveType::String) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::BigInt => "bigint",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Date => "date",
            PrimitiveType::Null => "null",
            PrimitiveType::Any => "any",
        };
        f.write_str(name)
    }
}

/// Structural kind of a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Record with named fields.
    Object,
    /// List with a single element type.
    Array,
    /// Primitive value.
    Leaf(PrimitiveType),
    /// Anything the classifier does not recognize.
    Unknown,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Object => write!(f, "object"),
            NodeKind::Array => write!(f, "array"),
            NodeKind::Leaf(ty) => write!(f, "{}", ty),
            NodeKind::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_coercions() {
        assert!(PrimitiveType::Integer.coerces_to(&PrimitiveType::Number));
        assert!(PrimitiveType::Integer.coerces_to(&PrimitiveType::BigInt));
        assert!(PrimitiveType::Date.coerces_to(&PrimitiveType::String));
        assert!(PrimitiveType::Boolean.coerces_to(&PrimitiveType::Any));
    }

    #[test]
    fn test_non_coercible_pairs() {
        assert!(!PrimitiveType::String.coerces_to(&PrimitiveType::Number));
        assert!(!PrimitiveType::Number.coerces_to(&PrimitiveType::String));
        assert!(!PrimitiveType::Number.coerces_to(&PrimitiveType::Integer));
        assert!(!PrimitiveType::Any.coerces_to(&PrimitiveType::String));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NodeKind::Object.to_string(), "object");
        assert_eq!(NodeKind::Leaf(PrimitiveType::BigInt).to_string(), "bigint");
        assert_eq!(NodeKind::Unknown.to_string(), "unknown");
    }
}

//! Document tree nodes.

use super::ordered_map::OrderedMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Mapping is the ordered map used for YAML mappings.
pub type Mapping = OrderedMap<String, Node>;

/// Node is one value in a parsed YAML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Node {
    #[default]
    Null,
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

/// ScalarKind is the type a scalar resolved to during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
    Timestamp,
}

/// Scalar is a leaf value: its source text plus the resolved kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scalar {
    raw: String,
    kind: ScalarKind,
}

static INT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$").expect("valid int regex"));

static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
    )
    .expect("valid float regex")
});

static TIMESTAMP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?)?$",
    )
    .expect("valid timestamp regex")
});

impl ScalarKind {
    /// Resolves the kind of a plain (unquoted) scalar by pattern.
    ///
    /// Returns `None` for the null forms, which have no scalar kind.
    pub fn resolve_plain(raw: &str) -> Option<ScalarKind> {
        match raw {
            "" | "~" | "null" | "Null" | "NULL" => None,
            "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => Some(ScalarKind::Bool),
            _ if INT_PATTERN.is_match(raw) => Some(ScalarKind::Int),
            _ if FLOAT_PATTERN.is_match(raw) => Some(ScalarKind::Float),
            _ if TIMESTAMP_PATTERN.is_match(raw) => Some(ScalarKind::Timestamp),
            _ => Some(ScalarKind::String),
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::Float)
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::Timestamp => "timestamp",
        }
    }
}

impl Scalar {
    pub fn new(raw: impl Into<String>, kind: ScalarKind) -> Self {
        Scalar {
            raw: raw.into(),
            kind,
        }
    }

    /// Creates a string scalar, as a quoted YAML scalar would produce.
    pub fn string(raw: impl Into<String>) -> Self {
        Scalar::new(raw, ScalarKind::String)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Returns true for the string-like kinds (strings and timestamps).
    pub fn is_textual(&self) -> bool {
        matches!(self.kind, ScalarKind::String | ScalarKind::Timestamp)
    }

    /// Returns the numeric value of an int or float scalar.
    pub fn as_f64(&self) -> Option<f64> {
        if !self.kind.is_numeric() {
            return None;
        }
        let raw = self.raw.trim_start_matches('+');
        if let Some(hex) = raw.strip_prefix("0x") {
            return i64::from_str_radix(hex, 16).ok().map(|v| v as f64);
        }
        if let Some(oct) = raw.strip_prefix("0o") {
            return i64::from_str_radix(oct, 8).ok().map(|v| v as f64);
        }
        match raw {
            ".inf" | ".Inf" | ".INF" => Some(f64::INFINITY),
            "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
            ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
            _ => raw.parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Node {
    /// Builds a node from plain (unquoted) scalar text, resolving its kind.
    pub fn from_plain(raw: &str) -> Node {
        match ScalarKind::resolve_plain(raw) {
            Some(kind) => Node::Scalar(Scalar::new(raw, kind)),
            None => Node::Null,
        }
    }

    /// Builds a string scalar node.
    pub fn string(raw: impl Into<String>) -> Node {
        Node::Scalar(Scalar::string(raw))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Returns true for leaf values (scalars and null).
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Scalar(_) | Node::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw text of a scalar node.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().map(Scalar::raw)
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a key if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Follows a chain of mapping keys.
    pub fn get_in(&self, keys: &[&str]) -> Option<&Node> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Short name of the node variant, used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(s) => s.kind().name(),
            Node::Sequence(_) => "list",
            Node::Mapping(_) => "map",
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Node::Mapping(mapping)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Scalar(scalar) => match scalar.kind() {
                ScalarKind::Bool => match scalar.raw().to_ascii_lowercase().as_str() {
                    "true" => serializer.serialize_bool(true),
                    "false" => serializer.serialize_bool(false),
                    _ => serializer.serialize_str(scalar.raw()),
                },
                ScalarKind::Int => match scalar.raw().parse::<i64>() {
                    Ok(i) => serializer.serialize_i64(i),
                    Err(_) => serializer.serialize_str(scalar.raw()),
                },
                ScalarKind::Float => match scalar.as_f64() {
                    Some(f) if f.is_finite() => serializer.serialize_f64(f),
                    _ => serializer.serialize_str(scalar.raw()),
                },
                ScalarKind::String | ScalarKind::Timestamp => serializer.serialize_str(scalar.raw()),
            },
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Mapping(mapping) => {
                let mut map = serializer.serialize_map(Some(mapping.len()))?;
                for (key, value) in mapping {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("null"),
            Node::Scalar(scalar) => write!(f, "{}", scalar),
            Node::Sequence(_) | Node::Mapping(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_resolution() {
        assert_eq!(ScalarKind::resolve_plain("42"), Some(ScalarKind::Int));
        assert_eq!(ScalarKind::resolve_plain("-7"), Some(ScalarKind::Int));
        assert_eq!(ScalarKind::resolve_plain("0x1F"), Some(ScalarKind::Int));
        assert_eq!(ScalarKind::resolve_plain("3.14"), Some(ScalarKind::Float));
        assert_eq!(ScalarKind::resolve_plain("1e3"), Some(ScalarKind::Float));
        assert_eq!(ScalarKind::resolve_plain(".inf"), Some(ScalarKind::Float));
        assert_eq!(ScalarKind::resolve_plain("true"), Some(ScalarKind::Bool));
        assert_eq!(ScalarKind::resolve_plain("2024-01-15"), Some(ScalarKind::Timestamp));
        assert_eq!(
            ScalarKind::resolve_plain("2024-01-15T10:30:00Z"),
            Some(ScalarKind::Timestamp)
        );
        assert_eq!(ScalarKind::resolve_plain("nginx:1.25"), Some(ScalarKind::String));
        assert_eq!(ScalarKind::resolve_plain("~"), None);
        assert_eq!(ScalarKind::resolve_plain("null"), None);
    }

    #[test]
    fn test_from_plain() {
        assert!(Node::from_plain("null").is_null());
        assert_eq!(
            Node::from_plain("5"),
            Node::Scalar(Scalar::new("5", ScalarKind::Int))
        );
        // A quoted "5" is a different value from a plain 5.
        assert_ne!(Node::from_plain("5"), Node::string("5"));
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(Scalar::new("0x10", ScalarKind::Int).as_f64(), Some(16.0));
        assert_eq!(Scalar::new("+2.5", ScalarKind::Float).as_f64(), Some(2.5));
        assert_eq!(Scalar::string("10").as_f64(), None);
    }

    #[test]
    fn test_get_in() {
        let mut metadata = Mapping::new();
        metadata.set("name".into(), Node::string("web"));
        let mut root = Mapping::new();
        root.set("metadata".into(), Node::Mapping(metadata));
        let root = Node::Mapping(root);

        assert_eq!(root.get_in(&["metadata", "name"]).and_then(Node::as_str), Some("web"));
        assert!(root.get_in(&["metadata", "namespace"]).is_none());
        assert!(root.get_in(&["metadata", "name", "deeper"]).is_none());
    }

    #[test]
    fn test_display_and_json() {
        let node = Node::Sequence(vec![Node::from_plain("1"), Node::string("a"), Node::Null]);
        assert_eq!(node.to_string(), r#"[1,"a",null]"#);
        assert_eq!(Node::from_plain("true").to_string(), "true");
    }
}

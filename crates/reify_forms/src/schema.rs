//! The data-schema model.
//!
//! Schema nodes arrive as JSON from an external form service and are
//! immutable per render pass. Property order is declaration order
//! (`IndexMap`), which the field resolver preserves unless the
//! presentation node reorders children explicitly.

use core::fmt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// The primitive kind a schema node declares, plus the semantic extensions
/// (`date`, `file`) the wire format allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    /// A string value.
    String,
    /// A floating-point number.
    Number,
    /// An integer.
    Integer,
    /// A boolean.
    Boolean,
    /// A nested object.
    Object,
    /// An array of items.
    Array,
    /// A calendar date (semantic extension).
    Date,
    /// An uploaded file reference (semantic extension).
    File,
    /// Anything else the wire sent; resolves to the diagnostic field.
    Unknown(String),
}

impl SchemaKind {
    /// Parses the wire `type` string.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "object" => Self::Object,
            "array" => Self::Array,
            "date" => Self::Date,
            "file" => Self::File,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire token for this kind.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Date => "date",
            Self::File => "file",
            Self::Unknown(other) => other,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for SchemaKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for SchemaKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}

impl Default for SchemaKind {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

/// A node of the data schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Declared primitive kind (wire field `type`).
    #[serde(rename = "type", default)]
    pub kind: SchemaKind,
    /// Human label; presentation may override it.
    #[serde(default)]
    pub title: Option<String>,
    /// Longer description; presentation may override it.
    #[serde(default)]
    pub description: Option<String>,
    /// Format hint (`email`, `uri`, ...), advisory only at this layer.
    #[serde(default)]
    pub format: Option<String>,
    /// Names of required child properties (object nodes).
    #[serde(default)]
    pub required: Vec<String>,
    /// Child properties in declared order (object nodes).
    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,
    /// Item schema (array nodes).
    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,
    /// Default value for the field.
    #[serde(default)]
    pub default: Option<Value>,
    /// Enumerated allowed values.
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<Value>,
}

impl SchemaNode {
    /// Membership test against the node's `required` list.
    ///
    /// Computed once per object node by the resolver and threaded to each
    /// child; children never re-derive it.
    #[must_use]
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|name| name == property)
    }
}

/// Dotted path from the form root to a property.
///
/// The root is the empty path; array items keep their parent's path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPath(String);

impl PropertyPath {
    /// The root path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Extends the path by one property segment.
    #[must_use]
    pub fn push(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}.{segment}", self.0))
        }
    }

    /// The dotted string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the form root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_object_schema_in_declared_order() {
        let schema: SchemaNode = serde_json::from_value(json!({
            "type": "object",
            "required": ["a"],
            "properties": {
                "a": { "type": "string" },
                "b": { "type": "number" }
            }
        }))
        .unwrap();

        assert_eq!(schema.kind, SchemaKind::Object);
        let names: Vec<_> = schema.properties.keys().cloned().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(schema.is_required("a"));
        assert!(!schema.is_required("b"));
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let schema: SchemaNode =
            serde_json::from_value(json!({ "type": "geo-point" })).unwrap();
        assert_eq!(schema.kind, SchemaKind::Unknown("geo-point".to_string()));
        assert_eq!(schema.kind.token(), "geo-point");
    }

    #[test]
    fn semantic_extensions_parse() {
        assert_eq!(SchemaKind::from_token("date"), SchemaKind::Date);
        assert_eq!(SchemaKind::from_token("file"), SchemaKind::File);
    }

    #[test]
    fn property_path_builds_dotted_strings() {
        let root = PropertyPath::root();
        assert!(root.is_root());
        let child = root.push("a").push("b");
        assert_eq!(child.as_str(), "a.b");
    }
}

//! The presentation-schema model.
//!
//! One presentation node accompanies each schema node, addressed by the
//! same property path, and supplies the optional overrides the field
//! resolver consults: explicit field/widget names, container directives,
//! child ordering, and an options bag threaded to the renderer.

use indexmap::IndexMap;
use reify_registry::render::Props;
use serde::Deserialize;
use std::sync::LazyLock;

/// Presentation overrides for one schema node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationNode {
    /// Explicit field override: a registry FQN when it contains a `.`,
    /// otherwise a built-in field-kind name. Highest precedence, terminal.
    #[serde(default)]
    pub field: Option<String>,
    /// Built-in widget/container token for layout resolution.
    #[serde(default)]
    pub widget: Option<String>,
    /// Explicit container component FQN for object/array nodes.
    #[serde(default)]
    pub component: Option<String>,
    /// Label override; may contain `${...}` interpolation.
    #[serde(default)]
    pub title: Option<String>,
    /// Description override; may contain `${...}` interpolation.
    #[serde(default)]
    pub description: Option<String>,
    /// Options bag passed through to the renderer.
    #[serde(default)]
    pub options: Props,
    /// Explicit ordering of child properties; unnamed children keep
    /// declared order after the named ones.
    #[serde(default)]
    pub order: Option<Vec<String>>,
    /// Child presentation nodes keyed by property name.
    #[serde(default, flatten)]
    pub children: IndexMap<String, PresentationNode>,
}

static EMPTY: LazyLock<PresentationNode> = LazyLock::new(PresentationNode::default);

impl PresentationNode {
    /// A node with no overrides.
    #[must_use]
    pub fn empty() -> &'static PresentationNode {
        &EMPTY
    }

    /// The presentation node for a child property, or the empty node.
    #[must_use]
    pub fn child(&self, name: &str) -> &PresentationNode {
        self.children.get(name).unwrap_or(&EMPTY)
    }

    /// Child names in resolution order: the `order` list first (names the
    /// schema actually declares), then remaining declared names.
    #[must_use]
    pub fn ordered<'a>(&'a self, declared: &[&'a str]) -> Vec<&'a str> {
        let Some(order) = &self.order else {
            return declared.to_vec();
        };
        let mut result: Vec<&'a str> = Vec::with_capacity(declared.len());
        for name in order {
            if let Some(found) = declared.iter().copied().find(|d| *d == name.as_str()) {
                result.push(found);
            }
        }
        for name in declared.iter().copied() {
            if !result.contains(&name) {
                result.push(name);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_overrides_and_children() {
        let node: PresentationNode = serde_json::from_value(json!({
            "field": "core.FancyString",
            "widget": "grid",
            "title": "Custom ${formData.name}",
            "options": { "dense": true },
            "address": { "field": "StringField" }
        }))
        .unwrap();

        assert_eq!(node.field.as_deref(), Some("core.FancyString"));
        assert_eq!(node.widget.as_deref(), Some("grid"));
        assert_eq!(node.options.get("dense"), Some(&json!(true)));
        assert_eq!(node.child("address").field.as_deref(), Some("StringField"));
        // Unknown children fall back to the empty node.
        assert!(node.child("missing").field.is_none());
    }

    #[test]
    fn ordered_respects_explicit_order_then_declared() {
        let node: PresentationNode =
            serde_json::from_value(json!({ "order": ["b", "ghost"] })).unwrap();
        let ordered = node.ordered(&["a", "b", "c"]);
        // "ghost" is not declared and is dropped; the rest keep declared order.
        assert_eq!(ordered, vec!["b", "a", "c"]);
    }

    #[test]
    fn ordered_defaults_to_declared() {
        let node = PresentationNode::default();
        assert_eq!(node.ordered(&["x", "y"]), vec!["x", "y"]);
    }
}

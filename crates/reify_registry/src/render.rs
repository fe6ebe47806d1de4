//! The renderable payload model.
//!
//! The registry stores a closed set of implementation payloads behind the
//! [`ComponentImpl`] enum: renderers ([`Renderable`]), forms (renderers with
//! form semantics), and runtime functions ([`RuntimeFunction`], used for
//! plugin loaders). The tagged enum is what the compiler enforces — a
//! registration cannot contain anything else.
//!
//! Decorators ([`ContextInjected`], [`ErrorBoundary`]) are explicit wrapper
//! types applied in a fixed order at resolution time, each with a single
//! responsibility.

use crate::error::RenderError;
use crate::store::ComponentRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Props
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered bag of named JSON values passed to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(IndexMap<String, Value>);

impl Props {
    /// Creates an empty props bag.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a value, replacing any previous value under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Merges `other` into this bag. Entries in `other` win.
    pub fn merge(&mut self, other: &Props) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the bag holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Converts the bag into a JSON object value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl From<serde_json::Map<String, Value>> for Props {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Props {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RenderNode
// ─────────────────────────────────────────────────────────────────────────────

/// The output of a renderer: an abstract presentation tree.
///
/// Concrete leaf widgets are external payloads; the core only needs a
/// uniform tree shape so placeholders, containers, and decorators can
/// produce output without knowing the host toolkit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderNode {
    /// A run of text.
    Text(String),
    /// An element with a tag, attributes, and children.
    Element {
        /// Element tag (host-toolkit meaning).
        tag: String,
        /// Element attributes.
        attrs: Props,
        /// Child nodes in order.
        children: Vec<RenderNode>,
    },
    /// A sequence of nodes with no wrapping element.
    Fragment(Vec<RenderNode>),
}

impl RenderNode {
    /// Creates an empty element with the given tag.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Props::new(),
            children: Vec::new(),
        }
    }

    /// Creates a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Builder-style attribute insertion. No-op on non-element nodes.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.set(key, value);
        }
        self
    }

    /// Builder-style child insertion. No-op on text nodes.
    #[must_use]
    pub fn with_child(mut self, child: RenderNode) -> Self {
        match &mut self {
            Self::Element { children, .. } | Self::Fragment(children) => children.push(child),
            Self::Text(_) => {}
        }
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderable / RuntimeFunction
// ─────────────────────────────────────────────────────────────────────────────

/// A renderer implementation stored in the registry.
pub trait Renderable: Send + Sync + 'static {
    /// Renders the implementation with the given props.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the renderer cannot produce output;
    /// callers that must not abort wrap the renderer in an
    /// [`ErrorBoundary`].
    fn render(&self, props: &Props) -> Result<RenderNode, RenderError>;

    /// Human-readable renderer name for diagnostics.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

/// A callable implementation stored in the registry (`function` kind).
///
/// Used for plugin and resource loaders: the function receives the registry
/// handle so it can register the components it loads.
pub trait RuntimeFunction: Send + Sync + 'static {
    /// Invokes the function with JSON arguments.
    ///
    /// # Errors
    ///
    /// Function-specific; the injection layer logs failures and treats the
    /// outcome as opaque.
    fn call(&self, registry: &ComponentRegistry, args: Props) -> Result<Value, RenderError>;
}

impl<F> RuntimeFunction for F
where
    F: Fn(&ComponentRegistry, Props) -> Result<Value, RenderError> + Send + Sync + 'static,
{
    fn call(&self, registry: &ComponentRegistry, args: Props) -> Result<Value, RenderError> {
        self(registry, args)
    }
}

/// Renderer adapter for plain closures, mostly useful in tests.
pub struct FnRenderable<F>(pub F);

impl<F> Renderable for FnRenderable<F>
where
    F: Fn(&Props) -> Result<RenderNode, RenderError> + Send + Sync + 'static,
{
    fn render(&self, props: &Props) -> Result<RenderNode, RenderError> {
        (self.0)(props)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ComponentImpl / ComponentKind
// ─────────────────────────────────────────────────────────────────────────────

/// The kind tag of a stored implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// A plain renderer.
    Component,
    /// A form renderer (a renderer with form semantics).
    Form,
    /// A callable runtime function (loaders).
    Function,
}

/// The closed set of payloads a registration may contain.
#[derive(Clone)]
pub enum ComponentImpl {
    /// A plain renderer.
    Renderer(Arc<dyn Renderable>),
    /// A form renderer.
    Form(Arc<dyn Renderable>),
    /// A runtime function.
    Function(Arc<dyn RuntimeFunction>),
}

impl core::fmt::Debug for ComponentImpl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ComponentImpl").field(&self.kind()).finish()
    }
}

impl ComponentImpl {
    /// Creates a renderer payload.
    pub fn renderer(renderable: impl Renderable) -> Self {
        Self::Renderer(Arc::new(renderable))
    }

    /// Creates a form payload.
    pub fn form(renderable: impl Renderable) -> Self {
        Self::Form(Arc::new(renderable))
    }

    /// Creates a function payload.
    pub fn function(function: impl RuntimeFunction) -> Self {
        Self::Function(Arc::new(function))
    }

    /// The kind tag of this payload.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Renderer(_) => ComponentKind::Component,
            Self::Form(_) => ComponentKind::Form,
            Self::Function(_) => ComponentKind::Function,
        }
    }

    /// Returns the renderer when this payload renders (component or form).
    #[must_use]
    pub fn as_renderable(&self) -> Option<&Arc<dyn Renderable>> {
        match self {
            Self::Renderer(r) | Self::Form(r) => Some(r),
            Self::Function(_) => None,
        }
    }

    /// Returns the function when this payload is callable.
    #[must_use]
    pub fn as_function(&self) -> Option<&Arc<dyn RuntimeFunction>> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decorators
// ─────────────────────────────────────────────────────────────────────────────

/// Decorator that merges ambient context values into render props.
///
/// Caller-supplied props win over injected context values, so a renderer
/// can always be overridden at the call site.
pub struct ContextInjected {
    inner: Arc<dyn Renderable>,
    context: Props,
}

impl ContextInjected {
    /// Wraps `inner`, injecting `context` under the key `"context"`.
    #[must_use]
    pub fn new(inner: Arc<dyn Renderable>, context: Props) -> Self {
        Self { inner, context }
    }
}

impl Renderable for ContextInjected {
    fn render(&self, props: &Props) -> Result<RenderNode, RenderError> {
        let mut merged = Props::new();
        merged.set("context", self.context.to_value());
        merged.merge(props);
        self.inner.render(&merged)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Decorator that binds a fixed set of props to a renderer.
///
/// Props supplied at render time win over the bound values, so the bound
/// bag behaves as call-site defaults. Batch resolution uses this to carry
/// the props of a detailed request into the resolved implementation.
pub struct BoundProps {
    inner: Arc<dyn Renderable>,
    props: Props,
}

impl BoundProps {
    /// Wraps `inner` with `props` as defaults.
    #[must_use]
    pub fn new(inner: Arc<dyn Renderable>, props: Props) -> Self {
        Self { inner, props }
    }
}

impl Renderable for BoundProps {
    fn render(&self, props: &Props) -> Result<RenderNode, RenderError> {
        let mut merged = self.props.clone();
        merged.merge(props);
        self.inner.render(&merged)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Decorator that converts a renderer failure into a visible diagnostic
/// node instead of propagating the error.
pub struct ErrorBoundary {
    inner: Arc<dyn Renderable>,
}

impl ErrorBoundary {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn Renderable>) -> Self {
        Self { inner }
    }
}

impl Renderable for ErrorBoundary {
    fn render(&self, props: &Props) -> Result<RenderNode, RenderError> {
        match self.inner.render(props) {
            Ok(node) => Ok(node),
            Err(err) => {
                tracing::warn!(renderer = self.inner.name(), %err, "renderer failed");
                Ok(RenderNode::element("section")
                    .with_attr("role", "alert")
                    .with_child(RenderNode::text(format!(
                        "render failed: {err} ({})",
                        self.inner.name()
                    ))))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_renderer() -> Arc<dyn Renderable> {
        Arc::new(FnRenderable(|props: &Props| {
            Ok(RenderNode::element("div")
                .with_attr("ctx", props.get("context").cloned().unwrap_or(Value::Null)))
        }))
    }

    #[test]
    fn props_merge_other_wins() {
        let mut a = Props::new().with("x", 1).with("y", 2);
        let b = Props::new().with("y", 3);
        a.merge(&b);
        assert_eq!(a.get("x"), Some(&Value::from(1)));
        assert_eq!(a.get("y"), Some(&Value::from(3)));
    }

    #[test]
    fn context_injection_does_not_clobber_caller_props() {
        let wrapped = ContextInjected::new(
            ok_renderer(),
            Props::new().with("theme", "dark"),
        );
        let caller = Props::new().with("context", "caller-owned");
        let node = wrapped.render(&caller).unwrap();
        // The caller's "context" value survives injection.
        match node {
            RenderNode::Element { attrs, .. } => {
                assert_eq!(attrs.get("ctx"), Some(&Value::from("caller-owned")));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn context_injection_supplies_context_when_absent() {
        let wrapped = ContextInjected::new(
            ok_renderer(),
            Props::new().with("theme", "dark"),
        );
        let node = wrapped.render(&Props::new()).unwrap();
        match node {
            RenderNode::Element { attrs, .. } => {
                let ctx = attrs.get("ctx").unwrap();
                assert_eq!(ctx["theme"], Value::from("dark"));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn bound_props_are_defaults_render_time_wins() {
        let echo = Arc::new(FnRenderable(|props: &Props| {
            Ok(RenderNode::element("div")
                .with_attr("x", props.get("x").cloned().unwrap_or(Value::Null))
                .with_attr("y", props.get("y").cloned().unwrap_or(Value::Null)))
        })) as Arc<dyn Renderable>;
        let bound = BoundProps::new(echo, Props::new().with("x", 1).with("y", 2));
        let node = bound.render(&Props::new().with("y", 9)).unwrap();
        match node {
            RenderNode::Element { attrs, .. } => {
                assert_eq!(attrs.get("x"), Some(&Value::from(1)));
                assert_eq!(attrs.get("y"), Some(&Value::from(9)));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn error_boundary_yields_diagnostic_node() {
        let failing = Arc::new(FnRenderable(|_: &Props| {
            Err(RenderError::message("boom"))
        })) as Arc<dyn Renderable>;
        let node = ErrorBoundary::new(failing).render(&Props::new()).unwrap();
        match node {
            RenderNode::Element { tag, children, .. } => {
                assert_eq!(tag, "section");
                assert!(matches!(&children[0], RenderNode::Text(t) if t.contains("boom")));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn component_impl_kind_tags() {
        assert_eq!(
            ComponentImpl::renderer(FnRenderable(|_: &Props| Ok(RenderNode::text("")))).kind(),
            ComponentKind::Component
        );
        assert_eq!(
            ComponentImpl::form(FnRenderable(|_: &Props| Ok(RenderNode::text("")))).kind(),
            ComponentKind::Form
        );
    }
}

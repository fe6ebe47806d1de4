//! Container/layout resolution for object and array nodes.
//!
//! A secondary cascade, identical in shape to field resolution: explicit
//! registry component, then a built-in container token from the
//! presentation widget name, then the default paper container. Pure — it
//! never mutates the registry.

use crate::presentation::PresentationNode;
use crate::schema::SchemaNode;
use reify_registry::render::ComponentImpl;
use reify_registry::resolver::Resolver;

/// Built-in container tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainerKind {
    /// Plain block container.
    Div,
    /// Section container.
    Section,
    /// Article container.
    Article,
    /// Paragraph container.
    Paragraph,
    /// No wrapping element.
    Fragment,
    /// Grid layout.
    Grid,
    /// Card surface.
    Card,
    /// Elevated paper surface (the default).
    #[default]
    Paper,
}

impl ContainerKind {
    /// Parses a presentation widget token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "div" => Some(Self::Div),
            "section" => Some(Self::Section),
            "article" => Some(Self::Article),
            "paragraph" => Some(Self::Paragraph),
            "fragment" => Some(Self::Fragment),
            "grid" => Some(Self::Grid),
            "card" => Some(Self::Card),
            "paper" => Some(Self::Paper),
            _ => None,
        }
    }

    /// The element tag this container renders as.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Section => "section",
            Self::Article => "article",
            Self::Paragraph => "p",
            Self::Fragment => "fragment",
            Self::Grid => "grid",
            Self::Card => "card",
            Self::Paper => "paper",
        }
    }
}

/// The wrapping presentation chosen for an object/array node.
#[derive(Debug, Clone)]
pub enum ResolvedContainer {
    /// An explicit registry-resolved component.
    Custom(ComponentImpl),
    /// A built-in container token.
    Builtin(ContainerKind),
}

/// Chooses the wrapping container for an object/array node.
///
/// Precedence: explicit registry component named by the presentation node,
/// then a built-in token keyed by the presentation widget name, then the
/// default [`ContainerKind::Paper`]. An unrecognized widget token falls
/// through to the default rather than failing. An explicit component name
/// is terminal: naming an unregistered FQN yields the resolver's `NotFound`
/// placeholder as the container, not a fall-through to the widget token —
/// the author asked for that component and gets its soft-fail result.
#[must_use]
pub fn resolve_container(
    _schema: &SchemaNode,
    presentation: &PresentationNode,
    resolver: &Resolver<'_>,
) -> ResolvedContainer {
    if let Some(component) = presentation.component.as_deref()
        && let Ok(implementation) = resolver.resolve(component)
    {
        return ResolvedContainer::Custom(implementation);
    }

    if let Some(widget) = presentation.widget.as_deref() {
        if let Some(kind) = ContainerKind::from_token(widget) {
            return ResolvedContainer::Builtin(kind);
        }
        tracing::debug!(widget, "unknown container token, using default");
    }

    ResolvedContainer::Builtin(ContainerKind::default())
}

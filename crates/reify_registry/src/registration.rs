//! Registration records.
//!
//! A [`ComponentRegistration`] binds an FQN to an implementation payload and
//! its metadata. Records are owned by the store, never partially mutated:
//! re-registering an FQN fully replaces the prior record.

use crate::error::RegistryError;
use crate::fqn::{ComponentFqn, DEFAULT_VERSION};
use crate::render::{ComponentImpl, ComponentKind, Renderable, RuntimeFunction};

/// The wildcard role granting access to every caller.
pub const WILDCARD_ROLE: &str = "*";

/// The stored record binding an FQN to an implementation plus its metadata.
#[derive(Debug, Clone)]
pub struct ComponentRegistration {
    /// The fully-qualified name this record is stored under.
    pub fqn: ComponentFqn,
    /// The implementation payload.
    pub implementation: ComponentImpl,
    /// Free-form tags for listing (`list_by_tag`).
    pub tags: Vec<String>,
    /// Roles allowed to receive the implementation; `["*"]` means everyone.
    pub allowed_roles: Vec<String>,
    /// Named connectors this component depends on (external collaborators).
    pub connectors: Vec<String>,
    /// Whether resolution wraps the renderer with context injection.
    pub requires_context_injection: bool,
    /// Whether resolution wraps the renderer with an error boundary.
    pub requires_error_boundary: bool,
}

impl ComponentRegistration {
    /// Starts a registration builder.
    #[must_use]
    pub fn builder() -> RegistrationBuilder {
        RegistrationBuilder::default()
    }

    /// The kind tag of the stored implementation.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.implementation.kind()
    }

    /// Canonical FQN string, the store key.
    #[must_use]
    pub fn key(&self) -> String {
        self.fqn.to_string()
    }
}

/// Builder for [`ComponentRegistration`].
///
/// Namespace, name, and implementation are required; everything else has
/// the documented defaults (`version = "1.0.0"`, `allowed_roles = ["*"]`,
/// `requires_error_boundary = true`).
///
/// # Example
///
/// ```
/// use reify_registry::registration::ComponentRegistration;
/// use reify_registry::render::{FnRenderable, Props, RenderNode};
///
/// let registration = ComponentRegistration::builder()
///     .namespace("core")
///     .name("Widget")
///     .renderer(FnRenderable(|_: &Props| Ok(RenderNode::text("widget"))))
///     .allowed_roles(["ADMIN"])
///     .build()
///     .unwrap();
/// assert_eq!(registration.key(), "core.Widget@1.0.0");
/// ```
#[derive(Default)]
pub struct RegistrationBuilder {
    namespace: Option<String>,
    name: Option<String>,
    version: Option<String>,
    implementation: Option<ComponentImpl>,
    tags: Vec<String>,
    allowed_roles: Option<Vec<String>>,
    connectors: Vec<String>,
    requires_context_injection: bool,
    requires_error_boundary: Option<bool>,
}

impl RegistrationBuilder {
    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the component name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the version (defaults to `1.0.0`).
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets a renderer implementation (`component` kind).
    #[must_use]
    pub fn renderer(mut self, renderable: impl Renderable) -> Self {
        self.implementation = Some(ComponentImpl::renderer(renderable));
        self
    }

    /// Sets a form implementation (`form` kind).
    #[must_use]
    pub fn form(mut self, renderable: impl Renderable) -> Self {
        self.implementation = Some(ComponentImpl::form(renderable));
        self
    }

    /// Sets a function implementation (`function` kind).
    #[must_use]
    pub fn function(mut self, function: impl RuntimeFunction) -> Self {
        self.implementation = Some(ComponentImpl::function(function));
        self
    }

    /// Sets a pre-built implementation payload.
    #[must_use]
    pub fn implementation(mut self, implementation: ComponentImpl) -> Self {
        self.implementation = Some(implementation);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the allowed roles (defaults to the wildcard).
    #[must_use]
    pub fn allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Sets connector names.
    #[must_use]
    pub fn connectors<I, S>(mut self, connectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connectors = connectors.into_iter().map(Into::into).collect();
        self
    }

    /// Requests context injection at resolution time.
    #[must_use]
    pub fn with_context_injection(mut self) -> Self {
        self.requires_context_injection = true;
        self
    }

    /// Overrides the error-boundary default (`true`).
    #[must_use]
    pub fn error_boundary(mut self, enabled: bool) -> Self {
        self.requires_error_boundary = Some(enabled);
        self
    }

    /// Builds the registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingNamespace`],
    /// [`RegistryError::MissingName`], or
    /// [`RegistryError::MissingImplementation`] when a required field is
    /// absent or empty. These are fatal: the record must not enter the
    /// store.
    pub fn build(self) -> Result<ComponentRegistration, RegistryError> {
        let namespace = match self.namespace {
            Some(ns) if !ns.trim().is_empty() => ns,
            _ => return Err(RegistryError::MissingNamespace),
        };
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(RegistryError::MissingName),
        };
        let implementation = self
            .implementation
            .ok_or(RegistryError::MissingImplementation)?;

        let version = self.version.as_deref().unwrap_or(DEFAULT_VERSION);
        let fqn = ComponentFqn::new(namespace, name, Some(version))?;

        Ok(ComponentRegistration {
            fqn,
            implementation,
            tags: self.tags,
            allowed_roles: self
                .allowed_roles
                .unwrap_or_else(|| vec![WILDCARD_ROLE.to_string()]),
            connectors: self.connectors,
            requires_context_injection: self.requires_context_injection,
            requires_error_boundary: self.requires_error_boundary.unwrap_or(true),
        })
    }
}

//! Plugin and resource injection.
//!
//! Descriptors name what to load and which loader function loads it; the
//! injection layer resolves the loader from the registry, invokes it with
//! the descriptor, and announces success through the registry's event
//! channel so waiting consumers can re-resolve. Loading is best-effort by
//! design: a batch of descriptors where some fail still loads the rest.

use crate::context::{PLUGIN_LOADER_FQN, RESOURCE_LOADER_FQN, RuntimeContext};
use reify_registry::error::RenderError;
use reify_registry::fqn::ensure_version;
use reify_registry::notify::RegistryEvent;
use reify_registry::registration::WILDCARD_ROLE;
use reify_registry::render::Props;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from a single injection.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The named loader is absent or not a function.
    #[error("loader '{0}' is not a registered function")]
    LoaderNotFound(String),

    /// The loader ran and failed.
    #[error("loader '{fqn}' failed")]
    LoaderFailed {
        /// The loader FQN that was invoked.
        fqn: String,
        /// The loader's own error.
        #[source]
        source: RenderError,
    },

    /// The descriptor could not be serialized for the loader call.
    #[error("descriptor '{0}' is not serializable")]
    Descriptor(String),
}

fn default_enabled() -> bool {
    true
}

fn wildcard_roles() -> Vec<String> {
    vec![WILDCARD_ROLE.to_string()]
}

/// Declaration of one plugin to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    /// Stable plugin identifier, echoed in the `PluginLoaded` event.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Where to fetch the plugin payload from; loader-specific.
    #[serde(default)]
    pub uri: Option<String>,
    /// Loader FQN; the default plugin loader when omitted.
    #[serde(default)]
    pub loader: Option<String>,
    /// Disabled descriptors are skipped by batch injection.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Roles allowed to receive this plugin.
    #[serde(default = "wildcard_roles")]
    pub roles: Vec<String>,
    /// Extra values passed through to the loader.
    #[serde(default)]
    pub props: Props,
}

/// What kind of external resource a descriptor names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An executable script payload.
    Script,
    /// A stylesheet.
    Style,
    /// Anything else (fonts, images, data files).
    #[default]
    Asset,
}

/// Declaration of one resource (stylesheet, script, asset) to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Stable resource identifier.
    pub id: String,
    /// Resource kind.
    #[serde(default, rename = "type")]
    pub kind: ResourceKind,
    /// Where to fetch the resource from.
    #[serde(default)]
    pub uri: Option<String>,
    /// Loader FQN; the default resource loader when omitted.
    #[serde(default)]
    pub loader: Option<String>,
    /// Extra values passed through to the loader.
    #[serde(default)]
    pub props: Props,
}

impl RuntimeContext {
    /// Loads one plugin through its loader function.
    ///
    /// Emits [`RegistryEvent::PluginLoaded`] on success so consumers that
    /// resolved `NotFound` earlier can re-resolve.
    ///
    /// # Errors
    ///
    /// [`InjectError::LoaderNotFound`] when the loader FQN is absent or
    /// names a non-function, [`InjectError::LoaderFailed`] when the loader
    /// itself errors.
    pub fn inject_plugin(&self, descriptor: &PluginDescriptor) -> Result<Value, InjectError> {
        let loader = descriptor.loader.as_deref().unwrap_or(PLUGIN_LOADER_FQN);
        let outcome = self.invoke_loader(loader, &descriptor.id, descriptor, &descriptor.props)?;
        self.registry().emit(&RegistryEvent::PluginLoaded {
            id: descriptor.id.clone(),
        });
        tracing::info!(plugin = %descriptor.id, loader, "plugin loaded");
        Ok(outcome)
    }

    /// Loads one resource through its loader function.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`inject_plugin`](Self::inject_plugin);
    /// resources emit no event.
    pub fn inject_resource(&self, descriptor: &ResourceDescriptor) -> Result<Value, InjectError> {
        let loader = descriptor.loader.as_deref().unwrap_or(RESOURCE_LOADER_FQN);
        let outcome = self.invoke_loader(loader, &descriptor.id, descriptor, &descriptor.props)?;
        tracing::info!(resource = %descriptor.id, loader, "resource loaded");
        Ok(outcome)
    }

    /// Loads a batch of plugins for the context's principal, returning
    /// how many loaded.
    ///
    /// Disabled descriptors and descriptors whose roles the principal does
    /// not hold are skipped; individual failures are logged and do not
    /// stop the batch.
    pub fn inject_plugins(&self, descriptors: &[PluginDescriptor]) -> usize {
        let gate = self.gate();
        let mut loaded = 0;
        for descriptor in descriptors {
            if !descriptor.enabled {
                tracing::debug!(plugin = %descriptor.id, "descriptor disabled, skipping");
                continue;
            }
            if !gate.has_role(&descriptor.roles, None, None) {
                tracing::debug!(plugin = %descriptor.id, "principal lacks plugin roles, skipping");
                continue;
            }
            match self.inject_plugin(descriptor) {
                Ok(_) => loaded += 1,
                Err(err) => {
                    tracing::warn!(plugin = %descriptor.id, %err, "plugin failed to load");
                }
            }
        }
        loaded
    }

    fn invoke_loader<D: Serialize>(
        &self,
        loader: &str,
        id: &str,
        descriptor: &D,
        props: &Props,
    ) -> Result<Value, InjectError> {
        let key = ensure_version(loader);
        let registration = self
            .registry()
            .get_str(&key)
            .ok_or_else(|| InjectError::LoaderNotFound(loader.to_string()))?;
        let function = registration
            .implementation
            .as_function()
            .ok_or_else(|| InjectError::LoaderNotFound(loader.to_string()))?;

        let descriptor_value =
            serde_json::to_value(descriptor).map_err(|_| InjectError::Descriptor(id.to_string()))?;
        let args = Props::new()
            .with("descriptor", descriptor_value)
            .with("props", props.to_value());

        function
            .call(self.registry(), args)
            .map_err(|source| InjectError::LoaderFailed {
                fqn: loader.to_string(),
                source,
            })
    }
}

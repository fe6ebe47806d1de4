//! Fully-qualified component names.
//!
//! Every registrable implementation is identified by an FQN of the form
//! `namespace.name@version`. The version segment is optional in the string
//! form and defaults to [`DEFAULT_VERSION`].
//!
//! # Grammar
//!
//! ```text
//! fqn       := path [ "@" version ]
//! path      := segment ( "." segment )*
//! namespace := all path segments except the last, joined with "."
//! name      := last path segment
//! ```
//!
//! A single-segment path (no `.`) is accepted for legacy registrations and
//! assigned the synthetic namespace [`RUNTIME_NAMESPACE`].

use crate::error::FqnError;
use core::fmt;
use core::str::FromStr;

/// Version assigned when the string form omits `@version`.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Synthetic namespace assigned to single-segment names.
///
/// Legacy registrations sometimes use a bare name (`"Widget"` instead of
/// `"core.Widget"`); they land in this namespace so the store stays keyed
/// by full canonical strings.
pub const RUNTIME_NAMESPACE: &str = "__runtime__";

/// A fully-qualified component name.
///
/// Equality and hashing are by `(namespace, name, version)`, which is
/// equivalent to equality of the canonical string form.
///
/// # Example
///
/// ```
/// use reify_registry::fqn::ComponentFqn;
///
/// let fqn: ComponentFqn = "core.forms.Widget@2.1.0".parse().unwrap();
/// assert_eq!(fqn.namespace(), "core.forms");
/// assert_eq!(fqn.name(), "Widget");
/// assert_eq!(fqn.to_string(), "core.forms.Widget@2.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentFqn {
    namespace: String,
    name: String,
    version: String,
}

impl ComponentFqn {
    /// Creates an FQN from its parts, defaulting the version when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`FqnError::InvalidIdentifier`] when namespace, name, or a
    /// supplied version is empty.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: Option<&str>,
    ) -> Result<Self, FqnError> {
        let namespace = namespace.into();
        let name = name.into();
        if namespace.trim().is_empty() {
            return Err(FqnError::InvalidIdentifier("empty namespace".into()));
        }
        if name.trim().is_empty() {
            return Err(FqnError::InvalidIdentifier("empty name".into()));
        }
        let version = match version {
            Some(v) if v.trim().is_empty() => {
                return Err(FqnError::InvalidIdentifier("empty version".into()));
            }
            Some(v) => v.to_string(),
            None => DEFAULT_VERSION.to_string(),
        };
        Ok(Self {
            namespace,
            name,
            version,
        })
    }

    /// Parses the string form of an FQN.
    ///
    /// The namespace is all dot-segments except the last; a single-segment
    /// path is assigned [`RUNTIME_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// Returns [`FqnError::InvalidIdentifier`] for empty input, empty
    /// segments, or more than one `@`.
    pub fn parse(input: &str) -> Result<Self, FqnError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(FqnError::InvalidIdentifier("empty identifier".into()));
        }

        let (path, version) = match input.split_once('@') {
            Some((path, version)) => {
                if version.contains('@') {
                    return Err(FqnError::InvalidIdentifier(format!(
                        "multiple '@' in '{input}'"
                    )));
                }
                (path, Some(version))
            }
            None => (input, None),
        };

        if path.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(FqnError::InvalidIdentifier(format!(
                "empty segment in '{input}'"
            )));
        }

        match path.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name, version),
            None => Self::new(RUNTIME_NAMESPACE, path, version),
        }
    }

    /// The namespace segments, joined with `.`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The unqualified component name (the logical name used as the key in
    /// batch resolution results).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ComponentFqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}@{}", self.namespace, self.name, self.version)
    }
}

impl FromStr for ComponentFqn {
    type Err = FqnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Appends `@1.0.0` to an FQN string that carries no version. Idempotent.
///
/// # Example
///
/// ```
/// use reify_registry::fqn::ensure_version;
///
/// assert_eq!(ensure_version("core.Widget"), "core.Widget@1.0.0");
/// assert_eq!(ensure_version("core.Widget@2.0.0"), "core.Widget@2.0.0");
/// ```
#[must_use]
pub fn ensure_version(fqn: &str) -> String {
    if fqn.contains('@') {
        fqn.to_string()
    } else {
        format!("{fqn}@{DEFAULT_VERSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_form() {
        let fqn = ComponentFqn::parse("core.Widget@2.0.0").unwrap();
        assert_eq!(fqn.namespace(), "core");
        assert_eq!(fqn.name(), "Widget");
        assert_eq!(fqn.version(), "2.0.0");
    }

    #[test]
    fn parse_defaults_version() {
        let fqn = ComponentFqn::parse("core.Widget").unwrap();
        assert_eq!(fqn.version(), DEFAULT_VERSION);
        assert_eq!(fqn.to_string(), "core.Widget@1.0.0");
    }

    #[test]
    fn parse_multi_segment_namespace() {
        // Namespace is all segments except the last.
        let fqn = ComponentFqn::parse("reify.forms.Widget@2.0.0").unwrap();
        assert_eq!(fqn.namespace(), "reify.forms");
        assert_eq!(fqn.name(), "Widget");
    }

    #[test]
    fn parse_single_segment_uses_runtime_namespace() {
        let fqn = ComponentFqn::parse("Widget").unwrap();
        assert_eq!(fqn.namespace(), RUNTIME_NAMESPACE);
        assert_eq!(fqn.name(), "Widget");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(ComponentFqn::parse("").is_err());
        assert!(ComponentFqn::parse("  ").is_err());
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert!(ComponentFqn::parse(".Widget").is_err());
        assert!(ComponentFqn::parse("core.").is_err());
        assert!(ComponentFqn::parse("core..Widget").is_err());
    }

    #[test]
    fn parse_rejects_empty_version() {
        assert!(ComponentFqn::parse("core.Widget@").is_err());
    }

    #[test]
    fn parse_rejects_double_at() {
        assert!(ComponentFqn::parse("core.Widget@1@2").is_err());
    }

    #[test]
    fn ensure_version_is_idempotent() {
        let once = ensure_version("core.Widget");
        let twice = ensure_version(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "core.Widget@1.0.0");
    }

    #[test]
    fn equality_is_by_canonical_form() {
        let a = ComponentFqn::parse("core.Widget").unwrap();
        let b = ComponentFqn::new("core", "Widget", Some("1.0.0")).unwrap();
        assert_eq!(a, b);

        let c = ComponentFqn::parse("core.Widget@2.0.0").unwrap();
        assert_ne!(a, c);
    }
}

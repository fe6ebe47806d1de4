//! Role-based access gate.
//!
//! Decides whether a caller may receive a registration's implementation.
//! The interesting part is multi-tenant narrowing: when a lookup is scoped
//! to an organization (and optionally a business unit), the caller's
//! effective roles come from matching memberships rather than the flat
//! role set.

use crate::registration::WILDCARD_ROLE;
use serde::{Deserialize, Serialize};

/// A principal's membership in an organization and optional business unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Organization identifier, if this membership is org-scoped.
    pub organization: Option<String>,
    /// Business-unit identifier within the organization.
    pub business_unit: Option<String>,
    /// Roles granted by this membership.
    pub roles: Vec<String>,
}

/// The acting principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable principal identifier.
    pub id: String,
    /// Flat role set, used when no tenant scope narrows the lookup.
    pub roles: Vec<String>,
    /// Organization/business-unit memberships.
    pub memberships: Vec<Membership>,
}

impl Principal {
    /// A principal with an id and flat roles, no memberships.
    pub fn with_roles<I, S>(id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            memberships: Vec::new(),
        }
    }

    /// The anonymous principal: no roles, no memberships.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: "anonymous".to_string(),
            ..Self::default()
        }
    }
}

/// A tenant scope narrowing a role check to an organization, and optionally
/// to one business unit within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantScope {
    /// Organization identifier to match memberships against.
    pub organization: String,
    /// Business-unit identifier; `None` means "organization-wide".
    pub business_unit: Option<String>,
}

impl TenantScope {
    /// An organization-wide scope.
    pub fn organization(id: impl Into<String>) -> Self {
        Self {
            organization: id.into(),
            business_unit: None,
        }
    }

    /// A scope narrowed to one business unit.
    pub fn business_unit(org: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            organization: org.into(),
            business_unit: Some(unit.into()),
        }
    }
}

/// Returns true when the two role sets intersect.
#[must_use]
pub fn roles_intersect(required: &[String], held: &[String]) -> bool {
    required.iter().any(|role| held.contains(role))
}

/// The role-intersection predicate over a principal.
#[derive(Debug, Clone, Copy)]
pub struct AccessGate<'a> {
    principal: &'a Principal,
}

impl<'a> AccessGate<'a> {
    /// Creates a gate for the given principal.
    #[must_use]
    pub fn new(principal: &'a Principal) -> Self {
        Self { principal }
    }

    /// The gated principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        self.principal
    }

    /// Decides whether a caller holding the effective role set may pass.
    ///
    /// - `required == ["*"]` always passes, for every caller including the
    ///   anonymous one.
    /// - When `caller_roles` is supplied it is used verbatim.
    /// - Otherwise the effective set is the principal's flat roles — unless
    ///   a [`TenantScope`] is supplied, in which case it is derived from
    ///   memberships (see [`scoped_roles`](Self::scoped_roles)).
    #[must_use]
    pub fn has_role(
        &self,
        required: &[String],
        caller_roles: Option<&[String]>,
        scope: Option<&TenantScope>,
    ) -> bool {
        if let [single] = required
            && single == WILDCARD_ROLE
        {
            return true;
        }

        match caller_roles {
            Some(roles) => roles_intersect(required, roles),
            None => match scope {
                Some(scope) => roles_intersect(required, &self.scoped_roles(scope)),
                None => roles_intersect(required, &self.principal.roles),
            },
        }
    }

    /// Derives the effective role set for a tenant scope.
    ///
    /// A membership contributes its roles when its organization matches the
    /// scope and its business unit agrees with the scope's:
    ///
    /// - scope without a business unit: only memberships with
    ///   `business_unit: None` match (an org-wide check never inherits
    ///   unit-scoped roles);
    /// - scope with a business unit: membership and scope must name the
    ///   same unit.
    ///
    /// A membership missing the information needed to decide contributes
    /// nothing.
    #[must_use]
    pub fn scoped_roles(&self, scope: &TenantScope) -> Vec<String> {
        let mut roles = Vec::new();
        for membership in &self.principal.memberships {
            let Some(org) = membership.organization.as_deref() else {
                // No organization recorded: not enough information to decide.
                continue;
            };
            if org != scope.organization {
                continue;
            }
            let unit_matches = match (&scope.business_unit, &membership.business_unit) {
                (None, None) => true,
                (Some(want), Some(have)) => want == have,
                _ => false,
            };
            if !unit_matches {
                continue;
            }
            for role in &membership.roles {
                if !roles.contains(role) {
                    roles.push(role.clone());
                }
            }
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn member(org: &str, unit: Option<&str>, roles: &[&str]) -> Membership {
        Membership {
            organization: Some(org.to_string()),
            business_unit: unit.map(str::to_string),
            roles: strs(roles),
        }
    }

    #[test]
    fn wildcard_always_passes() {
        let anon = Principal::anonymous();
        let gate = AccessGate::new(&anon);
        assert!(gate.has_role(&strs(&["*"]), None, None));
        assert!(gate.has_role(&strs(&["*"]), Some(&[]), None));
    }

    #[test]
    fn flat_role_intersection() {
        let principal = Principal::with_roles("u1", ["USER"]);
        let gate = AccessGate::new(&principal);
        assert!(gate.has_role(&strs(&["USER", "ADMIN"]), None, None));
        assert!(!gate.has_role(&strs(&["ADMIN"]), None, None));
    }

    #[test]
    fn explicit_caller_roles_bypass_principal() {
        let principal = Principal::with_roles("u1", ["ADMIN"]);
        let gate = AccessGate::new(&principal);
        // Supplied roles are used verbatim, the principal's are ignored.
        assert!(!gate.has_role(&strs(&["ADMIN"]), Some(&strs(&["USER"])), None));
    }

    #[test]
    fn org_scope_with_null_unit_membership() {
        let mut principal = Principal::with_roles("u1", ["USER"]);
        principal.memberships = vec![member("org-1", None, &["ADMIN"])];
        let gate = AccessGate::new(&principal);

        // Org-wide scope matches the null-unit membership.
        let scope = TenantScope::organization("org-1");
        assert!(gate.has_role(&strs(&["ADMIN"]), None, Some(&scope)));

        // A unit-narrowed scope does not match a null-unit membership.
        let scope = TenantScope::business_unit("org-1", "bu-9");
        assert!(!gate.has_role(&strs(&["ADMIN"]), None, Some(&scope)));
    }

    #[test]
    fn unit_scope_requires_same_unit() {
        let mut principal = Principal::anonymous();
        principal.memberships = vec![
            member("org-1", Some("bu-1"), &["EDITOR"]),
            member("org-1", Some("bu-2"), &["VIEWER"]),
        ];
        let gate = AccessGate::new(&principal);

        let scope = TenantScope::business_unit("org-1", "bu-1");
        assert!(gate.has_role(&strs(&["EDITOR"]), None, Some(&scope)));
        assert!(!gate.has_role(&strs(&["VIEWER"]), None, Some(&scope)));

        // Org-wide scope inherits nothing from unit-scoped memberships.
        let scope = TenantScope::organization("org-1");
        assert!(!gate.has_role(&strs(&["EDITOR"]), None, Some(&scope)));
    }

    #[test]
    fn ambiguous_membership_contributes_nothing() {
        let mut principal = Principal::anonymous();
        principal.memberships = vec![Membership {
            organization: None,
            business_unit: Some("bu-1".to_string()),
            roles: strs(&["ADMIN"]),
        }];
        let gate = AccessGate::new(&principal);
        let scope = TenantScope::business_unit("org-1", "bu-1");
        assert!(!gate.has_role(&strs(&["ADMIN"]), None, Some(&scope)));
    }

    #[test]
    fn scope_narrowing_ignores_flat_roles() {
        let mut principal = Principal::with_roles("u1", ["ADMIN"]);
        principal.memberships = vec![member("org-1", None, &["VIEWER"])];
        let gate = AccessGate::new(&principal);
        let scope = TenantScope::organization("org-1");
        // Flat ADMIN does not leak into the scoped check.
        assert!(!gate.has_role(&strs(&["ADMIN"]), None, Some(&scope)));
    }
}

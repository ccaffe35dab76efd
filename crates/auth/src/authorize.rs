use serde::Serialize;
use thiserror::Error;

use pharmacrm_core::{Employee, Feature, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("forbidden: role '{role}' may not access '{feature}'")]
    Forbidden { role: Role, feature: Feature },
}

/// Static role → feature table.
///
/// Exhaustive over both enums so a new feature or role cannot slip through
/// without a decision here.
pub fn role_grants(role: Role, feature: Feature) -> bool {
    match (feature, role) {
        (_, Role::Unrecognized) => false,
        (Feature::Employees, Role::Admin) => true,
        (Feature::Employees, Role::SalesRep | Role::Manager) => false,
        (Feature::Inventory, Role::Admin | Role::Manager) => true,
        (Feature::Inventory, Role::SalesRep) => false,
        (Feature::Customers | Feature::Orders | Feature::Tasks, _) => true,
    }
}

/// Does the user hold exactly `role`?
///
/// Unrecognized roles never match, not even `Role::Unrecognized` itself.
pub fn has_role(user: Option<&Employee>, role: Role) -> bool {
    role.is_recognized() && user.is_some_and(|e| e.role == role)
}

pub fn is_admin(user: Option<&Employee>) -> bool {
    has_role(user, Role::Admin)
}

/// Whether admin-only navigation entries should be rendered.
pub fn shows_admin_navigation(user: Option<&Employee>) -> bool {
    is_admin(user)
}

/// Check access to a feature. No user means no access.
pub fn can_access(user: Option<&Employee>, feature: Feature) -> bool {
    user.is_some_and(|e| role_grants(e.role, feature))
}

/// String-keyed variant for callers holding a route or menu key.
///
/// Unknown feature names are denied.
pub fn can_access_named(user: Option<&Employee>, feature: &str) -> bool {
    feature
        .parse::<Feature>()
        .is_ok_and(|f| can_access(user, f))
}

/// Features the user may open, in navigation order.
pub fn accessible_features(user: Option<&Employee>) -> Vec<Feature> {
    Feature::ALL
        .into_iter()
        .filter(|f| can_access(user, *f))
        .collect()
}

/// Same decision as [`can_access`], as a `Result` for `?` at call sites.
pub fn authorize(user: Option<&Employee>, feature: Feature) -> Result<(), AuthzError> {
    let Some(employee) = user else {
        return Err(AuthzError::Unauthenticated);
    };
    if role_grants(employee.role, feature) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role: employee.role,
            feature,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed, serializable record of an access decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub feature: Feature,
    pub granted: bool,
    pub employee_id: Option<String>,
    pub role: Option<Role>,
    /// Human-readable reason for the decision.
    pub reason: String,
    pub denial: Option<DenialKind>,
    /// Roles that would be granted this feature.
    pub granting_roles: Vec<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    UnrecognizedRole,
    InsufficientRole,
}

/// Explain why access to `feature` would be granted or denied.
pub fn explain_access(user: Option<&Employee>, feature: Feature) -> AccessExplanation {
    let granting_roles: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|r| role_grants(*r, feature))
        .collect();

    let Some(employee) = user else {
        return AccessExplanation {
            feature,
            granted: false,
            employee_id: None,
            role: None,
            reason: format!("No employee is signed in; '{feature}' requires authentication"),
            denial: Some(DenialKind::Unauthenticated),
            granting_roles,
        };
    };

    let granted = role_grants(employee.role, feature);
    let (reason, denial) = if granted {
        (format!("Role '{}' grants '{feature}'", employee.role), None)
    } else if !employee.role.is_recognized() {
        (
            format!("Employee {} carries an unrecognized role", employee.id),
            Some(DenialKind::UnrecognizedRole),
        )
    } else {
        (
            format!(
                "Role '{}' does not grant '{feature}'; requires one of {:?}",
                employee.role,
                granting_roles.iter().map(Role::as_str).collect::<Vec<_>>()
            ),
            Some(DenialKind::InsufficientRole),
        )
    };

    AccessExplanation {
        feature,
        granted,
        employee_id: Some(employee.id.to_string()),
        role: Some(employee.role),
        reason,
        denial,
        granting_roles,
    }
}

//! Path-based route authorization.

use crate::models::SessionToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    /// Let the caller through, but somewhere else.
    AllowWithRedirect(String),
}

/// Route namespaces. Each prefix matches itself and everything below it
/// (`/admin` matches `/admin` and `/admin/plans`, not `/administrator`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuardConfig {
    pub dashboard_prefix: String,
    pub app_prefixes: Vec<String>,
    pub admin_prefix: String,
    /// Where admins hitting the dashboard are sent
    pub admin_redirect: String,
}

impl Default for RouteGuardConfig {
    fn default() -> Self {
        Self {
            dashboard_prefix: "/dashboard".to_string(),
            app_prefixes: vec!["/app".to_string()],
            admin_prefix: "/admin".to_string(),
            admin_redirect: "/admin".to_string(),
        }
    }
}

fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Decide what happens to a request for `path` made with `token`.
///
/// Rules are checked in order; the first that matches wins:
/// 1. dashboard + admin token: redirect to the admin console
/// 2. dashboard: any token
/// 3. app namespaces: any token
/// 4. admin namespace: admin token
/// 5. everything else is public
pub fn authorize(path: &str, token: Option<&SessionToken>, config: &RouteGuardConfig) -> Decision {
    let require = |ok: bool| if ok { Decision::Allow } else { Decision::Deny };

    if is_under(path, &config.dashboard_prefix) {
        return match token {
            Some(t) if t.is_admin => Decision::AllowWithRedirect(config.admin_redirect.clone()),
            _ => require(token.is_some()),
        };
    }

    if config.app_prefixes.iter().any(|p| is_under(path, p)) {
        return require(token.is_some());
    }

    if is_under(path, &config.admin_prefix) {
        return require(token.is_some_and(|t| t.is_admin));
    }

    Decision::Allow
}

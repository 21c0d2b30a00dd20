//! The route table.
//!
//! One [`RouteDescriptor`] per `(method, path)` binds the route's ordered
//! guard steps to the [`Operation`] that serves it. The table is built once at
//! startup and is read-only afterwards.
//!
//! | Method | Path | Guards |
//! |---|---|---|
//! | GET | /users | Auth(VIEW_USERS) |
//! | GET | /users/{id} | Auth(VIEW_USER_BY_ID), Schema(GetUserById) |
//! | POST | /auth/register | Schema(Register) |
//! | POST | /auth/login | Schema(Login) |
//! | POST | /auth/forget-password | Schema(ForgetPassword) |
//! | POST | /users | Auth(CREATE_USER), Schema(CreateUser) |
//! | PUT | /users/{id} | Auth(UPDATE_USER), Schema(UpdateUser) |
//! | DELETE | /users/{id} | Auth(DELETE_USER), Schema(DeleteUser) |
//! | GET | /roles | Auth(VIEW_ROLES) |
//! | GET | /roles/{id} | Auth(VIEW_ROLE_BY_ID), Schema(GetRoleById) |
//! | POST | /roles | none |
//! | PUT | /roles/{id} | Auth(UPDATE_ROLE), Schema(UpdateRole) |
//! | DELETE | /roles/{id} | Auth(DELETE_ROLE), Schema(DeleteRole) |
//! | GET, POST | /permissions | none |
//! | GET, PUT, DELETE | /permissions/{id} | none |
//!
//! `POST /roles` and the `/permissions` routes carry no authorization guard.
//! That is kept as registered; [`RouteTable::audit`] reports every mutating
//! route without one, other than the public `/auth` operations.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use axum::http::Method;
use axum::routing::MethodFilter;

use rolegate_core::Permission;

use crate::handler::Operation;
use crate::middleware::guard::GuardStep;
use crate::validator::Schema;

#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub method: Method,
    pub path: &'static str,
    pub guards: Arc<[GuardStep]>,
    pub operation: Operation,
}

impl RouteDescriptor {
    pub fn new(
        method: Method,
        path: &'static str,
        guards: &[GuardStep],
        operation: Operation,
    ) -> Self {
        Self {
            method,
            path,
            guards: guards.into(),
            operation,
        }
    }

    pub fn required_permissions(&self) -> Vec<Permission> {
        self.guards
            .iter()
            .filter_map(|step| match step {
                GuardStep::Authorize(permission) => Some(*permission),
                GuardStep::Validate(_) => None,
            })
            .collect()
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    pub fn method_filter(&self) -> anyhow::Result<MethodFilter> {
        MethodFilter::try_from(self.method.clone())
            .map_err(|_| anyhow!("Unsupported method {} for {}", self.method, self.path))
    }
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A mutating route registered without an authorization guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFinding {
    pub method: Method,
    pub path: &'static str,
    pub operation: Operation,
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) mutates state without an authorization guard",
            self.method,
            self.path,
            self.operation.name()
        )
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    /// Rejects duplicate `(method, path)` pairs and methods axum cannot route.
    pub fn new(routes: Vec<RouteDescriptor>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();

        for route in &routes {
            route.method_filter()?;
            if !seen.insert((route.method.clone(), route.path)) {
                bail!("Route {} is registered twice", route);
            }
        }

        Ok(Self { routes })
    }

    pub fn standard() -> anyhow::Result<Self> {
        use GuardStep::{Authorize, Validate};

        Self::new(vec![
            // Users
            RouteDescriptor::new(
                Method::GET,
                "/users",
                &[Authorize(Permission::ViewUsers)],
                Operation::ListUsers,
            ),
            RouteDescriptor::new(
                Method::GET,
                "/users/{id}",
                &[
                    Authorize(Permission::ViewUserById),
                    Validate(Schema::GetUserById),
                ],
                Operation::GetUser,
            ),
            // Auth
            RouteDescriptor::new(
                Method::POST,
                "/auth/register",
                &[Validate(Schema::Register)],
                Operation::Register,
            ),
            RouteDescriptor::new(
                Method::POST,
                "/auth/login",
                &[Validate(Schema::Login)],
                Operation::Login,
            ),
            RouteDescriptor::new(
                Method::POST,
                "/auth/forget-password",
                &[Validate(Schema::ForgetPassword)],
                Operation::ForgetPassword,
            ),
            RouteDescriptor::new(
                Method::POST,
                "/users",
                &[
                    Authorize(Permission::CreateUser),
                    Validate(Schema::CreateUser),
                ],
                Operation::CreateUser,
            ),
            RouteDescriptor::new(
                Method::PUT,
                "/users/{id}",
                &[
                    Authorize(Permission::UpdateUser),
                    Validate(Schema::UpdateUser),
                ],
                Operation::UpdateUser,
            ),
            RouteDescriptor::new(
                Method::DELETE,
                "/users/{id}",
                &[
                    Authorize(Permission::DeleteUser),
                    Validate(Schema::DeleteUser),
                ],
                Operation::DeleteUser,
            ),
            // Roles
            RouteDescriptor::new(
                Method::GET,
                "/roles",
                &[Authorize(Permission::ViewRoles)],
                Operation::ListRoles,
            ),
            RouteDescriptor::new(
                Method::GET,
                "/roles/{id}",
                &[
                    Authorize(Permission::ViewRoleById),
                    Validate(Schema::GetRoleById),
                ],
                Operation::GetRole,
            ),
            RouteDescriptor::new(Method::POST, "/roles", &[], Operation::CreateRole),
            RouteDescriptor::new(
                Method::PUT,
                "/roles/{id}",
                &[
                    Authorize(Permission::UpdateRole),
                    Validate(Schema::UpdateRole),
                ],
                Operation::UpdateRole,
            ),
            RouteDescriptor::new(
                Method::DELETE,
                "/roles/{id}",
                &[
                    Authorize(Permission::DeleteRole),
                    Validate(Schema::DeleteRole),
                ],
                Operation::DeleteRole,
            ),
            // Permissions
            RouteDescriptor::new(Method::GET, "/permissions", &[], Operation::ListPermissions),
            RouteDescriptor::new(
                Method::GET,
                "/permissions/{id}",
                &[],
                Operation::GetPermission,
            ),
            RouteDescriptor::new(
                Method::POST,
                "/permissions",
                &[],
                Operation::CreatePermission,
            ),
            RouteDescriptor::new(
                Method::PUT,
                "/permissions/{id}",
                &[],
                Operation::UpdatePermission,
            ),
            RouteDescriptor::new(
                Method::DELETE,
                "/permissions/{id}",
                &[],
                Operation::DeletePermission,
            ),
        ])
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn find(&self, method: &Method, path: &str) -> Option<&RouteDescriptor> {
        self.routes
            .iter()
            .find(|route| route.method == *method && route.path == path)
    }

    /// Routes grouped by path, in first-registration order.
    pub fn paths(&self) -> Vec<(&'static str, Vec<&RouteDescriptor>)> {
        let mut grouped: Vec<(&'static str, Vec<&RouteDescriptor>)> = Vec::new();

        for route in &self.routes {
            match grouped.iter_mut().find(|(path, _)| *path == route.path) {
                Some((_, routes)) => routes.push(route),
                None => grouped.push((route.path, vec![route])),
            }
        }

        grouped
    }

    pub fn audit(&self) -> Vec<AuditFinding> {
        self.routes
            .iter()
            .filter(|route| route.is_mutating() && !route.operation.is_public())
            .filter(|route| route.required_permissions().is_empty())
            .map(|route| AuditFinding {
                method: route.method.clone(),
                path: route.path,
                operation: route.operation,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::standard().unwrap()
    }

    #[test]
    fn test_standard_table_has_every_route() {
        assert_eq!(table().routes().len(), 18);
    }

    #[test]
    fn test_guards_are_declared_in_order() {
        let table = table();
        let route = table.find(&Method::PUT, "/users/{id}").unwrap();
        assert_eq!(
            route.guards.as_ref(),
            &[
                GuardStep::Authorize(Permission::UpdateUser),
                GuardStep::Validate(Schema::UpdateUser),
            ]
        );
        assert_eq!(route.operation, Operation::UpdateUser);
    }

    #[test]
    fn test_each_verb_declares_its_own_guards() {
        let table = table();
        let get = table.find(&Method::GET, "/users/{id}").unwrap();
        let delete = table.find(&Method::DELETE, "/users/{id}").unwrap();
        assert_eq!(get.required_permissions(), vec![Permission::ViewUserById]);
        assert_eq!(delete.required_permissions(), vec![Permission::DeleteUser]);
    }

    #[test]
    fn test_public_auth_routes_only_validate() {
        let table = table();
        for path in ["/auth/register", "/auth/login", "/auth/forget-password"] {
            let route = table.find(&Method::POST, path).unwrap();
            assert!(route.required_permissions().is_empty());
            assert_eq!(route.guards.len(), 1);
        }
    }

    #[test]
    fn test_audit_reports_unguarded_mutations() {
        let findings: Vec<String> = table()
            .audit()
            .iter()
            .map(|finding| format!("{} {}", finding.method, finding.path))
            .collect();

        assert_eq!(
            findings,
            vec![
                "POST /roles",
                "POST /permissions",
                "PUT /permissions/{id}",
                "DELETE /permissions/{id}",
            ]
        );
    }

    #[test]
    fn test_audit_skips_public_operations_only() {
        let table = RouteTable::new(vec![
            RouteDescriptor::new(
                Method::POST,
                "/auth/login",
                &[GuardStep::Validate(Schema::Login)],
                Operation::Login,
            ),
            RouteDescriptor::new(
                Method::PUT,
                "/users/{id}",
                &[GuardStep::Validate(Schema::UpdateUser)],
                Operation::UpdateUser,
            ),
        ])
        .unwrap();

        let findings = table.audit();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].operation, Operation::UpdateUser);
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let err = RouteTable::new(vec![
            RouteDescriptor::new(Method::GET, "/users", &[], Operation::ListUsers),
            RouteDescriptor::new(Method::GET, "/users", &[], Operation::ListUsers),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "Route GET /users is registered twice");
    }

    #[test]
    fn test_paths_group_verbs() {
        let table = table();
        let paths = table.paths();
        let (_, by_id) = paths
            .iter()
            .find(|(path, _)| *path == "/users/{id}")
            .unwrap();
        let methods: Vec<_> = by_id.iter().map(|route| route.method.as_str()).collect();
        assert_eq!(methods, vec!["GET", "PUT", "DELETE"]);
        assert_eq!(paths.len(), 9);
    }

    #[test]
    fn test_guard_display() {
        assert_eq!(
            GuardStep::Authorize(Permission::ViewUsers).to_string(),
            "Auth(VIEW_USERS)"
        );
        assert_eq!(
            GuardStep::Validate(Schema::GetRoleById).to_string(),
            "Schema(GetRoleById)"
        );
    }
}

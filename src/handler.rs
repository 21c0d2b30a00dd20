//! The seam between the route table and the code that serves a route.
//!
//! Every route names an [`Operation`]; once its guard chain passes, the
//! request context is handed to [`Handlers::handle`] together with that
//! operation. Storage, password hashing and token issuance live behind this
//! trait.

use async_trait::async_trait;
use axum::response::Response;

use rolegate_core::AppError;

use crate::context::RequestContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListUsers,
    GetUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    Register,
    Login,
    ForgetPassword,
    ListRoles,
    GetRole,
    CreateRole,
    UpdateRole,
    DeleteRole,
    ListPermissions,
    GetPermission,
    CreatePermission,
    UpdatePermission,
    DeletePermission,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::ListUsers => "list_users",
            Operation::GetUser => "get_user",
            Operation::CreateUser => "create_user",
            Operation::UpdateUser => "update_user",
            Operation::DeleteUser => "delete_user",
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::ForgetPassword => "forget_password",
            Operation::ListRoles => "list_roles",
            Operation::GetRole => "get_role",
            Operation::CreateRole => "create_role",
            Operation::UpdateRole => "update_role",
            Operation::DeleteRole => "delete_role",
            Operation::ListPermissions => "list_permissions",
            Operation::GetPermission => "get_permission",
            Operation::CreatePermission => "create_permission",
            Operation::UpdatePermission => "update_permission",
            Operation::DeletePermission => "delete_permission",
        }
    }

    /// Operations open to anonymous callers: registration, login and
    /// password reset.
    pub fn is_public(self) -> bool {
        matches!(
            self,
            Operation::Register | Operation::Login | Operation::ForgetPassword
        )
    }
}

#[async_trait]
pub trait Handlers: Send + Sync + 'static {
    async fn handle(
        &self,
        operation: Operation,
        ctx: RequestContext,
    ) -> Result<Response, AppError>;
}

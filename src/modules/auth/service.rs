use anyhow::anyhow;
use axum::http::StatusCode;
use tracing::{info, instrument, warn};

use rolegate_auth::{create_access_token, create_reset_token};
use rolegate_config::JwtConfig;
use rolegate_core::AppError;

use crate::metrics::{track_login_failure, track_token_issued};
use crate::modules::directory::Store;
use crate::modules::users::model::User;
use crate::modules::users::service::{insert_user, normalize_email};
use crate::utils::password::{check_password, hash_password};

use super::model::{ForgetPasswordDto, LoginDto, LoginResponse, MessageResponse, RegisterDto};

pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists for that email, password reset instructions have been sent";

fn invalid_credentials() -> AppError {
    AppError::new(StatusCode::UNAUTHORIZED, anyhow!("Invalid email or password"))
}

/// Self-service sign-up. New accounts hold no roles.
#[instrument(skip(db, dto), fields(email = %dto.email))]
pub async fn register_user(db: &Store, dto: RegisterDto, hash_cost: u32) -> Result<User, AppError> {
    let password_hash = hash_password(&dto.password, hash_cost)?;
    let mut tables = db.write().await;

    let user = insert_user(
        &mut tables,
        dto.first_name,
        dto.last_name,
        &dto.email,
        password_hash,
        Vec::new(),
    )?;

    info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// Issues an access token carrying the union of the user's role permissions.
/// The store lock is released before the password is checked.
#[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
pub async fn login_user(
    db: &Store,
    dto: LoginDto,
    jwt_config: &JwtConfig,
    hash_cost: u32,
) -> Result<LoginResponse, AppError> {
    let email = normalize_email(&dto.email);
    let found = db
        .read()
        .await
        .user_by_email(&email)
        .map(|record| (record.user.clone(), record.password_hash.clone()));

    let (user, password_hash) = found.unzip();

    let matched = check_password(dto.password, password_hash, hash_cost).await?;
    let user = match user {
        Some(user) if matched => user,
        Some(user) => {
            warn!(user_id = %user.id, "Login failed: wrong password");
            track_login_failure();
            return Err(invalid_credentials());
        }
        None => {
            track_login_failure();
            return Err(invalid_credentials());
        }
    };

    let permissions: Vec<String> = db
        .read()
        .await
        .granted_permissions(&user.role_ids)
        .into_iter()
        .map(|permission| permission.as_str().to_string())
        .collect();

    let access_token = create_access_token(user.id, &user.email, permissions, jwt_config)?;
    track_token_issued("access");

    Ok(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: jwt_config.access_token_expiry,
        user,
    })
}

/// Always answers the same message so callers cannot tell which emails
/// have accounts. The reset token is only logged; delivery is out of scope.
#[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
pub async fn forget_password(
    db: &Store,
    dto: ForgetPasswordDto,
    jwt_config: &JwtConfig,
) -> Result<MessageResponse, AppError> {
    let tables = db.read().await;

    match tables.user_by_email(&normalize_email(&dto.email)) {
        Some(record) => {
            let token = create_reset_token(record.user.id, &record.user.email, jwt_config)?;
            track_token_issued("password_reset");
            info!(
                user_id = %record.user.id,
                reset_token = %token,
                "Password reset token issued"
            );
        }
        None => {
            info!("Password reset requested for unknown email");
        }
    }

    Ok(MessageResponse {
        message: RESET_REQUESTED_MESSAGE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::directory::Tables;
    use rolegate_auth::verify_token;
    use tokio::sync::RwLock;

    fn register_dto(email: &str) -> RegisterDto {
        RegisterDto {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            password: "cobol1959".to_string(),
        }
    }

    fn login_dto(email: &str, password: &str) -> LoginDto {
        LoginDto {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_after_register_has_no_permissions() {
        let db: Store = RwLock::new(Tables::default());
        let config = JwtConfig::with_secret("auth-service-secret");

        register_user(&db, register_dto("grace@example.com"), 4)
            .await
            .unwrap();
        let response = login_user(&db, login_dto("GRACE@example.com", "cobol1959"), &config, 4)
            .await
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        let claims = verify_token(&response.access_token, &config).unwrap();
        assert_eq!(claims.sub, response.user.id.to_string());
        assert!(claims.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let db: Store = RwLock::new(Tables::default());
        let config = JwtConfig::with_secret("auth-service-secret");
        register_user(&db, register_dto("grace@example.com"), 4)
            .await
            .unwrap();

        let wrong = login_user(&db, login_dto("grace@example.com", "nope"), &config, 4)
            .await
            .unwrap_err();
        let unknown = login_user(&db, login_dto("nobody@example.com", "nope"), &config, 4)
            .await
            .unwrap_err();

        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.error.to_string(), unknown.error.to_string());
    }

    #[tokio::test]
    async fn test_forget_password_is_generic() {
        let db: Store = RwLock::new(Tables::default());
        let config = JwtConfig::with_secret("auth-service-secret");
        register_user(&db, register_dto("grace@example.com"), 4)
            .await
            .unwrap();

        let known = forget_password(
            &db,
            ForgetPasswordDto {
                email: "grace@example.com".to_string(),
            },
            &config,
        )
        .await
        .unwrap();
        let unknown = forget_password(
            &db,
            ForgetPasswordDto {
                email: "nobody@example.com".to_string(),
            },
            &config,
        )
        .await
        .unwrap();

        assert_eq!(known.message, unknown.message);
    }
}

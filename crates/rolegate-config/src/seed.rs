use std::env;

/// Credentials for the administrator created at startup.
///
/// Both `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD` must be set; otherwise
/// nothing is seeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: String,
}

impl SeedConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            env::var("SEED_ADMIN_EMAIL").ok(),
            env::var("SEED_ADMIN_PASSWORD").ok(),
        )
    }

    fn from_values(email: Option<String>, password: Option<String>) -> Option<Self> {
        match (email, password) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(Self {
                    admin_email: email.trim().to_string(),
                    admin_password: password,
                })
            }
            _ => None,
        }
    }
}

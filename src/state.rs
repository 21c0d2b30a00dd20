use std::sync::Arc;

use rolegate_config::{CorsConfig, JwtConfig, ServerConfig};

use crate::handler::Handlers;
use crate::middleware::auth::{AuthorizationGate, GrantedPermissions};

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub body_limit: usize,
    pub gate: Arc<dyn AuthorizationGate>,
    pub handlers: Arc<dyn Handlers>,
}

impl AppState {
    pub fn new(jwt_config: JwtConfig, handlers: Arc<dyn Handlers>) -> Self {
        Self {
            jwt_config,
            cors_config: CorsConfig::default(),
            body_limit: ServerConfig::default().body_limit,
            gate: Arc::new(GrantedPermissions),
            handlers,
        }
    }

    pub fn with_gate(mut self, gate: Arc<dyn AuthorizationGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_cors(mut self, cors_config: CorsConfig) -> Self {
        self.cors_config = cors_config;
        self
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }
}

pub fn init_app_state(
    jwt_config: JwtConfig,
    server_config: &ServerConfig,
    handlers: Arc<dyn Handlers>,
) -> AppState {
    AppState::new(jwt_config, handlers)
        .with_cors(CorsConfig::from_env())
        .with_body_limit(server_config.body_limit)
}

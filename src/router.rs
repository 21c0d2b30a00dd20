use axum::http::{HeaderValue, Method, Uri};
use axum::{
    Router,
    extract::{Request, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{MethodRouter, on},
};
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use rolegate_core::AppError;

use crate::context::RequestContext;
use crate::handler::Operation;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::guard::{GuardChain, RequestPhase, run_guards};
use crate::routes::RouteTable;
use crate::state::AppState;

/// Builds one axum route per path in `table`. Every verb on that path gets
/// its own guard chain as a `route_layer`, so guards never leak between
/// verbs and never run for unmatched requests.
pub fn init_router(state: AppState, table: &RouteTable) -> anyhow::Result<Router> {
    let mut router: Router<AppState> = Router::new();

    for (path, routes) in table.paths() {
        let mut method_router: MethodRouter<AppState> = MethodRouter::new();

        for route in routes {
            let chain = GuardChain::new(state.clone(), route.to_string(), route.guards.clone());
            let operation = route.operation;

            let endpoint = on(
                route.method_filter()?,
                move |State(state): State<AppState>, req: Request| invoke(state, operation, req),
            )
            .route_layer(middleware::from_fn_with_state(chain, run_guards));

            method_router = method_router.merge(endpoint);
        }

        router = router.route(path, method_router.fallback(route_not_found));
    }

    Ok(router
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware)))
}

async fn invoke(state: AppState, operation: Operation, req: Request) -> Response {
    debug!(
        operation = operation.name(),
        phase = %RequestPhase::Handling,
        "Invoking handler"
    );

    let result = match RequestContext::from_request(req, &state).await {
        Ok(ctx) => state.handlers.handle(operation, ctx).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(response) => {
            debug!(
                operation = operation.name(),
                phase = %RequestPhase::Responded,
                status = response.status().as_u16(),
                "Handler responded"
            );
            response
        }
        Err(error) => {
            if error.status.is_server_error() {
                warn!(operation = operation.name(), error = %error.error, "Handler failed");
            }
            debug!(
                operation = operation.name(),
                phase = %RequestPhase::Responded,
                status = error.status.as_u16(),
                "Handler returned an error"
            );
            error.into_response()
        }
    }
}

/// Unknown paths and known paths with an unregistered verb both land here.
async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::route_not_found(method.as_str(), uri.path())
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

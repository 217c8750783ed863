//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests through the resource router to view sets
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, HttpBody},
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::AppConfig;
use crate::http::request;
use crate::http::response::{allow_header, ApiError, ApiResult};
use crate::observability::metrics;
use crate::routing::router::{RouteKind, API_ROOT_NAME};
use crate::routing::viewset::{self, Action, ViewRequest, ViewResponse};
use crate::routing::{ResourceRouter, Resolution, RouteMatch};

/// Route label used for requests that matched nothing.
const UNMATCHED_ROUTE: &str = "unmatched";

/// The only format suffix the server renders.
const JSON_FORMAT: &str = "json";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<ResourceRouter>,
    pub public_url: Option<String>,
    pub max_body_bytes: usize,
}

/// HTTP server for the todo API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `routes`.
    pub fn new(config: AppConfig, routes: ResourceRouter) -> Self {
        let state = AppState {
            routes: Arc::new(routes),
            public_url: config.api.public_url.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered application, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Outcome of routing one request.
struct Routed {
    route_name: String,
    allowed: Option<Vec<Method>>,
    result: ApiResult<Response>,
}

/// Main handler.
/// Resolves the route, runs the view set action and renders the outcome.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request::request_id(request.headers()).to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching request"
    );

    let routed = route_request(&state, request).await;

    let mut response = match routed.result {
        Ok(response) => response,
        Err(err) => {
            if err.status() != StatusCode::INTERNAL_SERVER_ERROR {
                tracing::debug!(
                    request_id = %request_id,
                    path = %path,
                    status = %err.status(),
                    error = %err,
                    "Request rejected"
                );
            }
            err.into_response()
        }
    };

    if let Some(allowed) = routed.allowed {
        response
            .headers_mut()
            .entry(header::ALLOW)
            .or_insert_with(|| allow_header(&allowed));
    }

    // HEAD keeps the length the GET body would have had.
    if method == Method::HEAD {
        if let Some(len) = response.body().size_hint().exact() {
            response
                .headers_mut()
                .insert(header::CONTENT_LENGTH, HeaderValue::from(len));
        }
        *response.body_mut() = Body::empty();
    }

    metrics::record_request(
        method.as_str(),
        &routed.route_name,
        response.status().as_u16(),
        start_time,
    );
    response
}

async fn route_request(state: &AppState, request: Request<Body>) -> Routed {
    let method = request.method().clone();
    let resolution = match request::decoded_path(request.uri()) {
        Some(path) => state.routes.resolve(&method, &path),
        None => Resolution::NotFound,
    };

    match resolution {
        Resolution::NotFound => Routed {
            route_name: UNMATCHED_ROUTE.to_string(),
            allowed: None,
            result: Err(ApiError::NotFound),
        },
        Resolution::MethodNotAllowed {
            route_name,
            allowed,
        } => Routed {
            route_name,
            allowed: None,
            result: Err(ApiError::MethodNotAllowed { method, allowed }),
        },
        Resolution::Root { action, format } => Routed {
            route_name: API_ROOT_NAME.to_string(),
            allowed: Some(RouteKind::Root.allowed_methods()),
            result: root_view(state, &request, action, format.as_deref()),
        },
        Resolution::Matched(route) => Routed {
            route_name: route.route_name.clone(),
            allowed: Some(route.kind.allowed_methods()),
            result: view(state, request, route).await,
        },
    }
}

fn check_format(format: Option<&str>) -> ApiResult<()> {
    match format {
        Some(f) if f != JSON_FORMAT => Err(ApiError::NotFound),
        _ => Ok(()),
    }
}

fn root_view(
    state: &AppState,
    request: &Request<Body>,
    action: Action,
    format: Option<&str>,
) -> ApiResult<Response> {
    check_format(format)?;
    let body = match action {
        Action::Metadata => viewset::metadata("Api Root", ""),
        _ => {
            let origin = request::request_origin(request.headers(), state.public_url.as_deref());
            state.routes.root_listing(&origin)
        }
    };
    Ok(ViewResponse::ok(body).into_response())
}

async fn view(state: &AppState, request: Request<Body>, route: RouteMatch) -> ApiResult<Response> {
    check_format(route.format.as_deref())?;

    let (parts, body) = request.into_parts();
    let data = if route.action.reads_body() {
        request::read_json_body(&parts.headers, body, state.max_body_bytes).await?
    } else {
        None
    };

    let origin = request::request_origin(&parts.headers, state.public_url.as_deref());
    let urls = state.routes.url_builder(&route.prefix, &origin);
    let view_request = ViewRequest::new(route.action, route.lookup, data, urls);

    let response = viewset::dispatch(route.view_set.as_ref(), view_request).await?;
    Ok(response.into_response())
}

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::logging,
    routes::{chat, docs, graph, health, llm},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Probes
        .route("/health", get(health::health_check))
        .route("/api/test", get(health::api_test))
        // Generation
        .route("/api/llm/generate", post(llm::generate))
        .route("/api/llm/models", get(llm::list_models))
        // Graph
        .route("/api/graph", get(graph::get_graph))
        .route("/api/graph/nodes", post(graph::create_node))
        .route("/api/graph/nodes/:node_id", delete(graph::delete_node))
        .route("/api/graph/nodes/:node_id/data", get(graph::get_node_data))
        .route("/api/graph/nodes/:node_id/data", patch(graph::update_node_data))
        .route("/api/graph/nodes/:node_id/execute", post(graph::execute_node))
        .route("/api/graph/edges", post(graph::create_edge))
        .route("/api/graph/edges/:source/:target", delete(graph::delete_edge))
        .route("/api/graph/active-config", get(graph::active_config))
        // Chat sessions
        .route("/api/chat/sessions", post(chat::create_session))
        .route("/api/chat/sessions", get(chat::list_sessions))
        .route("/api/chat/sessions/:session_id", get(chat::get_session))
        .route("/api/chat/sessions/:session_id", delete(chat::delete_session))
        .route("/api/chat/sessions/:session_id/messages", put(chat::replace_messages))
        .route("/api/chat/sessions/:session_id/activate", post(chat::activate_session))
        .route("/api/chat/sessions/:session_id/send", post(chat::send_message))
        // Docs
        .route("/api-docs/openapi.json", get(docs::openapi_json));

    let timeout = state.config.request_timeout();

    // Outermost first
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(axum_middleware::from_fn(logging::log_request));

    api_routes.layer(middleware).with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}

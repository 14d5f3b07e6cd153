use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::state::AppState;
use crate::{auth, calendars, color_settings, entries, users};

fn cors(origin: &str) -> anyhow::Result<CorsLayer> {
    if origin.trim() == "*" {
        return Ok(CorsLayer::permissive());
    }
    let origin = HeaderValue::from_str(origin.trim())
        .map_err(|e| anyhow::anyhow!("CORS_ALLOW_ORIGIN: {e}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn build_app(state: AppState) -> anyhow::Result<Router> {
    let http = state.config.http.clone();
    let app = Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(users::router())
                .merge(auth::router())
                .merge(calendars::router())
                .merge(color_settings::router())
                .merge(entries::router()),
        )
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(http.request_timeout_secs)))
        .layer(cors(&http.cors_allow_origin)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        );
    Ok(app)
}

pub async fn serve(app: Router, http: &HttpConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", http.host, http.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

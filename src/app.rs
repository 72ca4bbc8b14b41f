use askama::Template;
use axum::{
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    admin, auth, catalog,
    error::AppError,
    flash::{self, Flash},
    orders,
    state::AppState,
};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(auth::router())
        .merge(catalog::router())
        .merge(orders::router())
        .merge(admin::router())
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    flash: Option<Flash>,
}

async fn index(jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::pop(jar);
    let html = IndexPage { flash }.render()?;
    Ok((jar, Html(html)).into_response())
}

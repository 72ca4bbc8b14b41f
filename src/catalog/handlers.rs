use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::{
    auth::session::CurrentUser,
    catalog::{dto::MenuPage, repo::Pizza},
    error::AppError,
    flash,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/menu", get(menu))
}

#[instrument(skip(state, jar))]
async fn menu(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let pizzas = Pizza::list(&state.db).await?;
    let (jar, flash) = flash::pop(jar);
    let html = MenuPage {
        flash,
        username: session.username,
        pizzas,
    }
    .render()?;
    Ok((jar, Html(html)).into_response())
}

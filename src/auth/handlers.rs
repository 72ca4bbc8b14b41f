use askama::Template;
use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, LoginPage, RegisterForm, RegisterPage},
        password::{hash_password, verify_password},
        repo::{Role, User},
        session::{self, Session, SessionKeys},
    },
    error::AppError,
    flash::{self, redirect_with_flash, Flash},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

async fn register_page(jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::pop(jar);
    let html = RegisterPage {
        flash,
        username: String::new(),
    }
    .render()?;
    Ok((jar, Html(html)).into_response())
}

#[instrument(skip(state, form))]
async fn register(
    State(state): State<AppState>,
    Form(mut form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    form.username = form.username.trim().to_string();

    if let Err(msg) = validate_registration(&form) {
        return render_register_error(&form.username, msg);
    }

    if User::find_by_username(&state.db, &form.username)
        .await?
        .is_some()
    {
        warn!(username = %form.username, "username already taken");
        return render_register_error(&form.username, "That username is already taken.");
    }

    let hash = hash_password(&form.password)?;
    let user = User::create(&state.db, &form.username, &hash, Role::User).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(redirect_with_flash(
        "/login",
        Flash::success("Registration successful! Please log in."),
    ))
}

fn validate_registration(form: &RegisterForm) -> Result<(), &'static str> {
    if form.username.is_empty() {
        return Err("Username must not be empty.");
    }
    if form.username.len() > 64 {
        return Err("Username is too long.");
    }
    if form.password.len() < 8 {
        return Err("Password must be at least 8 characters.");
    }
    Ok(())
}

fn render_register_error(username: &str, msg: &str) -> Result<Response, AppError> {
    let html = RegisterPage {
        flash: Some(Flash::danger(msg)),
        username: username.to_string(),
    }
    .render()?;
    Ok(Html(html).into_response())
}

async fn login_page(jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::pop(jar);
    let html = LoginPage {
        flash,
        username: String::new(),
    }
    .render()?;
    Ok((jar, Html(html)).into_response())
}

#[instrument(skip(state, jar, form))]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(mut form): Form<LoginForm>,
) -> Result<Response, AppError> {
    form.username = form.username.trim().to_string();

    let Some(user) = User::find_by_username(&state.db, &form.username).await? else {
        warn!(username = %form.username, "login with unknown username");
        return render_login_error(&form.username);
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return render_login_error(&form.username);
    }

    let session = Session {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
    };
    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(&session)?;
    let jar = jar.add(keys.cookie(token));

    info!(user_id = %user.id, username = %user.username, "user logged in");
    let target = match user.role {
        Role::Admin => "/admin",
        Role::User => "/menu",
    };
    Ok((jar, redirect_with_flash(target, Flash::success("Login successful!"))).into_response())
}

fn render_login_error(username: &str) -> Result<Response, AppError> {
    let html = LoginPage {
        flash: Some(Flash::danger("Invalid username or password.")),
        username: username.to_string(),
    }
    .render()?;
    Ok(Html(html).into_response())
}

#[instrument(skip(jar))]
async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(session::clear_cookie());
    (
        jar,
        redirect_with_flash("/", Flash::info("You have been logged out.")),
    )
        .into_response()
}

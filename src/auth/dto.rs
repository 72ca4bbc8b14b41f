use askama::Template;
use serde::Deserialize;

use crate::flash::Flash;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub flash: Option<Flash>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub flash: Option<Flash>,
    pub username: String,
}

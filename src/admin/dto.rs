use askama::Template;

use crate::{flash::Flash, orders::repo::OrderSummary};

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct DashboardPage {
    pub flash: Option<Flash>,
    pub username: String,
    pub orders: Vec<OrderSummary>,
}

#[derive(Template)]
#[template(path = "add_pizza.html")]
pub struct AddPizzaPage {
    pub flash: Option<Flash>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
}

impl AddPizzaPage {
    pub fn empty(flash: Option<Flash>) -> Self {
        Self {
            flash,
            name: String::new(),
            description: String::new(),
            price: String::new(),
            image_url: String::new(),
        }
    }
}

/// Collected multipart fields of the add-pizza form.
#[derive(Debug, Default)]
pub struct AddPizzaForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_source: String,
    pub image_url: String,
    pub photo: Option<(String, bytes::Bytes)>,
}

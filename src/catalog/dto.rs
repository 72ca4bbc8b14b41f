use askama::Template;

use crate::{catalog::repo::Pizza, flash::Flash};

#[derive(Template)]
#[template(path = "menu.html")]
pub struct MenuPage {
    pub flash: Option<Flash>,
    pub username: String,
    pub pizzas: Vec<Pizza>,
}

#[cfg(test)]
mod tests {
    use sqlx::types::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn menu_renders_pizzas_and_flash() {
        let page = MenuPage {
            flash: Some(Flash::success("Login successful!")),
            username: "mario".into(),
            pizzas: vec![Pizza {
                id: Uuid::new_v4(),
                name: "Margherita".into(),
                description: "Tomato, mozzarella, basil".into(),
                price: Decimal::new(950, 2),
                image_url: "/static/pizza_images/margherita.png".into(),
                created_at: OffsetDateTime::now_utc(),
            }],
        };
        let html = page.render().expect("template should render");
        assert!(html.contains("Margherita"));
        assert!(html.contains("9.50"));
        assert!(html.contains("Login successful!"));
        assert!(html.contains("mario"));
    }

    #[test]
    fn empty_menu_renders_placeholder() {
        let page = MenuPage {
            flash: None,
            username: "mario".into(),
            pizzas: vec![],
        };
        let html = page.render().expect("template should render");
        assert!(html.contains("No pizzas yet"));
    }
}

use askama::Template;
use serde::Deserialize;

use crate::{catalog::repo::Pizza, flash::Flash, orders::repo::OrderDetails};

/// Raw order form input. Quantity stays a string so malformed input becomes
/// a form error rather than an extractor failure.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub quantity: String,
    pub pizza_size: String,
    pub address: String,
    pub payment_method: String,
}

#[derive(Template)]
#[template(path = "order.html")]
pub struct OrderPage {
    pub flash: Option<Flash>,
    pub pizza: Pizza,
    pub quantity: String,
    pub pizza_size: String,
    pub address: String,
    pub payment_method: String,
}

#[derive(Template)]
#[template(path = "order_confirmation.html")]
pub struct ConfirmationPage {
    pub flash: Option<Flash>,
    pub order: OrderDetails,
    pub delivery_time: String,
}

#[cfg(test)]
mod tests {
    use sqlx::types::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::orders::repo::OrderStatus;

    #[test]
    fn confirmation_renders_the_receipt() {
        let page = ConfirmationPage {
            flash: None,
            order: OrderDetails {
                id: Uuid::new_v4(),
                username: "mario".into(),
                pizza_name: "Quattro Stagioni".into(),
                quantity: 2,
                pizza_size: "large".into(),
                address: "1 Main St".into(),
                unit_price: Decimal::new(1250, 2),
                total_price: Decimal::new(2500, 2),
                payment_method: "cash".into(),
                status: OrderStatus::Pending,
                delivery_time: OffsetDateTime::now_utc(),
            },
            delivery_time: "2026-08-07 12:30 UTC".into(),
        };
        let html = page.render().expect("template should render");
        assert!(html.contains("Quattro Stagioni"));
        assert!(html.contains("25.00"));
        assert!(html.contains("pending"));
        assert!(html.contains("2026-08-07 12:30 UTC"));
    }
}

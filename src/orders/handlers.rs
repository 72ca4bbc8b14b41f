use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use time::{macros::format_description, Duration, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::session::CurrentUser,
    catalog::repo::Pizza,
    error::AppError,
    flash::{self, redirect_with_flash, Flash},
    orders::{
        dto::{ConfirmationPage, OrderForm, OrderPage},
        pricing,
        repo::{NewOrder, Order},
    },
    state::AppState,
};

const DELIVERY_OFFSET_MINUTES: i64 = 30;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/order/:pizza_id", get(order_page).post(place_order))
        .route("/order_confirmation/:order_id", get(order_confirmation))
}

// Path ids arrive as strings so a mistyped id lands on the menu with a
// flash message instead of a bare 400.
fn parse_id(raw: &str, what: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(what))
}

#[instrument(skip(state, jar))]
async fn order_page(
    State(state): State<AppState>,
    CurrentUser(_session): CurrentUser,
    Path(pizza_id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let pizza_id = parse_id(&pizza_id, "Pizza")?;
    let Some(pizza) = Pizza::find(&state.db, pizza_id).await? else {
        return Err(AppError::NotFound("Pizza"));
    };

    let (jar, flash) = flash::pop(jar);
    let html = OrderPage {
        flash,
        pizza,
        quantity: "1".to_string(),
        pizza_size: "medium".to_string(),
        address: String::new(),
        payment_method: "cash".to_string(),
    }
    .render()?;
    Ok((jar, Html(html)).into_response())
}

#[instrument(skip(state, form))]
async fn place_order(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(pizza_id): Path<String>,
    Form(form): Form<OrderForm>,
) -> Result<Response, AppError> {
    let pizza_id = parse_id(&pizza_id, "Pizza")?;
    let Some(pizza) = Pizza::find(&state.db, pizza_id).await? else {
        return Err(AppError::NotFound("Pizza"));
    };

    let quantity = match validate_order(&form) {
        Ok(q) => q,
        Err(msg) => return render_order_error(pizza, &form, msg),
    };

    let total_price = pricing::total_price(pizza.price, quantity);
    let delivery_time = OffsetDateTime::now_utc() + Duration::minutes(DELIVERY_OFFSET_MINUTES);

    let order = Order::create(
        &state.db,
        NewOrder {
            user_id: session.user_id,
            pizza_id: pizza.id,
            quantity,
            pizza_size: form.pizza_size.trim(),
            address: form.address.trim(),
            payment_method: form.payment_method.trim(),
            total_price,
            delivery_time,
        },
    )
    .await?;

    info!(
        order_id = %order.id,
        user_id = %session.user_id,
        total = %order.total_price,
        "order placed"
    );
    Ok(redirect_with_flash(
        &format!("/order_confirmation/{}", order.id),
        Flash::success("Order placed!"),
    ))
}

/// Form contract checked before anything touches the database; returns the
/// parsed quantity.
fn validate_order(form: &OrderForm) -> Result<i32, &'static str> {
    let quantity = match form.quantity.trim().parse::<i32>() {
        Ok(q) if q > 0 => q,
        _ => return Err("Quantity must be a positive number."),
    };
    if form.pizza_size.trim().is_empty() {
        return Err("Please choose a size.");
    }
    if form.address.trim().is_empty() {
        return Err("Please provide a delivery address.");
    }
    if form.payment_method.trim().is_empty() {
        return Err("Please choose a payment method.");
    }
    Ok(quantity)
}

fn render_order_error(pizza: Pizza, form: &OrderForm, msg: &str) -> Result<Response, AppError> {
    let html = OrderPage {
        flash: Some(Flash::danger(msg)),
        pizza,
        quantity: form.quantity.clone(),
        pizza_size: form.pizza_size.clone(),
        address: form.address.clone(),
        payment_method: form.payment_method.clone(),
    }
    .render()?;
    Ok(Html(html).into_response())
}

#[instrument(skip(state, jar))]
async fn order_confirmation(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let order_id = parse_id(&order_id, "Order")?;
    let Some(order) = Order::find_with_details(&state.db, order_id).await? else {
        return Err(AppError::NotFound("Order"));
    };

    let delivery_time = order
        .delivery_time
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute] UTC"
        ))
        .map_err(anyhow::Error::new)?;

    let (jar, flash) = flash::pop(jar);
    let html = ConfirmationPage {
        flash,
        order,
        delivery_time,
    }
    .render()?;
    Ok((jar, Html(html)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(quantity: &str) -> OrderForm {
        OrderForm {
            quantity: quantity.into(),
            pizza_size: "medium".into(),
            address: "1 Main St".into(),
            payment_method: "cash".into(),
        }
    }

    #[test]
    fn accepts_positive_quantities() {
        assert_eq!(validate_order(&form("1")), Ok(1));
        assert_eq!(validate_order(&form(" 12 ")), Ok(12));
    }

    #[test]
    fn rejects_non_positive_and_non_numeric_quantities() {
        for bad in ["0", "-3", "abc", "", "1.5"] {
            assert!(validate_order(&form(bad)).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn rejects_blank_required_fields() {
        let mut f = form("2");
        f.address = "  ".into();
        assert!(validate_order(&f).is_err());

        let mut f = form("2");
        f.pizza_size.clear();
        assert!(validate_order(&f).is_err());

        let mut f = form("2");
        f.payment_method.clear();
        assert!(validate_order(&f).is_err());
    }
}

use std::str::FromStr;

use askama::Template;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::types::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    admin::{
        dto::{AddPizzaForm, AddPizzaPage, DashboardPage},
        upload,
    },
    auth::session::AdminUser,
    catalog::repo::Pizza,
    error::AppError,
    flash::{self, redirect_with_flash, Flash},
    orders::repo::Order,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/add_pizza", get(add_pizza_page).post(add_pizza))
        .route("/mark_as_completed/:order_id", get(mark_as_completed))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

#[instrument(skip(state, jar))]
async fn dashboard(
    State(state): State<AppState>,
    AdminUser(session): AdminUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let orders = Order::list_with_details(&state.db).await?;
    let (jar, flash) = flash::pop(jar);
    let html = DashboardPage {
        flash,
        username: session.username,
        orders,
    }
    .render()?;
    Ok((jar, Html(html)).into_response())
}

async fn add_pizza_page(_admin: AdminUser, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::pop(jar);
    let html = AddPizzaPage::empty(flash).render()?;
    Ok((jar, Html(html)).into_response())
}

#[instrument(skip(state, multipart))]
async fn add_pizza(
    State(state): State<AppState>,
    AdminUser(session): AdminUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = collect_form(multipart).await?;

    let (name, description, price) = match validate_pizza_fields(&form) {
        Ok(v) => v,
        Err(msg) => return render_add_pizza_error(&form, msg),
    };

    let image_url = match resolve_image(&form) {
        Ok(ImageSource::Upload { filename, data }) => {
            upload::save_upload(&state.config.upload_dir, &filename, data).await?
        }
        Ok(ImageSource::External(url)) => url,
        Err(msg) => return render_add_pizza_error(&form, msg),
    };

    let pizza = Pizza::create(&state.db, &name, &description, price, &image_url).await?;

    info!(
        pizza_id = %pizza.id,
        name = %pizza.name,
        admin = %session.username,
        "pizza added"
    );
    Ok(redirect_with_flash(
        "/menu",
        Flash::success("Pizza added successfully!"),
    ))
}

enum ImageSource {
    Upload { filename: String, data: bytes::Bytes },
    External(String),
}

async fn collect_form(mut multipart: Multipart) -> Result<AddPizzaForm, AppError> {
    let mut form = AddPizzaForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Malformed form submission.".into()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => form.name = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            "price" => form.price = read_text(field).await?,
            "image_source" => form.image_source = read_text(field).await?,
            "image_url" => form.image_url = read_text(field).await?,
            "photo" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Malformed form submission.".into()))?;
                if !filename.is_empty() && !data.is_empty() {
                    form.photo = Some((filename, data));
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|_| AppError::Validation("Malformed form submission.".into()))
}

fn validate_pizza_fields(form: &AddPizzaForm) -> Result<(String, String, Decimal), &'static str> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Please provide a name.");
    }
    let description = form.description.trim();
    if description.is_empty() {
        return Err("Please provide a description.");
    }
    let price = match Decimal::from_str(form.price.trim()) {
        Ok(p) if p > Decimal::ZERO => p,
        _ => return Err("Price must be a positive number."),
    };
    Ok((name.to_string(), description.to_string(), price))
}

fn resolve_image(form: &AddPizzaForm) -> Result<ImageSource, &'static str> {
    match form.image_source.as_str() {
        "file" => match &form.photo {
            Some((filename, data)) if upload::allowed_file(filename) => {
                Ok(ImageSource::Upload {
                    filename: filename.clone(),
                    data: data.clone(),
                })
            }
            _ => Err("Invalid or missing image file."),
        },
        "url" => {
            let url = form.image_url.trim();
            if url.is_empty() {
                Err("Please provide a valid image URL.")
            } else {
                Ok(ImageSource::External(url.to_string()))
            }
        }
        _ => Err("Please choose an image source."),
    }
}

fn render_add_pizza_error(form: &AddPizzaForm, msg: &str) -> Result<Response, AppError> {
    let html = AddPizzaPage {
        flash: Some(Flash::danger(msg)),
        name: form.name.clone(),
        description: form.description.clone(),
        price: form.price.clone(),
        image_url: form.image_url.clone(),
    }
    .render()?;
    Ok(Html(html).into_response())
}

#[instrument(skip(state))]
async fn mark_as_completed(
    State(state): State<AppState>,
    AdminUser(session): AdminUser,
    Path(order_id): Path<String>,
) -> Result<Response, AppError> {
    let order_id = Uuid::parse_str(&order_id).map_err(|_| AppError::NotFound("Order"))?;
    Order::mark_completed(&state.db, order_id).await?;

    info!(order_id = %order_id, admin = %session.username, "order marked completed");
    Ok(redirect_with_flash(
        "/admin",
        Flash::success("Order marked as completed."),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(price: &str) -> AddPizzaForm {
        AddPizzaForm {
            name: "Margherita".into(),
            description: "Tomato, mozzarella, basil".into(),
            price: price.into(),
            image_source: "url".into(),
            image_url: "https://example.com/margherita.png".into(),
            photo: None,
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let (name, description, price) = validate_pizza_fields(&form("9.50")).expect("valid form");
        assert_eq!(name, "Margherita");
        assert_eq!(description, "Tomato, mozzarella, basil");
        assert_eq!(price, Decimal::new(950, 2));
    }

    #[test]
    fn rejects_bad_prices() {
        for bad in ["0", "-2", "free", ""] {
            assert!(validate_pizza_fields(&form(bad)).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn rejects_blank_name_and_description() {
        let mut f = form("9.50");
        f.name = "  ".into();
        assert!(validate_pizza_fields(&f).is_err());

        let mut f = form("9.50");
        f.description.clear();
        assert!(validate_pizza_fields(&f).is_err());
    }

    #[test]
    fn image_resolution_follows_the_selected_source() {
        let mut f = form("9.50");
        assert!(matches!(
            resolve_image(&f),
            Ok(ImageSource::External(url)) if url == f.image_url
        ));

        f.image_url.clear();
        assert!(resolve_image(&f).is_err());

        f.image_source = "file".into();
        f.photo = Some(("margherita.png".into(), bytes::Bytes::from_static(b"png")));
        assert!(matches!(resolve_image(&f), Ok(ImageSource::Upload { .. })));

        // Disallowed extension never resolves, so no row can be inserted.
        f.photo = Some(("malware.exe".into(), bytes::Bytes::from_static(b"mz")));
        assert!(resolve_image(&f).is_err());

        f.image_source = "telepathy".into();
        assert!(resolve_image(&f).is_err());
    }
}

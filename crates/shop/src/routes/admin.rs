//! Administrative route handlers.
//!
//! Product management behind the `/admin` prefix. Every handler requires a
//! resolved identity; anonymous requests are redirected to the login page by
//! the `RequireUser` extractor. Product images arrive through the upload
//! interceptor, never as raw multipart here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use bramble_core::{Price, ProductId};

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{MaybeUploaded, PageContext, RequireUser};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Product form data (shared by add and edit).
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub description: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub products: Vec<Product>,
}

/// Product form template (add and edit share it).
#[derive(Template, WebTemplate)]
#[template(path = "admin/edit_product.html")]
pub struct EditProductTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub editing: bool,
    pub form_action: String,
    pub title_value: String,
    pub price_value: String,
    pub description_value: String,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List products for management.
pub async fn products(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    context: PageContext,
) -> Result<Response, AppError> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let products = products
        .into_iter()
        .filter(|p| p.created_by == Some(user.id))
        .collect();

    Ok(AdminProductsTemplate {
        page_title: "Admin Products".to_owned(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        products,
    }
    .into_response())
}

/// Display the new product form.
pub async fn add_product_page(
    RequireUser(_user): RequireUser,
    context: PageContext,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    EditProductTemplate {
        page_title: "Add Product".to_owned(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        editing: false,
        form_action: "/admin/add-product".to_owned(),
        title_value: String::new(),
        price_value: String::new(),
        description_value: String::new(),
        error: query.error.map(form_error_message),
    }
}

/// Create a product from the submitted form and intercepted upload.
pub async fn add_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    MaybeUploaded(image): MaybeUploaded,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    // A dropped upload and a missing one look identical here; both send the
    // admin back to the form.
    let Some(image) = image else {
        return Ok(Redirect::to("/admin/add-product?error=image").into_response());
    };

    let Ok(price) = Price::parse(&form.price) else {
        return Ok(Redirect::to("/admin/add-product?error=price").into_response());
    };

    let product = NewProduct {
        title: form.title.trim().to_owned(),
        price,
        description: form.description,
        image_url: image.url,
    };

    let created = ProductRepository::new(state.pool())
        .create(&product, user.id)
        .await?;
    tracing::info!(product_id = %created.id, "product created");

    Ok(Redirect::to("/admin/products").into_response())
}

/// Display the edit form for an owned product.
pub async fn edit_product_page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    context: PageContext,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?;

    // Only the creator may edit; everyone else bounces to the list
    let Some(product) = product.filter(|p| p.created_by == Some(user.id)) else {
        return Ok(Redirect::to("/admin/products").into_response());
    };

    Ok(EditProductTemplate {
        page_title: "Edit Product".to_owned(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        editing: true,
        form_action: format!("/admin/edit-product/{}", product.id),
        title_value: product.title,
        price_value: product.price.amount().to_string(),
        description_value: product.description,
        error: query.error.map(form_error_message),
    }
    .into_response())
}

/// Update an owned product. Re-uploading the image is optional.
pub async fn edit_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i32>,
    MaybeUploaded(image): MaybeUploaded,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let id = ProductId::new(id);
    let repository = ProductRepository::new(state.pool());

    let product = repository.get_by_id(id).await?;
    let Some(_product) = product.filter(|p| p.created_by == Some(user.id)) else {
        return Ok(Redirect::to("/admin/products").into_response());
    };

    let Ok(price) = Price::parse(&form.price) else {
        return Ok(Redirect::to(&format!("/admin/edit-product/{id}?error=price")).into_response());
    };

    repository
        .update(
            id,
            form.title.trim(),
            price,
            &form.description,
            image.as_ref().map(|i| i.url.as_str()),
        )
        .await?;
    tracing::info!(product_id = %id, "product updated");

    Ok(Redirect::to("/admin/products").into_response())
}

/// Delete an owned product.
pub async fn delete_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let id = ProductId::new(id);
    let repository = ProductRepository::new(state.pool());

    let product = repository.get_by_id(id).await?;
    if product.filter(|p| p.created_by == Some(user.id)).is_some() {
        repository.delete(id).await?;
        tracing::info!(product_id = %id, "product deleted");
    }

    Ok(Redirect::to("/admin/products").into_response())
}

/// Map an error query key to a human message for the form.
fn form_error_message(key: String) -> String {
    match key.as_str() {
        "image" => "Attach a PNG or JPEG image.".to_owned(),
        "price" => "Enter the price as a non-negative decimal, e.g. 19.99.".to_owned(),
        _ => "Could not save the product.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_messages() {
        assert!(form_error_message("image".to_owned()).contains("PNG"));
        assert!(form_error_message("price".to_owned()).contains("decimal"));
        assert!(form_error_message("bogus".to_owned()).contains("Could not"));
    }
}

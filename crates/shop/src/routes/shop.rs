//! Storefront route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use bramble_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Product;
use crate::routes::errors;
use crate::state::AppState;

/// Product grid template (home page).
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct IndexTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub products: Vec<Product>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/product_list.html")]
pub struct ProductListTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub products: Vec<Product>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/product_detail.html")]
pub struct ProductDetailTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub product: Product,
}

/// Display the home page product grid.
pub async fn index(
    State(state): State<AppState>,
    context: PageContext,
) -> Result<Response, AppError> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(IndexTemplate {
        page_title: "Shop".to_owned(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        products,
    }
    .into_response())
}

/// Display the product listing.
pub async fn products(
    State(state): State<AppState>,
    context: PageContext,
) -> Result<Response, AppError> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(ProductListTemplate {
        page_title: "Products".to_owned(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        products,
    }
    .into_response())
}

/// Display a single product.
pub async fn product_detail(
    State(state): State<AppState>,
    context: PageContext,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?;

    let Some(product) = product else {
        return Ok(errors::not_found_view(
            &context.path,
            context.is_authenticated,
        ));
    };

    Ok(ProductDetailTemplate {
        page_title: product.title.clone(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        product,
    }
    .into_response())
}

//! HTTP route handlers for the shop.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Product grid (storefront)
//! GET  /products                  - Product listing
//! GET  /products/{id}             - Product detail
//!
//! # Admin (requires a resolved identity)
//! GET  /admin/products            - Manage products
//! GET  /admin/add-product         - New product form
//! POST /admin/add-product         - Create product (consumes upload)
//! GET  /admin/edit-product/{id}   - Edit product form
//! POST /admin/edit-product/{id}   - Update product
//! POST /admin/delete-product/{id} - Delete product
//!
//! # Auth
//! GET  /login                     - Login page
//! POST /login                     - Login action
//! GET  /signup                    - Signup page
//! POST /signup                    - Signup action
//! POST /logout                    - Logout action
//!
//! # Errors
//! GET  /500                       - Diagnostic failure view
//! (fallback)                      - Not-found view
//! ```
//!
//! Mount order is fixed: the `/admin` prefix is matched before the two
//! unprefixed groups so prefixed and catch-some routing never collide.

pub mod admin;
pub mod auth;
pub mod errors;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the storefront routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::index))
        .route("/products", get(shop::products))
        .route("/products/{id}", get(shop::product_detail))
}

/// Create the admin routes router (nested under `/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::products))
        .route(
            "/add-product",
            get(admin::add_product_page).post(admin::add_product),
        )
        .route(
            "/edit-product/{id}",
            get(admin::edit_product_page).post(admin::edit_product),
        )
        .route("/delete-product/{id}", post(admin::delete_product))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

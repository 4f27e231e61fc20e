//! Seed the database with a demo account and sample products.
//!
//! Idempotent per account: re-running against a seeded database reuses the
//! demo account but adds the sample products again.

use secrecy::ExposeSecret;
use sqlx::PgPool;

use bramble_core::{Email, Price};
use bramble_shop::db::{ProductRepository, UserRepository};
use bramble_shop::models::NewProduct;
use bramble_shop::services::auth::{AuthError, AuthService};

use super::CommandError;

const DEMO_EMAIL: &str = "demo@bramblegoods.io";
const DEMO_PASSWORD: &str = "bramble-demo-pass";

const SAMPLE_PRODUCTS: &[(&str, &str, &str)] = &[
    (
        "Hedgerow Jam",
        "6.50",
        "Blackberry and elderberry jam from the back field, in a 250g jar.",
    ),
    (
        "Willow Basket",
        "34.00",
        "Hand-woven willow basket, roomy enough for a market run.",
    ),
    (
        "Beeswax Candles",
        "12.00",
        "Pair of dipped beeswax candles with a slow, clean burn.",
    ),
];

/// Run the seeding.
pub async fn run() -> Result<(), CommandError> {
    let database_url = bramble_shop::config::database_url_from_env()?;

    tracing::info!("Connecting to shop database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let user = match AuthService::new(&pool).signup(DEMO_EMAIL, DEMO_PASSWORD).await {
        Ok(user) => {
            tracing::info!(email = DEMO_EMAIL, "demo account created");
            user
        }
        Err(AuthError::AccountExists) => {
            tracing::info!(email = DEMO_EMAIL, "demo account already exists");
            let email = Email::parse(DEMO_EMAIL)
                .map_err(|e| CommandError::Seed(format!("demo email: {e}")))?;
            let (user, _hash) = UserRepository::new(&pool)
                .get_with_password(&email)
                .await?
                .ok_or_else(|| CommandError::Seed("demo account vanished".to_owned()))?;
            user
        }
        Err(e) => return Err(e.into()),
    };

    let products = ProductRepository::new(&pool);
    for (title, price, description) in SAMPLE_PRODUCTS {
        let product = NewProduct {
            title: (*title).to_owned(),
            price: Price::parse(price)
                .map_err(|e| CommandError::Seed(format!("sample price {price}: {e}")))?,
            description: (*description).to_owned(),
            image_url: "/static/images/placeholder.svg".to_owned(),
        };
        let created = products.create(&product, user.id).await?;
        tracing::info!(product_id = %created.id, title = %created.title, "sample product created");
    }

    tracing::info!("Seeding complete");
    Ok(())
}

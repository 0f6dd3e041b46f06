//! Catalog download from the menu object-storage bucket.

use reqwest::blocking::Client;
use tracing::info;

use crate::domain::{Drink, Ingredient};
use crate::error::AppError;
use crate::io::Catalog;

/// Environment variable holding the bucket base URL.
pub const CATALOG_URL_VAR: &str = "BARKIT_CATALOG_URL";

const DRINKS_KEY: &str = "drinkMenu/drinks.json";
const INGREDIENTS_KEY: &str = "drinkMenu/ingredients.json";

pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(CATALOG_URL_VAR)
            .map_err(|_| AppError::new(2, format!("Missing {CATALOG_URL_VAR} in environment (.env).")))?;
        Ok(Self::new(base_url))
    }

    pub fn fetch_catalog(&self) -> Result<Catalog, AppError> {
        let drinks: Vec<Drink> = self.fetch_json(DRINKS_KEY)?;
        let ingredients: Vec<Ingredient> = self.fetch_json(INGREDIENTS_KEY)?;
        info!(drinks = drinks.len(), ingredients = ingredients.len(), "fetched remote catalog");
        Ok(Catalog::new(drinks, ingredients))
    }

    fn fetch_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T, AppError> {
        let url = object_url(&self.base_url, key);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::new(4, format!("Catalog request failed for {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::new(4, format!("Catalog request for {url} returned {status}.")));
        }

        resp.json::<T>()
            .map_err(|e| AppError::new(4, format!("Failed to decode {url}: {e}")))
    }
}

/// Join the bucket base URL and an object key with exactly one `/`.
pub fn object_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key.trim_start_matches('/'))
}

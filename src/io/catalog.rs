//! Drink and ingredient catalog ingest.
//!
//! The catalog ships as two flat JSON arrays (`drinks.json`, `ingredients.json`).
//! This module turns them into partitioner `Item`s and an ingredient lookup
//! for reports. No grouping logic lives here.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::domain::{Drink, Ingredient, Item};
use crate::error::AppError;

/// Parsed catalog: drinks plus ingredient lookup by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub drinks: Vec<Drink>,
    pub ingredients: IngredientIndex,
}

impl Catalog {
    pub fn new(drinks: Vec<Drink>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            drinks,
            ingredients: IngredientIndex::new(ingredients),
        }
    }

    /// Partitioner inputs, one per drink, in catalog order.
    pub fn items(&self) -> Vec<Item> {
        self.drinks.iter().map(drink_to_item).collect()
    }
}

/// Ingredient lookup keyed by id.
#[derive(Debug, Clone, Default)]
pub struct IngredientIndex {
    by_id: HashMap<i64, Ingredient>,
}

impl IngredientIndex {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self {
            by_id: ingredients.into_iter().map(|i| (i.id, i)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Ingredient> {
        self.by_id.get(&id)
    }

    /// Ingredient name, or `#<id>` when the id is not in the catalog.
    pub fn name_of(&self, id: i64) -> String {
        self.get(id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    /// Lowercased names of the spirit ingredients among `ids`, deduplicated, in id order.
    pub fn spirits_in<'a>(&self, ids: impl IntoIterator<Item = &'a i64>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for id in ids {
            if let Some(ing) = self.get(*id).filter(|i| i.is_spirit()) {
                let name = ing.name.to_lowercase();
                if !out.contains(&name) {
                    out.push(name);
                }
            }
        }
        out
    }
}

/// Parse the compact `id:amount:priority,...` ingredient encoding into resource ids.
///
/// Each comma-separated entry contributes its first `:` field, read as a
/// number. A blank field counts as resource `0`; non-finite values are
/// skipped, as are values with no integer id (fractions, out of `i64` range).
/// An empty encoding has no resources.
pub fn parse_resource_ids(encoded: &str) -> Vec<i64> {
    if encoded.is_empty() {
        return Vec::new();
    }
    encoded
        .split(',')
        .filter_map(|entry| entry.split(':').next())
        .filter_map(|field| {
            let field = field.trim();
            let value: f64 = if field.is_empty() { 0.0 } else { field.parse().ok()? };
            let integral = value.is_finite() && value.fract() == 0.0;
            (integral && value >= i64::MIN as f64 && value < i64::MAX as f64).then_some(value as i64)
        })
        .collect()
}

/// Convert one drink into a partitioner item.
pub fn drink_to_item(drink: &Drink) -> Item {
    let resource_ids = drink
        .ingredients
        .as_deref()
        .map(parse_resource_ids)
        .unwrap_or_default();
    Item::new(drink.id, drink.category.clone().unwrap_or_default(), resource_ids).with_name(drink.name.clone())
}

pub fn read_drinks<R: Read>(reader: R) -> Result<Vec<Drink>, AppError> {
    serde_json::from_reader(reader).map_err(|e| AppError::new(2, format!("Invalid drinks JSON: {e}")))
}

pub fn read_ingredients<R: Read>(reader: R) -> Result<Vec<Ingredient>, AppError> {
    serde_json::from_reader(reader).map_err(|e| AppError::new(2, format!("Invalid ingredients JSON: {e}")))
}

/// Load both catalog files from disk.
pub fn load_catalog(drinks_path: &Path, ingredients_path: &Path) -> Result<Catalog, AppError> {
    let drinks = read_drinks(open(drinks_path)?)?;
    let ingredients = read_ingredients(open(ingredients_path)?)?;
    Ok(Catalog::new(drinks, ingredients))
}

fn open(path: &Path) -> Result<BufReader<File>, AppError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))
}

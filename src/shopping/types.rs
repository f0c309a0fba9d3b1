//! Types for the shopping list

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Shelf a shopping item belongs to. Wire values are the backend's French
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShoppingCategory {
    #[serde(rename = "frais")]
    Fresh,
    #[serde(rename = "légumes")]
    Vegetables,
    #[serde(rename = "boulangerie")]
    Bakery,
    #[default]
    #[serde(rename = "épicerie")]
    Grocery,
    #[serde(rename = "viande")]
    Meat,
    #[serde(rename = "poisson")]
    Fish,
    #[serde(rename = "produits_ménagers")]
    Household,
    #[serde(rename = "hygiène")]
    Hygiene,
    #[serde(rename = "autre")]
    Other,
}

/// An item on the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub estimated_price: Option<f64>,
    /// Price paid, usually recorded when the item is ticked off
    pub actual_price: Option<f64>,
    pub category: ShoppingCategory,
    pub notes: Option<String>,
    pub completed: bool,
    pub purchased_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_id: i64,
    pub total_estimated_cost: f64,
    pub total_actual_cost: f64,
}

/// Fields accepted when adding an item
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewShoppingItem {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ShoppingCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewShoppingItem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_quantity(mut self, quantity: i64, unit: &str) -> Self {
        self.quantity = Some(quantity);
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_estimated_price(mut self, price: f64) -> Self {
        self.estimated_price = Some(price);
        self
    }

    pub fn with_category(mut self, category: ShoppingCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// Partial item update; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ShoppingCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Server-side filters for `GET /shopping`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ShoppingFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ShoppingCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ShoppingFilter {
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn category(mut self, category: ShoppingCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }
}

/// Shopping list statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingSummary {
    pub total_items: i64,
    pub completed_items: i64,
    pub pending_items: i64,
    /// Percentage, 0 to 100
    pub completion_rate: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ToggleParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_price: Option<f64>,
}

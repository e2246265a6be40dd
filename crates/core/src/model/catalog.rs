//! Menu catalog records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MenuItemId, ModifierId};

/// A sellable menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in the adapter's reporting currency.
    pub price: Decimal,
    pub category: String,
    /// Derived from vendor state (archived, sold out, out of stock).
    pub is_available: bool,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Typical preparation time in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<u32>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A group of options that customize a menu item (e.g. "Milk").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub id: ModifierId,
    pub name: String,
    pub options: Vec<ModifierOption>,
    pub required: bool,
    pub min_selections: u32,
    pub max_selections: u32,
}

/// A single choice within a [`Modifier`] (e.g. "Oat milk, +0.75").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierOption {
    pub id: ModifierId,
    pub name: String,
    pub price: Decimal,
    pub is_available: bool,
}

/// Input for creating a menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub preparation_time: Option<u32>,
    #[serde(default)]
    pub allergens: Vec<String>,
}

const fn default_available() -> bool {
    true
}

/// Partial update for a menu item.
///
/// All fields are optional - only provided fields will be updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
    pub sku: Option<String>,
    pub preparation_time: Option<u32>,
    pub allergens: Option<Vec<String>>,
}

impl MenuItemUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.is_available.is_none()
            && self.sku.is_none()
            && self.preparation_time.is_none()
            && self.allergens.is_none()
    }

    /// Apply the provided fields to `item`.
    pub fn apply_to(&self, item: &mut MenuItem) {
        if let Some(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = &self.category {
            item.category.clone_from(category);
        }
        if let Some(is_available) = self.is_available {
            item.is_available = is_available;
        }
        if let Some(sku) = &self.sku {
            item.sku = Some(sku.clone());
        }
        if let Some(preparation_time) = self.preparation_time {
            item.preparation_time = Some(preparation_time);
        }
        if let Some(allergens) = &self.allergens {
            item.allergens.clone_from(allergens);
        }
    }
}

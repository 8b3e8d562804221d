use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::round2;

/// A stocked item. `current_stock` is allowed to go negative: invoicing does
/// not block oversell, it only classifies the item as out of stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub current_stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, price: f64, current_stock: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sku: None,
            price: round2(price),
            cost: None,
            current_stock,
            alert_level: None,
            description: None,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_alert_level(mut self, alert_level: i64) -> Self {
        self.alert_level = Some(alert_level);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(round2(cost));
        self
    }

    /// Stock classification. Out-of-stock wins over low-stock; low-stock
    /// requires an alert level to be configured.
    pub fn stock_level(&self) -> StockLevel {
        if self.current_stock <= 0 {
            return StockLevel::Out;
        }
        match self.alert_level {
            Some(alert) if self.current_stock <= alert => StockLevel::Low,
            _ => StockLevel::Ok,
        }
    }

    /// Whether the item counts towards the dashboard low-stock alert.
    pub fn is_low_stock(&self) -> bool {
        matches!(
            self.alert_level,
            Some(alert) if self.current_stock <= alert
        )
    }

    /// Stock valuation at sale price.
    pub fn stock_value(&self) -> f64 {
        round2(self.price * self.current_stock as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Ok,
    Low,
    Out,
}

//! Product model

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

fn is_blank(value: &str) -> bool {
    value.chars().all(char::is_whitespace)
}

/// Market authorization of a product in one country
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Country code
    pub market_id: String,
    #[serde(default)]
    pub national_code: String,
    #[serde(default)]
    pub mah_name: String,
    #[serde(default)]
    pub legal_entity_name: String,
}

impl Market {
    /// Names of required fields that are empty or whitespace only
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.market_id) {
            missing.push("marketId");
        }
        if is_blank(&self.mah_name) {
            missing.push("mahName");
        }
        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Product as edited in the wallet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub gtin: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub manufacturer_name: String,
    #[serde(default)]
    pub markets: Vec<Market>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<u32>,
    /// New products may still change their code
    #[serde(default = "crate::config::default_true")]
    pub is_code_editable: bool,
}

fn default_version() -> u32 {
    1
}

impl Product {
    pub fn new(gtin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            gtin: gtin.into(),
            name: name.into(),
            version: default_version(),
            is_code_editable: true,
            ..Default::default()
        }
    }

    /// Next version of a stored product, with its code locked
    pub fn for_update(stored: Product) -> Self {
        Self {
            version: stored.version + 1,
            previous_version: Some(stored.version),
            is_code_editable: false,
            ..stored
        }
    }

    /// Add a market, replacing one with the same country
    pub fn add_market(&mut self, market: Market) {
        match self
            .markets
            .iter_mut()
            .find(|m| m.market_id == market.market_id)
        {
            Some(existing) => *existing = market,
            None => self.markets.push(market),
        }
    }

    /// Replace the market registered for `market_id`
    ///
    /// Returns `false` when no such market exists.
    pub fn update_market(&mut self, market_id: &str, market: Market) -> bool {
        match self.markets.iter_mut().find(|m| m.market_id == market_id) {
            Some(existing) => {
                *existing = market;
                true
            }
            None => false,
        }
    }

    pub fn remove_market(&mut self, market_id: &str) {
        self.markets.retain(|m| m.market_id != market_id);
    }

    /// Validation errors, empty when the product can be saved
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if is_blank(&self.name) {
            errors.push("Product name is a mandatory field.".to_string());
        }
        for market in &self.markets {
            let missing = market.missing_fields();
            if !missing.is_empty() {
                errors.push(format!(
                    "Market {} is missing {}.",
                    market.market_id.trim(),
                    missing.join(", ")
                ));
            }
        }
        errors
    }

    /// Payload of the `Product` message
    pub fn to_message_payload(&self) -> Value {
        json!({
            "productCode": self.gtin,
            "inventedName": self.name,
            "nameMedicinalProduct": self.description,
            "manufacturerName": self.manufacturer_name,
            "markets": self.markets,
            "version": self.version,
            "previousVersion": self.previous_version,
        })
    }
}

/// Video attached to one leaflet document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    pub document_type: String,
    pub lang: String,
    pub source: String,
}

/// Changed video sources of a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSourceUpdate {
    pub default_source: String,
    #[serde(default)]
    pub sources: Vec<VideoSource>,
}

impl VideoSourceUpdate {
    /// Payload of the `VideoSource` message
    ///
    /// Only the default source travels base64 encoded.
    pub fn to_message_payload(&self, product_code: &str) -> Value {
        json!({
            "productCode": product_code,
            "source": STANDARD.encode(&self.default_source),
            "sources": self.sources,
        })
    }
}

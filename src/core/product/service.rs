//! Product save service

use super::types::{Product, VideoSourceUpdate};
use crate::config::PipelineConfig;
use crate::core::gtin::validate_gtin;
use crate::core::messages::{Message, MessageDigester, collect_errors, digest_in_batches, init_message};
use crate::utils::error::{Result, WalletError};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Table holding the stored products, keyed by GTIN
pub const PRODUCTS_TABLE: &str = "products";

pub const MSG_INVALID_GTIN: &str = "Invalid GTIN.";
pub const MSG_CODE_ALREADY_USED: &str =
    "Cannot save the product because provided product code is already used.";

/// Read access to the shared wallet storage
#[async_trait]
pub trait StorageQueryService: Send + Sync {
    /// Record stored under `key`, `Ok(None)` when there is none
    async fn get_record(&self, table: &str, key: &str) -> Result<Option<Value>>;
}

/// Everything needed to save one product
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    pub product: Product,
    /// Raw image bytes of a newly selected photo
    pub photo: Option<Vec<u8>>,
    /// Set only when a video source changed
    pub video: Option<VideoSourceUpdate>,
}

impl SaveRequest {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            ..Default::default()
        }
    }

    pub fn with_photo(mut self, photo: Vec<u8>) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn with_video(mut self, video: VideoSourceUpdate) -> Self {
        self.video = Some(video);
        self
    }
}

/// Result of a save that reached the mapping engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOutcome {
    /// Distinct rejection reasons, in first-seen order
    pub errors: Vec<String>,
    pub undigested: Vec<Message>,
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Turns product edits into mapping engine messages
pub struct ProductService {
    pipeline: PipelineConfig,
    sender_id: String,
    storage: Arc<dyn StorageQueryService>,
    digester: Arc<dyn MessageDigester>,
}

impl ProductService {
    pub fn new(
        pipeline: PipelineConfig,
        sender_id: impl Into<String>,
        storage: Arc<dyn StorageQueryService>,
        digester: Arc<dyn MessageDigester>,
    ) -> Self {
        Self {
            pipeline,
            sender_id: sender_id.into(),
            storage,
            digester,
        }
    }

    /// Load a stored product as the next version to edit
    pub async fn load_for_update(&self, gtin: &str) -> Result<Product> {
        let record = self
            .storage
            .get_record(PRODUCTS_TABLE, gtin)
            .await?
            .ok_or_else(|| WalletError::not_found(format!("Product {} not found", gtin)))?;
        let stored: Product = serde_json::from_value(record)?;
        Ok(Product::for_update(stored))
    }

    /// Validate and submit a product with its attachments
    ///
    /// Rejections by the mapping engine are data in the returned
    /// [`SaveOutcome`]; anything stopping the save earlier is an error.
    pub async fn save(&self, request: SaveRequest) -> Result<SaveOutcome> {
        let SaveRequest {
            product,
            photo,
            video,
        } = request;

        if product.is_code_editable && self.code_in_use(&product.gtin).await? {
            return Err(WalletError::conflict(MSG_CODE_ALREADY_USED));
        }
        self.validate(&product)?;

        let mut messages = vec![self.product_message(&product)];
        if let Some(photo) = photo {
            messages.push(self.photo_message(&product.gtin, &photo));
        }

        info!(
            "Saving product {} (version {}) with {} messages",
            product.gtin,
            product.version,
            messages.len()
        );
        let mut undigested =
            digest_in_batches(&self.pipeline, self.digester.clone(), messages).await?;

        // Video sources are digested only after the product exists
        if let Some(video) = video {
            let message = self.video_message(&product.gtin, &video);
            undigested
                .extend(digest_in_batches(&self.pipeline, self.digester.clone(), vec![message]).await?);
        }

        let errors = collect_errors(&undigested);
        if !errors.is_empty() {
            warn!("Product {} saved with errors: {:?}", product.gtin, errors);
        }
        Ok(SaveOutcome { errors, undigested })
    }

    async fn code_in_use(&self, gtin: &str) -> Result<bool> {
        let existing = self.storage.get_record(PRODUCTS_TABLE, gtin).await?;
        debug!("Product code {} in use: {}", gtin, existing.is_some());
        Ok(existing.is_some())
    }

    fn validate(&self, product: &Product) -> Result<()> {
        if !validate_gtin(&product.gtin).is_valid {
            return Err(WalletError::validation(MSG_INVALID_GTIN));
        }
        let errors = product.validate();
        if !errors.is_empty() {
            return Err(WalletError::validation(errors.join(" ")));
        }
        Ok(())
    }

    fn product_message(&self, product: &Product) -> Message {
        let mut message = init_message("Product", &self.sender_id);
        message["product"] = product.to_message_payload();
        message
    }

    fn photo_message(&self, product_code: &str, photo: &[u8]) -> Message {
        let mut message = init_message("ProductPhoto", &self.sender_id);
        message["productCode"] = Value::from(product_code);
        message["imageData"] = Value::from(STANDARD.encode(photo));
        message
    }

    fn video_message(&self, product_code: &str, video: &VideoSourceUpdate) -> Message {
        let mut message = init_message("VideoSource", &self.sender_id);
        message["videos"] = video.to_message_payload(product_code);
        message
    }
}

//! Product save through the pipeline into the mapping engine

#[cfg(test)]
mod tests {
    use crate::common::{MappingEngine, test_config};
    use epi_wallet::WalletError;
    use epi_wallet::core::product::{
        MSG_CODE_ALREADY_USED, MSG_INVALID_GTIN, Market, Product, ProductService, SaveRequest,
        VideoSourceUpdate,
    };
    use std::sync::Arc;

    const GTIN: &str = "00012345600012";

    fn service(engine: &Arc<MappingEngine>) -> ProductService {
        let config = test_config();
        ProductService::new(
            config.pipeline().clone(),
            "holder-1",
            engine.clone(),
            engine.clone(),
        )
    }

    fn new_product() -> Product {
        let mut product = Product::new(GTIN, "Paracetamol");
        product.add_market(Market {
            market_id: "DE".to_string(),
            national_code: "PZN-1".to_string(),
            mah_name: "ACME Pharma".to_string(),
            legal_entity_name: "ACME GmbH".to_string(),
        });
        product
    }

    #[tokio::test]
    async fn test_create_then_update_product() {
        let engine = Arc::new(MappingEngine::default());
        let service = service(&engine);

        let outcome = crate::assert_ok!(service.save(SaveRequest::new(new_product())).await);
        assert!(outcome.is_success());
        assert_eq!(engine.records.lock()[GTIN]["version"], 1);

        // The code is now in use for new products
        let err = crate::assert_err!(service.save(SaveRequest::new(new_product())).await);
        assert!(matches!(err, WalletError::Conflict(ref m) if m == MSG_CODE_ALREADY_USED));

        // Updating the stored product bumps its version
        let mut product = crate::assert_ok!(service.load_for_update(GTIN).await);
        product.description = "500mg tablets".to_string();
        let outcome = crate::assert_ok!(
            service
                .save(SaveRequest::new(product).with_photo(vec![0x89, 0x50, 0x4e, 0x47]))
                .await
        );
        assert!(outcome.is_success());
        assert_eq!(engine.records.lock()[GTIN]["version"], 2);
        assert_eq!(engine.groups(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_invalid_gtin_never_reaches_engine() {
        let engine = Arc::new(MappingEngine::default());
        let service = service(&engine);

        let err = crate::assert_err!(
            service
                .save(SaveRequest::new(Product::new("00012345600013", "Paracetamol")))
                .await
        );
        assert!(matches!(err, WalletError::Validation(ref m) if m == MSG_INVALID_GTIN));
        assert!(engine.groups().is_empty());
    }

    #[tokio::test]
    async fn test_video_rejection_is_reported() {
        let engine = Arc::new(MappingEngine::default());
        engine.reject_type("VideoSource");
        let service = service(&engine);

        let request = SaveRequest::new(new_product()).with_video(VideoSourceUpdate {
            default_source: "https://videos.example/paracetamol".to_string(),
            sources: Vec::new(),
        });
        let outcome = crate::assert_ok!(service.save(request).await);

        // The product itself was stored before the video round
        assert!(engine.records.lock().contains_key(GTIN));
        assert_eq!(outcome.errors, vec!["VideoSource mapping is disabled"]);
        assert_eq!(engine.groups(), vec![1, 1]);
    }
}

//! Message import through the pipeline into the mapping engine

#[cfg(test)]
mod tests {
    use crate::common::{MappingEngine, test_config};
    use chrono::Utc;
    use epi_wallet::core::import::{ImportService, ImportTab, parse_message_files};
    use epi_wallet::core::messages::collect_errors;
    use std::sync::Arc;

    fn service(engine: &Arc<MappingEngine>) -> ImportService {
        let mut config = test_config();
        config.wallet.pipeline.max_batch_size = 3;
        ImportService::new(
            config.pipeline().clone(),
            config.import().clone(),
            engine.clone(),
            engine.clone(),
        )
    }

    fn product(code: &str) -> String {
        format!(
            r#"{{"messageType": "Product", "product": {{"productCode": "{}", "inventedName": "P{}", "version": 1}}}}"#,
            code, code
        )
    }

    #[tokio::test]
    async fn test_import_files_then_retry_failures() {
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("products.json");
        let single = dir.path().join("photo.json");
        std::fs::write(
            &batch,
            format!("[{}, {}, {}, {}]", product("1"), product("2"), product("3"), product("4")),
        )
        .unwrap();
        std::fs::write(
            &single,
            r#"{"messageType": "ProductPhoto", "productCode": "1", "imageData": ""}"#,
        )
        .unwrap();

        let messages = crate::assert_ok!(parse_message_files(&[batch, single]).await);
        assert_eq!(messages.len(), 5);

        let engine = Arc::new(MappingEngine::default());
        engine.reject_type("ProductPhoto");
        let service = service(&engine);

        let summary = crate::assert_ok!(service.process_messages(messages).await);
        assert_eq!(summary.submitted, 5);
        assert_eq!(summary.digested(), 4);
        assert_eq!(summary.selected_tab, ImportTab::Failed);
        assert_eq!(collect_errors(&summary.undigested), vec!["ProductPhoto mapping is disabled"]);
        assert_eq!(engine.groups(), vec![3, 2]);
        assert_eq!(engine.records.lock().len(), 4);

        let mut logs = crate::assert_ok!(service.import_logs(Utc::now()).await);
        assert_eq!(logs.successful.len(), 4);
        assert_eq!(logs.failed.len(), 1);
        // Newest first
        assert_eq!(logs.successful[0].log.item_code, "4");
        assert_eq!(logs.failed[0].item_id.as_deref(), Some("1_4"));

        // Nothing selected yet
        let summary = crate::assert_ok!(service.retry_failed(&logs.failed).await);
        assert_eq!(summary.submitted, 0);

        engine.accept_all();
        logs.set_retry_all(true);
        let summary = crate::assert_ok!(service.retry_failed(&logs.failed).await);
        assert_eq!(summary.submitted, 1);
        assert_eq!(summary.selected_tab, ImportTab::Succeeded);

        let logs = crate::assert_ok!(service.import_logs(Utc::now()).await);
        assert_eq!(logs.successful.len(), 5);
        assert_eq!(logs.successful[0].log.item_type, "productphoto");
    }

    #[tokio::test]
    async fn test_untyped_messages_are_rejected() {
        let engine = Arc::new(MappingEngine::default());
        let service = service(&engine);

        let summary = crate::assert_ok!(
            service
                .process_messages(vec![serde_json::json!({"productCode": "9"})])
                .await
        );
        assert_eq!(summary.selected_tab, ImportTab::Failed);
        assert_eq!(collect_errors(&summary.undigested), vec!["Unknown message type"]);
    }

    #[tokio::test]
    async fn test_malformed_file_aborts_import() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, product("1")).unwrap();
        std::fs::write(&bad, "{\"messageType\": ").unwrap();

        let err = crate::assert_err!(parse_message_files(&[good, bad]).await);
        assert!(err.to_string().contains("Message should be an object"));
    }
}

//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use epi_wallet::config::Validate;
    use epi_wallet::{Config, WalletError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_full_config_file() {
        let file = write_config(
            r#"
pipeline:
  max_batch_size: 50
  flush_interval_ms: 1000
permissions:
  check_interval_ms: 5000
  boot_pages: ["generate-did", "landing-page", "splash"]
  identity_creation_page: "generate-did"
  home_page: "dashboard"
identity:
  app_name: "epi"
  vault_domain: "vault.company"
  did_method: "ssi:name"
  max_name_attempts: 10
import:
  fresh_window_secs: 120
logging:
  level: "debug"
  json: true
"#,
        );

        let config = crate::assert_ok!(Config::from_file(file.path()).await);
        assert_eq!(config.pipeline().max_batch_size, 50);
        assert!(config.permissions().is_boot_page("splash"));
        assert!(!config.permissions().is_boot_page("dashboard"));
        assert_eq!(config.permissions().home_page, "dashboard");
        assert_eq!(config.identity().max_name_attempts, 10);
        assert_eq!(config.import().fresh_window_secs, 120);
        assert!(config.logging().json);
    }

    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let file = write_config("{}\n");
        let config = crate::assert_ok!(Config::from_file(file.path()).await);
        assert_eq!(config.pipeline().max_batch_size, 30);
        assert_eq!(
            config.permissions().boot_pages,
            vec!["generate-did", "landing-page"]
        );
        assert_eq!(config.permissions().identity_creation_page, "generate-did");
        assert_eq!(config.identity().did_method, "ssi:name");
    }

    #[tokio::test]
    async fn test_invalid_sections_are_config_errors() {
        for content in [
            "permissions:\n  check_interval_ms: 0\n",
            "permissions:\n  home_page: \"  \"\n",
            "identity:\n  max_name_attempts: 0\n",
            "logging:\n  level: \"\"\n",
            "pipeline: [1, 2]\n",
        ] {
            let file = write_config(content);
            let err = crate::assert_err!(Config::from_file(file.path()).await);
            assert!(matches!(err, WalletError::Config(_)), "{}: {}", content, err);
        }
    }

    #[test]
    fn test_yaml_round_trip_keeps_values() {
        let mut config = Config::default();
        config.wallet.pipeline.max_batch_size = 7;
        config.wallet.permissions.home_page = "start".to_string();

        let yaml = crate::assert_ok!(config.to_yaml());
        let reloaded = crate::assert_ok!(Config::from_yaml_str(&yaml));
        assert_eq!(reloaded.pipeline().max_batch_size, 7);
        assert_eq!(reloaded.permissions().home_page, "start");
    }

    #[test]
    fn test_section_validation_messages() {
        let mut config = Config::default();
        config.wallet.pipeline.max_batch_size = 0;
        let message = config.wallet.pipeline.validate().unwrap_err();
        assert!(message.contains("max_batch_size"));
    }
}

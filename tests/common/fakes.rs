//! Recording fakes for the wallet collaborators

use async_trait::async_trait;
use epi_wallet::core::identity::{IdentityResolver, name_did};
use epi_wallet::core::import::{ImportLog, ImportLogSource};
use epi_wallet::core::messages::{Message, MessageDigester, mark_undigested, message_type};
use epi_wallet::core::permissions::{
    CheckError, ClientEnvironment, CredentialChecker, CredentialSnapshot, CredentialStore,
};
use epi_wallet::core::product::{PRODUCTS_TABLE, StorageQueryService};
use epi_wallet::{Result, WalletError};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

type CheckResponse = std::result::Result<Option<CredentialSnapshot>, CheckError>;

/// Checker answering with whatever response was set last
pub struct ScriptedChecker {
    response: Mutex<CheckResponse>,
    calls: AtomicUsize,
}

impl ScriptedChecker {
    pub fn new(response: CheckResponse) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, response: CheckResponse) {
        *self.response.lock() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialChecker for ScriptedChecker {
    async fn check_authorization(&self, _did: &str) -> CheckResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().clone()
    }
}

/// Store keeping persisted keys in memory
#[derive(Default)]
pub struct MemoryCredentialStore {
    pub persisted: Mutex<Vec<String>>,
    pub deletes: AtomicUsize,
    pub fail_persist: AtomicBool,
}

impl MemoryCredentialStore {
    pub fn persisted(&self) -> Vec<String> {
        self.persisted.lock().clone()
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn persist(&self, snapshot: &CredentialSnapshot) -> Result<()> {
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(WalletError::storage("enclave is read only"));
        }
        self.persisted
            .lock()
            .push(snapshot.persistence_key().to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Client environment recording navigation, notices and refreshes
pub struct RecordingEnv {
    page: Mutex<String>,
    pub navigations: Mutex<Vec<(String, Option<String>)>>,
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<(String, String)>>,
    pub refreshes: AtomicUsize,
}

impl RecordingEnv {
    pub fn on_page(page: &str) -> Self {
        Self {
            page: Mutex::new(page.to_string()),
            navigations: Mutex::new(Vec::new()),
            infos: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn set_page(&self, page: &str) {
        *self.page.lock() = page.to_string();
    }

    pub fn navigations(&self) -> Vec<(String, Option<String>)> {
        self.navigations.lock().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().clone()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientEnvironment for RecordingEnv {
    fn current_page(&self) -> String {
        self.page.lock().clone()
    }

    async fn navigate(&self, page: &str, did: Option<&str>) {
        self.navigations
            .lock()
            .push((page.to_string(), did.map(str::to_string)));
        self.set_page(page);
    }

    fn notify_info(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    fn notify_error(&self, message: &str, detail: &str) {
        self.errors
            .lock()
            .push((message.to_string(), detail.to_string()));
    }

    async fn force_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Name registry with an optional stored main DID
#[derive(Default)]
pub struct MemoryResolver {
    pub main: Mutex<Option<String>>,
    pub taken: Mutex<HashSet<String>>,
    pub created: Mutex<Vec<String>>,
}

impl MemoryResolver {
    pub fn with_main(did: &str) -> Self {
        let resolver = Self::default();
        *resolver.main.lock() = Some(did.to_string());
        resolver
    }

    pub fn take(&self, domain: &str, name: &str) {
        self.taken.lock().insert(name_did(domain, name));
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }
}

#[async_trait]
impl IdentityResolver for MemoryResolver {
    async fn main_did(&self) -> Result<Option<String>> {
        Ok(self.main.lock().clone())
    }

    async fn set_main_did(&self, did: &str) -> Result<()> {
        *self.main.lock() = Some(did.to_string());
        Ok(())
    }

    async fn resolve(&self, did: &str) -> Result<Option<String>> {
        Ok(self.taken.lock().get(did).cloned())
    }

    async fn create_identity(&self, _method: &str, domain: &str, name: &str) -> Result<String> {
        let did = name_did(domain, name);
        self.taken.lock().insert(did.clone());
        self.created.lock().push(did.clone());
        Ok(did)
    }
}

/// In-memory mapping engine
///
/// Digests `Product` messages into the products table, accepts other typed
/// messages, and rejects untyped ones. Every message is logged the way the
/// real engine logs mappings.
#[derive(Default)]
pub struct MappingEngine {
    pub records: Mutex<HashMap<String, Value>>,
    pub logs: Mutex<Vec<ImportLog>>,
    pub groups: Mutex<Vec<usize>>,
    /// Message types rejected regardless of content
    pub rejected_types: Mutex<HashSet<String>>,
    clock: AtomicUsize,
}

impl MappingEngine {
    pub fn reject_type(&self, message_type: &str) {
        self.rejected_types.lock().insert(message_type.to_string());
    }

    pub fn accept_all(&self) {
        self.rejected_types.lock().clear();
    }

    pub fn groups(&self) -> Vec<usize> {
        self.groups.lock().clone()
    }

    fn log(&self, message: &Message, status: &str) {
        let item_code = message
            .pointer("/product/productCode")
            .or_else(|| message.get("productCode"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let timestamp = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
        self.logs.lock().push(ImportLog {
            item_code,
            item_type: message_type(message).unwrap_or("unknown").to_lowercase(),
            status: status.to_string(),
            message: Some(message.clone()),
            timestamp,
            extra: Default::default(),
        });
    }

    fn digest_one(&self, message: &Message) -> Option<String> {
        let Some(kind) = message_type(message) else {
            return Some("Unknown message type".to_string());
        };
        if self.rejected_types.lock().contains(kind) {
            return Some(format!("{} mapping is disabled", kind));
        }
        if kind == "Product" {
            let product = &message["product"];
            let Some(code) = product["productCode"].as_str() else {
                return Some("Product code is missing".to_string());
            };
            self.records.lock().insert(
                code.to_string(),
                json!({
                    "gtin": code,
                    "name": product["inventedName"],
                    "version": product["version"],
                }),
            );
        }
        None
    }
}

#[async_trait]
impl MessageDigester for MappingEngine {
    async fn digest_messages(&self, messages: Vec<Message>) -> Result<Vec<Message>> {
        self.groups.lock().push(messages.len());
        let mut undigested = Vec::new();
        for message in messages {
            match self.digest_one(&message) {
                None => self.log(&message, "success"),
                Some(reason) => {
                    self.log(&message, "failed");
                    undigested.push(mark_undigested(message, &reason));
                }
            }
        }
        Ok(undigested)
    }
}

#[async_trait]
impl ImportLogSource for MappingEngine {
    async fn mapping_logs(&self) -> Result<Vec<ImportLog>> {
        Ok(self.logs.lock().clone())
    }
}

#[async_trait]
impl StorageQueryService for MappingEngine {
    async fn get_record(&self, table: &str, key: &str) -> Result<Option<Value>> {
        if table != PRODUCTS_TABLE {
            return Ok(None);
        }
        Ok(self.records.lock().get(key).cloned())
    }
}

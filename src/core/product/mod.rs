//! Product save flow

mod service;
mod types;


pub use service::{
    MSG_CODE_ALREADY_USED, MSG_INVALID_GTIN, PRODUCTS_TABLE, ProductService, SaveOutcome,
    SaveRequest, StorageQueryService,
};
pub use types::{Market, Product, VideoSource, VideoSourceUpdate};

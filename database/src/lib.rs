pub mod config;
pub mod error;
pub mod schema;
pub mod source;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use schema::init_schema;
pub use source::{MemorySource, RecordSource};
pub use store::SqliteStore;

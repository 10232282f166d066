pub mod error;
pub mod export;
mod store;
#[cfg(feature = "test-utils")]
pub mod testutil;

pub use error::{Result, StoreError};
pub use export::write_documents;
pub use store::{InsertOutcome, QaStore};

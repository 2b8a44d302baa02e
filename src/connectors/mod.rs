// Store implementations
pub mod store_trait;
pub mod dynamodb_store;
pub mod mock_store;

pub use store_trait::*;
pub use dynamodb_store::*;
pub use mock_store::*;

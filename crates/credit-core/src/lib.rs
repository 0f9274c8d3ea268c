pub mod config;
pub mod error;
pub mod memory;
pub mod sentinel;
pub mod traits;
pub mod types;

pub use config::AppConfig;
pub use error::*;
pub use memory::InMemoryStatementSource;
pub use traits::*;
pub use types::*;

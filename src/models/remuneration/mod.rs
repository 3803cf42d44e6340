pub mod types;
pub mod queries;
pub mod rates;

pub use types::*;
pub use queries::*;

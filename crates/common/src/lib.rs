pub mod crypto;
pub mod types;
pub mod utils;

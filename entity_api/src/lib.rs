pub use entity::{creator_credentials, creator_status, Id};

pub mod creator_credential;
pub mod error;
pub mod query;

use uuid::Uuid;

pub mod creator_credentials;
pub mod creator_status;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;

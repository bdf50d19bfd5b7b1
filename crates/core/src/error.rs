//! Domain error taxonomy shared by the db and api layers.

use crate::types::DbId;

/// Errors raised by domain rules, independent of HTTP and storage.
///
/// The api layer maps each variant to a status code and ships the `Display`
/// text to the client verbatim, so messages here are written for API
/// consumers, not for logs.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row addressed by id does not exist, or is out of the caller's reach.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The request parsed fine but a field value breaks a domain rule.
    #[error("{0}")]
    Validation(String),

    /// Missing or unusable credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but role or ownership does not permit the operation.
    #[error("{0}")]
    Forbidden(String),
}

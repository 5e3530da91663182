//! Client error types

use crate::store::StoreError;
use thiserror::Error;

/// Input rejected before any store call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Select a table number")]
    MissingTableNumber,

    #[error("Invalid table number: {0}")]
    InvalidTableNumber(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("The kitchen is closed")]
    KitchenClosed,

    #[error("Announcement message must not be empty")]
    EmptyMessage,

    #[error("Menu entry is not orderable: {0}")]
    NotOrderable(String),

    #[error("A checkout is already in progress")]
    CheckoutInProgress,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Validation failed, nothing was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The document store rejected the operation
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Permission denied for the current role
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Order was already accepted (as far as the local mirror knows)
    #[error("Order already accepted: {0}")]
    AlreadyAccepted(String),

    /// Session has been logged out
    #[error("No active session")]
    NoSession,
}

impl ClientError {
    pub fn forbidden(action: impl Into<String>) -> Self {
        ClientError::Forbidden(action.into())
    }

    /// Whether the error was caught before any store call
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

//! Customer domain model.
//!
//! # Responsibility
//! - Define the customer record persisted by the customer store.
//! - Validate customer fields before any persistence or lookup.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on first insert.
//! - A persisted customer always carries a resolved address.

use crate::model::address::{Address, PostalCode};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned numeric customer identifier.
pub type CustomerId = i64;

/// Upper bound for `Customer::name`, counted in characters.
pub const CUSTOMER_NAME_MAX_CHARS: usize = 255;

/// Validation failures for customer records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerValidationError {
    /// Name is empty after trimming whitespace.
    BlankName,
    /// Name exceeds `CUSTOMER_NAME_MAX_CHARS`.
    NameTooLong { max: usize, actual: usize },
}

impl Display for CustomerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "customer name must not be blank"),
            Self::NameTooLong { max, actual } => write!(
                f,
                "customer name has {actual} characters; at most {max} allowed"
            ),
        }
    }
}

impl Error for CustomerValidationError {}

/// Registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Assigned by the customer store; ignored on create.
    #[serde(default)]
    pub id: Option<CustomerId>,
    pub name: String,
    /// On input only `postal_code` matters; the service replaces the rest.
    pub address: Address,
}

impl Customer {
    /// Creates an unsaved customer with an unresolved address.
    pub fn new(name: impl Into<String>, postal_code: PostalCode) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: Address::unresolved(postal_code),
        }
    }

    /// Postal code used to resolve this customer's address.
    pub fn postal_code(&self) -> &PostalCode {
        &self.address.postal_code
    }

    /// Checks field-level rules shared by every write path.
    pub fn validate(&self) -> Result<(), CustomerValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(CustomerValidationError::BlankName);
        }

        let actual = trimmed.chars().count();
        if actual > CUSTOMER_NAME_MAX_CHARS {
            return Err(CustomerValidationError::NameTooLong {
                max: CUSTOMER_NAME_MAX_CHARS,
                actual,
            });
        }

        Ok(())
    }
}

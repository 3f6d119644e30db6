//! Address resolution through an external lookup service.
//!
//! # Responsibility
//! - Define the synchronous postal-code-to-address lookup contract.
//! - Keep transport details out of the customer service.
//!
//! # Invariants
//! - Resolvers are stateless; they never read or write the address store.
//! - Failures are reported as-is and never retried here.

use crate::model::address::{Address, PostalCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod viacep;

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Failure reported by an address resolver.
#[derive(Debug)]
pub enum ResolveError {
    /// Transport-level failure (connect, timeout, TLS).
    Http(reqwest::Error),
    /// The lookup service answered with a non-success status.
    UnexpectedStatus { postal_code: PostalCode, status: u16 },
    /// The lookup service knows no address for this postal code.
    NotFound(PostalCode),
    /// The response body could not be turned into an address.
    InvalidResponse(String),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "address lookup request failed: {err}"),
            Self::UnexpectedStatus {
                postal_code,
                status,
            } => write!(
                f,
                "address lookup for {postal_code} returned HTTP status {status}"
            ),
            Self::NotFound(postal_code) => write!(f, "no address found for {postal_code}"),
            Self::InvalidResponse(message) => {
                write!(f, "invalid address lookup response: {message}")
            }
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Maps a postal code to a fully populated address.
pub trait AddressResolver {
    fn resolve(&self, postal_code: &PostalCode) -> ResolveResult<Address>;
}

impl<T: AddressResolver + ?Sized> AddressResolver for &T {
    fn resolve(&self, postal_code: &PostalCode) -> ResolveResult<Address> {
        (**self).resolve(postal_code)
    }
}

//! Core domain logic for the customer registry.
//! Customers are stored with an address resolved by postal code, read
//! through a local address cache in front of the ViaCEP lookup service.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod resolver;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::address::{Address, PostalCode, PostalCodeError};
pub use model::customer::{Customer, CustomerId, CustomerValidationError};
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::{RepoError, RepoResult};
pub use resolver::viacep::{ViaCepConfig, ViaCepResolver};
pub use resolver::{AddressResolver, ResolveError, ResolveResult};
pub use service::customer_service::{
    CustomerService, CustomerServiceError, CustomerServiceResult,
};

/// Customer service over SQLite stores sharing one connection.
pub type SqliteCustomerService<'conn, R> =
    CustomerService<SqliteCustomerRepository<'conn>, SqliteAddressRepository<'conn>, R>;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! Customer registration use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete entry points for customers.
//! - Resolve each customer's postal code through the address store,
//!   falling back to the resolver and caching its answer.
//!
//! # Invariants
//! - A customer is only persisted after its address has been resolved and
//!   stored, so every persisted customer references a full address.
//! - The resolver is called at most once per uncached postal code per save.
//! - Update and delete of an unknown id leave the customer store untouched
//!   and report `CustomerNotFound`.
//!
//! # Concurrency
//! Cache-or-fetch is not atomic. Two callers saving customers with the same
//! uncached postal code may both call the resolver; both write the same
//! address row and the last write wins.

use crate::model::address::{Address, PostalCode};
use crate::model::customer::{Customer, CustomerId, CustomerValidationError};
use crate::repo::address_repo::AddressRepository;
use crate::repo::customer_repo::CustomerRepository;
use crate::repo::RepoError;
use crate::resolver::{AddressResolver, ResolveError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CustomerServiceResult<T> = Result<T, CustomerServiceError>;

/// Service error for customer use-cases.
#[derive(Debug)]
pub enum CustomerServiceError {
    /// No customer with this id exists.
    CustomerNotFound(CustomerId),
    /// Customer input failed field validation.
    Validation(CustomerValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Address lookup failed; nothing was persisted for the customer.
    Resolver(ResolveError),
}

impl Display for CustomerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CustomerNotFound(id) => write!(f, "customer not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Resolver(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CustomerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CustomerNotFound(_) => None,
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Resolver(err) => Some(err),
        }
    }
}

impl From<RepoError> for CustomerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::CustomerNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ResolveError> for CustomerServiceError {
    fn from(value: ResolveError) -> Self {
        Self::Resolver(value)
    }
}

impl From<CustomerValidationError> for CustomerServiceError {
    fn from(value: CustomerValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Customer service wired explicitly with its stores and resolver.
pub struct CustomerService<C, A, R>
where
    C: CustomerRepository,
    A: AddressRepository,
    R: AddressResolver,
{
    customers: C,
    addresses: A,
    resolver: R,
}

impl<C, A, R> CustomerService<C, A, R>
where
    C: CustomerRepository,
    A: AddressRepository,
    R: AddressResolver,
{
    /// Creates a service over the given collaborators.
    pub fn new(customers: C, addresses: A, resolver: R) -> Self {
        Self {
            customers,
            addresses,
            resolver,
        }
    }

    /// Lists every stored customer in insertion order.
    pub fn list_customers(&self) -> CustomerServiceResult<Vec<Customer>> {
        Ok(self.customers.list_customers()?)
    }

    /// Gets one customer by id.
    ///
    /// # Errors
    /// - `CustomerNotFound` when the id is unknown.
    pub fn get_customer(&self, id: CustomerId) -> CustomerServiceResult<Customer> {
        self.customers
            .get_customer(id)?
            .ok_or(CustomerServiceError::CustomerNotFound(id))
    }

    /// Registers a new customer.
    ///
    /// Any id on the input is ignored; the customer store assigns one.
    /// The embedded address is replaced by the resolved one.
    pub fn create_customer(&self, customer: Customer) -> CustomerServiceResult<Customer> {
        let saved = self.resolve_address_and_save(Customer {
            id: None,
            ..customer
        })?;
        info!(
            "event=customer_create module=service status=ok customer_id={} cep={}",
            saved.id.unwrap_or_default(),
            saved.postal_code()
        );
        Ok(saved)
    }

    /// Replaces the customer stored under `id`.
    ///
    /// # Errors
    /// - `CustomerNotFound` when the id is unknown; nothing is written and
    ///   no address lookup happens.
    pub fn update_customer(
        &self,
        id: CustomerId,
        customer: Customer,
    ) -> CustomerServiceResult<Customer> {
        self.ensure_customer_exists(id)?;

        let saved = self.resolve_address_and_save(Customer {
            id: Some(id),
            ..customer
        })?;
        info!(
            "event=customer_update module=service status=ok customer_id={id} cep={}",
            saved.postal_code()
        );
        Ok(saved)
    }

    /// Deletes the customer stored under `id`. Its address stays cached.
    ///
    /// # Errors
    /// - `CustomerNotFound` when the id is unknown.
    pub fn delete_customer(&self, id: CustomerId) -> CustomerServiceResult<()> {
        self.ensure_customer_exists(id)?;
        self.customers.delete_customer(id)?;
        info!("event=customer_delete module=service status=ok customer_id={id}");
        Ok(())
    }

    /// Returns the cached address for `postal_code`, fetching and caching
    /// it through the resolver on a miss.
    pub fn resolve_address(&self, postal_code: &PostalCode) -> CustomerServiceResult<Address> {
        if let Some(address) = self.addresses.get_address(postal_code)? {
            debug!("event=address_resolve module=service status=ok source=cache cep={postal_code}");
            return Ok(address);
        }

        debug!("event=address_resolve module=service status=miss cep={postal_code}");
        let address = self.resolver.resolve(postal_code)?;
        self.addresses.save_address(&address)?;
        info!("event=address_resolve module=service status=ok source=remote cep={postal_code}");
        Ok(address)
    }

    fn resolve_address_and_save(&self, mut customer: Customer) -> CustomerServiceResult<Customer> {
        customer.validate()?;
        customer.address = self.resolve_address(customer.postal_code())?;
        Ok(self.customers.save_customer(&customer)?)
    }

    fn ensure_customer_exists(&self, id: CustomerId) -> CustomerServiceResult<()> {
        match self.customers.get_customer(id)? {
            Some(_) => Ok(()),
            None => Err(CustomerServiceError::CustomerNotFound(id)),
        }
    }
}

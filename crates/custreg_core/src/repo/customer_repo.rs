//! Customer store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/save/delete over the `customers` table.
//! - Return customers with their address joined from `addresses`.
//!
//! # Invariants
//! - Write paths call `Customer::validate()` before SQL mutations.
//! - A customer row always references an existing address row.
//! - Listing order is insertion order (`id ASC`).

use crate::model::customer::{Customer, CustomerId};
use crate::repo::address_repo::parse_address_row;
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CUSTOMER_SELECT_SQL: &str = "SELECT
    c.id AS id,
    c.name AS name,
    a.cep AS cep,
    a.street AS street,
    a.complement AS complement,
    a.neighborhood AS neighborhood,
    a.city AS city,
    a.state AS state,
    a.ibge AS ibge,
    a.gia AS gia,
    a.ddd AS ddd,
    a.siafi AS siafi
FROM customers c
JOIN addresses a ON a.cep = c.address_cep";

/// Repository interface for customer CRUD operations.
pub trait CustomerRepository {
    /// Lists every stored customer in insertion order.
    fn list_customers(&self) -> RepoResult<Vec<Customer>>;
    /// Gets one customer by id.
    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Inserts when `customer.id` is `None`, otherwise overwrites by id.
    ///
    /// Returns the stored record with its id set. The referenced address
    /// must already be present in the address store.
    fn save_customer(&self, customer: &Customer) -> RepoResult<Customer>;
    /// Deletes one customer; the referenced address is kept.
    fn delete_customer(&self, id: CustomerId) -> RepoResult<()>;
}

impl<T: CustomerRepository + ?Sized> CustomerRepository for &T {
    fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        (**self).list_customers()
    }

    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        (**self).get_customer(id)
    }

    fn save_customer(&self, customer: &Customer) -> RepoResult<Customer> {
        (**self).save_customer(customer)
    }

    fn delete_customer(&self, id: CustomerId) -> RepoResult<()> {
        (**self).delete_customer(id)
    }
}

/// SQLite-backed customer store.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "customers", &["id", "name", "address_cep", "updated_at"])?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} ORDER BY c.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut customers = Vec::new();

        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }

        Ok(customers)
    }

    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let customer = self
            .conn
            .query_row(
                &format!("{CUSTOMER_SELECT_SQL} WHERE c.id = ?1;"),
                [id],
                |row| Ok(parse_customer_row(row)),
            )
            .optional()?;

        customer.transpose()
    }

    fn save_customer(&self, customer: &Customer) -> RepoResult<Customer> {
        customer.validate()?;

        let id = match customer.id {
            None => {
                self.conn.execute(
                    "INSERT INTO customers (name, address_cep) VALUES (?1, ?2);",
                    params![customer.name.as_str(), customer.postal_code().as_str()],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO customers (id, name, address_cep) VALUES (?1, ?2, ?3)
                     ON CONFLICT (id) DO UPDATE SET
                        name = excluded.name,
                        address_cep = excluded.address_cep,
                        updated_at = (strftime('%s', 'now') * 1000);",
                    params![id, customer.name.as_str(), customer.postal_code().as_str()],
                )?;
                id
            }
        };

        let mut saved = customer.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    fn delete_customer(&self, id: CustomerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    Ok(Customer {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        address: parse_address_row(row)?,
    })
}

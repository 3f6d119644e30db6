//! Address store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist resolved addresses keyed by canonical postal code.
//! - Serve as the read-through cache in front of the address resolver.
//!
//! # Invariants
//! - At most one row per postal code; saving an existing code overwrites it.
//! - Rows are never deleted through this store.

use crate::model::address::{Address, PostalCode};
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ADDRESS_COLUMNS: &[&str] = &[
    "cep",
    "street",
    "complement",
    "neighborhood",
    "city",
    "state",
    "ibge",
    "gia",
    "ddd",
    "siafi",
];

/// Repository interface for the postal-code keyed address store.
pub trait AddressRepository {
    /// Gets the stored address for `postal_code`, if any.
    fn get_address(&self, postal_code: &PostalCode) -> RepoResult<Option<Address>>;
    /// Inserts or overwrites the address stored under its postal code.
    fn save_address(&self, address: &Address) -> RepoResult<()>;
}

impl<T: AddressRepository + ?Sized> AddressRepository for &T {
    fn get_address(&self, postal_code: &PostalCode) -> RepoResult<Option<Address>> {
        (**self).get_address(postal_code)
    }

    fn save_address(&self, address: &Address) -> RepoResult<()> {
        (**self).save_address(address)
    }
}

/// SQLite-backed address store.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "addresses", ADDRESS_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Number of cached addresses.
    pub fn count_addresses(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM addresses;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative address count `{count}`")))
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn get_address(&self, postal_code: &PostalCode) -> RepoResult<Option<Address>> {
        let address = self
            .conn
            .query_row(
                "SELECT cep, street, complement, neighborhood, city, state, ibge, gia, ddd, siafi
                 FROM addresses
                 WHERE cep = ?1;",
                [postal_code.as_str()],
                |row| Ok(parse_address_row(row)),
            )
            .optional()?;

        address.transpose()
    }

    fn save_address(&self, address: &Address) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO addresses (
                cep,
                street,
                complement,
                neighborhood,
                city,
                state,
                ibge,
                gia,
                ddd,
                siafi
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT (cep) DO UPDATE SET
                street = excluded.street,
                complement = excluded.complement,
                neighborhood = excluded.neighborhood,
                city = excluded.city,
                state = excluded.state,
                ibge = excluded.ibge,
                gia = excluded.gia,
                ddd = excluded.ddd,
                siafi = excluded.siafi;",
            params![
                address.postal_code.as_str(),
                address.street.as_str(),
                address.complement.as_str(),
                address.neighborhood.as_str(),
                address.city.as_str(),
                address.state.as_str(),
                address.ibge_code.as_str(),
                address.gia_code.as_str(),
                address.area_code.as_str(),
                address.siafi_code.as_str(),
            ],
        )?;

        Ok(())
    }
}

/// Parses the address columns of `row`, which must use `addresses` names.
pub(crate) fn parse_address_row(row: &Row<'_>) -> RepoResult<Address> {
    let cep: String = row.get("cep")?;
    let postal_code = PostalCode::parse(&cep).map_err(|_| {
        RepoError::InvalidData(format!("invalid postal code `{cep}` in addresses.cep"))
    })?;

    Ok(Address {
        postal_code,
        street: row.get("street")?,
        complement: row.get("complement")?,
        neighborhood: row.get("neighborhood")?,
        city: row.get("city")?,
        state: row.get("state")?,
        ibge_code: row.get("ibge")?,
        gia_code: row.get("gia")?,
        area_code: row.get("ddd")?,
        siafi_code: row.get("siafi")?,
    })
}

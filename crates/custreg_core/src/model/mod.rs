//! Customer registration domain model.
//!
//! # Responsibility
//! - Define the canonical records shared by stores, resolver and service.
//! - Own validation rules that every write path must honor.
//!
//! # Invariants
//! - An `Address` is identified by its canonical `PostalCode`.
//! - A `Customer` references exactly one `Address`.

pub mod address;
pub mod customer;

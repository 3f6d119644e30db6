//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate stores and the address resolver into customer use-cases.
//! - Keep callers decoupled from storage and lookup transport details.

pub mod customer_service;

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire the customer service the way an embedding application would.
//! - Print deterministic status lines for quick local sanity checks.

use custreg_core::db::{open_db, open_db_in_memory};
use custreg_core::{
    init_logging, CoreConfig, SqliteAddressRepository, SqliteCustomerRepository,
    SqliteCustomerService, ViaCepResolver,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("custreg_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();
    let config = CoreConfig::from_env()?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let addresses = SqliteAddressRepository::try_new(&conn)?;
    let cached_addresses = addresses.count_addresses()?;
    let service: SqliteCustomerService<'_, ViaCepResolver> = SqliteCustomerService::new(
        SqliteCustomerRepository::try_new(&conn)?,
        addresses,
        ViaCepResolver::new(&config.viacep)?,
    );
    let customers = service.list_customers()?;

    log::info!(
        "event=cli_probe module=cli status=ok customers={} cached_addresses={cached_addresses}",
        customers.len()
    );
    println!("custreg_core version={}", custreg_core::core_version());
    println!("custreg_core customers={}", customers.len());
    println!("custreg_core cached_addresses={cached_addresses}");
    Ok(())
}

// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_repo_sqlite::{initialize_database, run_migrations, DbConnection};
use phonotek_storage_sqlite::connection::{Config as StorageConfig, ConnectionPool, PooledConnection};

use super::*;

/// Create the connection pool backing all database operations.
pub fn create_connection_pool(config: &StorageConfig) -> Result<ConnectionPool> {
    Ok(phonotek_storage_sqlite::connection::create_connection_pool(
        config,
    )?)
}

pub fn get_pooled_connection(pool: &ConnectionPool) -> Result<PooledConnection> {
    Ok(phonotek_storage_sqlite::connection::get_pooled_connection(
        pool,
    )?)
}

/// Configure the database engine for a freshly pooled connection.
pub fn initialize(connection: &mut DbConnection) -> Result<()> {
    initialize_database(connection)
        .map_err(|err| anyhow::Error::from(err).context("failed to initialize database"))
        .map_err(Error::Other)
}

pub fn migrate_schema(connection: &mut DbConnection) -> Result<()> {
    for migration_version in run_migrations(connection)
        .map_err(|err| anyhow::anyhow!(err))
        .map_err(Error::DatabaseMigration)?
    {
        log::info!("Applied migration '{migration_version}'");
    }
    Ok(())
}

/// Periodic storage maintenance. Must not run inside a transaction.
pub fn optimize(connection: &mut DbConnection, vacuum: bool) -> Result<()> {
    Ok(phonotek_storage_sqlite::optimize_database(
        connection, vacuum,
    )?)
}

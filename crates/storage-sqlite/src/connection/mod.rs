// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU32;

use diesel::{r2d2, Connection as _};

use crate::Result;

pub type ConnectionManager = r2d2::ConnectionManager<diesel::SqliteConnection>;

pub type ConnectionPool = r2d2::Pool<ConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<ConnectionManager>;

/// Storage configuration, suitable for config files.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Database connection string, either a file path or `:memory:`.
    pub connection: String,

    pub pool_max_size: NonZeroU32,
}

pub fn create_connection_pool(config: &Config) -> Result<ConnectionPool> {
    let Config {
        connection,
        pool_max_size,
    } = config;
    // Establish a test connection before creating the pool to fail
    // early. For an inaccessible file r2d2 would retry repeatedly and
    // log errors instead of returning one.
    let _ = diesel::SqliteConnection::establish(connection)?;
    let manager = ConnectionManager::new(connection);
    let pool = ConnectionPool::builder()
        .max_size(pool_max_size.get())
        .build(manager)?;
    Ok(pool)
}

pub fn get_pooled_connection(pool: &ConnectionPool) -> Result<PooledConnection> {
    pool.get().map_err(Into::into)
}

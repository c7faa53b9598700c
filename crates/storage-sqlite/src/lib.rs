// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use diesel::{RunQueryDsl as _, SqliteConnection};
use thiserror::Error;

pub mod connection;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),

    #[error(transparent)]
    DatabaseConnection(#[from] diesel::ConnectionError),

    #[error(transparent)]
    DatabaseConnectionPool(#[from] r2d2::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rebuild the database file from scratch, reclaiming the space left
/// behind by purged rows. Must not run inside a transaction.
pub fn vacuum_database(connection: &mut SqliteConnection) -> Result<()> {
    diesel::dsl::sql_query("VACUUM")
        .execute(connection)
        .map(|_| ())
        .map_err(Into::into)
}

/// Refresh the statistics that feed the query planner.
///
/// The statistics are not updated automatically as the content
/// changes, so this should be re-run after bulk mutations.
///
/// See also: <https://www.sqlite.org/lang_analyze.html>
pub fn analyze_database_stats(connection: &mut SqliteConnection) -> Result<()> {
    diesel::dsl::sql_query("ANALYZE")
        .execute(connection)
        .map(|_| ())
        .map_err(Into::into)
}

/// Periodic storage maintenance, optionally rebuilding the file before
/// refreshing the planner statistics.
pub fn optimize_database(connection: &mut SqliteConnection, vacuum: bool) -> Result<()> {
    if vacuum {
        log::info!("Rebuilding database storage");
        vacuum_database(connection)?;
    }

    log::info!("Refreshing database statistics");
    analyze_database_stats(connection)
}

// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Binds the storage-agnostic service operations to Diesel/SQLite.
//!
//! Every mutating operation below opens one transaction, passes the
//! borrowed connection through the repository adapter, and commits on
//! success. External side effects run inside the transaction before
//! the commit, so an external failure rolls the relational part back.

use thiserror::Error;

use phonotek_repo::prelude::RepoError;
use phonotek_repo_sqlite::prelude::{Connection as RepoConnection, DieselTransactionError};
use phonotek_storage_sqlite::Error as StorageError;
use phonotek_usecases as uc;

pub mod auth;
pub mod database;
pub mod history;
pub mod playlist;
pub mod track;
pub mod user;

#[cfg(test)]
mod tests;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Input(anyhow::Error),

    #[error("{0} not found")]
    NotFound(uc::What),

    #[error("permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Conflict(uc::Conflict),

    #[error(transparent)]
    Unauthenticated(uc::AuthInvalidity),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("database migration failed: {0}")]
    DatabaseMigration(anyhow::Error),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl<E> From<DieselTransactionError<E>> for Error
where
    E: Into<Error>,
{
    fn from(err: DieselTransactionError<E>) -> Self {
        err.into_inner().into()
    }
}

impl From<uc::Error> for Error {
    fn from(err: uc::Error) -> Self {
        use uc::Error::*;
        match err {
            Input(uc::InputError(err)) => Self::Input(err),
            NotFound(what) => Self::NotFound(what),
            PermissionDenied => Self::PermissionDenied,
            Conflict(conflict) => Self::Conflict(conflict),
            Unauthenticated(invalidity) => Self::Unauthenticated(invalidity),
            Internal(err) => Self::Other(err),
        }
    }
}

pub type TransactionError = DieselTransactionError<Error>;

impl From<Error> for TransactionError {
    fn from(err: Error) -> Self {
        Self::new(err)
    }
}

fn transaction_error<E>(err: E) -> TransactionError
where
    E: Into<Error>,
{
    TransactionError::from(err.into())
}

pub type Result<T> = std::result::Result<T, Error>;

// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Storage-agnostic repository traits.
//!
//! Capabilities are split into narrow traits so that each service-layer
//! operation only depends on what it actually uses, e.g. reading playlist
//! entries does not require the position-shifting capability.

use phonotek_core::util::clock::UtcDateTimeMs;

#[macro_use]
mod macros;

pub mod history;
pub mod playlist;
pub mod token;
pub mod track;
pub mod user;

pub type RecordId = i64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordHeader<Id> {
    pub id: Id,
    pub created_at: UtcDateTimeMs,
    pub updated_at: UtcDateTimeMs,
}

pub mod prelude {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum RepoError {
        #[error("not found")]
        NotFound,

        #[error("conflict")]
        Conflict,

        #[error("aborted")]
        Aborted,

        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }

    pub type RepoResult<T> = Result<T, RepoError>;

    pub trait OptionalRepoResult<T> {
        fn optional(self) -> RepoResult<Option<T>>;
    }

    impl<T> OptionalRepoResult<T> for Result<T, RepoError> {
        fn optional(self) -> RepoResult<Option<T>> {
            self.map_or_else(
                |err| {
                    if matches!(err, RepoError::NotFound) {
                        Ok(None)
                    } else {
                        Err(err)
                    }
                },
                |val| Ok(Some(val)),
            )
        }
    }
}

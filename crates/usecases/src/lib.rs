// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Storage-agnostic service operations.
//!
//! All operations are plain functions that are generic over the
//! repository capability traits and borrow a repository for the
//! duration of one call. Opening and committing the surrounding
//! transaction is the caller's responsibility.

use std::{fmt, result::Result as StdResult};

use thiserror::Error;

use phonotek_repo::prelude::RepoError;

pub mod auth;
pub mod collab;
pub mod history;
pub mod playlist;
pub mod track;
pub mod user;

/// The kind of record an operation failed to find.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum What {
    User,
    Track,
    Playlist,
    Membership,
    Token,
}

impl fmt::Display for What {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            Self::User => "user",
            Self::Track => "track",
            Self::Playlist => "playlist",
            Self::Membership => "membership",
            Self::Token => "token",
        };
        f.write_str(what)
    }
}

#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conflict {
    #[error("name is already taken")]
    NameTaken,

    #[error("e-mail address is already taken")]
    EmailTaken,

    #[error("track is already a member of the playlist")]
    AlreadyMember,

    #[error("track already occupies the requested position")]
    PositionUnchanged,

    #[error("requested position is outside the playlist")]
    PositionOutOfRange,

    #[error("title is already taken")]
    TitleTaken,

    #[error("slug is already taken")]
    SlugTaken,
}

/// Why a presented credential is not acceptable.
///
/// Deliberately coarse: responses should not reveal whether a
/// credential was malformed, revoked, or replayed.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthInvalidity {
    #[error("malformed credential")]
    Malformed,

    #[error("bad signature")]
    BadSignature,

    #[error("expired credential")]
    Expired,

    #[error("revoked credential")]
    Revoked,

    #[error("replayed credential")]
    Replayed,
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct InputError(#[from] pub anyhow::Error);

pub type InputResult<T> = StdResult<T, InputError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{0} not found")]
    NotFound(What),

    #[error("permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Conflict(#[from] Conflict),

    #[error(transparent)]
    Unauthenticated(#[from] AuthInvalidity),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for Error {
    fn from(err: RepoError) -> Self {
        // NotFound and Conflict are translated into domain variants at
        // each call site. Whatever reaches this fallback is unexpected.
        match err {
            RepoError::Other(err) => Self::Internal(err),
            err => Self::Internal(anyhow::Error::from(err)),
        }
    }
}

pub type Result<T> = StdResult<T, Error>;

pub(crate) fn validate_input<T>(input: &T, what: What) -> InputResult<()>
where
    T: semval::Validate,
    T::Invalidity: fmt::Debug,
{
    input
        .validate()
        .map_err(|context| InputError(anyhow::anyhow!("invalid {what}: {context:?}")))
}

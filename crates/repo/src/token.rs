// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use phonotek_core::util::clock::UtcDateTimeMs;

use crate::{prelude::*, user::RecordId as UserId};

/// Opaque identifier shared by an access/refresh credential pair.
///
/// Unlike the other record ids this is not a storage rowid but a random
/// identifier minted by the issuer and embedded in the signed claims.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(String);

impl TokenId {
    #[must_use]
    pub const fn new(inner: String) -> Self {
        Self(inner)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        let Self(inner) = self;
        inner
    }
}

impl From<String> for TokenId {
    fn from(from: String) -> Self {
        Self::new(from)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One live credential pair.
///
/// A row exists while the pair is redeemable. Deleting the row revokes
/// both the access and the refresh credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub user_id: UserId,

    /// The refresh credential exactly as issued, compared verbatim
    /// against the presented value on rotation.
    pub refresh_value: String,

    pub expires_at: UtcDateTimeMs,
}

pub trait Repo {
    fn insert_token(
        &mut self,
        token_id: &TokenId,
        created_at: UtcDateTimeMs,
        record: &Record,
    ) -> RepoResult<()>;

    fn load_token(&mut self, token_id: &TokenId) -> RepoResult<Record>;

    /// Returns the number of deleted rows (0 or 1).
    fn delete_token(&mut self, token_id: &TokenId) -> RepoResult<usize>;

    /// Returns the number of deleted rows.
    fn delete_all_user_tokens(&mut self, user_id: UserId) -> RepoResult<usize>;

    /// Delete all rows with `expires_at <= now`, i.e. every row that is
    /// no longer usable under the exclusive validity window.
    ///
    /// Returns the number of deleted rows.
    fn delete_expired_tokens(&mut self, now: UtcDateTimeMs) -> RepoResult<usize>;
}

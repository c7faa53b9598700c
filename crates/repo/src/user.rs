// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use phonotek_core::{user::User, util::clock::UtcDateTimeMs};

use crate::prelude::*;

record_id_newtype!(RecordId);

pub type RecordHeader = crate::RecordHeader<RecordId>;

pub trait Repo {
    fn insert_user(&mut self, created_at: UtcDateTimeMs, created_user: &User)
        -> RepoResult<RecordId>;

    fn load_user(&mut self, id: RecordId) -> RepoResult<(RecordHeader, User)>;

    fn resolve_user_id_by_email(&mut self, email: &str) -> RepoResult<RecordId>;

    /// Replace the e-mail address and clear the verified flag.
    fn update_user_email(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        email: &str,
    ) -> RepoResult<()>;

    fn update_user_verified(
        &mut self,
        id: RecordId,
        updated_at: UtcDateTimeMs,
        verified: bool,
    ) -> RepoResult<()>;
}

// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Storage-agnostic domain model of the phonotek media catalog.

pub mod playlist;
pub mod slug;
pub mod track;
pub mod user;
pub mod util;

pub mod prelude {
    pub(crate) use semval::prelude::*;

    pub use crate::{
        slug::Slug,
        util::clock::{TimestampMillis, UtcDateTimeMs},
    };
}

pub use self::{playlist::Playlist, slug::Slug, track::Track, user::User};

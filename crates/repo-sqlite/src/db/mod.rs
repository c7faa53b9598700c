// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

pub(crate) mod auth_token;
pub(crate) mod listen;
pub(crate) mod playlist;
pub(crate) mod playlist_track;
pub(crate) mod track;
pub(crate) mod user;

// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod history;
pub mod playlist;
pub mod token;
pub mod track;
pub mod user;

// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Re-exports the sub-crates behind feature gates.

pub use phonotek_core as core;

#[cfg(feature = "repo")]
pub use phonotek_repo as repo;

#[cfg(feature = "sqlite")]
pub use phonotek_repo_sqlite as repo_sqlite;

#[cfg(feature = "sqlite")]
pub use phonotek_storage_sqlite as storage_sqlite;

#[cfg(feature = "usecases")]
pub use phonotek_usecases as usecases;

#[cfg(feature = "sqlite")]
pub use phonotek_usecases_sqlite as usecases_sqlite;

// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::prelude::*;

/// An account that owns tracks and playlists and holds credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Public display and login name, unique across the catalog.
    pub name: String,

    /// E-mail address, unique across the catalog.
    pub email: String,

    /// Whether the e-mail address has been verified.
    pub verified: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UserInvalidity {
    NameEmpty,
    EmailInvalid,
}

impl Validate for User {
    type Invalidity = UserInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self {
            name,
            email,
            verified: _,
        } = self;
        ValidationContext::new()
            .invalidate_if(name.trim().is_empty(), Self::Invalidity::NameEmpty)
            .invalidate_if(
                // Proper address validation is left to the mail system.
                !email.contains('@') || email.trim().len() != email.len(),
                Self::Invalidity::EmailInvalid,
            )
            .into()
    }
}

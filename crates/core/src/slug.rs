// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use semval::prelude::*;

/// A changeable, URL-safe identifier.
///
/// Unique per owner, i.e. two users may both publish a track
/// under the slug "demo".
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slug(String);

impl Slug {
    #[must_use]
    pub const fn new(inner: String) -> Self {
        Self(inner)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        let Self(inner) = self;
        inner
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        let Self(inner) = self;
        inner
    }
}

impl From<String> for Slug {
    fn from(from: String) -> Self {
        Self::new(from)
    }
}

impl From<&str> for Slug {
    fn from(from: &str) -> Self {
        Self::new(from.to_owned())
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlugInvalidity {
    Empty,
    InvalidCharacters,
    LeadingOrTrailingHyphen,
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

impl Validate for Slug {
    type Invalidity = SlugInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let slug = self.as_str();
        ValidationContext::new()
            .invalidate_if(slug.is_empty(), Self::Invalidity::Empty)
            .invalidate_if(
                !slug.chars().all(is_slug_char),
                Self::Invalidity::InvalidCharacters,
            )
            .invalidate_if(
                slug.starts_with('-') || slug.ends_with('-'),
                Self::Invalidity::LeadingOrTrailingHyphen,
            )
            .into()
    }
}

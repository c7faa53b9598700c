// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

macro_rules! record_id_newtype {
    ($type_name:ident) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $type_name($crate::RecordId);

        impl $type_name {
            #[must_use]
            pub const fn new(inner: $crate::RecordId) -> Self {
                Self(inner)
            }

            #[must_use]
            pub const fn to_inner(self) -> $crate::RecordId {
                let Self(inner) = self;
                inner
            }
        }

        impl From<$crate::RecordId> for $type_name {
            fn from(from: $crate::RecordId) -> Self {
                Self::new(from)
            }
        }

        impl From<$type_name> for $crate::RecordId {
            fn from(from: $type_name) -> Self {
                from.to_inner()
            }
        }

        impl std::fmt::Display for $type_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let Self(inner) = self;
                inner.fmt(f)
            }
        }
    };
}

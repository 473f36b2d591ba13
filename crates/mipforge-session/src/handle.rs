//! Opaque numeric handles.
//!
//! Both handle types pack a slot index and a generation counter into a
//! `u64` as `(generation << 32) | index`. Generations start at 1, so the
//! raw value `0` never names a live object and serves as the null handle.

use std::fmt;

/// Index and generation of an arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Key {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Key {
    #[inline]
    pub(crate) fn pack(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.index)
    }

    #[inline]
    pub(crate) fn unpack(raw: u64) -> Option<Self> {
        let key = Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        };
        (key.generation != 0).then_some(key)
    }
}

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            /// The null handle. Never refers to a live object.
            pub const NULL: Self = Self(0);

            /// Rebuilds a handle from a value returned by [`into_raw`](Self::into_raw).
            #[inline]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn into_raw(self) -> u64 {
                self.0
            }

            #[inline]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            #[inline]
            pub(crate) fn from_key(key: Key) -> Self {
                Self(key.pack())
            }

            #[inline]
            pub(crate) fn key(self) -> Option<Key> {
                Key::unpack(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.key() {
                    Some(key) => write!(f, "{}({}v{})", $label, key.index, key.generation),
                    None => write!(f, "{}(null)", $label),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }
    };
}

handle_type!(
    /// Reference to an LP solver held by a [`SolverRegistry`](crate::SolverRegistry).
    ///
    /// A session built from a handle only borrows it as a tag; disposing
    /// the session never releases the solver.
    SolverHandle,
    "SolverHandle"
);

handle_type!(
    /// Identifier of a session held by a [`SessionManager`](crate::SessionManager).
    SessionId,
    "SessionId"
);

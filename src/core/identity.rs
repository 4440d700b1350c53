//! Identity atoms.
//!
//! RequestId: maintenance-request identifier with prefix
//! UpdateId: timeline-entry identifier within the log
//! UserId / PropertyId / UnitId: opaque external keys, non-empty

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{CoreError, InvalidId};

/// Alphabet for request ID suffixes: lowercase alphanumeric.
const REQUEST_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Base58 alphabet (no 0OIl) for update IDs.
const UPDATE_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Request identifier - "mr-{suffix}" format.
///
/// Suffix is lowercase alphanumeric. Only the engine generates new IDs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Parse and validate a request ID string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let Some(rest) = s.strip_prefix("mr-") else {
            return Err(InvalidId::Request {
                raw: s.to_string(),
                reason: "must start with 'mr-'".into(),
            }
            .into());
        };
        if rest.is_empty() {
            return Err(InvalidId::Request {
                raw: s.to_string(),
                reason: "missing suffix".into(),
            }
            .into());
        }
        let suffix = rest.to_lowercase();
        for c in suffix.bytes() {
            if !REQUEST_ALPHABET.contains(&c) {
                return Err(InvalidId::Request {
                    raw: s.to_string(),
                    reason: "contains non-alphanumeric character".into(),
                }
                .into());
            }
        }
        Ok(Self(format!("mr-{suffix}")))
    }

    /// Generate a new request ID with given suffix length.
    ///
    /// Only the engine should call this.
    pub(crate) fn generate(len: usize) -> Self {
        use rand::Rng;
        assert!(len >= 3, "request id suffix must be >=3 chars");

        let mut rng = rand::rng();
        let suffix: String = (0..len)
            .map(|_| {
                let idx = rng.random_range(0..REQUEST_ALPHABET.len());
                REQUEST_ALPHABET[idx] as char
            })
            .collect();

        Self(format!("mr-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({:?})", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Update identifier - unique within the timeline log.
///
/// Engine-generated, no specific format required.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateId(String);

impl UpdateId {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.is_empty() {
            Err(InvalidId::Update {
                raw: s,
                reason: "empty".into(),
            }
            .into())
        } else {
            Ok(Self(s))
        }
    }

    /// Generate a new update ID.
    pub(crate) fn generate() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let suffix: String = (0..8)
            .map(|_| {
                let idx = rng.random_range(0..UPDATE_ALPHABET.len());
                UPDATE_ALPHABET[idx] as char
            })
            .collect();
        Self(suffix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UpdateId({:?})", self.0)
    }
}

impl fmt::Display for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! opaque_key {
    ($name:ident, $variant:ident, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Resolved by external collaborators; validated non-empty only.
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
                let s = s.into();
                if s.is_empty() {
                    Err(InvalidId::$variant {
                        raw: s,
                        reason: "empty".into(),
                    }
                    .into())
                } else {
                    Ok(Self(s))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_key!(UserId, User, "User identifier - non-empty string.");
opaque_key!(PropertyId, Property, "Property identifier - non-empty string.");
opaque_key!(UnitId, Unit, "Unit identifier - non-empty string.");

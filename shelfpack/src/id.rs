use std::{fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-assigned identifier for a rectangle.
///
/// Shelfpack never interprets these; they exist so results can be mapped back
/// onto the application's own objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Id(Arc<str>);

impl Id {
    pub fn new<S: Into<Arc<str>>>(id: S) -> Self {
        Id(id.into())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id(value.into())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id(value.into())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

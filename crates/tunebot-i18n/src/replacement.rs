//! Positional message arguments

use chrono::{DateTime, Utc};
use std::fmt;

/// A value substituted into a `{n}` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// Absent value, printed as `null`
    Null,
    /// Boolean, printed as `true` / `false`
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text inserted verbatim
    Str(String),
    /// Point in time, formatted as date and/or time
    DateTime(DateTime<Utc>),
}

impl Replacement {
    /// Numeric value, if this replacement is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Short type name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::DateTime(_) => "date-time",
        }
    }
}

impl fmt::Display for Replacement {
    /// Locale-independent rendering
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::DateTime(value) => write!(f, "{}", value.to_rfc3339()),
        }
    }
}

impl From<&str> for Replacement {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Replacement {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Replacement {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for Replacement {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Replacement {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Replacement {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<usize> for Replacement {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<f32> for Replacement {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Replacement {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<DateTime<Utc>> for Replacement {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Replacement>> From<Option<T>> for Replacement {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Build a `Vec<Replacement>` from heterogeneous values
///
/// ```rust
/// use tunebot_i18n::{replacements, Replacement};
///
/// let args = replacements!["Ada", 3, true];
/// assert_eq!(args[0], Replacement::Str("Ada".to_string()));
/// assert_eq!(args[1], Replacement::Int(3));
/// ```
#[macro_export]
macro_rules! replacements {
    () => {
        ::std::vec::Vec::<$crate::Replacement>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Replacement::from($value)),+]
    };
}

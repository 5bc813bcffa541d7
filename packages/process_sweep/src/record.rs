use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::time::Duration;

/// The measurements reported by one task, as returned by
/// [`Lifecycle::data()`][crate::Lifecycle::data].
///
/// Keys are chosen by the lifecycle implementation. Using a sorted map keeps the column
/// order stable when records are printed as tables.
pub type Record = BTreeMap<String, Field>;

/// One value in a [`Record`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use process_sweep::{Field, Record};
///
/// let record = Record::from([
///     ("exit".to_string(), Field::from(0)),
///     ("usertime".to_string(), Field::from(Duration::from_millis(1250))),
///     ("args".to_string(), Field::from("-9 -e")),
/// ]);
///
/// assert_eq!(record["exit"].as_i64(), Some(0));
/// assert_eq!(record["usertime"].to_string(), "1.250");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub enum Field {
    /// No value, for example a measurement that could not be taken because the process
    /// failed to start.
    #[default]
    Null,

    /// A flag.
    Bool(bool),

    /// A signed integer, such as an exit code.
    Int(i64),

    /// An unsigned integer, such as a size in bytes.
    UInt(u64),

    /// A floating point number, such as a ratio.
    Float(f64),

    /// Text, such as captured output or an error message.
    Text(String),

    /// A span of time, such as processor time.
    Duration(Duration),
}

impl Field {
    /// Whether this is [`Field::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value as a flag, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The value as a signed integer, if it is an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// The value as an unsigned integer, if it is an integer that fits.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(value) => Some(*value),
            Self::Int(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// The value as a floating point number. Durations convert to seconds.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "measurements beyond 2^53 are not expected and would be approximate anyway"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            Self::UInt(value) => Some(*value as f64),
            Self::Duration(value) => Some(value.as_secs_f64()),
            _ => None,
        }
    }

    /// The value as text, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The value as a duration, if it is one.
    #[must_use]
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Duration(value) => write!(f, "{:.3}", value.as_secs_f64()),
        }
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Field {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Field {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<usize> for Field {
    fn from(value: usize) -> Self {
        Self::UInt(u64::try_from(value).unwrap_or(u64::MAX))
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Duration> for Field {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl<T> From<Option<T>> for Field
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn integers_convert_between_signedness() {
        assert_eq!(Field::from(5_u64).as_i64(), Some(5));
        assert_eq!(Field::from(-1).as_u64(), None);
        assert_eq!(Field::from(u64::MAX).as_i64(), None);
    }

    #[test]
    fn durations_read_as_seconds() {
        let field = Field::from(Duration::from_millis(1500));

        assert_eq!(field.as_duration(), Some(Duration::from_millis(1500)));
        assert_eq!(field.as_f64(), Some(1.5));
        assert_eq!(field.to_string(), "1.500");
    }

    #[test]
    fn missing_values_are_null() {
        let field = Field::from(None::<String>);

        assert!(field.is_null());
        assert_eq!(field, Field::default());
        assert_eq!(field.to_string(), "");
    }

    #[test]
    fn present_options_unwrap() {
        assert_eq!(Field::from(Some("oops")).as_str(), Some("oops"));
    }

    #[test]
    fn kinds_do_not_mix() {
        let field = Field::from("text");

        assert_eq!(field.as_bool(), None);
        assert_eq!(field.as_f64(), None);
        assert_eq!(field.as_duration(), None);
        assert_eq!(Field::from(true).as_str(), None);
    }
}

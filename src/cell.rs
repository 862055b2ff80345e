use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// A single loosely-typed spreadsheet cell.
///
/// `Null` and `Text("")` are both treated as missing by the analysis
/// functions, but they stay distinct values (duplicate-row detection sees
/// them as different).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent value.
    #[default]
    Null,
    /// Numeric value. May be NaN or infinite if the source produced one.
    Number(f64),
    /// Textual value, possibly empty.
    Text(String),
    /// Calendar timestamp.
    Date(NaiveDateTime),
}

impl CellValue {
    /// Returns true for `Null` and the empty string.
    #[inline]
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Coerce to a number. See [`crate::to_number`].
    #[inline]
    pub fn to_number(&self) -> f64 {
        crate::engine::numeric::to_number(self)
    }

    /// Hashable identity used for distinct-value counting.
    ///
    /// Returns `None` for missing cells. Numbers compare by value with
    /// `-0.0 == 0.0` and all NaNs equal to each other.
    pub(crate) fn key(&self) -> Option<CellKey<'_>> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(CellKey::Text(s)),
            CellValue::Number(n) => Some(CellKey::Number(number_bits(*n))),
            CellValue::Date(d) => Some(CellKey::Date(*d)),
        }
    }
}

/// Distinct-value identity of a non-missing cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Number(u64),
    Text(&'a str),
    Date(NaiveDateTime),
}

fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

/// Format a number the way spreadsheet tools display it: integral values
/// without a fractional part, `-0` as `0`, and exponent notation (`1e+21`,
/// `1.5e-7`) below `1e-6` or from `1e21` up.
pub(crate) fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        f.write_str("0")
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let s = format!("{n:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
            _ => f.write_str(&s),
        }
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            CellValue::Number(n) => format_number(*n, f),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => {
                if d.time() == NaiveTime::MIN {
                    write!(f, "{}", d.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S"))
                }
            }
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Date(_) => serializer.collect_str(self),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d.and_time(NaiveTime::MIN))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

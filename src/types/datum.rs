//! Literal values
//!
//! A [`Datum`] is the payload of a literal under a [`SqlTypeInfo`]. Numeric
//! kinds use fixed-width payloads (NUMERIC/DECIMAL store a scaled `i64`
//! mantissa), temporal kinds store 64-bit epoch seconds, and string kinds
//! own their string.

use crate::error::{Error, Result};
use crate::types::sql_type::{SqlTypeInfo, TypeKind};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Null sentinels. These are the historical payloads stored inside a null
/// literal; `Constant::is_null` remains the source of truth and legitimate
/// values are strictly greater than the sentinel.
pub const NULL_SMALLINT: i16 = i16::MIN;
pub const NULL_INT: i32 = i32::MIN;
pub const NULL_BIGINT: i64 = i64::MIN;
pub const NULL_FLOAT: f32 = f32::MIN;
pub const NULL_DOUBLE: f64 = f64::MIN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    Bool(bool),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    /// Epoch seconds for TIME, TIMESTAMP and DATE.
    Time(i64),
    Str(String),
}

/// The kind-specific null payload. Booleans use `false` as the stand-in and
/// string kinds use the empty string.
pub fn null_datum(kind: TypeKind) -> Datum {
    match kind {
        TypeKind::Boolean => Datum::Bool(false),
        TypeKind::SmallInt => Datum::SmallInt(NULL_SMALLINT),
        TypeKind::Int => Datum::Int(NULL_INT),
        TypeKind::BigInt | TypeKind::Numeric | TypeKind::Decimal => Datum::BigInt(NULL_BIGINT),
        TypeKind::Float => Datum::Float(NULL_FLOAT),
        TypeKind::Double => Datum::Double(NULL_DOUBLE),
        TypeKind::Time | TypeKind::Timestamp | TypeKind::Date => Datum::Time(NULL_BIGINT),
        TypeKind::Char | TypeKind::Varchar | TypeKind::Text => Datum::Str(String::new()),
        TypeKind::Null => Datum::BigInt(0),
    }
}

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn literal_error(s: &str, ti: &SqlTypeInfo) -> Error {
    Error::InvalidLiteral {
        literal: s.to_string(),
        target: ti.type_name().to_string(),
    }
}

/// Parses a literal into the payload for `ti`. Engine-wide helper; the IR
/// uses it when a string constant is cast to another type.
pub fn string_to_datum(s: &str, ti: &SqlTypeInfo) -> Result<Datum> {
    let d = match ti.kind {
        TypeKind::Boolean => {
            if s.eq_ignore_ascii_case("t") || s.eq_ignore_ascii_case("true") || s == "1" {
                Datum::Bool(true)
            } else if s.eq_ignore_ascii_case("f") || s.eq_ignore_ascii_case("false") || s == "0" {
                Datum::Bool(false)
            } else {
                return Err(literal_error(s, ti));
            }
        }
        TypeKind::SmallInt => Datum::SmallInt(s.parse().map_err(|_| literal_error(s, ti))?),
        TypeKind::Int => Datum::Int(s.parse().map_err(|_| literal_error(s, ti))?),
        TypeKind::BigInt => Datum::BigInt(s.parse().map_err(|_| literal_error(s, ti))?),
        TypeKind::Numeric | TypeKind::Decimal => {
            let mut dec = Decimal::from_str(s).map_err(|_| literal_error(s, ti))?;
            dec.rescale(ti.scale as u32);
            Datum::BigInt(dec.mantissa() as i64)
        }
        TypeKind::Float => Datum::Float(s.parse().map_err(|_| literal_error(s, ti))?),
        TypeKind::Double => Datum::Double(s.parse().map_err(|_| literal_error(s, ti))?),
        TypeKind::Time => {
            let t = NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| literal_error(s, ti))?;
            Datum::Time(t.num_seconds_from_midnight() as i64)
        }
        TypeKind::Timestamp => {
            let t = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                .map_err(|_| literal_error(s, ti))?;
            Datum::Time(t.and_utc().timestamp())
        }
        TypeKind::Date => {
            let d = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| literal_error(s, ti))?;
            Datum::Time(d.and_time(NaiveTime::MIN).and_utc().timestamp())
        }
        TypeKind::Char | TypeKind::Varchar | TypeKind::Text => Datum::Str(s.to_string()),
        TypeKind::Null => return Err(literal_error(s, ti)),
    };
    Ok(d)
}

/// Renders a payload under its type. Engine-wide helper; also backs the
/// printed form of constants.
pub fn datum_to_string(d: &Datum, ti: &SqlTypeInfo) -> String {
    match (d, ti.kind) {
        (Datum::Bool(b), _) => (if *b { "t" } else { "f" }).to_string(),
        (Datum::BigInt(v), TypeKind::Numeric | TypeKind::Decimal) => {
            Decimal::new(*v, ti.scale as u32).to_string()
        }
        (Datum::SmallInt(v), _) => v.to_string(),
        (Datum::Int(v), _) => v.to_string(),
        (Datum::BigInt(v), _) => v.to_string(),
        (Datum::Float(v), _) => v.to_string(),
        (Datum::Double(v), _) => v.to_string(),
        (Datum::Time(v), TypeKind::Time) => {
            NaiveTime::from_num_seconds_from_midnight_opt(*v as u32, 0)
                .map(|t| t.format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| v.to_string())
        }
        (Datum::Time(v), TypeKind::Date) => chrono::DateTime::from_timestamp(*v, 0)
            .map(|t| t.naive_utc().format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| v.to_string()),
        (Datum::Time(v), _) => chrono::DateTime::from_timestamp(*v, 0)
            .map(|t| t.naive_utc().format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| v.to_string()),
        (Datum::Str(s), _) => s.clone(),
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Bool(b) => write!(f, "{}", b),
            Datum::SmallInt(v) => write!(f, "{}", v),
            Datum::Int(v) => write!(f, "{}", v),
            Datum::BigInt(v) => write!(f, "{}", v),
            Datum::Float(v) => write!(f, "{}", v),
            Datum::Double(v) => write!(f, "{}", v),
            Datum::Time(v) => write!(f, "{}", v),
            Datum::Str(s) => write!(f, "'{}'", s),
        }
    }
}

//! SQL type descriptors
//!
//! A [`SqlTypeInfo`] fully describes a value type on two axes: the numeric
//! axis (kind plus precision and scale) and the string axis (kind plus
//! encoding and dictionary id). Promotion and castability are decided from
//! these descriptors alone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dictionary id of the transient (negotiation) dictionary. Ids at or below
/// this value never name a materialized dictionary; they are placeholders a
/// literal adopts so it can share a column's dictionary at query time.
pub const TRANSIENT_DICT_ID: i32 = -1;

/// Maps a dictionary id to its transient counterpart. The mapping is its own
/// inverse: `transient_dict(transient_dict(id)) == id`.
pub const fn transient_dict(dict_id: i32) -> i32 {
    -dict_id - 2
}

/// SQL value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Boolean,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    Text,
    Time,
    Timestamp,
    Date,
    Null,
}

impl TypeKind {
    /// The SQL name used in user-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Boolean => "BOOLEAN",
            TypeKind::SmallInt => "SMALLINT",
            TypeKind::Int => "INT",
            TypeKind::BigInt => "BIGINT",
            TypeKind::Float => "FLOAT",
            TypeKind::Double => "DOUBLE",
            TypeKind::Numeric => "NUMERIC",
            TypeKind::Decimal => "DECIMAL",
            TypeKind::Char => "CHAR",
            TypeKind::Varchar => "VARCHAR",
            TypeKind::Text => "TEXT",
            TypeKind::Time => "TIME",
            TypeKind::Timestamp => "TIMESTAMP",
            TypeKind::Date => "DATE",
            TypeKind::Null => "NULL",
        }
    }
}

/// String storage encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    None,
    Dict,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::None => "NONE",
            Encoding::Dict => "DICT",
        }
    }
}

/// A fully resolved SQL value type.
///
/// `dimension` holds total digits for numeric kinds and the maximum
/// character length for string kinds. `comp_param` is the dictionary id
/// when `compression` is [`Encoding::Dict`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlTypeInfo {
    pub kind: TypeKind,
    pub dimension: i32,
    pub scale: i32,
    pub notnull: bool,
    pub compression: Encoding,
    pub comp_param: i32,
}

impl SqlTypeInfo {
    pub fn new(kind: TypeKind, dimension: i32, scale: i32, notnull: bool) -> Self {
        Self {
            kind,
            dimension,
            scale,
            notnull,
            compression: Encoding::None,
            comp_param: 0,
        }
    }

    /// A type with no precision or scale.
    pub fn simple(kind: TypeKind, notnull: bool) -> Self {
        Self::new(kind, 0, 0, notnull)
    }

    pub fn with_encoding(
        kind: TypeKind,
        dimension: i32,
        scale: i32,
        notnull: bool,
        compression: Encoding,
        comp_param: i32,
    ) -> Self {
        Self {
            kind,
            dimension,
            scale,
            notnull,
            compression,
            comp_param,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::SmallInt
                | TypeKind::Int
                | TypeKind::BigInt
                | TypeKind::Float
                | TypeKind::Double
                | TypeKind::Numeric
                | TypeKind::Decimal
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::SmallInt | TypeKind::Int | TypeKind::BigInt
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Char | TypeKind::Varchar | TypeKind::Text
        )
    }

    pub fn is_time(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Time | TypeKind::Timestamp | TypeKind::Date
        )
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self.kind, TypeKind::Numeric | TypeKind::Decimal)
    }

    /// Byte width of the physical representation, or `None` for
    /// variable-length values. Dictionary-encoded strings are stored as
    /// fixed 32-bit ids.
    pub fn fixed_size(&self) -> Option<usize> {
        match self.kind {
            TypeKind::Boolean => Some(1),
            TypeKind::SmallInt => Some(2),
            TypeKind::Int | TypeKind::Float => Some(4),
            TypeKind::BigInt
            | TypeKind::Numeric
            | TypeKind::Decimal
            | TypeKind::Double
            | TypeKind::Time
            | TypeKind::Timestamp
            | TypeKind::Date => Some(8),
            TypeKind::Char | TypeKind::Varchar | TypeKind::Text => match self.compression {
                Encoding::Dict => Some(4),
                Encoding::None => None,
            },
            TypeKind::Null => Some(0),
        }
    }

    /// The SQL name used in error messages.
    pub fn type_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Whether a value of this type may legally be cast to `to`. Precision,
    /// scale and encoding changes within the same kind are always legal;
    /// otherwise the family transitions below decide.
    pub fn is_castable(&self, to: &SqlTypeInfo) -> bool {
        if self.kind == to.kind {
            return true;
        }
        // a string literal can be parsed into anything, and anything can be
        // rendered as a string
        if self.is_string() || to.is_string() {
            return true;
        }
        if self.is_number() && to.is_number() {
            return true;
        }
        if (self.is_number() && to.kind == TypeKind::Boolean)
            || (self.kind == TypeKind::Boolean && to.is_number())
        {
            return true;
        }
        if (self.is_number() && to.kind == TypeKind::Timestamp)
            || (self.kind == TypeKind::Timestamp && to.is_number())
        {
            return true;
        }
        matches!(
            (self.kind, to.kind),
            (TypeKind::Timestamp, TypeKind::Date) | (TypeKind::Date, TypeKind::Timestamp)
        )
    }
}

impl fmt::Display for SqlTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.kind.name(), self.dimension, self.scale)?;
        if self.compression == Encoding::Dict {
            write!(f, " DICT({})", self.comp_param)?;
        }
        Ok(())
    }
}

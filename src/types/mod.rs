//! The SQL value model: type descriptors and literal payloads.

pub mod datum;
pub mod sql_type;

pub use datum::{
    datum_to_string, null_datum, string_to_datum, Datum, NULL_BIGINT, NULL_DOUBLE, NULL_FLOAT,
    NULL_INT, NULL_SMALLINT,
};
pub use sql_type::{transient_dict, Encoding, SqlTypeInfo, TypeKind, TRANSIENT_DICT_ID};

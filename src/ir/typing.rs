//! Operator type analysis
//!
//! Given a binary operator and its operand types, [`BinOper::analyze_type`]
//! decides the result type and the types both operands must be cast to
//! before the operator applies. Promotion is deterministic and symmetric in
//! the operands.

use crate::error::{Error, Result};
use crate::ir::expr::{BinOper, BinaryOp};
use crate::types::sql_type::{transient_dict, Encoding, SqlTypeInfo, TypeKind};

impl BinOper {
    /// Returns `(result_type, new_left_type, new_right_type)`; the operand
    /// types are what the operands must be cast to.
    pub fn analyze_type(
        op: BinaryOp,
        left_type: &SqlTypeInfo,
        right_type: &SqlTypeInfo,
    ) -> Result<(SqlTypeInfo, SqlTypeInfo, SqlTypeInfo)> {
        let mut new_left = left_type.clone();
        let mut new_right = right_type.clone();
        let mut result;
        if op.is_logic() {
            if left_type.kind != TypeKind::Boolean || right_type.kind != TypeKind::Boolean {
                return Err(Error::NonBooleanInLogic);
            }
            result = SqlTypeInfo::simple(TypeKind::Boolean, false);
        } else if op.is_comparison() {
            if left_type != right_type {
                if left_type.is_number() && right_type.is_number() {
                    let common = Self::common_numeric_type(left_type, right_type);
                    new_left = common.clone();
                    new_left.notnull = left_type.notnull;
                    new_right = common;
                    new_right.notnull = right_type.notnull;
                } else if left_type.is_time() && right_type.is_time() {
                    (new_left, new_right) = compare_temporals(left_type, right_type)?;
                } else if left_type.is_string() && right_type.is_time() {
                    new_left = right_type.clone();
                    new_left.notnull = left_type.notnull;
                    new_right = right_type.clone();
                } else if left_type.is_time() && right_type.is_string() {
                    new_left = left_type.clone();
                    new_right = left_type.clone();
                    new_right.notnull = right_type.notnull;
                } else if left_type.is_string() && right_type.is_string() {
                    // both sides keep their encoding; the executor negotiates
                } else {
                    return Err(Error::Incomparable {
                        left: left_type.type_name().to_string(),
                        right: right_type.type_name().to_string(),
                    });
                }
            }
            result = SqlTypeInfo::simple(TypeKind::Boolean, false);
        } else if op.is_arithmetic() {
            if !left_type.is_number() || !right_type.is_number() {
                return Err(Error::NonNumericArithmetic);
            }
            if op == BinaryOp::Modulo && (!left_type.is_integer() || !right_type.is_integer()) {
                return Err(Error::NonIntegerModulo);
            }
            let common = Self::common_numeric_type(left_type, right_type);
            new_left = common.clone();
            new_left.notnull = left_type.notnull;
            new_right = common.clone();
            new_right.notnull = right_type.notnull;
            result = common;
        } else {
            unreachable!("invalid binary operator type");
        }
        result.notnull = left_type.notnull && right_type.notnull;
        Ok((result, new_left, new_right))
    }

    /// The common type two numeric operands promote to.
    pub fn common_numeric_type(type1: &SqlTypeInfo, type2: &SqlTypeInfo) -> SqlTypeInfo {
        debug_assert!(type1.is_number() && type2.is_number());
        use TypeKind::*;
        if type1.kind == type2.kind {
            return SqlTypeInfo::new(
                type1.kind,
                type1.dimension.max(type2.dimension),
                type1.scale.max(type2.scale),
                false,
            );
        }
        if type1.is_decimal() && type2.is_decimal() {
            return common_decimal_type(type1, type2);
        }
        match (type1.kind, type2.kind) {
            (Double, _) | (_, Double) => SqlTypeInfo::simple(Double, false),
            (Float, _) | (_, Float) => SqlTypeInfo::simple(Float, false),
            (SmallInt, Int) | (Int, SmallInt) => SqlTypeInfo::simple(Int, false),
            (SmallInt | Int, BigInt) | (BigInt, SmallInt | Int) => {
                SqlTypeInfo::simple(BigInt, false)
            }
            (SmallInt, Numeric | Decimal) => decimal_for_integer(type2, 5),
            (Numeric | Decimal, SmallInt) => decimal_for_integer(type1, 5),
            (Int, Numeric | Decimal) => decimal_for_integer(type2, 10),
            (Numeric | Decimal, Int) => decimal_for_integer(type1, 10),
            (BigInt, Numeric | Decimal) => decimal_for_integer(type2, 19),
            (Numeric | Decimal, BigInt) => decimal_for_integer(type1, 19),
            _ => unreachable!("numeric promotion on non-numeric kinds"),
        }
    }

    /// The common type of two string operands, negotiating dictionary
    /// encodings: a shared (or transient-related) dictionary is kept, any
    /// other mix decompresses.
    pub fn common_string_type(type1: &SqlTypeInfo, type2: &SqlTypeInfo) -> SqlTypeInfo {
        debug_assert!(type1.is_string() && type2.is_string());
        let mut comp = Encoding::None;
        let mut comp_param = 0;
        match (type1.compression, type2.compression) {
            (Encoding::Dict, Encoding::Dict) => {
                if type1.comp_param == type2.comp_param
                    || type1.comp_param == transient_dict(type2.comp_param)
                {
                    comp = Encoding::Dict;
                    comp_param = type1.comp_param.min(type2.comp_param);
                } else {
                    comp_param = type1.comp_param.max(type2.comp_param);
                }
            }
            (Encoding::Dict, Encoding::None) => comp_param = type1.comp_param,
            (Encoding::None, Encoding::Dict) => comp_param = type2.comp_param,
            (Encoding::None, Encoding::None) => {
                comp_param = type1.comp_param.max(type2.comp_param)
            }
        }
        if type1.kind == TypeKind::Text || type2.kind == TypeKind::Text {
            return SqlTypeInfo::with_encoding(TypeKind::Text, 0, 0, false, comp, comp_param);
        }
        SqlTypeInfo::with_encoding(
            TypeKind::Varchar,
            type1.dimension.max(type2.dimension),
            0,
            false,
            comp,
            comp_param,
        )
    }
}

/// Operand types for a temporal comparison. TIMESTAMP and DATE compare as
/// TIMESTAMP; TIME only compares with TIME.
fn compare_temporals(
    left_type: &SqlTypeInfo,
    right_type: &SqlTypeInfo,
) -> Result<(SqlTypeInfo, SqlTypeInfo)> {
    use TypeKind::*;
    let incomparable = || Error::IncomparableTemporals {
        left: left_type.type_name().to_string(),
        right: right_type.type_name().to_string(),
    };
    let max_dim = left_type.dimension.max(right_type.dimension);
    match (left_type.kind, right_type.kind) {
        (Timestamp, Timestamp) => Ok((
            SqlTypeInfo::new(Timestamp, max_dim, 0, left_type.notnull),
            SqlTypeInfo::new(Timestamp, max_dim, 0, right_type.notnull),
        )),
        (Timestamp, Date) => Ok((left_type.clone(), left_type.clone())),
        (Date, Timestamp) => Ok((right_type.clone(), right_type.clone())),
        (Date, Date) => Ok((left_type.clone(), left_type.clone())),
        (Time, Time) => Ok((
            SqlTypeInfo::new(Time, max_dim, 0, left_type.notnull),
            SqlTypeInfo::new(Time, max_dim, 0, right_type.notnull),
        )),
        (Timestamp | Date, Time) | (Time, Timestamp | Date) => Err(incomparable()),
        _ => unreachable!("temporal comparison on non-temporal kinds"),
    }
}

/// Promotes an integer of `int_digits` decimal digits against a decimal
/// operand: the result keeps the decimal's scale and widens the integer part
/// far enough to hold either side.
fn decimal_for_integer(dec: &SqlTypeInfo, int_digits: i32) -> SqlTypeInfo {
    let dimension = match int_digits {
        5 => (5 + dec.scale).max(dec.dimension),
        10 => (10 + dec.scale).min(19).max(dec.dimension),
        _ => 19,
    };
    SqlTypeInfo::new(dec.kind, dimension, dec.scale, false)
}

/// Cross-kind NUMERIC/DECIMAL promotion: common scale is the max, and the
/// integer part widens to the larger of the two. Same-kind decimal pairs
/// take the generic max-dimension/max-scale path instead.
fn common_decimal_type(type1: &SqlTypeInfo, type2: &SqlTypeInfo) -> SqlTypeInfo {
    let common_scale = type1.scale.max(type2.scale);
    let int_digits = (type1.dimension - type1.scale).max(type2.dimension - type2.scale);
    SqlTypeInfo::new(TypeKind::Numeric, int_digits + common_scale, common_scale, false)
}

//! Error types for the expression IR

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Analysis failures surfaced at the point of violation. The caller renders
/// the user message; internal contract violations are panics, not variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("non-boolean operands cannot be used in logic operations")]
    NonBooleanInLogic,

    #[error("cannot compare between {left} and {right}")]
    IncomparableTemporals { left: String, right: String },

    #[error("cannot compare between {left} and {right}")]
    Incomparable { left: String, right: String },

    #[error("non-numeric operands in arithmetic operations")]
    NonNumericArithmetic,

    #[error("non-integer operands in modulo operation")]
    NonIntegerModulo,

    #[error("cannot CAST from {from} to {to}")]
    UncastableTypes { from: String, to: String },

    #[error("invalid cast from {from} to {to}")]
    InvalidCast { from: String, to: String },

    #[error("invalid literal '{literal}' for type {target}")]
    InvalidLiteral { literal: String, target: String },

    #[error("cannot group by string columns which are not dictionary encoded")]
    GroupByRequiresDictEncoding,

    #[error("cannot apply transient dictionary encoding to non-literal expression")]
    TransientEncodingOnNonLiteral,

    #[error("cannot find {0} in targetlist")]
    NotInTargetList(String),

    #[error("targetlist is not all columns")]
    TargetListNotAllColumns,

    #[error("targetlist is not all columns and aggregates")]
    TargetListNotAllColumnsOrAggs,

    #[error(
        "expressions in the SELECT or HAVING clause must be an aggregate function \
         or an expression over GROUP BY columns"
    )]
    GroupByViolation,

    #[error("invalid variable in GROUP BY or HAVING")]
    InvalidVarInGroupBy,

    #[error("operation is not supported on subqueries")]
    UnsupportedSubqueryOp,
}

//! Typed expression IR for an analytic SQL engine.
//!
//! This crate holds the tree the semantic analyzer produces after resolving
//! a parsed query against the catalog: every node carries a fully-resolved
//! SQL type, operator promotion follows SQL rules deterministically, and the
//! tree supports the operations the planner needs (deep copy, structural
//! equality, cast injection, predicate classification, target-list
//! rewriting). Parsing, planning and execution live elsewhere; the crate
//! consumes a [`catalog::Catalog`] and produces a [`Query`] tree.

pub mod catalog;
pub mod error;
pub mod ir;
pub mod types;

pub use error::{Error, Result};
pub use ir::expr::{Expr, ExprRef};
pub use ir::query::Query;
pub use types::{Datum, SqlTypeInfo, TypeKind};

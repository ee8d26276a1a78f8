//! The typed expression tree handed from semantic analysis to the planner.

pub mod cast;
pub mod expr;
pub mod predicate;
pub mod query;
pub mod rewrite;
pub mod typing;

#[cfg(test)]
mod test_casts;
#[cfg(test)]
mod test_promotion;

pub use cast::DomainSet;
pub use expr::{
    expr_ref, AggExpr, AggType, BinOper, BinaryOp, CaseExpr, CharLengthExpr, ColumnVar, Constant,
    DatetruncExpr, DatetruncField, Expr, ExprRef, ExtractExpr, ExtractField, InValues, LikeExpr,
    Qualifier, Subquery, UOper, UnaryOp, Var, WhichRow,
};
pub use query::{OrderEntry, Query, QueryType, RangeTblEntry, TargetEntry};

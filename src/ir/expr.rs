//! Expression nodes
//!
//! The expression tree is a closed sum over thirteen node variants. Every
//! node carries a resolved [`SqlTypeInfo`]; internal nodes derive their
//! `contains_agg` flag from their children at construction time. Nodes are
//! shared through [`ExprRef`] handles and treated as immutable once built:
//! every operation that would change a node returns a fresh one instead.

use crate::error::{Error, Result};
use crate::ir::query::Query;
use crate::types::datum::{datum_to_string, null_datum, Datum};
use crate::types::sql_type::{SqlTypeInfo, TypeKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Shared handle to an expression node. Rewriting produces trees that may
/// share children; the handle keeps them alive without copies.
pub type ExprRef = Arc<Expr>;

/// Wraps a node in a shared expression handle.
pub fn expr_ref(node: impl Into<Expr>) -> ExprRef {
    Arc::new(node.into())
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    UMinus,
    IsNull,
    Exists,
    Cast,
    Unnest,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    ArrayAt,
}

impl BinaryOp {
    pub fn is_logic(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Plus
                | BinaryOp::Minus
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
        )
    }

    /// The operator that expresses the same comparison with the operands
    /// swapped.
    pub fn commute(self) -> Self {
        match self {
            BinaryOp::Eq => BinaryOp::Eq,
            BinaryOp::Ne => BinaryOp::Ne,
            BinaryOp::Lt => BinaryOp::Gt,
            BinaryOp::Le => BinaryOp::Ge,
            BinaryOp::Gt => BinaryOp::Lt,
            BinaryOp::Ge => BinaryOp::Le,
            _ => unreachable!("commuting a non-comparison operator"),
        }
    }

    fn token(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::ArrayAt => "[]",
        }
    }
}

/// Comparison qualifier for quantified comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    One,
    Any,
    All,
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggType {
    Avg,
    Min,
    Max,
    Sum,
    Count,
}

impl fmt::Display for AggType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AggType::Avg => "AVG",
            AggType::Min => "MIN",
            AggType::Max => "MAX",
            AggType::Sum => "SUM",
            AggType::Count => "COUNT",
        };
        write!(f, "{}", s)
    }
}

/// Which row a free variable refers to during plan execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WhichRow {
    InputInner,
    InputOuter,
    Output,
    GroupBy,
}

/// Date parts for EXTRACT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractField {
    Year,
    Quarter,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    DayOfWeek,
    DayOfYear,
    Epoch,
}

impl fmt::Display for ExtractField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractField::Year => "YEAR",
            ExtractField::Quarter => "QUARTER",
            ExtractField::Month => "MONTH",
            ExtractField::Day => "DAY",
            ExtractField::Hour => "HOUR",
            ExtractField::Minute => "MINUTE",
            ExtractField::Second => "SECOND",
            ExtractField::DayOfWeek => "DOW",
            ExtractField::DayOfYear => "DOY",
            ExtractField::Epoch => "EPOCH",
        };
        write!(f, "{}", s)
    }
}

/// Truncation units for DATE_TRUNC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatetruncField {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl fmt::Display for DatetruncField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DatetruncField::Year => "YEAR",
            DatetruncField::Quarter => "QUARTER",
            DatetruncField::Month => "MONTH",
            DatetruncField::Week => "WEEK",
            DatetruncField::Day => "DAY",
            DatetruncField::Hour => "HOUR",
            DatetruncField::Minute => "MINUTE",
            DatetruncField::Second => "SECOND",
        };
        write!(f, "{}", s)
    }
}

/// A reference to a table column, bound to a range-table slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnVar {
    pub type_info: SqlTypeInfo,
    pub table_id: i32,
    pub column_id: i32,
    /// Index into the owning query's range table, or -1 for a free [`Var`].
    pub rte_idx: i32,
}

impl ColumnVar {
    pub fn new(type_info: SqlTypeInfo, table_id: i32, column_id: i32, rte_idx: i32) -> Self {
        Self {
            type_info,
            table_id,
            column_id,
            rte_idx,
        }
    }
}

/// A column variable whose position is given relative to a plan row rather
/// than the range table.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub col: ColumnVar,
    pub which_row: WhichRow,
    /// 1-based slot in the referenced row.
    pub varno: usize,
}

impl Var {
    pub fn new(
        type_info: SqlTypeInfo,
        table_id: i32,
        column_id: i32,
        rte_idx: i32,
        which_row: WhichRow,
        varno: usize,
    ) -> Self {
        Self {
            col: ColumnVar::new(type_info, table_id, column_id, rte_idx),
            which_row,
            varno,
        }
    }

    /// A free variable with no backing table column.
    pub fn free(type_info: SqlTypeInfo, which_row: WhichRow, varno: usize) -> Self {
        Self::new(type_info, 0, 0, -1, which_row, varno)
    }
}

/// A literal. Null literals keep the kind-specific sentinel payload; the
/// `is_null` flag is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub type_info: SqlTypeInfo,
    pub is_null: bool,
    pub constval: Datum,
}

impl Constant {
    pub fn new(type_info: SqlTypeInfo, constval: Datum) -> Self {
        Self {
            type_info,
            is_null: false,
            constval,
        }
    }

    pub fn null(type_info: SqlTypeInfo) -> Self {
        let constval = null_datum(type_info.kind);
        Self {
            type_info,
            is_null: true,
            constval,
        }
    }

    pub(crate) fn set_null_value(&mut self) {
        self.constval = null_datum(self.type_info.kind);
    }
}

/// A unary operation, including CAST wrappers.
#[derive(Debug, Clone)]
pub struct UOper {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub optype: UnaryOp,
    pub operand: ExprRef,
}

impl UOper {
    pub fn new(type_info: SqlTypeInfo, optype: UnaryOp, operand: ExprRef) -> Self {
        let contains_agg = operand.contains_agg();
        Self {
            type_info,
            contains_agg,
            optype,
            operand,
        }
    }
}

/// A binary operation.
#[derive(Debug, Clone)]
pub struct BinOper {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub optype: BinaryOp,
    pub qualifier: Qualifier,
    pub left: ExprRef,
    pub right: ExprRef,
}

impl BinOper {
    pub fn new(
        type_info: SqlTypeInfo,
        optype: BinaryOp,
        qualifier: Qualifier,
        left: ExprRef,
        right: ExprRef,
    ) -> Self {
        let contains_agg = left.contains_agg() || right.contains_agg();
        Self {
            type_info,
            contains_agg,
            optype,
            qualifier,
            left,
            right,
        }
    }
}

/// Placeholder for a scalar subquery. Operations on it are unsupported.
#[derive(Debug, Clone)]
pub struct Subquery {
    pub type_info: SqlTypeInfo,
    pub parsetree: Box<Query>,
}

impl Subquery {
    pub fn new(type_info: SqlTypeInfo, parsetree: Box<Query>) -> Self {
        Self {
            type_info,
            parsetree,
        }
    }
}

/// `arg IN (v1, v2, ...)`.
#[derive(Debug, Clone)]
pub struct InValues {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub arg: ExprRef,
    pub value_list: Vec<ExprRef>,
}

impl InValues {
    pub fn new(arg: ExprRef, value_list: Vec<ExprRef>) -> Self {
        let type_info = SqlTypeInfo::simple(TypeKind::Boolean, arg.type_info().notnull);
        let contains_agg =
            arg.contains_agg() || value_list.iter().any(|v| v.contains_agg());
        Self {
            type_info,
            contains_agg,
            arg,
            value_list,
        }
    }
}

/// `CHAR_LENGTH(arg)` / `LENGTH(arg)`.
#[derive(Debug, Clone)]
pub struct CharLengthExpr {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub arg: ExprRef,
    pub calc_encoded_length: bool,
}

impl CharLengthExpr {
    pub fn new(arg: ExprRef, calc_encoded_length: bool) -> Self {
        let type_info = SqlTypeInfo::simple(TypeKind::Int, arg.type_info().notnull);
        let contains_agg = arg.contains_agg();
        Self {
            type_info,
            contains_agg,
            arg,
            calc_encoded_length,
        }
    }
}

/// `arg [I]LIKE pattern [ESCAPE escape]`.
#[derive(Debug, Clone)]
pub struct LikeExpr {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub arg: ExprRef,
    pub like_expr: ExprRef,
    pub escape_expr: Option<ExprRef>,
    pub is_ilike: bool,
    /// Pattern reduces to a prefix/suffix/containment check.
    pub is_simple: bool,
}

impl LikeExpr {
    pub fn new(
        arg: ExprRef,
        like_expr: ExprRef,
        escape_expr: Option<ExprRef>,
        is_ilike: bool,
        is_simple: bool,
    ) -> Self {
        let type_info = SqlTypeInfo::simple(TypeKind::Boolean, arg.type_info().notnull);
        let contains_agg = arg.contains_agg();
        Self {
            type_info,
            contains_agg,
            arg,
            like_expr,
            escape_expr,
            is_ilike,
            is_simple,
        }
    }
}

/// An aggregate call. A missing argument means `COUNT(*)`.
#[derive(Debug, Clone)]
pub struct AggExpr {
    pub type_info: SqlTypeInfo,
    pub aggtype: AggType,
    pub arg: Option<ExprRef>,
    pub is_distinct: bool,
}

impl AggExpr {
    pub fn new(
        type_info: SqlTypeInfo,
        aggtype: AggType,
        arg: Option<ExprRef>,
        is_distinct: bool,
    ) -> Self {
        Self {
            type_info,
            aggtype,
            arg,
            is_distinct,
        }
    }
}

/// A searched CASE expression.
#[derive(Debug, Clone)]
pub struct CaseExpr {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub when_then_list: Vec<(ExprRef, ExprRef)>,
    pub else_expr: Option<ExprRef>,
}

impl CaseExpr {
    pub fn new(
        type_info: SqlTypeInfo,
        when_then_list: Vec<(ExprRef, ExprRef)>,
        else_expr: Option<ExprRef>,
    ) -> Self {
        let contains_agg = when_then_list
            .iter()
            .any(|(w, t)| w.contains_agg() || t.contains_agg())
            || else_expr.as_ref().is_some_and(|e| e.contains_agg());
        Self {
            type_info,
            contains_agg,
            when_then_list,
            else_expr,
        }
    }
}

/// `EXTRACT(field FROM from_expr)`.
#[derive(Debug, Clone)]
pub struct ExtractExpr {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub field: ExtractField,
    pub from_expr: ExprRef,
}

impl ExtractExpr {
    pub fn new(type_info: SqlTypeInfo, field: ExtractField, from_expr: ExprRef) -> Self {
        let contains_agg = from_expr.contains_agg();
        Self {
            type_info,
            contains_agg,
            field,
            from_expr,
        }
    }
}

/// `DATE_TRUNC(field, from_expr)`.
#[derive(Debug, Clone)]
pub struct DatetruncExpr {
    pub type_info: SqlTypeInfo,
    pub contains_agg: bool,
    pub field: DatetruncField,
    pub from_expr: ExprRef,
}

impl DatetruncExpr {
    pub fn new(type_info: SqlTypeInfo, field: DatetruncField, from_expr: ExprRef) -> Self {
        let contains_agg = from_expr.contains_agg();
        Self {
            type_info,
            contains_agg,
            field,
            from_expr,
        }
    }
}

/// A scalar expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    ColumnVar(ColumnVar),
    Var(Var),
    Constant(Constant),
    UOper(UOper),
    BinOper(BinOper),
    Subquery(Subquery),
    InValues(InValues),
    CharLength(CharLengthExpr),
    Like(LikeExpr),
    Agg(AggExpr),
    Case(CaseExpr),
    Extract(ExtractExpr),
    Datetrunc(DatetruncExpr),
}

macro_rules! impl_from_node {
    ($($variant:ident($node:ty)),* $(,)?) => {
        $(impl From<$node> for Expr {
            fn from(node: $node) -> Expr {
                Expr::$variant(node)
            }
        })*
    };
}

impl_from_node!(
    ColumnVar(ColumnVar),
    Var(Var),
    Constant(Constant),
    UOper(UOper),
    BinOper(BinOper),
    Subquery(Subquery),
    InValues(InValues),
    CharLength(CharLengthExpr),
    Like(LikeExpr),
    Agg(AggExpr),
    Case(CaseExpr),
    Extract(ExtractExpr),
    Datetrunc(DatetruncExpr),
);

/// Views an expression as a column reference; matches both bound and free
/// variables.
pub(crate) fn column_var_of(e: &Expr) -> Option<&ColumnVar> {
    match e {
        Expr::ColumnVar(c) => Some(c),
        Expr::Var(v) => Some(&v.col),
        _ => None,
    }
}

impl Expr {
    pub fn type_info(&self) -> &SqlTypeInfo {
        match self {
            Expr::ColumnVar(c) => &c.type_info,
            Expr::Var(v) => &v.col.type_info,
            Expr::Constant(c) => &c.type_info,
            Expr::UOper(u) => &u.type_info,
            Expr::BinOper(b) => &b.type_info,
            Expr::Subquery(s) => &s.type_info,
            Expr::InValues(iv) => &iv.type_info,
            Expr::CharLength(c) => &c.type_info,
            Expr::Like(l) => &l.type_info,
            Expr::Agg(a) => &a.type_info,
            Expr::Case(c) => &c.type_info,
            Expr::Extract(e) => &e.type_info,
            Expr::Datetrunc(d) => &d.type_info,
        }
    }

    /// Whether any aggregate call occurs in this subtree.
    pub fn contains_agg(&self) -> bool {
        match self {
            Expr::ColumnVar(_) | Expr::Var(_) | Expr::Constant(_) | Expr::Subquery(_) => false,
            Expr::Agg(_) => true,
            Expr::UOper(u) => u.contains_agg,
            Expr::BinOper(b) => b.contains_agg,
            Expr::InValues(iv) => iv.contains_agg,
            Expr::CharLength(c) => c.contains_agg,
            Expr::Like(l) => l.contains_agg,
            Expr::Case(c) => c.contains_agg,
            Expr::Extract(e) => e.contains_agg,
            Expr::Datetrunc(d) => d.contains_agg,
        }
    }

    /// Clones the subtree. Owned string payloads are duplicated; the copy
    /// shares nothing mutable with the original. Fails on subqueries.
    pub fn deep_copy(&self) -> Result<ExprRef> {
        let copy = match self {
            Expr::ColumnVar(c) => expr_ref(c.clone()),
            Expr::Var(v) => expr_ref(v.clone()),
            Expr::Constant(c) => expr_ref(c.clone()),
            Expr::UOper(u) => expr_ref(UOper::new(
                u.type_info.clone(),
                u.optype,
                u.operand.deep_copy()?,
            )),
            Expr::BinOper(b) => expr_ref(BinOper::new(
                b.type_info.clone(),
                b.optype,
                b.qualifier,
                b.left.deep_copy()?,
                b.right.deep_copy()?,
            )),
            Expr::Subquery(_) => return Err(Error::UnsupportedSubqueryOp),
            Expr::InValues(iv) => {
                let values = iv
                    .value_list
                    .iter()
                    .map(|v| v.deep_copy())
                    .collect::<Result<Vec<_>>>()?;
                expr_ref(InValues::new(iv.arg.deep_copy()?, values))
            }
            Expr::CharLength(c) => {
                expr_ref(CharLengthExpr::new(c.arg.deep_copy()?, c.calc_encoded_length))
            }
            Expr::Like(l) => expr_ref(LikeExpr::new(
                l.arg.deep_copy()?,
                l.like_expr.deep_copy()?,
                l.escape_expr.as_ref().map(|e| e.deep_copy()).transpose()?,
                l.is_ilike,
                l.is_simple,
            )),
            Expr::Agg(a) => expr_ref(AggExpr::new(
                a.type_info.clone(),
                a.aggtype,
                a.arg.as_ref().map(|e| e.deep_copy()).transpose()?,
                a.is_distinct,
            )),
            Expr::Case(c) => {
                let pairs = c
                    .when_then_list
                    .iter()
                    .map(|(w, t)| Ok((w.deep_copy()?, t.deep_copy()?)))
                    .collect::<Result<Vec<_>>>()?;
                expr_ref(CaseExpr::new(
                    c.type_info.clone(),
                    pairs,
                    c.else_expr.as_ref().map(|e| e.deep_copy()).transpose()?,
                ))
            }
            Expr::Extract(e) => expr_ref(ExtractExpr::new(
                e.type_info.clone(),
                e.field,
                e.from_expr.deep_copy()?,
            )),
            Expr::Datetrunc(d) => expr_ref(DatetruncExpr::new(
                d.type_info.clone(),
                d.field,
                d.from_expr.deep_copy()?,
            )),
        };
        Ok(copy)
    }
}

// Structural equality. Column references compare their binding (a bound Var
// equals a ColumnVar with the same slot); internal nodes ignore their own
// type annotation. This mirrors what rewriting relies on: a rewritten tree
// compares equal to its source even when annotations were recomputed.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::ColumnVar(_) | Expr::Var(_), Expr::ColumnVar(_) | Expr::Var(_)) => {
                let lhs = column_var_of(self).expect("column variable");
                let rhs = column_var_of(other).expect("column variable");
                if lhs.rte_idx != -1 {
                    return lhs.table_id == rhs.table_id
                        && lhs.column_id == rhs.column_id
                        && lhs.rte_idx == rhs.rte_idx;
                }
                match (self, other) {
                    (Expr::Var(lv), Expr::Var(rv)) => {
                        lv.which_row == rv.which_row && lv.varno == rv.varno
                    }
                    _ => false,
                }
            }
            (Expr::Constant(a), Expr::Constant(b)) => {
                a.type_info == b.type_info && a.is_null == b.is_null && a.constval == b.constval
            }
            (Expr::UOper(a), Expr::UOper(b)) => a.optype == b.optype && a.operand == b.operand,
            (Expr::BinOper(a), Expr::BinOper(b)) => {
                a.optype == b.optype
                    && a.qualifier == b.qualifier
                    && a.left == b.left
                    && a.right == b.right
            }
            (Expr::Subquery(_), Expr::Subquery(_)) => {
                unreachable!("comparing subquery expressions is not supported")
            }
            (Expr::InValues(a), Expr::InValues(b)) => {
                a.arg == b.arg
                    && a.value_list.len() == b.value_list.len()
                    && a.value_list.iter().zip(&b.value_list).all(|(x, y)| x == y)
            }
            (Expr::CharLength(a), Expr::CharLength(b)) => {
                a.arg == b.arg && a.calc_encoded_length == b.calc_encoded_length
            }
            (Expr::Like(a), Expr::Like(b)) => {
                a.arg == b.arg
                    && a.like_expr == b.like_expr
                    && a.is_ilike == b.is_ilike
                    && match (&a.escape_expr, &b.escape_expr) {
                        (None, None) => true,
                        (Some(x), Some(y)) => x == y,
                        _ => false,
                    }
            }
            (Expr::Agg(a), Expr::Agg(b)) => {
                a.aggtype == b.aggtype
                    && a.is_distinct == b.is_distinct
                    && match (&a.arg, &b.arg) {
                        (None, None) => true,
                        (Some(x), Some(y)) => x == y,
                        _ => false,
                    }
            }
            (Expr::Case(a), Expr::Case(b)) => {
                a.when_then_list.len() == b.when_then_list.len()
                    && a.else_expr.is_some() == b.else_expr.is_some()
                    && a.when_then_list
                        .iter()
                        .zip(&b.when_then_list)
                        .all(|((wa, ta), (wb, tb))| wa == wb && ta == tb)
                    && match (&a.else_expr, &b.else_expr) {
                        (Some(x), Some(y)) => x == y,
                        _ => true,
                    }
            }
            (Expr::Extract(a), Expr::Extract(b)) => {
                a.field == b.field && a.from_expr == b.from_expr
            }
            (Expr::Datetrunc(a), Expr::Datetrunc(b)) => {
                a.field == b.field && a.from_expr == b.from_expr
            }
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::ColumnVar(c) => write!(
                f,
                "(ColumnVar table: {} column: {} rte: {})",
                c.table_id, c.column_id, c.rte_idx
            ),
            Expr::Var(v) => write!(
                f,
                "(Var table: {} column: {} rte: {} which_row: {:?} varno: {})",
                v.col.table_id, v.col.column_id, v.col.rte_idx, v.which_row, v.varno
            ),
            Expr::Constant(c) => {
                if c.is_null {
                    write!(f, "(Const NULL)")
                } else {
                    write!(f, "(Const {})", datum_to_string(&c.constval, &c.type_info))
                }
            }
            Expr::UOper(u) => match u.optype {
                UnaryOp::Not => write!(f, "(NOT {})", u.operand),
                UnaryOp::UMinus => write!(f, "(- {})", u.operand),
                UnaryOp::IsNull => write!(f, "(IS NULL {})", u.operand),
                UnaryOp::Exists => write!(f, "(EXISTS {})", u.operand),
                UnaryOp::Unnest => write!(f, "(UNNEST {})", u.operand),
                UnaryOp::Cast => write!(
                    f,
                    "(CAST {}({},{}) {}({}) {})",
                    u.type_info.type_name(),
                    u.type_info.dimension,
                    u.type_info.scale,
                    u.type_info.compression.name(),
                    u.type_info.comp_param,
                    u.operand
                ),
            },
            Expr::BinOper(b) => {
                let qual = match b.qualifier {
                    Qualifier::One => "",
                    Qualifier::Any => "ANY ",
                    Qualifier::All => "ALL ",
                };
                write!(f, "({} {}{} {})", b.optype.token(), qual, b.left, b.right)
            }
            Expr::Subquery(_) => write!(f, "(Subquery)"),
            Expr::InValues(iv) => {
                write!(f, "(IN {} (", iv.arg)?;
                for (i, v) in iv.value_list.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "))")
            }
            Expr::CharLength(c) => {
                if c.calc_encoded_length {
                    write!(f, "CHAR_LENGTH({})", c.arg)
                } else {
                    write!(f, "LENGTH({})", c.arg)
                }
            }
            Expr::Like(l) => {
                write!(f, "(LIKE {} {}", l.arg, l.like_expr)?;
                if let Some(escape) = &l.escape_expr {
                    write!(f, " {}", escape)?;
                }
                write!(f, ")")
            }
            Expr::Agg(a) => {
                write!(f, "({} ", a.aggtype)?;
                if a.is_distinct {
                    write!(f, "DISTINCT ")?;
                }
                match &a.arg {
                    Some(arg) => write!(f, "{})", arg),
                    None => write!(f, "*)"),
                }
            }
            Expr::Case(c) => {
                write!(f, "CASE")?;
                for (when, then) in &c.when_then_list {
                    write!(f, " ({}, {})", when, then)?;
                }
                if let Some(else_expr) = &c.else_expr {
                    write!(f, " ELSE {}", else_expr)?;
                }
                write!(f, " END")
            }
            Expr::Extract(e) => write!(f, "EXTRACT({} FROM {})", e.field, e.from_expr),
            Expr::Datetrunc(d) => write!(f, "DATE_TRUNC({}, {})", d.field, d.from_expr),
        }
    }
}

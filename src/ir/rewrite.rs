//! Target-list rewriting
//!
//! Three flavors of leaf substitution used when predicates and projections
//! move across plan boundaries. All of them build fresh trees; the input
//! tree is left intact, so a failed rewrite observes no partial state.

use crate::error::{Error, Result};
use crate::ir::expr::{
    column_var_of, expr_ref, AggExpr, BinOper, CaseExpr, CharLengthExpr, DatetruncExpr, Expr,
    ExprRef, ExtractExpr, InValues, LikeExpr, UOper, Var, WhichRow,
};
use crate::ir::query::TargetEntry;

impl Expr {
    /// Replaces column references and aggregates with deep copies of the
    /// matching target-list expressions.
    pub fn rewrite_with_targetlist(&self, tlist: &[TargetEntry]) -> Result<ExprRef> {
        match self {
            Expr::ColumnVar(_) | Expr::Var(_) => {
                let c = column_var_of(self).expect("column variable");
                for tle in tlist {
                    if let Some(colvar) = column_var_of(&tle.expr) {
                        if c.table_id == colvar.table_id && c.column_id == colvar.column_id {
                            return tle.expr.deep_copy();
                        }
                    }
                }
                Err(Error::NotInTargetList("column variable".to_string()))
            }
            Expr::Constant(_) => self.deep_copy(),
            Expr::UOper(u) => Ok(expr_ref(UOper::new(
                u.type_info.clone(),
                u.optype,
                u.operand.rewrite_with_targetlist(tlist)?,
            ))),
            Expr::BinOper(b) => Ok(expr_ref(BinOper::new(
                b.type_info.clone(),
                b.optype,
                b.qualifier,
                b.left.rewrite_with_targetlist(tlist)?,
                b.right.rewrite_with_targetlist(tlist)?,
            ))),
            Expr::Subquery(_) => Err(Error::UnsupportedSubqueryOp),
            Expr::InValues(iv) => {
                let values = iv
                    .value_list
                    .iter()
                    .map(|v| v.deep_copy())
                    .collect::<Result<Vec<_>>>()?;
                Ok(expr_ref(InValues::new(
                    iv.arg.rewrite_with_targetlist(tlist)?,
                    values,
                )))
            }
            Expr::CharLength(c) => Ok(expr_ref(CharLengthExpr::new(
                c.arg.rewrite_with_targetlist(tlist)?,
                c.calc_encoded_length,
            ))),
            Expr::Like(l) => Ok(expr_ref(LikeExpr::new(
                l.arg.rewrite_with_targetlist(tlist)?,
                l.like_expr.deep_copy()?,
                l.escape_expr.as_ref().map(|e| e.deep_copy()).transpose()?,
                l.is_ilike,
                l.is_simple,
            ))),
            Expr::Agg(_) => {
                for tle in tlist {
                    if let Expr::Agg(_) = &*tle.expr {
                        if *tle.expr == *self {
                            return tle.expr.deep_copy();
                        }
                    }
                }
                Err(Error::NotInTargetList("aggregate expression".to_string()))
            }
            Expr::Case(c) => {
                let pairs = c
                    .when_then_list
                    .iter()
                    .map(|(w, t)| {
                        Ok((
                            w.rewrite_with_targetlist(tlist)?,
                            t.rewrite_with_targetlist(tlist)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let else_expr = match &c.else_expr {
                    Some(e) => Some(e.rewrite_with_targetlist(tlist)?),
                    None => None,
                };
                Ok(expr_ref(CaseExpr::new(c.type_info.clone(), pairs, else_expr)))
            }
            Expr::Extract(e) => Ok(expr_ref(ExtractExpr::new(
                e.type_info.clone(),
                e.field,
                e.from_expr.rewrite_with_targetlist(tlist)?,
            ))),
            Expr::Datetrunc(d) => Ok(expr_ref(DatetruncExpr::new(
                d.type_info.clone(),
                d.field,
                d.from_expr.rewrite_with_targetlist(tlist)?,
            ))),
        }
    }

    /// Redirects column references to the child's output row: every target
    /// entry must itself be a column, and a match becomes a `Var` naming the
    /// child's 1-based output slot. Aggregate arguments are rewritten in
    /// place of the aggregate itself.
    pub fn rewrite_with_child_targetlist(&self, tlist: &[TargetEntry]) -> Result<ExprRef> {
        match self {
            Expr::ColumnVar(_) | Expr::Var(_) => {
                let c = column_var_of(self).expect("column variable");
                for (i, tle) in tlist.iter().enumerate() {
                    let colvar = column_var_of(&tle.expr)
                        .ok_or(Error::TargetListNotAllColumns)?;
                    if c.table_id == colvar.table_id && c.column_id == colvar.column_id {
                        return Ok(expr_ref(Var::new(
                            colvar.type_info.clone(),
                            colvar.table_id,
                            colvar.column_id,
                            colvar.rte_idx,
                            WhichRow::InputOuter,
                            i + 1,
                        )));
                    }
                }
                Err(Error::NotInTargetList("column variable".to_string()))
            }
            Expr::Constant(_) => self.deep_copy(),
            Expr::UOper(u) => Ok(expr_ref(UOper::new(
                u.type_info.clone(),
                u.optype,
                u.operand.rewrite_with_child_targetlist(tlist)?,
            ))),
            Expr::BinOper(b) => Ok(expr_ref(BinOper::new(
                b.type_info.clone(),
                b.optype,
                b.qualifier,
                b.left.rewrite_with_child_targetlist(tlist)?,
                b.right.rewrite_with_child_targetlist(tlist)?,
            ))),
            Expr::Subquery(_) => Err(Error::UnsupportedSubqueryOp),
            Expr::InValues(iv) => {
                let values = iv
                    .value_list
                    .iter()
                    .map(|v| v.deep_copy())
                    .collect::<Result<Vec<_>>>()?;
                Ok(expr_ref(InValues::new(
                    iv.arg.rewrite_with_child_targetlist(tlist)?,
                    values,
                )))
            }
            Expr::CharLength(c) => Ok(expr_ref(CharLengthExpr::new(
                c.arg.rewrite_with_child_targetlist(tlist)?,
                c.calc_encoded_length,
            ))),
            Expr::Like(l) => Ok(expr_ref(LikeExpr::new(
                l.arg.rewrite_with_child_targetlist(tlist)?,
                l.like_expr.deep_copy()?,
                l.escape_expr.as_ref().map(|e| e.deep_copy()).transpose()?,
                l.is_ilike,
                l.is_simple,
            ))),
            Expr::Agg(a) => Ok(expr_ref(AggExpr::new(
                a.type_info.clone(),
                a.aggtype,
                a.arg
                    .as_ref()
                    .map(|e| e.rewrite_with_child_targetlist(tlist))
                    .transpose()?,
                a.is_distinct,
            ))),
            Expr::Case(c) => {
                let pairs = c
                    .when_then_list
                    .iter()
                    .map(|(w, t)| {
                        Ok((
                            w.rewrite_with_child_targetlist(tlist)?,
                            t.rewrite_with_child_targetlist(tlist)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let else_expr = match &c.else_expr {
                    Some(e) => Some(e.rewrite_with_child_targetlist(tlist)?),
                    None => None,
                };
                Ok(expr_ref(CaseExpr::new(c.type_info.clone(), pairs, else_expr)))
            }
            Expr::Extract(e) => Ok(expr_ref(ExtractExpr::new(
                e.type_info.clone(),
                e.field,
                e.from_expr.rewrite_with_child_targetlist(tlist)?,
            ))),
            Expr::Datetrunc(d) => Ok(expr_ref(DatetruncExpr::new(
                d.type_info.clone(),
                d.field,
                d.from_expr.rewrite_with_child_targetlist(tlist)?,
            ))),
        }
    }

    /// Replaces aggregates (and column references) appearing in the target
    /// list with `Var`s naming their output slot; used when a HAVING clause
    /// is evaluated over aggregated rows.
    pub fn rewrite_agg_to_var(&self, tlist: &[TargetEntry]) -> Result<ExprRef> {
        match self {
            Expr::Var(_) => {
                for (i, tle) in tlist.iter().enumerate() {
                    if *tle.expr == *self {
                        return Ok(expr_ref(Var::free(
                            tle.expr.type_info().clone(),
                            WhichRow::InputOuter,
                            i + 1,
                        )));
                    }
                }
                Err(Error::NotInTargetList("variable".to_string()))
            }
            Expr::ColumnVar(c) => {
                for (i, tle) in tlist.iter().enumerate() {
                    if let Expr::Agg(_) = &*tle.expr {
                        continue;
                    }
                    let colvar = column_var_of(&tle.expr)
                        .ok_or(Error::TargetListNotAllColumnsOrAggs)?;
                    if c.table_id == colvar.table_id && c.column_id == colvar.column_id {
                        return Ok(expr_ref(Var::new(
                            colvar.type_info.clone(),
                            colvar.table_id,
                            colvar.column_id,
                            colvar.rte_idx,
                            WhichRow::InputOuter,
                            i + 1,
                        )));
                    }
                }
                Err(Error::NotInTargetList("column variable".to_string()))
            }
            Expr::Constant(_) => self.deep_copy(),
            Expr::UOper(u) => Ok(expr_ref(UOper::new(
                u.type_info.clone(),
                u.optype,
                u.operand.rewrite_agg_to_var(tlist)?,
            ))),
            Expr::BinOper(b) => Ok(expr_ref(BinOper::new(
                b.type_info.clone(),
                b.optype,
                b.qualifier,
                b.left.rewrite_agg_to_var(tlist)?,
                b.right.rewrite_agg_to_var(tlist)?,
            ))),
            Expr::Subquery(_) => Err(Error::UnsupportedSubqueryOp),
            Expr::InValues(iv) => {
                let values = iv
                    .value_list
                    .iter()
                    .map(|v| v.rewrite_agg_to_var(tlist))
                    .collect::<Result<Vec<_>>>()?;
                Ok(expr_ref(InValues::new(
                    iv.arg.rewrite_agg_to_var(tlist)?,
                    values,
                )))
            }
            Expr::CharLength(c) => Ok(expr_ref(CharLengthExpr::new(
                c.arg.rewrite_agg_to_var(tlist)?,
                c.calc_encoded_length,
            ))),
            Expr::Like(l) => Ok(expr_ref(LikeExpr::new(
                l.arg.rewrite_agg_to_var(tlist)?,
                l.like_expr.deep_copy()?,
                l.escape_expr.as_ref().map(|e| e.deep_copy()).transpose()?,
                l.is_ilike,
                l.is_simple,
            ))),
            Expr::Agg(_) => {
                for (i, tle) in tlist.iter().enumerate() {
                    if let Expr::Agg(agg) = &*tle.expr {
                        if *self == *tle.expr {
                            return Ok(expr_ref(Var::free(
                                agg.type_info.clone(),
                                WhichRow::InputOuter,
                                i + 1,
                            )));
                        }
                    }
                }
                Err(Error::NotInTargetList("aggregate expression".to_string()))
            }
            Expr::Case(c) => {
                let pairs = c
                    .when_then_list
                    .iter()
                    .map(|(w, t)| {
                        Ok((w.rewrite_agg_to_var(tlist)?, t.rewrite_agg_to_var(tlist)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let else_expr = match &c.else_expr {
                    Some(e) => Some(e.rewrite_agg_to_var(tlist)?),
                    None => None,
                };
                Ok(expr_ref(CaseExpr::new(c.type_info.clone(), pairs, else_expr)))
            }
            Expr::Extract(e) => Ok(expr_ref(ExtractExpr::new(
                e.type_info.clone(),
                e.field,
                e.from_expr.rewrite_agg_to_var(tlist)?,
            ))),
            Expr::Datetrunc(d) => Ok(expr_ref(DatetruncExpr::new(
                d.type_info.clone(),
                d.field,
                d.from_expr.rewrite_agg_to_var(tlist)?,
            ))),
        }
    }
}

//! Predicate analysis
//!
//! Classifies conjuncts for the planner (scan vs. join vs. constant),
//! collects column references, validates GROUP BY coverage, and normalizes
//! simple comparisons into column-op-literal form.

use crate::error::{Error, Result};
use crate::ir::expr::{
    column_var_of, expr_ref, BinOper, BinaryOp, ColumnVar, Expr, ExprRef, Qualifier, WhichRow,
};
use crate::types::sql_type::TypeKind;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

impl Expr {
    /// Appends this predicate to one of the three lists: conjunctions are
    /// flattened, and every other node lands in `join`, `scan` or `consts`
    /// by the number of range-table entries it references.
    pub fn group_predicates(
        self: Arc<Self>,
        scan: &mut Vec<ExprRef>,
        join: &mut Vec<ExprRef>,
        consts: &mut Vec<ExprRef>,
    ) {
        match &*self {
            Expr::BinOper(b) if b.optype == BinaryOp::And => {
                b.left.clone().group_predicates(scan, join, consts);
                b.right.clone().group_predicates(scan, join, consts);
            }
            Expr::ColumnVar(c) => {
                if c.type_info.kind == TypeKind::Boolean {
                    scan.push(self.clone());
                }
            }
            Expr::Var(v) => {
                if v.col.type_info.kind == TypeKind::Boolean {
                    scan.push(self.clone());
                }
            }
            Expr::Constant(_) | Expr::Subquery(_) => {}
            _ => {
                let mut rte_set = HashSet::new();
                self.collect_rte_idx(&mut rte_set);
                match rte_set.len() {
                    0 => consts.push(self),
                    1 => scan.push(self),
                    _ => join.push(self),
                }
            }
        }
    }

    /// The transitive union of range-table indices referenced by column
    /// variables in this subtree.
    pub fn collect_rte_idx(&self, rte_set: &mut HashSet<i32>) {
        match self {
            Expr::ColumnVar(c) => {
                rte_set.insert(c.rte_idx);
            }
            Expr::Var(v) => {
                rte_set.insert(v.col.rte_idx);
            }
            Expr::Constant(_) | Expr::Subquery(_) => {}
            Expr::UOper(u) => u.operand.collect_rte_idx(rte_set),
            Expr::BinOper(b) => {
                b.left.collect_rte_idx(rte_set);
                b.right.collect_rte_idx(rte_set);
            }
            Expr::InValues(iv) => {
                iv.arg.collect_rte_idx(rte_set);
                for v in &iv.value_list {
                    v.collect_rte_idx(rte_set);
                }
            }
            Expr::CharLength(c) => c.arg.collect_rte_idx(rte_set),
            Expr::Like(l) => {
                l.arg.collect_rte_idx(rte_set);
                l.like_expr.collect_rte_idx(rte_set);
                if let Some(escape) = &l.escape_expr {
                    escape.collect_rte_idx(rte_set);
                }
            }
            Expr::Agg(a) => {
                if let Some(arg) = &a.arg {
                    arg.collect_rte_idx(rte_set);
                }
            }
            Expr::Case(c) => {
                for (when, then) in &c.when_then_list {
                    when.collect_rte_idx(rte_set);
                    then.collect_rte_idx(rte_set);
                }
                if let Some(else_expr) = &c.else_expr {
                    else_expr.collect_rte_idx(rte_set);
                }
            }
            Expr::Extract(e) => e.from_expr.collect_rte_idx(rte_set),
            Expr::Datetrunc(d) => d.from_expr.collect_rte_idx(rte_set),
        }
    }

    /// Accumulates the column variables referenced in this subtree, keyed
    /// and ordered by (table_id, column_id). With `include_agg` false the
    /// walk does not descend into aggregate arguments.
    pub fn collect_column_var(
        &self,
        colvar_set: &mut BTreeMap<(i32, i32), ColumnVar>,
        include_agg: bool,
    ) {
        match self {
            Expr::ColumnVar(_) | Expr::Var(_) => {
                let c = column_var_of(self).expect("column variable");
                colvar_set
                    .entry((c.table_id, c.column_id))
                    .or_insert_with(|| c.clone());
            }
            Expr::Constant(_) | Expr::Subquery(_) => {}
            Expr::UOper(u) => u.operand.collect_column_var(colvar_set, include_agg),
            Expr::BinOper(b) => {
                b.left.collect_column_var(colvar_set, include_agg);
                b.right.collect_column_var(colvar_set, include_agg);
            }
            Expr::InValues(iv) => {
                iv.arg.collect_column_var(colvar_set, include_agg);
                for v in &iv.value_list {
                    v.collect_column_var(colvar_set, include_agg);
                }
            }
            Expr::CharLength(c) => c.arg.collect_column_var(colvar_set, include_agg),
            Expr::Like(l) => {
                l.arg.collect_column_var(colvar_set, include_agg);
                l.like_expr.collect_column_var(colvar_set, include_agg);
                if let Some(escape) = &l.escape_expr {
                    escape.collect_column_var(colvar_set, include_agg);
                }
            }
            Expr::Agg(a) => {
                if include_agg {
                    if let Some(arg) = &a.arg {
                        arg.collect_column_var(colvar_set, include_agg);
                    }
                }
            }
            Expr::Case(c) => {
                for (when, then) in &c.when_then_list {
                    when.collect_column_var(colvar_set, include_agg);
                    then.collect_column_var(colvar_set, include_agg);
                }
                if let Some(else_expr) = &c.else_expr {
                    else_expr.collect_column_var(colvar_set, include_agg);
                }
            }
            Expr::Extract(e) => e.from_expr.collect_column_var(colvar_set, include_agg),
            Expr::Datetrunc(d) => d.from_expr.collect_column_var(colvar_set, include_agg),
        }
    }

    /// Checks that every column reference in this subtree is covered by the
    /// GROUP BY list. Free variables must already be group-by outputs.
    pub fn check_group_by(&self, groupby: &[ExprRef]) -> Result<()> {
        match self {
            Expr::Var(v) => {
                if v.which_row != WhichRow::GroupBy {
                    return Err(Error::InvalidVarInGroupBy);
                }
                Ok(())
            }
            Expr::ColumnVar(c) => {
                for e in groupby {
                    if let Some(gc) = column_var_of(e) {
                        if c.table_id == gc.table_id && c.column_id == gc.column_id {
                            return Ok(());
                        }
                    }
                }
                Err(Error::GroupByViolation)
            }
            Expr::UOper(u) => u.operand.check_group_by(groupby),
            Expr::BinOper(b) => {
                b.left.check_group_by(groupby)?;
                b.right.check_group_by(groupby)
            }
            Expr::Case(c) => {
                for (when, then) in &c.when_then_list {
                    when.check_group_by(groupby)?;
                    then.check_group_by(groupby)?;
                }
                if let Some(else_expr) = &c.else_expr {
                    else_expr.check_group_by(groupby)?;
                }
                Ok(())
            }
            Expr::Extract(e) => e.from_expr.check_group_by(groupby),
            Expr::Datetrunc(d) => d.from_expr.check_group_by(groupby),
            _ => Ok(()),
        }
    }

    /// Collects sub-expressions matched by `f`, deduplicated by structural
    /// equality. A matching node is not descended into.
    pub fn find_expr<'a>(&'a self, f: &dyn Fn(&Expr) -> bool, found: &mut Vec<&'a Expr>) {
        if f(self) {
            add_unique_ref(found, self);
            return;
        }
        match self {
            Expr::ColumnVar(_) | Expr::Var(_) | Expr::Constant(_) | Expr::Subquery(_) => {}
            Expr::UOper(u) => u.operand.find_expr(f, found),
            Expr::BinOper(b) => {
                b.left.find_expr(f, found);
                b.right.find_expr(f, found);
            }
            Expr::InValues(iv) => {
                iv.arg.find_expr(f, found);
                for v in &iv.value_list {
                    v.find_expr(f, found);
                }
            }
            Expr::CharLength(c) => c.arg.find_expr(f, found),
            Expr::Like(l) => {
                l.arg.find_expr(f, found);
                l.like_expr.find_expr(f, found);
                if let Some(escape) = &l.escape_expr {
                    escape.find_expr(f, found);
                }
            }
            Expr::Agg(a) => {
                if let Some(arg) = &a.arg {
                    arg.find_expr(f, found);
                }
            }
            Expr::Case(c) => {
                for (when, then) in &c.when_then_list {
                    when.find_expr(f, found);
                    then.find_expr(f, found);
                }
                if let Some(else_expr) = &c.else_expr {
                    else_expr.find_expr(f, found);
                }
            }
            Expr::Extract(e) => e.from_expr.find_expr(f, found),
            Expr::Datetrunc(d) => d.from_expr.find_expr(f, found),
        }
    }
}

fn add_unique_ref<'a>(found: &mut Vec<&'a Expr>, e: &'a Expr) {
    if !found.iter().any(|x| *x == e) {
        found.push(e);
    }
}

impl BinOper {
    /// Recognizes `<column> <cmp> <literal>` (or its mirror image) and
    /// returns a copy normalized to column-on-the-left, along with the
    /// column's range-table index. Anything else is not a simple predicate.
    pub fn normalize_simple_predicate(&self) -> Option<(ExprRef, i32)> {
        if !self.optype.is_comparison() || self.qualifier != Qualifier::One {
            return None;
        }
        match (&*self.left, &*self.right) {
            (Expr::ColumnVar(cv), Expr::Constant(_)) => {
                let copy = expr_ref(BinOper::new(
                    self.type_info.clone(),
                    self.optype,
                    self.qualifier,
                    self.left.deep_copy().ok()?,
                    self.right.deep_copy().ok()?,
                ));
                Some((copy, cv.rte_idx))
            }
            (Expr::Constant(_), Expr::ColumnVar(cv)) => {
                let copy = expr_ref(BinOper::new(
                    self.type_info.clone(),
                    self.optype.commute(),
                    self.qualifier,
                    self.right.deep_copy().ok()?,
                    self.left.deep_copy().ok()?,
                ));
                Some((copy, cv.rte_idx))
            }
            _ => None,
        }
    }
}

//! Cast injection and constant folding
//!
//! [`Expr::add_cast`] wraps an expression in a CAST unless a structural
//! shortcut applies; literals are folded in value space instead of wrapped.
//! All of it is copy-on-write: shared nodes are never mutated, a changed
//! node is a fresh one.

use crate::error::{Error, Result};
use crate::ir::expr::{
    expr_ref, CaseExpr, Constant, Expr, ExprRef, UOper, UnaryOp,
};
use crate::types::datum::{datum_to_string, string_to_datum, Datum};
use crate::types::sql_type::{transient_dict, Encoding, SqlTypeInfo, TypeKind, TRANSIENT_DICT_ID};
use std::sync::Arc;
use tracing::trace;

/// The set of values a CASE expression can produce. Empty means unbounded.
pub type DomainSet = Vec<ExprRef>;

impl Expr {
    /// Returns self for uncompressed expressions, otherwise a CAST to the
    /// uncompressed rendition of the same type.
    pub fn decompress(self: Arc<Self>) -> ExprRef {
        if self.type_info().compression == Encoding::None {
            return self;
        }
        let mut new_ti = self.type_info().clone();
        new_ti.compression = Encoding::None;
        new_ti.comp_param = 0;
        expr_ref(UOper::new(new_ti, UnaryOp::Cast, self))
    }

    /// Coerces the expression to `new_type_info`, returning self when no
    /// conversion is needed, a folded literal for constants, and a CAST
    /// wrapper otherwise.
    pub fn add_cast(self: Arc<Self>, new_type_info: &SqlTypeInfo) -> Result<ExprRef> {
        match &*self {
            Expr::Constant(c) => {
                if c.is_null {
                    let mut out = c.clone();
                    out.type_info = new_type_info.clone();
                    out.set_null_value();
                    return Ok(expr_ref(out));
                }
                if new_type_info.compression != c.type_info.compression {
                    // cast the value to the uncompressed form first, then
                    // let the generic path add the encoding-changing wrapper
                    let casted = if new_type_info.compression != Encoding::None {
                        let mut plain_ti = new_type_info.clone();
                        plain_ti.compression = Encoding::None;
                        c.do_cast(&plain_ti)?
                    } else {
                        c.clone()
                    };
                    return add_cast_default(expr_ref(casted), new_type_info);
                }
                Ok(expr_ref(c.do_cast(new_type_info)?))
            }
            Expr::UOper(u) if u.optype == UnaryOp::Cast => {
                // casting a cast of a dict-encoded string back towards the
                // same (or transient-related) dictionary is redundant; the
                // inner operand already carries the right encoding
                if u.type_info.is_string()
                    && new_type_info.is_string()
                    && new_type_info.compression == Encoding::Dict
                    && u.type_info.compression == Encoding::None
                {
                    let oti = u.operand.type_info();
                    if oti.is_string()
                        && oti.compression == Encoding::Dict
                        && (oti.comp_param == new_type_info.comp_param
                            || oti.comp_param == transient_dict(new_type_info.comp_param))
                    {
                        return Ok(u.operand.clone());
                    }
                }
                add_cast_default(self, new_type_info)
            }
            Expr::Case(c) => {
                let mut ti = new_type_info.clone();
                if new_type_info.is_string()
                    && new_type_info.compression == Encoding::Dict
                    && new_type_info.comp_param == TRANSIENT_DICT_ID
                    && c.type_info.is_string()
                    && c.type_info.compression == Encoding::None
                    && c.type_info.comp_param > TRANSIENT_DICT_ID
                {
                    ti.comp_param = transient_dict(c.type_info.comp_param);
                }
                let mut pairs = Vec::with_capacity(c.when_then_list.len());
                for (when, then) in &c.when_then_list {
                    pairs.push((when.clone(), then.clone().add_cast(&ti)?));
                }
                let else_expr = match &c.else_expr {
                    Some(e) => Some(e.clone().add_cast(&ti)?),
                    None => None,
                };
                Ok(expr_ref(CaseExpr::new(ti, pairs, else_expr)))
            }
            Expr::Subquery(_) => Err(Error::UnsupportedSubqueryOp),
            _ => add_cast_default(self, new_type_info),
        }
    }

    /// Collects the set of values this expression can produce, for planning
    /// dictionary encodings. Anything but a CASE over literals and column
    /// references clears the set to denote an unbounded domain.
    pub fn get_domain(&self, domain: &mut DomainSet) {
        match self {
            Expr::Case(c) => {
                for (_, then) in &c.when_then_list {
                    if !add_domain_leaf(then, domain) {
                        then.get_domain(domain);
                        if domain.is_empty() {
                            return;
                        }
                    }
                }
                if let Some(else_expr) = &c.else_expr {
                    if !add_domain_leaf(else_expr, domain) {
                        else_expr.get_domain(domain);
                    }
                }
            }
            _ => domain.clear(),
        }
    }
}

/// Adds `e` to the domain when it is a literal, a column reference, or a
/// CAST over a literal. Returns false when the caller must recurse instead.
fn add_domain_leaf(e: &ExprRef, domain: &mut DomainSet) -> bool {
    match &**e {
        Expr::Constant(_) | Expr::ColumnVar(_) | Expr::Var(_) => {
            add_unique(domain, e);
            true
        }
        Expr::UOper(u) if u.optype == UnaryOp::Cast => {
            if matches!(&*u.operand, Expr::Constant(_)) {
                add_unique(domain, e);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

fn add_unique(domain: &mut DomainSet, e: &ExprRef) {
    if !domain.iter().any(|d| **d == **e) {
        domain.push(e.clone());
    }
}

fn add_cast_default(this: ExprRef, new_type_info: &SqlTypeInfo) -> Result<ExprRef> {
    let ti = this.type_info();
    if new_type_info == ti {
        return Ok(this);
    }
    if new_type_info.is_string()
        && ti.is_string()
        && new_type_info.compression == Encoding::Dict
        && ti.compression == Encoding::Dict
        && (new_type_info.comp_param == ti.comp_param
            || new_type_info.comp_param == transient_dict(ti.comp_param))
    {
        return Ok(this);
    }
    if !ti.is_castable(new_type_info) {
        return Err(Error::UncastableTypes {
            from: ti.type_name().to_string(),
            to: new_type_info.type_name().to_string(),
        });
    }
    // the executor resolves transient dictionaries for literals only
    if !matches!(&*this, Expr::Constant(_))
        && new_type_info.is_string()
        && new_type_info.compression == Encoding::Dict
        && new_type_info.comp_param <= TRANSIENT_DICT_ID
    {
        if ti.is_string() && ti.compression != Encoding::Dict {
            return Err(Error::GroupByRequiresDictEncoding);
        }
        return Err(Error::TransientEncodingOnNonLiteral);
    }
    trace!(from = %ti, to = %new_type_info, "injecting cast wrapper");
    Ok(expr_ref(UOper::new(
        new_type_info.clone(),
        UnaryOp::Cast,
        this,
    )))
}

impl Constant {
    /// Converts the literal's value to `new_type_info`, returning a fresh
    /// constant. Fails on family pairs with no value-level conversion.
    pub fn do_cast(&self, new_type_info: &SqlTypeInfo) -> Result<Constant> {
        if self.type_info == *new_type_info {
            return Ok(self.clone());
        }
        if self.is_null {
            let mut out = self.clone();
            out.type_info = new_type_info.clone();
            out.set_null_value();
            return Ok(out);
        }
        let from = &self.type_info;
        let constval = if new_type_info.is_number()
            && (from.is_number()
                || from.kind == TypeKind::Timestamp
                || from.kind == TypeKind::Boolean)
        {
            self.cast_number(new_type_info)?
        } else if new_type_info.is_string() && from.is_string() {
            Datum::Str(truncate_to(self.string_value(), new_type_info))
        } else if from.is_string() {
            string_to_datum(self.string_value(), new_type_info)?
        } else if new_type_info.is_string() {
            let rendered = datum_to_string(&self.constval, from);
            Datum::Str(truncate_to(&rendered, new_type_info))
        } else {
            return Err(Error::InvalidCast {
                from: from.type_name().to_string(),
                to: new_type_info.type_name().to_string(),
            });
        };
        Ok(Constant::new(new_type_info.clone(), constval))
    }

    fn string_value(&self) -> &str {
        match &self.constval {
            Datum::Str(s) => s,
            _ => unreachable!("string payload expected for {}", self.type_info.type_name()),
        }
    }

    fn cast_number(&self, new_type_info: &SqlTypeInfo) -> Result<Datum> {
        use TypeKind::*;

        // normalized view of the source payload
        enum Num {
            Exact(i64),
            Real(f64),
            Scaled(i64, u32),
        }

        let from = &self.type_info;
        let src = match (from.kind, &self.constval) {
            (SmallInt, Datum::SmallInt(v)) => Num::Exact(*v as i64),
            (Int, Datum::Int(v)) => Num::Exact(*v as i64),
            (BigInt, Datum::BigInt(v)) => Num::Exact(*v),
            (Timestamp, Datum::Time(v)) => Num::Exact(*v),
            (Boolean, Datum::Bool(b)) => Num::Exact(*b as i64),
            (Float, Datum::Float(v)) => Num::Real(*v as f64),
            (Double, Datum::Double(v)) => Num::Real(*v),
            (Numeric | Decimal, Datum::BigInt(m)) => Num::Scaled(*m, from.scale as u32),
            _ => {
                return Err(Error::InvalidCast {
                    from: from.type_name().to_string(),
                    to: new_type_info.type_name().to_string(),
                })
            }
        };

        let to_exact = |src: &Num| match *src {
            Num::Exact(v) => v,
            Num::Real(f) => f as i64,
            Num::Scaled(m, s) => m / 10_i64.pow(s),
        };

        let d = match new_type_info.kind {
            SmallInt => Datum::SmallInt(to_exact(&src) as i16),
            Int => Datum::Int(to_exact(&src) as i32),
            BigInt => Datum::BigInt(to_exact(&src)),
            Float => Datum::Float(match src {
                Num::Exact(v) => v as f32,
                Num::Real(f) => f as f32,
                Num::Scaled(m, s) => m as f32 / 10_f32.powi(s as i32),
            }),
            Double => Datum::Double(match src {
                Num::Exact(v) => v as f64,
                Num::Real(f) => f,
                Num::Scaled(m, s) => m as f64 / 10_f64.powi(s as i32),
            }),
            Numeric | Decimal => {
                let target_scale = new_type_info.scale as u32;
                Datum::BigInt(match src {
                    Num::Exact(v) => v * 10_i64.pow(target_scale),
                    Num::Real(f) => (f * 10_f64.powi(target_scale as i32)) as i64,
                    Num::Scaled(m, s) if target_scale >= s => {
                        m * 10_i64.pow(target_scale - s)
                    }
                    Num::Scaled(m, s) => m / 10_i64.pow(s - target_scale),
                })
            }
            _ => unreachable!("numeric cast to non-numeric kind"),
        };
        Ok(d)
    }
}

/// Truncates a rendered string to the target's character bound, if any.
fn truncate_to(s: &str, ti: &SqlTypeInfo) -> String {
    if ti.kind != TypeKind::Text && s.chars().count() > ti.dimension as usize {
        s.chars().take(ti.dimension as usize).collect()
    } else {
        s.to_string()
    }
}

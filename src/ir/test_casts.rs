#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::ir::expr::{
        expr_ref, CaseExpr, ColumnVar, Constant, Expr, ExprRef, Subquery, UOper, UnaryOp,
    };
    use crate::ir::query::Query;
    use crate::types::{
        transient_dict, Datum, Encoding, SqlTypeInfo, TypeKind, NULL_DOUBLE, TRANSIENT_DICT_ID,
    };

    fn simple(kind: TypeKind) -> SqlTypeInfo {
        SqlTypeInfo::simple(kind, false)
    }

    fn decimal(dimension: i32, scale: i32) -> SqlTypeInfo {
        SqlTypeInfo::new(TypeKind::Decimal, dimension, scale, false)
    }

    fn varchar(dimension: i32) -> SqlTypeInfo {
        SqlTypeInfo::new(TypeKind::Varchar, dimension, 0, false)
    }

    fn dict_varchar(dimension: i32, comp_param: i32) -> SqlTypeInfo {
        SqlTypeInfo::with_encoding(
            TypeKind::Varchar,
            dimension,
            0,
            false,
            Encoding::Dict,
            comp_param,
        )
    }

    fn int_lit(v: i32) -> ExprRef {
        expr_ref(Constant::new(simple(TypeKind::Int), Datum::Int(v)))
    }

    fn str_lit(s: &str, ti: SqlTypeInfo) -> ExprRef {
        expr_ref(Constant::new(ti, Datum::Str(s.to_string())))
    }

    fn col(ti: SqlTypeInfo) -> ExprRef {
        expr_ref(ColumnVar::new(ti, 1, 1, 0))
    }

    fn constant_of(e: &ExprRef) -> &Constant {
        match &**e {
            Expr::Constant(c) => c,
            other => panic!("constant expected, got {}", other),
        }
    }

    #[test]
    fn test_cast_to_same_type_is_identity() {
        let c = col(simple(TypeKind::Int));
        let out = c.clone().add_cast(&simple(TypeKind::Int)).unwrap();
        assert!(ExprRef::ptr_eq(&c, &out));

        let lit = int_lit(7);
        let out = lit.clone().add_cast(&simple(TypeKind::Int)).unwrap();
        assert_eq!(*lit, *out);
    }

    #[test]
    fn test_cast_wrapper_for_non_literals() {
        let c = col(simple(TypeKind::Int));
        let out = c.clone().add_cast(&simple(TypeKind::BigInt)).unwrap();
        let Expr::UOper(u) = &*out else {
            panic!("cast wrapper expected");
        };
        assert_eq!(u.optype, UnaryOp::Cast);
        assert_eq!(u.type_info.kind, TypeKind::BigInt);
        assert!(ExprRef::ptr_eq(&u.operand, &c));
    }

    #[test]
    fn test_literal_cast_folds_value() {
        let out = int_lit(7).add_cast(&decimal(10, 2)).unwrap();
        let c = constant_of(&out);
        assert_eq!(c.type_info, decimal(10, 2));
        assert_eq!(c.constval, Datum::BigInt(700));
    }

    #[test]
    fn test_lossless_cast_round_trip() {
        let original = int_lit(7);
        let widened = original.clone().add_cast(&simple(TypeKind::BigInt)).unwrap();
        let back = widened.add_cast(&simple(TypeKind::Int)).unwrap();
        assert_eq!(*original, *back);

        let through_decimal = original
            .clone()
            .add_cast(&decimal(10, 2))
            .unwrap()
            .add_cast(&simple(TypeKind::Int))
            .unwrap();
        assert_eq!(*original, *through_decimal);
    }

    #[test]
    fn test_decimal_rescale() {
        // 123.45 stored as a scaled mantissa
        let c = Constant::new(decimal(10, 2), Datum::BigInt(12345));
        let widened = c.do_cast(&decimal(10, 3)).unwrap();
        assert_eq!(widened.constval, Datum::BigInt(123_450));
        let narrowed = c.do_cast(&decimal(10, 1)).unwrap();
        assert_eq!(narrowed.constval, Datum::BigInt(1234));
        let as_int = c.do_cast(&simple(TypeKind::Int)).unwrap();
        assert_eq!(as_int.constval, Datum::Int(123));
        let as_double = c.do_cast(&simple(TypeKind::Double)).unwrap();
        assert_eq!(as_double.constval, Datum::Double(123.45));
    }

    #[test]
    fn test_boolean_and_timestamp_become_numbers() {
        let b = Constant::new(simple(TypeKind::Boolean), Datum::Bool(true));
        assert_eq!(
            b.do_cast(&simple(TypeKind::Int)).unwrap().constval,
            Datum::Int(1)
        );
        assert_eq!(
            b.do_cast(&decimal(10, 2)).unwrap().constval,
            Datum::BigInt(100)
        );

        let ts = Constant::new(simple(TypeKind::Timestamp), Datum::Time(86_400));
        assert_eq!(
            ts.do_cast(&simple(TypeKind::BigInt)).unwrap().constval,
            Datum::BigInt(86_400)
        );
    }

    #[test]
    fn test_string_cast_truncates_to_dimension() {
        let c = Constant::new(varchar(11), Datum::Str("hello world".to_string()));
        let out = c.do_cast(&varchar(5)).unwrap();
        assert_eq!(out.constval, Datum::Str("hello".to_string()));
        // TEXT is unbounded
        let out = c.do_cast(&simple(TypeKind::Text)).unwrap();
        assert_eq!(out.constval, Datum::Str("hello world".to_string()));
    }

    #[test]
    fn test_string_parses_and_renders() {
        let c = Constant::new(varchar(10), Datum::Str("42".to_string()));
        assert_eq!(
            c.do_cast(&simple(TypeKind::Int)).unwrap().constval,
            Datum::Int(42)
        );

        let n = Constant::new(simple(TypeKind::Int), Datum::Int(42));
        assert_eq!(
            n.do_cast(&varchar(10)).unwrap().constval,
            Datum::Str("42".to_string())
        );
        assert_eq!(
            n.do_cast(&varchar(1)).unwrap().constval,
            Datum::Str("4".to_string())
        );
    }

    #[test]
    fn test_invalid_value_cast_fails() {
        let b = Constant::new(simple(TypeKind::Boolean), Datum::Bool(true));
        assert!(matches!(
            b.do_cast(&simple(TypeKind::Date)),
            Err(Error::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_null_literal_adopts_new_type() {
        let null = expr_ref(Constant::null(simple(TypeKind::Int)));
        let out = null.add_cast(&simple(TypeKind::Double)).unwrap();
        let c = constant_of(&out);
        assert!(c.is_null);
        assert_eq!(c.type_info.kind, TypeKind::Double);
        assert_eq!(c.constval, Datum::Double(NULL_DOUBLE));
    }

    #[test]
    fn test_uncastable_types_fail() {
        let c = col(simple(TypeKind::Boolean));
        assert_eq!(
            c.add_cast(&simple(TypeKind::Date)).unwrap_err(),
            Error::UncastableTypes {
                from: "BOOLEAN".to_string(),
                to: "DATE".to_string(),
            }
        );
    }

    #[test]
    fn test_dict_to_related_dict_is_noop() {
        let c = col(dict_varchar(10, 3));
        let out = c.clone().add_cast(&dict_varchar(10, transient_dict(3))).unwrap();
        assert!(ExprRef::ptr_eq(&c, &out));
    }

    #[test]
    fn test_transient_cast_restrictions() {
        // non-dict string column grouped by a negotiated dictionary
        let plain = col(varchar(10));
        assert_eq!(
            plain
                .add_cast(&dict_varchar(10, TRANSIENT_DICT_ID))
                .unwrap_err(),
            Error::GroupByRequiresDictEncoding
        );

        // non-string, non-literal expression
        let num = col(simple(TypeKind::Int));
        assert_eq!(
            num.add_cast(&dict_varchar(10, transient_dict(4))).unwrap_err(),
            Error::TransientEncodingOnNonLiteral
        );
    }

    #[test]
    fn test_redundant_dictionary_cast_collapses() {
        let inner = col(dict_varchar(10, 3));
        let decompressed = inner.clone().decompress();
        let Expr::UOper(u) = &*decompressed else {
            panic!("cast wrapper expected");
        };
        assert_eq!(u.type_info.compression, Encoding::None);

        // casting the decompressed form back to the same dictionary resolves
        // to the original operand
        let out = decompressed.clone().add_cast(&dict_varchar(10, 3)).unwrap();
        assert!(ExprRef::ptr_eq(&out, &inner));
    }

    #[test]
    fn test_decompress_is_noop_without_encoding() {
        let c = col(varchar(10));
        let out = c.clone().decompress();
        assert!(ExprRef::ptr_eq(&c, &out));
    }

    #[test]
    fn test_case_cast_pushes_into_branches() {
        let when = col(simple(TypeKind::Boolean));
        let case = expr_ref(CaseExpr::new(
            varchar(1),
            vec![(when, str_lit("x", varchar(1)))],
            Some(str_lit("y", varchar(1))),
        ));
        let out = case.add_cast(&varchar(5)).unwrap();
        let Expr::Case(c) = &*out else {
            panic!("case expected");
        };
        assert_eq!(c.type_info, varchar(5));
        assert_eq!(constant_of(&c.when_then_list[0].1).type_info, varchar(5));
        assert_eq!(
            constant_of(c.else_expr.as_ref().unwrap()).type_info,
            varchar(5)
        );
    }

    #[test]
    fn test_case_cast_rewrites_transient_dictionary() {
        let when = col(simple(TypeKind::Boolean));
        let case_ti = SqlTypeInfo::with_encoding(TypeKind::Varchar, 10, 0, false, Encoding::None, 7);
        let case = expr_ref(CaseExpr::new(
            case_ti,
            vec![(when, str_lit("x", varchar(10)))],
            None,
        ));
        let out = case.add_cast(&dict_varchar(10, TRANSIENT_DICT_ID)).unwrap();
        let Expr::Case(c) = &*out else {
            panic!("case expected");
        };
        assert_eq!(c.type_info.comp_param, transient_dict(7));
        assert_eq!(c.type_info.compression, Encoding::Dict);
    }

    #[test]
    fn test_subquery_operations_are_unsupported() {
        let sq = expr_ref(Subquery::new(
            simple(TypeKind::Int),
            Box::new(Query::new()),
        ));
        assert_eq!(sq.deep_copy().unwrap_err(), Error::UnsupportedSubqueryOp);
        assert_eq!(
            sq.add_cast(&simple(TypeKind::BigInt)).unwrap_err(),
            Error::UnsupportedSubqueryOp
        );
    }

    #[test]
    fn test_case_domain_collects_literals_and_columns() {
        let when = col(simple(TypeKind::Boolean));
        let case = CaseExpr::new(
            varchar(10),
            vec![
                (when.clone(), str_lit("x", varchar(10))),
                (when.clone(), col(varchar(10))),
            ],
            Some(str_lit("y", varchar(10))),
        );
        let mut domain = Vec::new();
        Expr::Case(case).get_domain(&mut domain);
        assert_eq!(domain.len(), 3);
    }

    #[test]
    fn test_case_domain_counts_cast_literals_once() {
        let when = col(simple(TypeKind::Boolean));
        let cast_lit = expr_ref(UOper::new(varchar(5), UnaryOp::Cast, str_lit("x", varchar(1))));
        let case = CaseExpr::new(
            varchar(5),
            vec![
                (when.clone(), cast_lit.clone()),
                (when.clone(), cast_lit.clone()),
            ],
            None,
        );
        let mut domain = Vec::new();
        Expr::Case(case).get_domain(&mut domain);
        assert_eq!(domain.len(), 1);
    }

    #[test]
    fn test_case_domain_is_empty_when_unbounded() {
        let when = col(simple(TypeKind::Boolean));
        let computed = expr_ref(UOper::new(
            simple(TypeKind::Int),
            UnaryOp::UMinus,
            col(simple(TypeKind::Int)),
        ));
        let case = CaseExpr::new(
            simple(TypeKind::Int),
            vec![(when.clone(), int_lit(1)), (when, computed)],
            None,
        );
        let mut domain = Vec::new();
        Expr::Case(case).get_domain(&mut domain);
        assert!(domain.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::ir::expr::{BinOper, BinaryOp};
    use crate::types::{transient_dict, Encoding, SqlTypeInfo, TypeKind};

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

    #[test]
    fn test_smallint_plus_decimal_promotes_to_decimal() {
        let (result, left, right) =
            BinOper::analyze_type(BinaryOp::Plus, &simple(TypeKind::SmallInt), &decimal(10, 2))
                .unwrap();
        assert_eq!(result, decimal(10, 2));
        assert_eq!(left, decimal(10, 2));
        assert_eq!(right, decimal(10, 2));
    }

    #[test]
    fn test_float_plus_decimal_promotes_to_float() {
        let (result, left, right) =
            BinOper::analyze_type(BinaryOp::Plus, &simple(TypeKind::Float), &decimal(10, 2))
                .unwrap();
        assert_eq!(result.kind, TypeKind::Float);
        assert_eq!(left.kind, TypeKind::Float);
        assert_eq!(right.kind, TypeKind::Float);
    }

    #[test]
    fn test_integer_widening() {
        let (result, _, _) =
            BinOper::analyze_type(BinaryOp::Plus, &simple(TypeKind::SmallInt), &simple(TypeKind::Int))
                .unwrap();
        assert_eq!(result.kind, TypeKind::Int);
        let (result, _, _) =
            BinOper::analyze_type(BinaryOp::Plus, &simple(TypeKind::Int), &simple(TypeKind::BigInt))
                .unwrap();
        assert_eq!(result.kind, TypeKind::BigInt);
    }

    #[test]
    fn test_same_kind_decimals_take_max_precision_and_scale() {
        let common = BinOper::common_numeric_type(&decimal(10, 2), &decimal(5, 4));
        assert_eq!(common, decimal(10, 4));
        let numeric = |d, s| SqlTypeInfo::new(TypeKind::Numeric, d, s, false);
        let common = BinOper::common_numeric_type(&numeric(10, 2), &numeric(5, 4));
        assert_eq!(common, numeric(10, 4));
    }

    #[test]
    fn test_cross_kind_decimal_pair_widens_integer_digits() {
        // 8 integer digits on one side, 4 fractional digits on the other
        let numeric = SqlTypeInfo::new(TypeKind::Numeric, 5, 4, false);
        let common = BinOper::common_numeric_type(&decimal(10, 2), &numeric);
        assert_eq!(common, SqlTypeInfo::new(TypeKind::Numeric, 12, 4, false));
    }

    #[test]
    fn test_numeric_promotion_is_symmetric() {
        let types = [
            simple(TypeKind::SmallInt),
            simple(TypeKind::Int),
            simple(TypeKind::BigInt),
            simple(TypeKind::Float),
            simple(TypeKind::Double),
            decimal(10, 2),
            decimal(5, 4),
            SqlTypeInfo::new(TypeKind::Numeric, 8, 1, false),
        ];
        for a in &types {
            for b in &types {
                assert_eq!(
                    BinOper::common_numeric_type(a, b),
                    BinOper::common_numeric_type(b, a),
                    "promotion of {} and {} is not symmetric",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_timestamp_date_comparison_coerces_to_timestamp() {
        let ts = simple(TypeKind::Timestamp);
        let date = simple(TypeKind::Date);
        let (result, left, right) = BinOper::analyze_type(BinaryOp::Eq, &ts, &date).unwrap();
        assert_eq!(result.kind, TypeKind::Boolean);
        assert_eq!(left.kind, TypeKind::Timestamp);
        assert_eq!(left.dimension, 0);
        assert_eq!(right.kind, TypeKind::Timestamp);
    }

    #[test]
    fn test_time_date_comparison_fails() {
        let err = BinOper::analyze_type(
            BinaryOp::Eq,
            &simple(TypeKind::Time),
            &simple(TypeKind::Date),
        )
        .unwrap_err();
        assert!(matches!(err, Error::IncomparableTemporals { .. }));

        let err = BinOper::analyze_type(
            BinaryOp::Lt,
            &simple(TypeKind::Timestamp),
            &simple(TypeKind::Time),
        )
        .unwrap_err();
        assert!(matches!(err, Error::IncomparableTemporals { .. }));
    }

    #[test]
    fn test_string_coerces_to_temporal_side() {
        let (result, left, right) =
            BinOper::analyze_type(BinaryOp::Eq, &varchar(20), &simple(TypeKind::Date)).unwrap();
        assert_eq!(result.kind, TypeKind::Boolean);
        assert_eq!(left.kind, TypeKind::Date);
        assert_eq!(right.kind, TypeKind::Date);
    }

    #[test]
    fn test_equal_types_compare_unchanged() {
        let ti = dict_varchar(10, 3);
        let (result, left, right) = BinOper::analyze_type(BinaryOp::Eq, &ti, &ti).unwrap();
        assert_eq!(result.kind, TypeKind::Boolean);
        assert_eq!(left, ti);
        assert_eq!(right, ti);
    }

    #[test]
    fn test_logic_requires_booleans() {
        let err = BinOper::analyze_type(
            BinaryOp::And,
            &simple(TypeKind::Boolean),
            &simple(TypeKind::Int),
        )
        .unwrap_err();
        assert_eq!(err, Error::NonBooleanInLogic);
    }

    #[test]
    fn test_arithmetic_requires_numbers() {
        let err =
            BinOper::analyze_type(BinaryOp::Plus, &varchar(10), &simple(TypeKind::Int)).unwrap_err();
        assert_eq!(err, Error::NonNumericArithmetic);
    }

    #[test]
    fn test_modulo_requires_integers() {
        let err = BinOper::analyze_type(
            BinaryOp::Modulo,
            &simple(TypeKind::Int),
            &simple(TypeKind::Float),
        )
        .unwrap_err();
        assert_eq!(err, Error::NonIntegerModulo);
    }

    #[test]
    fn test_incomparable_kinds_fail() {
        let err = BinOper::analyze_type(
            BinaryOp::Eq,
            &simple(TypeKind::Boolean),
            &simple(TypeKind::Date),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Incomparable { .. }));
    }

    #[test]
    fn test_result_nullability_is_conjunction() {
        let notnull = SqlTypeInfo::simple(TypeKind::Int, true);
        let nullable = SqlTypeInfo::simple(TypeKind::BigInt, false);
        let (result, left, right) =
            BinOper::analyze_type(BinaryOp::Plus, &notnull, &nullable).unwrap();
        assert!(!result.notnull);
        assert!(left.notnull);
        assert!(!right.notnull);

        let (result, _, _) = BinOper::analyze_type(BinaryOp::Plus, &notnull, &notnull).unwrap();
        assert!(result.notnull);
    }

    #[test]
    fn test_shared_dictionary_is_kept() {
        let common = BinOper::common_string_type(&dict_varchar(10, 3), &dict_varchar(20, 3));
        assert_eq!(common, dict_varchar(20, 3));
    }

    #[test]
    fn test_transient_related_dictionaries_are_kept() {
        let transient = dict_varchar(20, transient_dict(3));
        let common = BinOper::common_string_type(&dict_varchar(10, 3), &transient);
        assert_eq!(common.compression, Encoding::Dict);
        assert_eq!(common.comp_param, transient_dict(3));
        assert_eq!(common.dimension, 20);
    }

    #[test]
    fn test_unrelated_dictionaries_decompress() {
        let common = BinOper::common_string_type(&dict_varchar(10, 3), &dict_varchar(20, 5));
        assert_eq!(common.kind, TypeKind::Varchar);
        assert_eq!(common.dimension, 20);
        assert_eq!(common.compression, Encoding::None);
        assert_eq!(common.comp_param, 5);
    }

    #[test]
    fn test_text_dominates_string_promotion() {
        let text = SqlTypeInfo::simple(TypeKind::Text, false);
        let common = BinOper::common_string_type(&text, &varchar(20));
        assert_eq!(common.kind, TypeKind::Text);
    }
}

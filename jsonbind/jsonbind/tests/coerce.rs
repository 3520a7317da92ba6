use jsonbind::{DecodeErrorKind, Scalar, ScalarKind, Shape, Value, coerce_scalar};

fn coerce(value: Value, kind: ScalarKind) -> Scalar {
    coerce_scalar(false, &value, kind)
        .expect("coercible value")
        .expect("non-null result")
}

#[test]
fn null_follows_field_nullability() {
    for kind in [
        ScalarKind::Int,
        ScalarKind::String,
        ScalarKind::Bool,
        ScalarKind::Float,
    ] {
        assert_eq!(coerce_scalar(true, &Value::Null, kind).unwrap(), None);
    }

    assert_eq!(coerce(Value::Null, ScalarKind::Int), Scalar::Int(0));
    assert_eq!(coerce(Value::Null, ScalarKind::String), Scalar::String(String::new()));
    assert_eq!(coerce(Value::Null, ScalarKind::Bool), Scalar::Bool(false));
    assert_eq!(coerce(Value::Null, ScalarKind::Float), Scalar::Float(0.0));
}

#[test]
fn non_null_values_ignore_nullability() {
    assert_eq!(
        coerce_scalar(true, &Value::Int(4), ScalarKind::Int).unwrap(),
        Some(Scalar::Int(4))
    );
}

#[test]
fn string_conversion() {
    assert_eq!(coerce(Value::Int(-3), ScalarKind::String), Scalar::String("-3".into()));
    assert_eq!(coerce(Value::Float(2.5), ScalarKind::String), Scalar::String("2.5".into()));
    assert_eq!(coerce(Value::Bool(true), ScalarKind::String), Scalar::String("true".into()));
    assert_eq!(coerce(Value::string("x"), ScalarKind::String), Scalar::String("x".into()));
}

#[test]
fn int_conversion() {
    assert_eq!(coerce(Value::Float(2.9), ScalarKind::Int), Scalar::Int(2));
    assert_eq!(coerce(Value::Float(-2.9), ScalarKind::Int), Scalar::Int(-2));
    assert_eq!(coerce(Value::Float(f64::NAN), ScalarKind::Int), Scalar::Int(0));
    assert_eq!(coerce(Value::Float(1e300), ScalarKind::Int), Scalar::Int(i64::MAX));
    assert_eq!(coerce(Value::Bool(true), ScalarKind::Int), Scalar::Int(1));
    assert_eq!(coerce(Value::string(" 17 "), ScalarKind::Int), Scalar::Int(17));
    assert_eq!(coerce(Value::string("4.75"), ScalarKind::Int), Scalar::Int(4));
    assert_eq!(coerce(Value::string("abc"), ScalarKind::Int), Scalar::Int(0));
}

#[test]
fn float_conversion() {
    assert_eq!(coerce(Value::Int(3), ScalarKind::Float), Scalar::Float(3.0));
    assert_eq!(coerce(Value::Bool(true), ScalarKind::Float), Scalar::Float(1.0));
    assert_eq!(coerce(Value::string("0.5"), ScalarKind::Float), Scalar::Float(0.5));
    assert_eq!(coerce(Value::string("n/a"), ScalarKind::Float), Scalar::Float(0.0));
}

#[test]
fn bool_conversion_uses_truthiness() {
    let falsy = [
        Value::Int(0),
        Value::Float(0.0),
        Value::string(""),
        Value::string("0"),
        Value::List(vec![]),
        Value::map(Vec::<(&str, Value)>::new()),
        Value::Bytes(Vec::<u8>::new().into()),
    ];
    for value in falsy {
        assert_eq!(coerce(value, ScalarKind::Bool), Scalar::Bool(false));
    }

    let truthy = [
        Value::Int(-1),
        Value::Float(0.1),
        Value::string("false"),
        Value::List(vec![Value::Null]),
        Value::map([("k", Value::Null)]),
    ];
    for value in truthy {
        assert_eq!(coerce(value, ScalarKind::Bool), Scalar::Bool(true));
    }
}

#[test]
fn aggregates_do_not_convert_to_text_or_numbers() {
    for kind in [ScalarKind::String, ScalarKind::Int, ScalarKind::Float] {
        let err = coerce_scalar(false, &Value::map([("k", Value::Int(1))]), kind).unwrap_err();
        assert!(matches!(
            err.kind(),
            DecodeErrorKind::Coercion { shape: Shape::Other, expected } if *expected == kind.name()
        ));
    }

    let err = coerce_scalar(false, &Value::List(vec![]), ScalarKind::Int).unwrap_err();
    assert_eq!(err.to_string(), "cannot convert list value to int");
}

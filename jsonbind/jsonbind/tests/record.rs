use std::sync::Arc;

use jsonbind::{
    Decoder, DecodeErrorKind, FieldDef, FieldType, Record, RecordSchema, RecordSchemaError,
    RecordValue, Scalar, Target, TypeRegistry, Value, format_record,
};

fn field(name: &str, ty: &str) -> FieldDef {
    FieldDef::new(name, ty.parse::<FieldType>().expect("valid field type"))
}

fn person_schema() -> RecordSchema {
    RecordSchema::new(
        "Person",
        vec![
            field("name", "string").with_key("first_name"),
            field("age", "?int"),
            field("id", "int|string"),
            field("friends", "list").with_element_type("Person"),
            field("address", "?Address"),
        ],
    )
    .unwrap()
}

fn address_schema() -> RecordSchema {
    RecordSchema::new(
        "Address",
        vec![
            field("city", "string"),
            field("zip", "?string").with_key("codes.zip"),
        ],
    )
    .unwrap()
}

fn decoder() -> Decoder {
    Decoder::builder()
        .with_record(person_schema())
        .with_record(address_schema())
        .build()
}

#[test]
fn new_record_starts_with_zero_and_null_values() {
    let record = Record::new(Arc::new(person_schema()));

    assert_eq!(record.type_name(), "Person");
    assert_eq!(record.scalar("name"), Some(&Scalar::String(String::new())));
    assert_eq!(record.scalar("age"), None);
    assert_eq!(record.scalar("id"), Some(&Scalar::Int(0)));
    assert_eq!(record.list("friends").map(<[_]>::len), Some(0));
    assert!(record.object("address").is_none());
    assert!(record.get("missing").is_none());
}

#[test]
fn record_decodes_like_a_bound_type() {
    let data = Value::map([
        ("first_name", Value::string("Foo")),
        ("age", Value::string("33")),
        ("id", Value::string("A-1")),
        (
            "friends",
            Value::List(vec![Value::map([
                ("first_name", Value::string("Bar")),
                ("id", Value::Int(2)),
            ])]),
        ),
        (
            "address",
            Value::map([
                ("city", Value::string("Oslo")),
                ("codes", Value::map([("zip", Value::Int(150))])),
            ]),
        ),
    ]);

    let target = decoder().decode_new("Person", &data).unwrap();
    let record = Record::from_target(target.as_ref()).unwrap();

    assert_eq!(record.scalar("name"), Some(&Scalar::String("Foo".into())));
    assert_eq!(record.scalar("age"), Some(&Scalar::Int(33)));
    assert_eq!(record.scalar("id"), Some(&Scalar::String("A-1".into())));

    let friends = record.list("friends").unwrap();
    assert_eq!(friends.len(), 1);
    let friend = Record::from_target(friends[0].as_ref()).unwrap();
    assert_eq!(friend.scalar("name"), Some(&Scalar::String("Bar".into())));
    assert_eq!(friend.scalar("id"), Some(&Scalar::Int(2)));

    let address = Record::from_target(record.object("address").unwrap()).unwrap();
    assert_eq!(address.scalar("city"), Some(&Scalar::String("Oslo".into())));
    assert_eq!(address.scalar("zip"), Some(&Scalar::String("150".into())));
}

#[test]
fn record_union_field_rejects_other_shapes() {
    let data = Value::map([("id", Value::Bool(true))]);
    let err = decoder().decode_new("Person", &data).unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::UnionTypeMismatch { .. }));
    assert_eq!(err.path_string(), ".id");
}

#[test]
fn record_list_without_element_type_fails() {
    let schema = RecordSchema::new("Bag", vec![field("items", "list")]).unwrap();
    let decoder = Decoder::builder().with_record(schema).build();

    let err = decoder
        .decode_new("Bag", &Value::map(Vec::<(&str, Value)>::new()))
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        DecodeErrorKind::MissingElementType { field } if field == "items"
    ));
}

fn holder_schema() -> RecordSchema {
    RecordSchema::new(
        "Holder",
        vec![field("items", "int|array|null").with_element_type("Item")],
    )
    .unwrap()
}

fn item_schema() -> RecordSchema {
    RecordSchema::new("Item", vec![field("n", "int")]).unwrap()
}

#[test]
fn union_with_array_member_holds_lists_or_scalars() {
    let decoder = Decoder::builder()
        .with_record(holder_schema())
        .with_record(item_schema())
        .build();
    let mut holder = Record::new(Arc::new(holder_schema()));

    let items = Value::List(vec![
        Value::map([("n", Value::Int(1))]),
        Value::map([("n", Value::Int(2))]),
    ]);
    decoder
        .decode(&mut holder, &Value::map([("items", items)]))
        .unwrap();
    let list = holder.list("items").unwrap();
    assert_eq!(list.len(), 2);
    let second = Record::from_target(list[1].as_ref()).unwrap();
    assert_eq!(second.scalar("n"), Some(&Scalar::Int(2)));
    assert_eq!(holder.scalar("items"), None);

    decoder
        .decode(&mut holder, &Value::map(Vec::<(&str, Value)>::new()))
        .unwrap();
    assert_eq!(holder.list("items").map(<[_]>::len), Some(2));

    decoder
        .decode(&mut holder, &Value::map([("items", Value::Int(5))]))
        .unwrap();
    assert!(holder.list("items").is_none());
    assert_eq!(holder.scalar("items"), Some(&Scalar::Int(5)));

    decoder
        .decode(&mut holder, &Value::map([("items", Value::Null)]))
        .unwrap();
    assert!(holder.list("items").is_none());
    assert_eq!(holder.scalar("items"), None);
}

#[test]
fn union_array_member_needs_element_type() {
    let schema = RecordSchema::new("Holder", vec![field("items", "array|null")]).unwrap();
    let decoder = Decoder::builder().with_record(schema).build();

    let target = decoder
        .decode_new("Holder", &Value::map([("items", Value::Null)]))
        .unwrap();
    assert!(Record::from_target(target.as_ref()).unwrap().list("items").is_none());

    let data = Value::map([("items", Value::List(vec![]))]);
    let err = decoder.decode_new("Holder", &data).unwrap_err();
    assert!(matches!(
        err.kind(),
        DecodeErrorKind::MissingElementType { field } if field == "items"
    ));
    assert_eq!(err.path_string(), ".items");
}

#[test]
fn record_list_rejects_elements_of_other_types() {
    let schema = RecordSchema::new(
        "Box",
        vec![field("items", "list").with_element_type("Address")],
    )
    .unwrap();
    let decoder = Decoder::builder()
        .with_record(schema)
        .with_constructor("Address", || {
            Box::new(Record::new(Arc::new(person_schema())))
        })
        .build();

    let data = Value::map([(
        "items",
        Value::List(vec![Value::map([("city", Value::string("x"))])]),
    )]);
    let err = decoder.decode_new("Box", &data).unwrap_err();

    assert!(matches!(err.kind(), DecodeErrorKind::TypeConstruction { .. }));
    assert_eq!(err.path_string(), ".items[0]");
}

#[test]
fn record_scalars_reject_values_outside_their_type() {
    let mut record = Record::new(Arc::new(person_schema()));
    let Some(RecordValue::Scalar(_)) = record.get("age") else {
        panic!("age should be a scalar");
    };

    let Some(jsonbind::core::FieldMut::Scalar(slot)) = record.field_mut("name") else {
        panic!("name should be a scalar slot");
    };
    assert!(slot.assign(None).is_err());
    assert!(slot.assign(Some(Scalar::Int(1))).is_err());
    assert!(slot.assign(Some(Scalar::String("ok".into()))).is_ok());
}

#[test]
fn schema_rejects_duplicates_and_bad_element_types() {
    let err = RecordSchema::new("T", vec![field("a", "int"), field("a", "string")]).unwrap_err();
    assert_eq!(
        err,
        RecordSchemaError::DuplicateField {
            type_name: "T".into(),
            field: "a".into(),
        }
    );

    let err = RecordSchema::new("T", vec![field("a", "list").with_element_type("int")])
        .unwrap_err();
    assert!(matches!(err, RecordSchemaError::InvalidElementType { .. }));

    let err = RecordSchema::new("", Vec::<FieldDef>::new()).unwrap_err();
    assert_eq!(err, RecordSchemaError::EmptyTypeName);
}

#[test]
fn registry_lists_and_constructs_record_types() {
    let mut registry = TypeRegistry::new();
    registry.register_record(person_schema());
    registry.register_record(address_schema());

    assert_eq!(registry.type_names(), ["Address", "Person"]);
    assert!(registry.contains("Person"));
    assert!(!registry.contains("Team"));

    let instance = registry.construct("Address").unwrap();
    assert_eq!(instance.type_name(), "Address");

    let err = registry.construct("Team").unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot construct type 'Team': type is not registered"
    );
}

#[test]
fn format_record_renders_nested_values() -> Result<(), std::fmt::Error> {
    let data = Value::map([
        ("first_name", Value::string("Foo")),
        (
            "friends",
            Value::List(vec![Value::map([("first_name", Value::string("Bar"))])]),
        ),
        (
            "address",
            Value::map([
                ("city", Value::string("Oslo")),
                ("codes", Value::map([("zip", Value::Null)])),
            ]),
        ),
    ]);
    let target = decoder().decode_new("Person", &data).unwrap();
    let record = Record::from_target(target.as_ref()).unwrap();

    let text = format_record(record)?;
    let expected = "\
Person {
    name: \"Foo\"
    age: null
    id: 0
    friends: [
        Person {
            name: \"Bar\"
            age: null
            id: 0
            friends: []
            address: null
        }
    ]
    address: Address {
        city: \"Oslo\"
        zip: null
    }
}
";
    assert_eq!(text, expected);
    assert_eq!(record.to_string(), expected);
    Ok(())
}

use jsonbind_core::{
    DecodeErrorKind, FieldMut, FieldType, Kind, KindSet, ListSlot, OptionalObject, Scalar,
    ScalarKind, ScalarSlot, ScalarType, Target, TargetType, Value, bind, field_defs,
    scalar_union,
};

scalar_union! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum Id {
        Number(i64),
        Text(String),
    }
}

impl Default for Id {
    fn default() -> Self {
        Id::Number(0)
    }
}

#[derive(Debug, Default)]
struct Address {
    city: String,
}

bind! {
    impl Address as "Address" {
        city: scalar("city"),
    }
}

#[derive(Debug, Default)]
struct Person {
    id: Id,
    alias: Option<Id>,
    name: String,
    age: Option<i64>,
    score: f64,
    active: bool,
    friends: Vec<Person>,
    previous: Option<Vec<Address>>,
    home: Address,
    work: Option<Address>,
    notes: String,
}

bind! {
    impl Person as "Person" {
        id: scalar("id"),
        alias: scalar("alias"),
        name: scalar("first_name"),
        age: scalar("stats.age"),
        score: scalar("score"),
        active: scalar("active"),
        friends: list("friends", "Person"),
        previous: list("previous", "Address"),
        home: object("home"),
        work: object("work"),
    }
}

#[test]
fn bindings_follow_declaration_order() {
    let person = Person::default();
    let bindings = person.bindings();
    let names: Vec<&str> = bindings.iter().map(|b| b.field.as_ref()).collect();
    assert_eq!(
        names,
        [
            "id", "alias", "name", "age", "score", "active", "friends", "previous", "home", "work"
        ]
    );
    assert_eq!(bindings[2].source_key, "first_name");
    assert_eq!(bindings[3].source_key, "stats.age");
    assert_eq!(bindings[6].element_type(), Some("Person"));
    assert_eq!(bindings[0].element_type(), None);
}

#[test]
fn unbound_fields_expose_no_slot() {
    let mut person = Person::default();
    assert!(person.field_mut("notes").is_none());
    assert!(person.field_mut("missing").is_none());
}

#[test]
fn field_defs_derive_types_from_slots() {
    let mut person = Person::default();
    let defs = field_defs(&mut person);
    let ty = |name: &str| defs.get(name).expect("bound field").field_type.clone();

    assert_eq!(ty("id"), FieldType::Union(KindSet::of(&[Kind::Int, Kind::String])));
    assert_eq!(
        ty("alias"),
        FieldType::Union(KindSet::of(&[Kind::Int, Kind::String, Kind::Null]))
    );
    assert_eq!(ty("name"), FieldType::Scalar(ScalarKind::String));
    assert_eq!(ty("age"), FieldType::nullable(FieldType::Scalar(ScalarKind::Int)));
    assert_eq!(ty("score"), FieldType::Scalar(ScalarKind::Float));
    assert_eq!(ty("active"), FieldType::Scalar(ScalarKind::Bool));
    assert_eq!(ty("friends"), FieldType::List);
    assert_eq!(ty("previous"), FieldType::nullable(FieldType::List));
    assert_eq!(ty("home"), FieldType::object("Address"));
    assert_eq!(ty("work"), FieldType::nullable(FieldType::object("Address")));
    assert_eq!(Person::TYPE_NAME, "Person");
}

#[test]
fn union_kinds_come_from_payload_types() {
    assert_eq!(Id::DECLARED.kinds(), KindSet::of(&[Kind::Int, Kind::String]));
    assert_eq!(Id::from_scalar(Scalar::Int(4)), Ok(Id::Number(4)));
    assert_eq!(
        Id::from_scalar(Scalar::String("x".into())),
        Ok(Id::Text("x".into()))
    );
    assert_eq!(Id::from_scalar(Scalar::Bool(true)), Err(Scalar::Bool(true)));
}

#[test]
fn scalar_slots_assign_and_report_current_value() {
    let mut person = Person::default();

    let Some(FieldMut::Scalar(slot)) = person.field_mut("age") else {
        panic!("age should be a scalar slot");
    };
    assert_eq!(slot.current(), Value::Null);
    slot.assign(Some(Scalar::Int(33))).unwrap();
    assert_eq!(slot.current(), Value::Int(33));
    slot.assign(None).unwrap();
    assert_eq!(person.age, None);

    let Some(FieldMut::Scalar(slot)) = person.field_mut("alias") else {
        panic!("alias should be a scalar slot");
    };
    slot.assign(Some(Scalar::String("bob".into()))).unwrap();
    assert_eq!(person.alias, Some(Id::Text("bob".into())));
}

#[test]
fn required_scalar_slot_rejects_null_and_other_kinds() {
    let mut person = Person::default();
    let Some(FieldMut::Scalar(slot)) = person.field_mut("name") else {
        panic!("name should be a scalar slot");
    };

    let err = slot.assign(None).unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::SlotMismatch { actual, .. } if actual == "null"));

    let err = slot.assign(Some(Scalar::Int(1))).unwrap_err();
    assert_eq!(err.to_string(), "field declared as string cannot hold int");
}

#[test]
fn list_slots_check_element_type() {
    let mut person = Person::default();
    let Some(FieldMut::List(slot)) = person.field_mut("friends") else {
        panic!("friends should be a list slot");
    };

    assert_eq!(slot.element_type(), "Person");
    assert!(!slot.is_nullable());
    assert!(slot.accepts(&Person::default()));
    assert!(!slot.accepts(&Address::default()));

    let items: Vec<Box<dyn Target>> = vec![Box::new(Person::default()), Box::new(Person::default())];
    slot.replace(items).unwrap();
    assert_eq!(person.friends.len(), 2);
}

#[test]
fn list_slot_replace_rejects_foreign_instances() {
    let mut person = Person::default();
    let Some(FieldMut::List(slot)) = person.field_mut("previous") else {
        panic!("previous should be a list slot");
    };

    let items: Vec<Box<dyn Target>> = vec![Box::new(Person::default())];
    let err = slot.replace(items).unwrap_err();
    assert!(matches!(
        err.kind(),
        DecodeErrorKind::TypeConstruction { type_name, .. } if type_name == "Person"
    ));
    assert!(person.previous.is_none());
}

#[test]
fn object_slots_distinguish_required_and_optional() {
    let mut person = Person::default();

    assert!(matches!(person.field_mut("home"), Some(FieldMut::Object(_))));

    let Some(FieldMut::OptionalObject(slot)) = person.field_mut("work") else {
        panic!("work should be an optional object slot");
    };
    assert_eq!(slot.type_name(), "Address");
    assert!(!slot.is_set());
    slot.install(Box::new(Address {
        city: "Oslo".into(),
    }))
    .unwrap();
    assert!(slot.is_set());
    assert_eq!(person.work.map(|a| a.city), Some("Oslo".to_string()));
}

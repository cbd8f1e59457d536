//! End-to-end tests for record, mapping and sequence conversion


use chrono::{TimeZone, Utc};
use shapecast_core::{
    convert, impl_record, is_empty, ConvertOptions, Converter, Error, FaultPolicy, Hooks,
    RecordSchema, ScalarKind, Shape, TypeDesc, Value,
};
use std::collections::BTreeMap;
use std::thread;
use test_support::*;

#[test]
fn test_order_into_summary() {
    let order = sample_order();
    let mut summary = OrderSummary::default();

    convert(&order, &mut summary, &Hooks::new()).expect("conversion should succeed");

    assert_eq!(summary.id, "ORD-0001");
    assert_eq!(summary.created, "2021-08-12 09:30:00");
    assert_eq!(summary.status, "paid");
    assert_eq!(summary.items.len(), order.items.len());
    for (source, target) in order.items.iter().zip(&summary.items) {
        assert_eq!(target.id, source.id);
        assert_eq!(target.item_name, source.item_name);
        assert_eq!(target.price, source.price);
    }
}

#[test]
fn test_same_type_conversion_is_copy() {
    let order = sample_order();
    let mut copy = OrderEx::default();
    convert(&order, &mut copy, &Hooks::new()).unwrap();
    assert_eq!(copy, order);
}

#[test]
fn test_nested_records_with_aliases() {
    let user = sample_user();
    let mut profile = ProfileExample::default();
    convert(&user, &mut profile, &Hooks::new()).unwrap();

    assert_eq!(profile.first_name, "Test");
    assert_eq!(profile.last_name, "Second");
    assert_eq!(profile.email, "test.second@example.com");
    assert_eq!(profile.authentication.api_secret, "s3cr3t");
    assert_eq!(profile.authentication.api_token, "t0k3n");
    assert_eq!(profile.authentication.service.name, "storage");
    assert_eq!(profile.authentication.service.amount, 9.75);
}

#[test]
fn test_alias_match_with_different_names() {
    let detail = ServiceDetail {
        service: "compute".to_string(),
        cost: 120.5,
    };
    let mut cost = ServiceCost::default();
    convert(&detail, &mut cost, &Hooks::new()).unwrap();

    assert_eq!(cost.name, "compute");
    assert_eq!(cost.amount, 120.5);
}

#[test]
fn test_unmatched_fields_keep_zero_values() {
    #[derive(Debug, Default)]
    struct OnlyY {
        y: String,
    }
    #[derive(Debug, Default)]
    struct OnlyX {
        x: i64,
    }
    impl_record!(OnlyY { y: String });
    impl_record!(OnlyX { x: i64 });

    let mut target = OnlyX::default();
    let result = convert(&OnlyY { y: "value".to_string() }, &mut target, &Hooks::new());

    assert!(result.is_ok());
    assert_eq!(target.x, 0);
}

#[test]
fn test_mapping_with_timestamp_string() {
    let source = Value::mapping([
        ("name", "Test Second"),
        ("date_birth", "1977-12-11 12:21:50"),
    ]);
    let mut person = Person::default();
    convert(&source, &mut person, &Hooks::new()).unwrap();

    assert_eq!(person.name, "Test Second");
    assert_eq!(person.birth, Utc.with_ymd_and_hms(1977, 12, 11, 12, 21, 50).unwrap());
}

#[test]
fn test_float_into_integer_truncates() {
    let mut cents = 0i64;
    convert(&12.99f64, &mut cents, &Hooks::new()).unwrap();
    assert_eq!(cents, 12);
}

#[test]
fn test_hook_precedence() {
    let dynamic = Value::dynamic(Value::from("raw"));

    // Only the second hook yields the declared type.
    let hooks = Hooks::new()
        .with(|_| Ok(Value::from("first")))
        .with(|_| Ok(Value::I64(2)));
    let mut number = 0i64;
    convert(&dynamic, &mut number, &hooks).unwrap();
    assert_eq!(number, 2);

    // Both match: registration order wins.
    let hooks = Hooks::new()
        .with(|_| Ok(Value::I64(1)))
        .with(|_| Ok(Value::I64(2)));
    let mut number = 0i64;
    convert(&dynamic, &mut number, &hooks).unwrap();
    assert_eq!(number, 1);
}

#[test]
fn test_dynamic_falls_through_to_static_rules() {
    let hooks = Hooks::new().with(|_| Err(anyhow::anyhow!("never applies")));
    let mut number = 0u8;
    convert(&Value::dynamic(Value::I64(7)), &mut number, &hooks).unwrap();
    assert_eq!(number, 7);
}

#[test]
fn test_structural_fault_policies() {
    let source = Value::mapping([
        ("id", Value::from("ORD-9")),
        ("items", Value::from(3i64)),
        ("status", Value::from("open")),
    ]);

    let mut order = OrderEx::default();
    let err = convert(&source, &mut order, &Hooks::new()).unwrap_err();
    match &err {
        Error::UnsupportedPairing {
            source_type,
            target_type,
            path,
        } => {
            assert_eq!(source_type, "i64");
            assert_eq!(target_type, "[]OrderItem");
            assert_eq!(path, "$.items");
        }
        other => panic!("expected unsupported pairing, got {:?}", other),
    }
    assert_eq!(order, OrderEx::default());

    let swallowing = Converter::new()
        .with_options(ConvertOptions::new().with_fault_policy(FaultPolicy::Swallow));
    swallowing.convert(&source, &mut order).unwrap();
    assert_eq!(order.id, "ORD-9");
    assert!(order.items.is_empty());
    assert_eq!(order.status, "");
}

#[test]
fn test_mapping_into_typed_mapping() {
    let source = Value::from_json_str(r#"{"apples": "12", "pears": 4, "plums": 2.9}"#).unwrap();
    let mut stock: BTreeMap<String, u32> = BTreeMap::new();
    convert(&source, &mut stock, &Hooks::new()).unwrap();

    assert_eq!(stock.get("apples"), Some(&12));
    assert_eq!(stock.get("pears"), Some(&4));
    assert_eq!(stock.get("plums"), Some(&2));

    let bad = Value::from_json_str(r#"{"apples": "a dozen"}"#).unwrap();
    let err = convert(&bad, &mut stock, &Hooks::new()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(!err.is_structural());
}

#[test]
fn test_schema_from_struct_tags() {
    let schema = RecordSchema::builder("Person")
        .field("name", TypeDesc::Scalar(ScalarKind::String), &[])
        .tagged_field(
            "birth",
            TypeDesc::Scalar(ScalarKind::Timestamp),
            r#"json:"date_birth,omitempty" bson:"dob""#,
        )
        .build();
    let ty = TypeDesc::record(schema);

    let source = Value::mapping([("name", "Ada"), ("dob", "1815-12-10 00:00:00")]);
    let mut slot = ty.zero();
    Converter::new().convert_value(&source, &mut slot, &ty).unwrap();

    assert_eq!(slot.get("name"), Some(&Value::from("Ada")));
    assert_eq!(
        slot.get("birth"),
        Some(&Value::Timestamp(Utc.with_ymd_and_hms(1815, 12, 10, 0, 0, 0).unwrap()))
    );
}

#[test]
fn test_is_empty_on_converted_values() {
    let mut summary = OrderSummary::default();
    assert!(summary.to_value().is_zero());

    convert(&sample_order(), &mut summary, &Hooks::new()).unwrap();
    assert!(!summary.to_value().is_zero());
    assert!(!is_empty(&summary));
}

#[test]
fn test_shared_converter_across_threads() {
    let converter = Converter::new().with_hooks(extended_json_hooks());
    let order = sample_order();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut summary = OrderSummary::default();
                    converter.convert(&order, &mut summary).map(|_| summary)
                })
            })
            .collect();

        for handle in handles {
            let summary = handle.join().unwrap().unwrap();
            assert_eq!(summary.items.len(), 3);
        }
    });
}

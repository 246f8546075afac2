use super::*;
use serde_json::json;

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => Document::new(map),
        other => panic!("test document must be an object, got {other}"),
    }
}

#[test]
fn doc_id_renders_supported_types_canonically() {
    let cases: &[(Value, &str)] = &[
        (json!({"id": 1}), "1"),
        (json!({"id": -42}), "-42"),
        (json!({"id": 9_223_372_036_854_775_807_i64}), "9223372036854775807"),
        (json!({"id": 18_446_744_073_709_551_615_u64}), "18446744073709551615"),
        (json!({"id": 12.0}), "12"),
        (json!({"id": 12.6}), "13"),
        (json!({"id": 12.4}), "12"),
        (json!({"id": 1.0e15}), "1000000000000000"),
        (json!({"id": "2"}), "2"),
        (json!({"id": "user-7"}), "user-7"),
    ];

    for (input, expected) in cases {
        let got = doc(input.clone()).doc_id().expect("resolvable id");
        assert_eq!(
            got.as_str(),
            *expected,
            "doc_id({}) should be {:?}, got {:?}",
            input,
            expected,
            got
        );
    }
}

#[test]
fn doc_id_follows_field_priority() {
    let cases: &[(Value, &str)] = &[
        (json!({"_id": "a", "id": "b", "ID": "c", "Id": "d"}), "a"),
        (json!({"id": "b", "ID": "c", "Id": "d"}), "b"),
        (json!({"ID": "c", "Id": "d"}), "c"),
        (json!({"Id": "d", "name": "x"}), "d"),
    ];

    for (input, expected) in cases {
        let got = doc(input.clone()).doc_id().expect("resolvable id");
        assert_eq!(got.as_str(), *expected, "doc_id({})", input);
    }
}

#[test]
fn doc_id_ignores_lower_priority_fields_when_winner_is_bad() {
    let err = doc(json!({"_id": true, "id": 1})).doc_id().unwrap_err();
    assert!(matches!(
        err,
        RecordError::UnsupportedIdentity {
            field: "_id",
            kind: "bool"
        }
    ));
}

#[test]
fn doc_id_missing_field_is_an_error() {
    let cases = [json!({}), json!({"name": "A"}), json!({"iD": 1, "ident": 2})];

    for input in cases {
        let err = doc(input.clone()).doc_id().unwrap_err();
        assert!(
            matches!(err, RecordError::MissingIdentity),
            "doc_id({}) should be MissingIdentity, got {:?}",
            input,
            err
        );
    }
}

#[test]
fn doc_id_rejects_unsupported_types() {
    let cases: &[(Value, &str)] = &[
        (json!({"id": null}), "null"),
        (json!({"id": false}), "bool"),
        (json!({"id": [1]}), "array"),
        (json!({"id": {"n": 1}}), "object"),
    ];

    for (input, expected_kind) in cases {
        match doc(input.clone()).doc_id() {
            Err(RecordError::UnsupportedIdentity { field, kind }) => {
                assert_eq!(field, "id");
                assert_eq!(kind, *expected_kind);
            }
            other => panic!("doc_id({}) should be unsupported, got {:?}", input, other),
        }
    }
}

#[test]
fn doc_id_rejects_empty_string() {
    let err = doc(json!({"id": ""})).doc_id().unwrap_err();
    assert!(matches!(err, RecordError::EmptyIdentity { field: "id" }));
}

#[test]
fn from_json_requires_an_object() {
    assert!(Document::from_json(r#"{"id": 1, "name": "A"}"#).is_ok());
    assert!(Document::from_json("[1, 2]").is_err());
    assert!(Document::from_json("42").is_err());
    assert!(Document::from_json("{not json").is_err());
}

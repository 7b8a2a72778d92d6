//! End-to-end coercion: compiled document in, typed values out.

use pretty_assertions::assert_eq;
use schemacast::prelude::*;

const DOCUMENT: &str = r#"{
    "types": {
        "Sentiment": { "kind": "enum", "variants": ["A", "B", "C"] },
        "Answer": {
            "kind": "object",
            "fields": {
                "prop1": { "type": { "kind": "string" } },
                "prop2": { "type": { "kind": "string" } }
            }
        },
        "Report": {
            "kind": "object",
            "fields": {
                "mood": { "type": { "kind": "reference", "name": "Sentiment" } },
                "notes": {
                    "type": { "kind": "array", "items": { "kind": "optional", "inner": { "kind": "string" } } },
                    "required": false
                },
                "confidence": { "type": { "kind": "float" }, "required": false, "default": 0.5 }
            }
        }
    },
    "aliases": {
        "Answer": { "REASONING": "prop1", "ANSWER": "prop2" },
        "Sentiment": { "k1: User is angry": "A", "k1": "A", "k2": "B" }
    }
}"#;

fn env() -> CoercionEnv {
    CoercionEnv::from_document(DOCUMENT).expect("document compiles")
}

#[test]
fn aliased_object_keys_resolve() {
    let text = r#"{"REASONING": "x", "ANSWER": "y"}"#;
    let typed = coerce_text(&env(), text, &SchemaType::reference("Answer")).unwrap();
    assert_eq!(
        typed.to_json(),
        serde_json::json!({"prop1": "x", "prop2": "y"})
    );
}

#[test]
fn enum_label_and_short_alias_resolve_identically() {
    let env = env();
    let target = SchemaType::reference("Sentiment");

    let from_label = coerce_text(&env, "k1: User is angry", &target).unwrap();
    let from_short = coerce_text(&env, "k1", &target).unwrap();
    assert_eq!(from_label.as_variant(), Some("A"));
    assert_eq!(from_label, from_short);
}

#[test]
fn payload_is_isolated_from_prose() {
    // prop2 arrives as a number; the string field renders it.
    let text = r#"Sure! Here's the answer: {"prop1":"x","prop2":5} Hope that helps!"#;
    let typed = coerce_text(&env(), text, &SchemaType::reference("Answer")).unwrap();
    assert_eq!(
        typed.to_json(),
        serde_json::json!({"prop1": "x", "prop2": "5"})
    );
}

#[test]
fn unknown_keys_never_fail_an_object() {
    let text = r#"{"prop1": "x", "prop2": "y", "explanation": "models add these"}"#;
    let typed = coerce_text(&env(), text, &SchemaType::reference("Answer")).unwrap();
    assert_eq!(
        typed.to_json(),
        serde_json::json!({"prop1": "x", "prop2": "y"})
    );
}

#[test]
fn union_picks_earliest_declared_arm() {
    let target = SchemaType::union([SchemaType::string(), SchemaType::boolean()]);
    let typed = coerce_text(&env(), r#""true""#, &target).unwrap();
    assert_eq!(typed, TypedValue::String("true".into()));
}

#[test]
fn defaults_and_optional_items_apply() {
    let text = r#"{"mood": "k2", "notes": ["ok", 12, "fine"]}"#;
    let typed = coerce_text(&env(), text, &SchemaType::reference("Report")).unwrap();

    // 12 coerces to a string ("12"); the optional item type means even an
    // uncoercible entry would degrade to null in place.
    assert_eq!(
        typed.to_json(),
        serde_json::json!({
            "mood": "B",
            "notes": ["ok", "12", "fine"],
            "confidence": 0.5
        })
    );
}

#[test]
fn round_trip_is_identity_up_to_typing() {
    let env = env();
    let raw = serde_json::json!({"prop1": "a", "prop2": "b"});
    let typed = coerce_text(&env, &raw.to_string(), &SchemaType::reference("Answer")).unwrap();
    assert_eq!(typed.to_json(), raw);
}

#[test]
fn enum_resolution_is_stable_across_calls() {
    let env = env();
    let target = SchemaType::reference("Sentiment");
    let first = coerce_text(&env, "definitely k2", &target).unwrap();
    for _ in 0..10 {
        let again = coerce_text(&env, "definitely k2", &target).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn missing_payload_reports_no_payload_found() {
    let err = coerce_text(&env(), "no json at all", &SchemaType::reference("Answer")).unwrap_err();
    assert_eq!(err, CoercionError::NoPayloadFound);
}

#[test]
fn failure_paths_are_localized() {
    let target = SchemaType::object(
        ObjectSchema::new("Wrapper").with_field(
            "items",
            FieldSchema::new(SchemaType::array(SchemaType::integer())),
        ),
    );
    let err = coerce_text(&env(), r#"{"items": [1, 2, "x"]}"#, &target).unwrap_err();
    let CoercionError::TypeMismatch { path, .. } = &err else {
        panic!("expected type mismatch, got {err}");
    };
    assert_eq!(path.to_string(), "root.items[2]");
}

#[test]
fn fenced_payload_wins_over_nothing() {
    let text = "Here is the result:\n```json\n{\"prop1\": \"a\", \"prop2\": \"b\"}\n```\n";
    let typed = coerce_text(&env(), text, &SchemaType::reference("Answer")).unwrap();
    assert_eq!(typed.field("prop1"), Some(&TypedValue::String("a".into())));
}

#[test]
fn restated_answer_is_preferred() {
    let text = r#"Draft: {"prop1": "old", "prop2": "old"}
        After reconsidering: {"prop1": "new", "prop2": "new"}"#;
    let typed = coerce_text(&env(), text, &SchemaType::reference("Answer")).unwrap();
    assert_eq!(typed.field("prop1"), Some(&TypedValue::String("new".into())));
}

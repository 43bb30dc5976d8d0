//! Property-based tests for name parsing and JSON helpers using proptest.

use proptest::prelude::*;
use serde_json::Value;
use whisk::json::{self, QuoteEscaping};
use whisk::{Dictionary, QualifiedName};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.@-]{1,20}"
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \"\n\r\t\\\\{}:,]{0,30}"
}

fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| serde_json::json!(v)),
        arb_text().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_dictionary() -> impl Strategy<Value = Dictionary> {
    prop::collection::btree_map("[a-z\"]{1,8}", arb_json_value(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

fn count_quotes(value: &Value) -> usize {
    match value {
        Value::String(s) => s.matches('"').count(),
        Value::Array(items) => items.iter().map(count_quotes).sum(),
        Value::Object(map) => map.values().map(count_quotes).sum(),
        _ => 0,
    }
}

fn count_escaped_quotes(value: &Value) -> usize {
    match value {
        Value::String(s) => s.matches("\\\"").count(),
        Value::Array(items) => items.iter().map(count_escaped_quotes).sum(),
        Value::Object(map) => map.values().map(count_escaped_quotes).sum(),
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

proptest! {
    /// `/ns/name` always splits into its two parts.
    #[test]
    fn qualified_name_with_namespace(ns in arb_segment(), name in arb_segment()) {
        let q = QualifiedName::parse(&format!("/{}/{}", ns, name));
        prop_assert_eq!(q.namespace, ns);
        prop_assert_eq!(q.name, name);
    }

    /// Package-qualified names keep everything after the namespace.
    #[test]
    fn qualified_name_with_package(ns in arb_segment(), pkg in arb_segment(), name in arb_segment()) {
        let q = QualifiedName::parse(&format!("/{}/{}/{}", ns, pkg, name));
        prop_assert_eq!(q.namespace, ns);
        prop_assert_eq!(q.name, format!("{}/{}", pkg, name));
    }

    /// Bare and slash-prefixed names resolve identically into the default namespace.
    #[test]
    fn qualified_name_default_namespace(name in arb_segment()) {
        let bare = QualifiedName::parse(&name);
        let prefixed = QualifiedName::parse(&format!("/{}", name));
        prop_assert_eq!(&bare, &prefixed);
        prop_assert_eq!(bare.namespace.as_str(), "_");
    }

    /// API paths never contain characters that need escaping outside the query.
    #[test]
    fn action_path_is_url_safe(text in "[ -~]{0,40}") {
        let path = QualifiedName::parse(&text).action_path();
        prop_assert!(path.starts_with("/api/v1/namespaces/"));
        prop_assert!(path.ends_with("?blocking=true"));
        prop_assert!(!path.contains(' '));
        prop_assert_eq!(path.matches('?').count(), 1);
    }

    /// Standard serialization is one line and parses back to the same dictionary.
    #[test]
    fn standard_serialization_round_trips(dict in arb_dictionary()) {
        let text = json::dictionary_to_json_string(&dict, QuoteEscaping::Standard).unwrap();
        prop_assert!(!text.contains('\n'));
        prop_assert!(!text.contains('\r'));
        let back: Dictionary = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(back, dict);
    }

    /// Legacy serialization is one line and still valid JSON.
    #[test]
    fn legacy_serialization_is_valid_json(dict in arb_dictionary()) {
        let text = json::dictionary_to_json_string(&dict, QuoteEscaping::Legacy).unwrap();
        prop_assert!(!text.contains(['\n', '\r']));
        prop_assert!(serde_json::from_str::<Dictionary>(&text).is_ok());
    }

    /// Escaping keeps the shape and turns every quote into an escaped quote.
    #[test]
    fn escape_preserves_shape(dict in arb_dictionary()) {
        let original = Value::Object(dict);
        let escaped = json::escape(&original).unwrap();

        prop_assert_eq!(
            escaped.as_object().map(|m| m.keys().cloned().collect::<Vec<_>>()),
            original.as_object().map(|m| m.keys().cloned().collect::<Vec<_>>())
        );
        prop_assert!(count_escaped_quotes(&escaped) >= count_quotes(&original));
        prop_assert_eq!(count_quotes(&escaped), count_quotes(&original));
    }
}

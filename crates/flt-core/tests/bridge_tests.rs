/// JSON bridge tests: schema parsing, defaults, error mapping, normalization.
use flt_core::{
    from_json, normalize, strip_defaults, to_json, Condition, ConditionValue, FilterNode,
    FltError, Group, JsonFilter, JsonNode, LogicalOp, MatchType, Symbol,
};
use serde_json::{json, Value};

fn parse(value: Value) -> JsonFilter {
    serde_json::from_value(value).expect("filter JSON must match the schema")
}

// ============================================================================
// JSON → tree
// ============================================================================

#[test]
fn from_json_applies_defaults() {
    let filter = parse(json!({
        "operation": "or",
        "conditions": [
            {"type": "condition", "value": "x", "matchType": "like"},
            {"type": "group", "operation": "Nand", "conditions": []}
        ]
    }));
    let group = from_json(&filter).unwrap();

    assert_eq!(group.operation, LogicalOp::Or);
    assert_eq!(group.head, vec![0xfe, 0xff, 0xff, 0xff]);
    assert_eq!(
        group.children,
        vec![
            FilterNode::Condition(Condition::new(MatchType::Like, 0, "x")),
            FilterNode::Group(Group::nested(LogicalOp::Nand, vec![])),
        ]
    );
}

#[test]
fn from_json_missing_operation_is_and() {
    let filter = parse(json!({"conditions": []}));
    assert_eq!(filter.operation, Symbol::name("AND"));
    assert_eq!(from_json(&filter).unwrap().operation, LogicalOp::And);
}

#[test]
fn from_json_keeps_explicit_heads() {
    let filter = parse(json!({
        "operation": "AND",
        "head": [],
        "conditions": [
            {"type": "group", "operation": "OR", "head": [1], "conditions": []}
        ]
    }));
    let group = from_json(&filter).unwrap();
    assert!(group.head.is_empty());
    match &group.children[0] {
        FilterNode::Group(nested) => assert_eq!(nested.head, vec![0x01]),
        other => panic!("expected group, got {other:?}"),
    }
}

#[test]
fn from_json_list_value() {
    let filter = parse(json!({
        "operation": "OR",
        "conditions": [{"type": "condition", "value": ["A", "B"], "matchType": "IN_LIST", "row": 2}]
    }));
    let group = from_json(&filter).unwrap();
    match &group.children[0] {
        FilterNode::Condition(c) => {
            assert_eq!(c.value, ConditionValue::List(vec!["A".into(), "B".into()]));
            assert_eq!(c.row, 2);
        }
        other => panic!("expected condition, got {other:?}"),
    }
}

#[test]
fn from_json_numeric_codes() {
    let filter = parse(json!({
        "operation": 7,
        "conditions": [{"type": "condition", "value": "v", "matchType": 153, "row": 1}]
    }));
    let group = from_json(&filter).unwrap();
    assert_eq!(group.operation, LogicalOp::Unknown(7));
    match &group.children[0] {
        FilterNode::Condition(c) => assert_eq!(c.match_type, MatchType::Unknown(0x99)),
        other => panic!("expected condition, got {other:?}"),
    }
}

#[test]
fn invalid_operation_name() {
    let filter = parse(json!({"operation": "XOR", "conditions": []}));
    match from_json(&filter) {
        Err(FltError::InvalidOperation(name)) => assert_eq!(name, "XOR"),
        other => panic!("expected InvalidOperation, got {other:?}"),
    }
}

#[test]
fn invalid_nested_operation_name() {
    let filter = parse(json!({
        "operation": "AND",
        "conditions": [{"type": "group", "operation": "maybe", "conditions": []}]
    }));
    assert!(matches!(from_json(&filter), Err(FltError::InvalidOperation(_))));
}

#[test]
fn invalid_match_type_name() {
    let filter = parse(json!({
        "operation": "AND",
        "conditions": [{"type": "condition", "value": "v", "matchType": "ALMOST", "row": 1}]
    }));
    match from_json(&filter) {
        Err(FltError::InvalidMatchType(name)) => assert_eq!(name, "ALMOST"),
        other => panic!("expected InvalidMatchType, got {other:?}"),
    }
}

#[test]
fn schema_violations_are_json_errors() {
    for bad in [
        r#"{"operation":"AND"}"#,
        r#"{"operation":"AND","conditions":[{"type":"rule","value":"v","matchType":"LIKE"}]}"#,
        r#"{"operation":"AND","conditions":[{"type":"condition","value":5,"matchType":"LIKE"}]}"#,
        r#"{"operation":"AND","conditions":[{"type":"condition","value":"v","matchType":"LIKE","row":-1}]}"#,
        r#"{"operation":"AND","head":[256],"conditions":[]}"#,
        "not json",
    ] {
        let err = flt_core::json_to_bytes(bad).unwrap_err();
        assert!(matches!(err, FltError::Json(_)), "{bad}: {err:?}");
    }
}

// ============================================================================
// Tree → JSON
// ============================================================================

#[test]
fn to_json_shape() {
    let group = Group::new(
        LogicalOp::And,
        vec![
            Condition::new(MatchType::StartsWith, 0, "Hallo").into(),
            Group::nested(
                LogicalOp::Or,
                vec![Condition::new(MatchType::Contains, 3, "!").into()],
            )
            .into(),
        ],
    );
    let value = serde_json::to_value(to_json(&group)).unwrap();
    assert_eq!(
        value,
        json!({
            "operation": "AND",
            "head": [254, 255, 255, 255],
            "conditions": [
                {"type": "condition", "value": "Hallo", "matchType": "STARTS_WITH", "row": 0},
                {
                    "type": "group",
                    "operation": "OR",
                    "head": [1],
                    "conditions": [
                        {"type": "condition", "value": "!", "matchType": "CONTAINS", "row": 3}
                    ]
                }
            ]
        })
    );
}

#[test]
fn to_json_keeps_unknown_codes_as_numbers() {
    let group = Group::new(
        LogicalOp::Unknown(9),
        vec![Condition::new(MatchType::Unknown(0x99), 1, "v").into()],
    );
    let value = serde_json::to_value(to_json(&group)).unwrap();
    assert_eq!(value["operation"], json!(9));
    assert_eq!(value["conditions"][0]["matchType"], json!(153));
}

#[test]
fn to_json_field_order() {
    let group = Group::new(
        LogicalOp::Or,
        vec![Condition::new(MatchType::Equals, 1, "a").into()],
    );
    let text = serde_json::to_string(&to_json(&group)).unwrap();
    assert_eq!(
        text,
        r#"{"operation":"OR","head":[254,255,255,255],"conditions":[{"type":"condition","value":"a","matchType":"EQUALS","row":1}]}"#
    );
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn normalize_fills_heads_recursively() {
    let filter = parse(json!({
        "operation": "AND",
        "conditions": [
            {"type": "condition", "value": "a", "matchType": "EQUALS", "row": 1},
            {"type": "group", "operation": "OR", "conditions": [
                {"type": "group", "operation": "NOR", "conditions": []}
            ]}
        ]
    }));
    let normalized = serde_json::to_value(normalize(&filter)).unwrap();
    assert_eq!(normalized["head"], json!([254, 255, 255, 255]));
    assert_eq!(normalized["conditions"][1]["head"], json!([1]));
    assert_eq!(normalized["conditions"][1]["conditions"][0]["head"], json!([1]));
    assert_eq!(
        normalized["conditions"][0],
        json!({"type": "condition", "value": "a", "matchType": "EQUALS", "row": 1})
    );
}

#[test]
fn normalize_leaves_source_untouched() {
    let filter = parse(json!({"operation": "AND", "conditions": []}));
    let normalized = normalize(&filter);
    assert_eq!(filter.head, None);
    assert_eq!(normalized.head, Some(vec![0xfe, 0xff, 0xff, 0xff]));
}

#[test]
fn normalize_is_idempotent() {
    let filter = parse(json!({
        "operation": "AND",
        "head": [9],
        "conditions": [{"type": "group", "operation": "OR", "conditions": []}]
    }));
    let once = normalize(&filter);
    assert_eq!(normalize(&once), once);
    assert_eq!(once.head, Some(vec![9]));
}

#[test]
fn normalize_writes_canonical_names() {
    let filter = parse(json!({
        "operation": "or",
        "conditions": [
            {"type": "condition", "value": "a", "matchType": "in_list", "row": 1},
            {"type": "group", "operation": 3, "conditions": [
                {"type": "condition", "value": "b", "matchType": 36, "row": 2},
                {"type": "condition", "value": "c", "matchType": 153, "row": 3}
            ]}
        ]
    }));
    let normalized = serde_json::to_value(normalize(&filter)).unwrap();
    assert_eq!(normalized["operation"], "OR");
    assert_eq!(normalized["conditions"][0]["matchType"], "IN_LIST");
    assert_eq!(normalized["conditions"][1]["operation"], "NOR");
    assert_eq!(normalized["conditions"][1]["conditions"][0]["matchType"], "STARTS_WITH");
    assert_eq!(normalized["conditions"][1]["conditions"][1]["matchType"], 153);
}

#[test]
fn normalize_keeps_unresolvable_names() {
    let filter = parse(json!({
        "operation": "xor",
        "conditions": [{"type": "condition", "value": "a", "matchType": "similar"}]
    }));
    let normalized = normalize(&filter);
    assert_eq!(normalized.operation, Symbol::name("xor"));
    match &normalized.conditions[0] {
        JsonNode::Condition(condition) => assert_eq!(condition.match_type, Symbol::name("similar")),
        other => panic!("expected condition, got {other:?}"),
    }
    assert!(matches!(from_json(&normalized), Err(FltError::InvalidMatchType(name)) if name == "similar"));
}

#[test]
fn json_roundtrip_with_lowercase_names() {
    let filter = parse(json!({
        "operation": "nand",
        "conditions": [
            {"type": "condition", "value": "x", "matchType": "Ends_With"},
            {"type": "group", "operation": "Or", "conditions": []}
        ]
    }));
    let normalized = normalize(&filter);
    assert_eq!(to_json(&from_json(&normalized).unwrap()), normalized);
}

#[test]
fn strip_defaults_undoes_normalize() {
    let filter = parse(json!({
        "operation": "OR",
        "conditions": [
            {"type": "group", "operation": "AND", "conditions": [
                {"type": "condition", "value": ["x"], "matchType": "IN_LIST", "row": 4}
            ]}
        ]
    }));
    assert_eq!(strip_defaults(&normalize(&filter)), filter);
}

#[test]
fn strip_defaults_keeps_custom_heads() {
    let filter = parse(json!({
        "operation": "OR",
        "head": [],
        "conditions": [{"type": "group", "operation": "AND", "head": [2], "conditions": []}]
    }));
    let stripped = strip_defaults(&filter);
    assert_eq!(stripped.head, Some(vec![]));
    match &stripped.conditions[0] {
        JsonNode::Group(nested) => assert_eq!(nested.head, Some(vec![2])),
        other => panic!("expected group, got {other:?}"),
    }
}

#[test]
fn json_roundtrip_through_tree() {
    let filter = parse(json!({
        "operation": "NOR",
        "conditions": [
            {"type": "condition", "value": "Welt", "matchType": "ENDS_WITH", "row": 1},
            {"type": "group", "operation": "NAND", "conditions": [
                {"type": "condition", "value": ["1", "2"], "matchType": "NOT_IN_LIST", "row": 7}
            ]}
        ]
    }));
    let normalized = normalize(&filter);
    assert_eq!(to_json(&from_json(&normalized).unwrap()), normalized);
}

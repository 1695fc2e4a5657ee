//! JSON bridge — maps the public JSON filter shape to and from [`Group`].
//!
//! ```json
//! {
//!   "operation": "AND",
//!   "head": [254, 255, 255, 255],
//!   "conditions": [
//!     { "type": "condition", "value": "test", "matchType": "EQUALS", "row": 1 },
//!     { "type": "group", "operation": "OR", "conditions": [ ... ] }
//!   ]
//! }
//! ```
//!
//! `operation` and `matchType` take a symbolic name (any case) or a raw
//! numeric code. Codes without a name come back out as numbers, so filters
//! holding codes this crate does not know still survive a round trip.
//!
//! Defaults: a missing `operation` is `AND`, a missing `row` is 0, a missing
//! top-level `head` is `FE FF FF FF` and a missing nested `head` is `01`.

use serde::{Deserialize, Serialize};

use crate::codes::{LogicalOp, MatchType};
use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::{FltError, Result};
use crate::types::{Condition, ConditionValue, FilterNode, Group, NESTED_HEAD, TOP_LEVEL_HEAD};

/// Top-level filter object; nested groups share the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonFilter {
    #[serde(default = "default_operation")]
    pub operation: Symbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Vec<u8>>,
    pub conditions: Vec<JsonNode>,
}

/// One entry of a `conditions` array, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonNode {
    Condition(JsonCondition),
    Group(JsonFilter),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCondition {
    pub value: JsonValue,
    #[serde(rename = "matchType")]
    pub match_type: Symbol,
    #[serde(default)]
    pub row: u32,
}

/// A condition operand: one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonValue {
    Single(String),
    List(Vec<String>),
}

/// An enumerated field written either by name or by raw code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Symbol {
    Name(String),
    Code(u8),
}

impl Symbol {
    pub fn name(name: &str) -> Self {
        Symbol::Name(name.to_string())
    }
}

fn default_operation() -> Symbol {
    Symbol::name("AND")
}

/// Parse a JSON filter, encode it and return the FLT bytes.
pub fn json_to_bytes(json: &str) -> Result<Vec<u8>> {
    let filter: JsonFilter = serde_json::from_str(json)?;
    encode(&from_json(&filter)?)
}

/// Decode FLT bytes and return the filter as compact JSON.
pub fn bytes_to_json(bytes: &[u8]) -> Result<String> {
    let filter = to_json(&decode(bytes)?);
    Ok(serde_json::to_string(&filter)?)
}

/// Build the filter tree for a JSON filter, applying defaults.
pub fn from_json(filter: &JsonFilter) -> Result<Group> {
    group_from_json(filter, &TOP_LEVEL_HEAD)
}

fn group_from_json(filter: &JsonFilter, default_head: &[u8]) -> Result<Group> {
    let children = filter
        .conditions
        .iter()
        .map(|node| match node {
            JsonNode::Condition(condition) => condition_from_json(condition).map(FilterNode::Condition),
            JsonNode::Group(nested) => group_from_json(nested, &NESTED_HEAD).map(FilterNode::Group),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Group {
        operation: operation_from_symbol(&filter.operation)?,
        head: filter.head.clone().unwrap_or_else(|| default_head.to_vec()),
        children,
    })
}

fn condition_from_json(condition: &JsonCondition) -> Result<Condition> {
    let value = match &condition.value {
        JsonValue::Single(s) => ConditionValue::Single(s.clone()),
        JsonValue::List(items) => ConditionValue::List(items.clone()),
    };
    Ok(Condition {
        match_type: match_type_from_symbol(&condition.match_type)?,
        row: condition.row,
        value,
    })
}

fn operation_from_symbol(symbol: &Symbol) -> Result<LogicalOp> {
    match symbol {
        Symbol::Name(name) => {
            LogicalOp::from_name(name).ok_or_else(|| FltError::InvalidOperation(name.clone()))
        }
        Symbol::Code(code) => Ok(LogicalOp::from_code(*code)),
    }
}

fn match_type_from_symbol(symbol: &Symbol) -> Result<MatchType> {
    match symbol {
        Symbol::Name(name) => {
            MatchType::from_name(name).ok_or_else(|| FltError::InvalidMatchType(name.clone()))
        }
        Symbol::Code(code) => Ok(MatchType::from_code(*code)),
    }
}

/// Convert a filter tree to its JSON shape. Every group carries its `head`;
/// unnamed codes are written as numbers.
pub fn to_json(group: &Group) -> JsonFilter {
    JsonFilter {
        operation: symbol_for(group.operation.name(), group.operation.code()),
        head: Some(group.head.clone()),
        conditions: group
            .children
            .iter()
            .map(|child| match child {
                FilterNode::Condition(condition) => JsonNode::Condition(JsonCondition {
                    value: match &condition.value {
                        ConditionValue::Single(s) => JsonValue::Single(s.clone()),
                        ConditionValue::List(items) => JsonValue::List(items.clone()),
                    },
                    match_type: symbol_for(condition.match_type.name(), condition.match_type.code()),
                    row: condition.row,
                }),
                FilterNode::Group(nested) => JsonNode::Group(to_json(nested)),
            })
            .collect(),
    }
}

fn symbol_for(name: Option<&str>, code: u8) -> Symbol {
    match name {
        Some(name) => Symbol::name(name),
        None => Symbol::Code(code),
    }
}

/// Copy of `filter` with every missing `head` filled with its default and
/// every `operation`/`matchType` written the way [`to_json`] writes it.
/// Values and rows are left untouched; unresolvable names are kept as given.
pub fn normalize(filter: &JsonFilter) -> JsonFilter {
    normalize_group(filter, &TOP_LEVEL_HEAD)
}

fn normalize_group(filter: &JsonFilter, default_head: &[u8]) -> JsonFilter {
    let operation = match operation_from_symbol(&filter.operation) {
        Ok(op) => symbol_for(op.name(), op.code()),
        Err(_) => filter.operation.clone(),
    };
    JsonFilter {
        operation,
        head: Some(filter.head.clone().unwrap_or_else(|| default_head.to_vec())),
        conditions: filter
            .conditions
            .iter()
            .map(|node| match node {
                JsonNode::Condition(condition) => JsonNode::Condition(normalize_condition(condition)),
                JsonNode::Group(nested) => JsonNode::Group(normalize_group(nested, &NESTED_HEAD)),
            })
            .collect(),
    }
}

fn normalize_condition(condition: &JsonCondition) -> JsonCondition {
    let match_type = match match_type_from_symbol(&condition.match_type) {
        Ok(m) => symbol_for(m.name(), m.code()),
        Err(_) => condition.match_type.clone(),
    };
    JsonCondition {
        match_type,
        ..condition.clone()
    }
}

/// Drops every `head` equal to its default, undoing the head filling of
/// [`normalize`].
pub fn strip_defaults(filter: &JsonFilter) -> JsonFilter {
    strip_group(filter, &TOP_LEVEL_HEAD)
}

fn strip_group(filter: &JsonFilter, default_head: &[u8]) -> JsonFilter {
    JsonFilter {
        operation: filter.operation.clone(),
        head: filter
            .head
            .clone()
            .filter(|head| head.as_slice() != default_head),
        conditions: filter
            .conditions
            .iter()
            .map(|node| match node {
                JsonNode::Group(nested) => JsonNode::Group(strip_group(nested, &NESTED_HEAD)),
                condition => condition.clone(),
            })
            .collect(),
    }
}

//! Filter tree model shared by the encoder, decoder and JSON bridge.
//!
//! A filter is a [`Group`] whose children are conditions or nested groups.
//! Child order is significant and preserved by every conversion. Trees are
//! built fresh per conversion and owned outright; nothing is shared between
//! a decoded tree and the buffer it came from.

use crate::codes::{LogicalOp, MatchType};

/// Opaque prefix of a top-level group; doubles as the BOM marker.
pub const TOP_LEVEL_HEAD: [u8; 4] = [0xfe, 0xff, 0xff, 0xff];

/// Opaque prefix of a nested group; the same byte tags a group item.
pub const NESTED_HEAD: [u8; 1] = [0x01];

/// Separator used to build the joined text of a list value.
pub const LIST_SEPARATOR: &str = ";";

/// One node of a filter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    Condition(Condition),
    Group(Group),
}

/// A logical connective applied to an ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub operation: LogicalOp,
    /// Bytes written verbatim before the operation byte.
    pub head: Vec<u8>,
    pub children: Vec<FilterNode>,
}

impl Group {
    /// A top-level group with the default BOM head.
    pub fn new(operation: LogicalOp, children: Vec<FilterNode>) -> Self {
        Self {
            operation,
            head: TOP_LEVEL_HEAD.to_vec(),
            children,
        }
    }

    /// A nested group with the default `01` head.
    pub fn nested(operation: LogicalOp, children: Vec<FilterNode>) -> Self {
        Self {
            operation,
            head: NESTED_HEAD.to_vec(),
            children,
        }
    }
}

/// A single comparison against one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub match_type: MatchType,
    /// Caller-supplied row number. The format treats 0 as "unset" but this
    /// is not enforced.
    pub row: u32,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(match_type: MatchType, row: u32, value: impl Into<ConditionValue>) -> Self {
        Self {
            match_type,
            row,
            value: value.into(),
        }
    }
}

/// The operand of a condition. The variant picks the encoding shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionValue {
    Single(String),
    List(Vec<String>),
}

impl ConditionValue {
    /// The "full string" projection written ahead of the value: the single
    /// string itself, or the list elements joined with `;`.
    ///
    /// Decoders only use this field to know how far to skip. Its content is
    /// not read back into the tree.
    pub fn full_text(&self) -> String {
        match self {
            ConditionValue::Single(s) => s.clone(),
            ConditionValue::List(items) => items.join(LIST_SEPARATOR),
        }
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Single(value)
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(values: Vec<String>) -> Self {
        ConditionValue::List(values)
    }
}

impl From<Vec<&str>> for ConditionValue {
    fn from(values: Vec<&str>) -> Self {
        ConditionValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Condition> for FilterNode {
    fn from(condition: Condition) -> Self {
        FilterNode::Condition(condition)
    }
}

impl From<Group> for FilterNode {
    fn from(group: Group) -> Self {
        FilterNode::Group(group)
    }
}

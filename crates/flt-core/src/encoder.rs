//! FLT Encoder — serializes a filter tree into its binary form.
//!
//! The encoder mirrors [`crate::decoder`]: every group is written as its
//! `head` bytes followed by `op count:u16 00` and its items in order. The
//! head is never regenerated here; defaults are applied by the JSON bridge.
//!
//! For a nested group the head also serves as the item tag, so it must be
//! exactly `[0x01]`; any other nested head fails with
//! [`FltError::InvalidTree`].
//!
//! # Example
//! ```
//! use flt_core::{encode, Condition, Group, LogicalOp, MatchType};
//!
//! let filter = Group::new(
//!     LogicalOp::And,
//!     vec![Condition::new(MatchType::Equals, 1, "x").into()],
//! );
//! let bytes = encode(&filter).unwrap();
//! assert_eq!(&bytes[..8], &[0xfe, 0xff, 0xff, 0xff, 0x00, 0x01, 0x00, 0x00]);
//! ```

use crate::decoder::{LIST_MARKER, MAGIC, SIZE_MODE_U16, SIZE_MODE_U8, STRING_MARKER};
use crate::error::{FltError, Result};
use crate::types::{Condition, ConditionValue, FilterNode, Group, NESTED_HEAD};
use crate::wire::{put_u16_le, put_u32_le, put_wide_text, wide_len};

/// Lists shorter than this use the one-byte count.
pub const SHORT_LIST_LIMIT: usize = 0x80;

/// Encode a top-level group into a complete FLT buffer.
pub fn encode(group: &Group) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_group(group, false, &mut out)?;
    tracing::debug!(
        children = group.children.len(),
        len = out.len(),
        "encoded FLT buffer"
    );
    Ok(out)
}

/// Encode a single condition item, including its `00 00` marker.
pub fn encode_condition(condition: &Condition) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_condition_into(condition, &mut out)?;
    Ok(out)
}

fn encode_group(group: &Group, nested: bool, out: &mut Vec<u8>) -> Result<()> {
    if nested && group.head != NESTED_HEAD {
        return Err(FltError::InvalidTree(format!(
            "nested group head must be [01], got {:02x?}",
            group.head
        )));
    }
    if group.operation.is_non_canonical() {
        return Err(FltError::InvalidValue(format!(
            "operation code {} must use its named variant",
            group.operation.code()
        )));
    }
    let count = u16::try_from(group.children.len()).map_err(|_| {
        FltError::InvalidTree(format!(
            "group has {} children, at most {} fit the count field",
            group.children.len(),
            u16::MAX
        ))
    })?;

    tracing::trace!(operation = %group.operation, count, "group");

    out.extend_from_slice(&group.head);
    out.push(group.operation.code());
    put_u16_le(out, count);
    out.push(0x00);

    for child in &group.children {
        match child {
            FilterNode::Condition(condition) => encode_condition_into(condition, out)?,
            FilterNode::Group(child) => encode_group(child, true, out)?,
        }
    }
    Ok(())
}

fn encode_condition_into(condition: &Condition, out: &mut Vec<u8>) -> Result<()> {
    if condition.match_type.is_non_canonical() {
        return Err(FltError::InvalidValue(format!(
            "match type code {:#04x} must use its named variant",
            condition.match_type.code()
        )));
    }

    let full_text = condition.value.full_text();

    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(MAGIC);
    out.push(condition.match_type.code());
    put_u32_le(out, text_len(&full_text)?);
    put_wide_text(out, &full_text);
    put_u32_le(out, condition.row);
    out.extend_from_slice(&[0x00; 4]);

    match &condition.value {
        ConditionValue::Single(text) => {
            out.push(STRING_MARKER);
            put_text(out, text)?;
        }
        ConditionValue::List(items) => {
            out.push(LIST_MARKER);
            if items.len() < SHORT_LIST_LIMIT {
                out.push(SIZE_MODE_U8);
                out.push(items.len() as u8);
            } else {
                let count = u16::try_from(items.len()).map_err(|_| {
                    FltError::InvalidTree(format!(
                        "list value has {} elements, at most {} fit the count field",
                        items.len(),
                        u16::MAX
                    ))
                })?;
                out.push(SIZE_MODE_U16);
                put_u16_le(out, count);
            }
            for item in items {
                out.push(STRING_MARKER);
                put_text(out, item)?;
            }
        }
    }

    tracing::trace!(match_type = %condition.match_type, row = condition.row, "condition");
    Ok(())
}

fn put_text(out: &mut Vec<u8>, text: &str) -> Result<()> {
    put_u32_le(out, text_len(text)?);
    put_wide_text(out, text);
    Ok(())
}

fn text_len(text: &str) -> Result<u32> {
    let len = wide_len(text);
    u32::try_from(len)
        .map_err(|_| FltError::InvalidTree(format!("text of {len} characters exceeds the length field")))
}

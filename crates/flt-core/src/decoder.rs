//! FLT Decoder — reconstructs a filter tree from its binary form.
//!
//! Layout (little-endian, wide text = 2 bytes per UTF-16 unit):
//!
//! ```text
//! File            := [BOM] Group               BOM = FE FF FF FF
//! Group           := op:u8 count:u16 pad:u8(00) Item*{count}
//! Item            := 00 00 ConditionRecord | 01 Group
//! ConditionRecord := "DXUFMT" match:u8 fullLen:u32 wide{fullLen}
//!                    row:u32 00000000 Value
//! Value           := 12 len:u32 wide{len}
//!                  | 01 (02 n:u8 | 03 n:u16) (12 len:u32 wide{len}){n}
//! ```
//!
//! # Key design decisions
//!
//! - **Strictly forward**: every read goes through one [`Reader`], so each
//!   error carries the absolute offset of the byte that broke the layout.
//! - **Unknown codes survive**: unrecognized operation and match-type bytes
//!   become `Unknown(code)` instead of errors.
//! - **Full string is skipped**: the joined text ahead of the row is only
//!   bounds checked, never decoded; the value comes from the tagged value
//!   section.

use crate::codes::{LogicalOp, MatchType};
use crate::error::{FltError, Result};
use crate::types::{Condition, ConditionValue, FilterNode, Group, NESTED_HEAD, TOP_LEVEL_HEAD};
use crate::wire::Reader;

/// ASCII tag opening every condition record.
pub const MAGIC: &[u8; 6] = b"DXUFMT";

/// Marker in front of every length-prefixed string value.
pub const STRING_MARKER: u8 = 0x12;

/// Marker in front of a list value.
pub const LIST_MARKER: u8 = 0x01;

/// List size mode: one-byte element count.
pub const SIZE_MODE_U8: u8 = 0x02;

/// List size mode: 16-bit element count.
pub const SIZE_MODE_U16: u8 = 0x03;

/// Deepest group nesting accepted before the input is rejected.
pub const MAX_DEPTH: usize = 256;

/// Decode a complete FLT buffer into its top-level group.
///
/// A leading BOM is skipped and reported back as the group's `head`; without
/// it the head is empty. Bytes after the top-level group are ignored.
pub fn decode(bytes: &[u8]) -> Result<Group> {
    tracing::debug!(len = bytes.len(), "decoding FLT buffer");
    let mut reader = Reader::new(bytes);

    let head = if reader.peek_bytes(TOP_LEVEL_HEAD.len()) == Some(&TOP_LEVEL_HEAD[..]) {
        reader.skip(TOP_LEVEL_HEAD.len())?;
        TOP_LEVEL_HEAD.to_vec()
    } else {
        Vec::new()
    };

    let group = parse_group(&mut reader, head, 0)?;

    if reader.remaining() > 0 {
        tracing::debug!(
            offset = reader.offset(),
            trailing = reader.remaining(),
            "ignoring bytes after top-level group"
        );
    }
    tracing::debug!(children = group.children.len(), "decoded FLT buffer");
    Ok(group)
}

/// Decode one condition record, starting at its `DXUFMT` tag.
pub fn decode_condition_record(bytes: &[u8]) -> Result<Condition> {
    parse_condition_record(&mut Reader::new(bytes))
}

fn parse_group(reader: &mut Reader<'_>, head: Vec<u8>, depth: usize) -> Result<Group> {
    if depth >= MAX_DEPTH {
        return Err(FltError::malformed("nesting too deep", reader.offset()));
    }

    let start = reader.offset();
    let operation = LogicalOp::from_code(reader.u8()?);
    let count = reader.u16_le()?;

    let pad_offset = reader.offset();
    if reader.u8()? != 0x00 {
        return Err(FltError::malformed("invalid group padding", pad_offset));
    }

    tracing::trace!(offset = start, %operation, count, depth, "group");

    let mut children = Vec::with_capacity(usize::from(count).min(reader.remaining()));
    for _ in 0..count {
        let item_offset = reader.offset();
        match reader.peek_bytes(2) {
            Some([0x00, 0x00]) => {
                reader.skip(2)?;
                children.push(FilterNode::Condition(parse_condition_record(reader)?));
            }
            _ => match reader.peek() {
                Some(tag) if tag == NESTED_HEAD[0] => {
                    reader.skip(1)?;
                    let nested = parse_group(reader, NESTED_HEAD.to_vec(), depth + 1)?;
                    children.push(FilterNode::Group(nested));
                }
                Some(0x00) if reader.remaining() < 2 => {
                    return Err(FltError::TruncatedInput {
                        offset: item_offset,
                        needed: 2,
                        available: reader.remaining(),
                    });
                }
                Some(_) => {
                    return Err(FltError::malformed("unexpected item marker", item_offset));
                }
                None => {
                    return Err(FltError::TruncatedInput {
                        offset: item_offset,
                        needed: 1,
                        available: 0,
                    });
                }
            },
        }
    }

    Ok(Group {
        operation,
        head,
        children,
    })
}

fn parse_condition_record(reader: &mut Reader<'_>) -> Result<Condition> {
    let magic_offset = reader.offset();
    let tag = reader.bytes(MAGIC.len())?;
    if let Some(pos) = tag.iter().zip(MAGIC).position(|(got, want)| got != want) {
        return Err(FltError::malformed("bad magic", magic_offset + pos));
    }

    let match_type = MatchType::from_code(reader.u8()?);

    // Joined projection of the value. Only its length matters.
    let full_len = reader.u32_le()? as usize;
    let full_offset = reader.offset();
    let full_bytes = full_len.checked_mul(2).ok_or(FltError::TruncatedInput {
        offset: full_offset,
        needed: usize::MAX,
        available: reader.remaining(),
    })?;
    reader.skip(full_bytes)?;

    let row = reader.u32_le()?;
    reader.skip(4)?;

    let value_offset = reader.offset();
    let value = match reader.u8()? {
        STRING_MARKER => ConditionValue::Single(parse_text(reader)?),
        LIST_MARKER => ConditionValue::List(parse_list(reader)?),
        _ => return Err(FltError::malformed("expected value marker", value_offset)),
    };

    tracing::trace!(offset = magic_offset, %match_type, row, "condition");

    Ok(Condition {
        match_type,
        row,
        value,
    })
}

/// Length-prefixed wide text; the `0x12` marker is already consumed.
fn parse_text(reader: &mut Reader<'_>) -> Result<String> {
    let len = reader.u32_le()?;
    reader.wide_text(len as usize)
}

fn parse_list(reader: &mut Reader<'_>) -> Result<Vec<String>> {
    let mode_offset = reader.offset();
    let count = match reader.u8()? {
        SIZE_MODE_U8 => usize::from(reader.u8()?),
        SIZE_MODE_U16 => usize::from(reader.u16_le()?),
        _ => return Err(FltError::malformed("expected list size marker", mode_offset)),
    };

    // Each element needs at least 5 bytes, which bounds the reservation.
    let mut items = Vec::with_capacity(count.min(reader.remaining() / 5));
    for _ in 0..count {
        let marker_offset = reader.offset();
        if reader.u8()? != STRING_MARKER {
            return Err(FltError::malformed("expected string marker", marker_offset));
        }
        items.push(parse_text(reader)?);
    }
    Ok(items)
}

//! # flt-core
//!
//! Pure-Rust encoder and decoder for **FLT** filter files.
//!
//! An FLT file persists a tree-shaped logical filter: groups joining their
//! children with AND/OR/NAND/NOR, and conditions comparing one row against a
//! string or a list of strings. The layout is little-endian with 16-bit wide
//! text and must round-trip byte-for-byte with existing producers.
//!
//! ## Quick start
//!
//! ```rust
//! use flt_core::{bytes_to_json, json_to_bytes};
//!
//! // JSON → FLT
//! let json = r#"{"operation":"OR","conditions":[
//!     {"type":"condition","value":["A","B","C"],"matchType":"IN_LIST","row":2}]}"#;
//! let bytes = json_to_bytes(json).unwrap();
//! assert_eq!(&bytes[..4], &[0xfe, 0xff, 0xff, 0xff]);
//!
//! // FLT → JSON (defaults filled in)
//! let back: serde_json::Value = serde_json::from_str(&bytes_to_json(&bytes).unwrap()).unwrap();
//! assert_eq!(back["operation"], "OR");
//! assert_eq!(back["conditions"][0]["value"][2], "C");
//! ```
//!
//! ## Modules
//!
//! - [`codes`] — `MatchType` and `LogicalOp` byte tables
//! - [`wire`] — little-endian integers and wide text
//! - [`types`] — the `Group` / `Condition` tree
//! - [`decoder`] — FLT bytes → tree
//! - [`encoder`] — tree → FLT bytes
//! - [`bridge`] — JSON filter ⇄ tree, default normalization
//! - [`error`] — error types

pub mod bridge;
pub mod codes;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod types;
pub mod wire;

pub use bridge::{
    bytes_to_json, from_json, json_to_bytes, normalize, strip_defaults, to_json, JsonCondition,
    JsonFilter, JsonNode, JsonValue, Symbol,
};
pub use codes::{LogicalOp, MatchType};
pub use decoder::{decode, decode_condition_record};
pub use encoder::{encode, encode_condition};
pub use error::FltError;
pub use types::{Condition, ConditionValue, FilterNode, Group};

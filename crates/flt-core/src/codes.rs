//! Enumerated byte codes: comparison operators and logical connectives.
//!
//! Codes are part of the file format and never renumbered. The gaps in the
//! match type range (0x0C, 0x0D, 0x10..=0x23) are deliberate. Bytes that do
//! not map to a known variant decode to `Unknown(code)` so that files written
//! by newer producers still round-trip.

use std::fmt;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Equals,
    NotEquals,
    Smaller,
    SmallerEquals,
    Bigger,
    BiggerEquals,
    Like,
    NotLike,
    Between,
    NotBetween,
    InList,
    NotInList,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    /// A byte with no symbolic name, kept verbatim.
    Unknown(u8),
}

const MATCH_TYPES: [(MatchType, &str, u8); 16] = [
    (MatchType::Equals, "EQUALS", 0x00),
    (MatchType::NotEquals, "NOT_EQUALS", 0x01),
    (MatchType::Smaller, "SMALLER", 0x02),
    (MatchType::SmallerEquals, "SMALLER_EQUALS", 0x03),
    (MatchType::Bigger, "BIGGER", 0x04),
    (MatchType::BiggerEquals, "BIGGER_EQUALS", 0x05),
    (MatchType::Like, "LIKE", 0x06),
    (MatchType::NotLike, "NOT_LIKE", 0x07),
    (MatchType::Between, "BETWEEN", 0x08),
    (MatchType::NotBetween, "NOT_BETWEEN", 0x09),
    (MatchType::InList, "IN_LIST", 0x0a),
    (MatchType::NotInList, "NOT_IN_LIST", 0x0b),
    (MatchType::Contains, "CONTAINS", 0x0e),
    (MatchType::NotContains, "NOT_CONTAINS", 0x0f),
    (MatchType::StartsWith, "STARTS_WITH", 0x24),
    (MatchType::EndsWith, "ENDS_WITH", 0x25),
];

impl MatchType {
    /// Every named match type, in code order.
    pub const ALL: [MatchType; 16] = [
        MatchType::Equals,
        MatchType::NotEquals,
        MatchType::Smaller,
        MatchType::SmallerEquals,
        MatchType::Bigger,
        MatchType::BiggerEquals,
        MatchType::Like,
        MatchType::NotLike,
        MatchType::Between,
        MatchType::NotBetween,
        MatchType::InList,
        MatchType::NotInList,
        MatchType::Contains,
        MatchType::NotContains,
        MatchType::StartsWith,
        MatchType::EndsWith,
    ];

    /// The byte written to the file.
    pub fn code(self) -> u8 {
        match self {
            MatchType::Unknown(code) => code,
            known => MATCH_TYPES
                .iter()
                .find(|(m, _, _)| *m == known)
                .map(|(_, _, code)| *code)
                .unwrap_or_default(),
        }
    }

    /// Map a byte to its match type; never fails.
    pub fn from_code(code: u8) -> Self {
        MATCH_TYPES
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(m, _, _)| *m)
            .unwrap_or(MatchType::Unknown(code))
    }

    /// Symbolic name, or `None` for `Unknown`.
    pub fn name(self) -> Option<&'static str> {
        MATCH_TYPES
            .iter()
            .find(|(m, _, _)| *m == self)
            .map(|(_, name, _)| *name)
    }

    /// Case-insensitive lookup by symbolic name.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        MATCH_TYPES
            .iter()
            .find(|(_, n, _)| *n == upper)
            .map(|(m, _, _)| *m)
    }

    /// `true` for an `Unknown` whose code actually belongs to a named variant.
    pub(crate) fn is_non_canonical(self) -> bool {
        matches!(self, MatchType::Unknown(code) if !matches!(MatchType::from_code(code), MatchType::Unknown(_)))
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN({})", self.code()),
        }
    }
}

/// Logical connective of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Nand,
    Nor,
    /// A byte with no symbolic name, kept verbatim.
    Unknown(u8),
}

const OPERATIONS: [(LogicalOp, &str, u8); 4] = [
    (LogicalOp::And, "AND", 0),
    (LogicalOp::Or, "OR", 1),
    (LogicalOp::Nand, "NAND", 2),
    (LogicalOp::Nor, "NOR", 3),
];

impl LogicalOp {
    /// Every named operation, in code order.
    pub const ALL: [LogicalOp; 4] = [LogicalOp::And, LogicalOp::Or, LogicalOp::Nand, LogicalOp::Nor];

    pub fn code(self) -> u8 {
        match self {
            LogicalOp::Unknown(code) => code,
            known => OPERATIONS
                .iter()
                .find(|(op, _, _)| *op == known)
                .map(|(_, _, code)| *code)
                .unwrap_or_default(),
        }
    }

    pub fn from_code(code: u8) -> Self {
        OPERATIONS
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(op, _, _)| *op)
            .unwrap_or(LogicalOp::Unknown(code))
    }

    pub fn name(self) -> Option<&'static str> {
        OPERATIONS
            .iter()
            .find(|(op, _, _)| *op == self)
            .map(|(_, name, _)| *name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        OPERATIONS
            .iter()
            .find(|(_, n, _)| *n == upper)
            .map(|(op, _, _)| *op)
    }

    pub(crate) fn is_non_canonical(self) -> bool {
        matches!(self, LogicalOp::Unknown(code) if !matches!(LogicalOp::from_code(code), LogicalOp::Unknown(_)))
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN({})", self.code()),
        }
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::ResolvedValue;

/// One row of the rewrite instruction: the physical column list shared by
/// every row of the statement, this row's own values, and the storage nodes
/// this row is routed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertValueToken {
    pub columns: Vec<String>,
    pub values: Vec<ResolvedValue>,
    pub data_nodes: BTreeSet<String>,
}

/// The rewrite instruction for an insert's `VALUES` clause: the inclusive
/// character region of the original text to replace and one row token per
/// optimized unit, in row order. Splicing the replacement text and grouping
/// rows by node is the downstream assembler's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertValuesToken {
    pub start_index: usize,
    pub stop_index: usize,
    pub values: Vec<InsertValueToken>,
}

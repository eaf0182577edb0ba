use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::ResolvedValue;

/// One row of an optimized insert: the row's resolved values in column order
/// plus the storage nodes the routing stage assigned it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOptimizeUnit {
    pub values: Vec<ResolvedValue>,
    pub data_nodes: BTreeSet<String>,
}

impl InsertOptimizeUnit {
    pub fn new<N>(values: Vec<ResolvedValue>, data_nodes: N) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            values,
            data_nodes: data_nodes.into_iter().map(Into::into).collect(),
        }
    }
}

/// The optimizer collaborator's view of an insert: target table, the logical
/// column list as declared, and one unit per original row, in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOptimizedStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub units: Vec<InsertOptimizeUnit>,
}

impl InsertOptimizedStatement {
    pub fn new<T, C>(table: T, columns: C, units: Vec<InsertOptimizeUnit>) -> Self
    where
        T: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            units,
        }
    }
}

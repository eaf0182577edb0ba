use std::collections::HashMap;

use sqlparser::ast::Statement;

use crate::optimize::InsertOptimizedStatement;
use crate::rule::CipherColumnSource;
use crate::segment::{insert_values_segments, InsertValuesSegment};
use crate::token::insert_values::{InsertValueToken, InsertValuesToken};
use crate::RewriteError;

/// Decides whether a statement needs a `VALUES` rewrite token and, if so,
/// produces it. `Ok(None)` is the expected outcome for anything that is not
/// an insert with at least one `VALUES` tuple.
pub fn generate_insert_values_token(
    statement: &Statement,
    sql: &str,
    optimized: &InsertOptimizedStatement,
    rule: &dyn CipherColumnSource,
) -> Result<Option<InsertValuesToken>, RewriteError> {
    let segments = insert_values_segments(statement, sql)?;
    if !needs_rewrite(statement, &segments) {
        return Ok(None);
    }
    let cipher_columns = rule.cipher_columns_for(&optimized.table);
    Ok(build_insert_values_token(&segments, optimized, &cipher_columns))
}

pub fn needs_rewrite(statement: &Statement, segments: &[InsertValuesSegment]) -> bool {
    matches!(statement, Statement::Insert(_)) && !segments.is_empty()
}

/// Assembles the token over pre-extracted segments. `None` only when the
/// segment set is empty, which the caller treats as non-applicability.
pub fn build_insert_values_token(
    segments: &[InsertValuesSegment],
    optimized: &InsertOptimizedStatement,
    cipher_columns: &HashMap<String, String>,
) -> Option<InsertValuesToken> {
    let (start_index, stop_index) = replace_span(segments)?;
    // One column list for the whole statement; every row writes the same
    // physical columns.
    let columns = actual_insert_columns(&optimized.columns, cipher_columns);
    let values = optimized
        .units
        .iter()
        .map(|unit| InsertValueToken {
            columns: columns.clone(),
            values: unit.values.clone(),
            data_nodes: unit.data_nodes.clone(),
        })
        .collect();
    Some(InsertValuesToken {
        start_index,
        stop_index,
        values,
    })
}

fn replace_span(segments: &[InsertValuesSegment]) -> Option<(usize, usize)> {
    let first = segments.first()?;
    let mut start = first.start_index;
    let mut stop = first.stop_index;
    for segment in &segments[1..] {
        start = start.min(segment.start_index);
        stop = stop.max(segment.stop_index);
    }
    Some((start, stop))
}

fn actual_insert_columns(
    columns: &[String],
    cipher_columns: &HashMap<String, String>,
) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            cipher_columns
                .get(column)
                .unwrap_or(column)
                .clone()
        })
        .collect()
}

use sqlparser::ast::{Expr, Insert, SetExpr, UnaryOperator, Value as SqlValue};

use crate::types::{ResolvedValue, Value};
use crate::RewriteError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PlaceholderState {
    next_ordinal: usize,
}

/// Resolves the `VALUES` rows of an insert against the statement's parameter
/// list. `Ok(None)` when the insert has no `VALUES` source. Rows handed to
/// this stage are already materialized, so anything other than a literal or
/// a placeholder is rejected.
pub fn resolve_insert_rows(
    insert: &Insert,
    params: &[Value],
) -> Result<Option<Vec<Vec<ResolvedValue>>>, RewriteError> {
    let Some(source) = &insert.source else {
        return Ok(None);
    };
    let SetExpr::Values(values) = source.body.as_ref() else {
        return Ok(None);
    };
    Ok(Some(resolve_values_rows(&values.rows, params)?))
}

pub fn resolve_values_rows(
    rows: &[Vec<Expr>],
    params: &[Value],
) -> Result<Vec<Vec<ResolvedValue>>, RewriteError> {
    let mut state = PlaceholderState::default();
    let mut resolved_rows = Vec::with_capacity(rows.len());

    for row in rows {
        let mut resolved = Vec::with_capacity(row.len());
        for expr in row {
            resolved.push(resolve_expr(expr, params, &mut state)?);
        }
        resolved_rows.push(resolved);
    }

    Ok(resolved_rows)
}

fn resolve_expr(
    expr: &Expr,
    params: &[Value],
    state: &mut PlaceholderState,
) -> Result<ResolvedValue, RewriteError> {
    match expr {
        Expr::Value(value) => match &value.value {
            SqlValue::Placeholder(token) => {
                let index = resolve_placeholder_index(token, params.len(), state)?;
                Ok(ResolvedValue::Placeholder(index))
            }
            other => Ok(ResolvedValue::Literal(sql_literal_to_value(other)?)),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: operand,
        } => Ok(ResolvedValue::Literal(negated_numeric(operand)?)),
        other => Err(RewriteError {
            message: format!("VALUES expression '{other}' is not a literal or placeholder"),
        }),
    }
}

fn negated_numeric(operand: &Expr) -> Result<Value, RewriteError> {
    if let Expr::Value(value) = operand {
        if let SqlValue::Number(raw, _) = &value.value {
            // Parse sign and digits together so i64::MIN round-trips.
            return numeric_literal(&format!("-{raw}"));
        }
    }
    Err(RewriteError {
        message: format!("VALUES expression '-{operand}' is not a literal or placeholder"),
    })
}

fn sql_literal_to_value(value: &SqlValue) -> Result<Value, RewriteError> {
    match value {
        SqlValue::Number(raw, _) => numeric_literal(raw),
        SqlValue::Boolean(flag) => Ok(Value::Integer(i64::from(*flag))),
        SqlValue::Null => Ok(Value::Null),
        SqlValue::HexStringLiteral(text) => Ok(Value::Blob(parse_hex_literal(text)?)),
        SqlValue::Placeholder(token) => Err(RewriteError {
            message: format!("unexpected placeholder '{token}' while resolving row"),
        }),
        other => other
            .clone()
            .into_string()
            .map(Value::Text)
            .ok_or_else(|| RewriteError {
                message: format!("unsupported SQL literal '{other}'"),
            }),
    }
}

fn numeric_literal(raw: &str) -> Result<Value, RewriteError> {
    if let Ok(int) = raw.parse::<i64>() {
        return Ok(Value::Integer(int));
    }
    raw.parse::<f64>().map(Value::Real).map_err(|_| RewriteError {
        message: format!("unsupported numeric literal '{raw}'"),
    })
}

fn resolve_placeholder_index(
    token: &str,
    params_len: usize,
    state: &mut PlaceholderState,
) -> Result<usize, RewriteError> {
    let trimmed = token.trim();

    let index = if trimmed.is_empty() || trimmed == "?" {
        let index = state.next_ordinal;
        state.next_ordinal += 1;
        index
    } else if let Some(numeric) = trimmed.strip_prefix('?') {
        let parsed = parse_1_based_index(trimmed, numeric)?;
        state.next_ordinal = state.next_ordinal.max(parsed);
        parsed - 1
    } else if let Some(numeric) = trimmed.strip_prefix('$') {
        let parsed = parse_1_based_index(trimmed, numeric)?;
        state.next_ordinal = state.next_ordinal.max(parsed);
        parsed - 1
    } else {
        return Err(RewriteError {
            message: format!("unsupported SQL placeholder format '{trimmed}'"),
        });
    };

    if index >= params_len {
        return Err(RewriteError {
            message: format!(
                "placeholder '{trimmed}' references parameter {} but only {} parameters were provided",
                index + 1,
                params_len
            ),
        });
    }

    Ok(index)
}

fn parse_1_based_index(token: &str, digits: &str) -> Result<usize, RewriteError> {
    let parsed: usize = digits.parse().map_err(|_| RewriteError {
        message: format!("unsupported SQL placeholder format '{token}'"),
    })?;
    if parsed == 0 {
        return Err(RewriteError {
            message: format!("placeholder '{token}' indices are 1-based"),
        });
    }
    Ok(parsed)
}

fn parse_hex_literal(text: &str) -> Result<Vec<u8>, RewriteError> {
    if text.len() % 2 != 0 {
        return Err(RewriteError {
            message: format!(
                "hex literal must contain an even number of digits, got {}",
                text.len()
            ),
        });
    }

    text.as_bytes()
        .chunks(2)
        .map(|pair| Ok((hex_nibble(pair[0])? << 4) | hex_nibble(pair[1])?))
        .collect()
}

fn hex_nibble(byte: u8) -> Result<u8, RewriteError> {
    char::from(byte)
        .to_digit(16)
        .map(|digit| digit as u8)
        .ok_or_else(|| RewriteError {
            message: format!("invalid hex digit '{}'", char::from(byte)),
        })
}

use serde::{Deserialize, Serialize};
use sqlparser::ast::{Expr, Insert, SetExpr, Spanned, Statement};
use sqlparser::tokenizer::{Location, Span};

use crate::RewriteError;

/// The source-text region of one parenthesized `VALUES` tuple, parentheses
/// included. Offsets are inclusive character positions in the original SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertValuesSegment {
    pub start_index: usize,
    pub stop_index: usize,
}

/// Derives one segment per `VALUES` tuple of an insert statement. Non-insert
/// statements and inserts whose source is not a `VALUES` body (e.g.
/// `INSERT ... SELECT`) yield an empty vector.
pub fn insert_values_segments(
    statement: &Statement,
    sql: &str,
) -> Result<Vec<InsertValuesSegment>, RewriteError> {
    let Statement::Insert(insert) = statement else {
        return Ok(Vec::new());
    };
    segments_for_insert(insert, sql)
}

fn segments_for_insert(
    insert: &Insert,
    sql: &str,
) -> Result<Vec<InsertValuesSegment>, RewriteError> {
    let Some(source) = &insert.source else {
        return Ok(Vec::new());
    };
    let SetExpr::Values(values) = source.body.as_ref() else {
        return Ok(Vec::new());
    };

    let chars: Vec<char> = sql.chars().collect();
    let line_starts = line_starts(&chars);

    let mut segments = Vec::with_capacity(values.rows.len());
    for row in &values.rows {
        let span = row_span(row)?;
        let first = location_offset(span.start, &line_starts, chars.len())?;
        // Expression spans end one past the last character of the token.
        let after = location_offset(span.end, &line_starts, chars.len())?;
        segments.push(widen_to_parentheses(&chars, first, after)?);
    }
    Ok(segments)
}

fn row_span(row: &[Expr]) -> Result<Span, RewriteError> {
    let mut exprs = row.iter();
    let Some(first) = exprs.next() else {
        return Err(RewriteError {
            message: "cannot locate an empty VALUES tuple in source text".to_string(),
        });
    };
    let mut span = first.span();
    for expr in exprs {
        span = span.union(&expr.span());
    }
    Ok(span)
}

fn location_offset(
    location: Location,
    line_starts: &[usize],
    source_len: usize,
) -> Result<usize, RewriteError> {
    if location.line == 0 {
        return Err(RewriteError {
            message: "VALUES expression carries no source span".to_string(),
        });
    }
    let line = (location.line - 1) as usize;
    let Some(line_start) = line_starts.get(line) else {
        return Err(RewriteError {
            message: format!("VALUES expression span at line {} is outside the source text", location.line),
        });
    };
    let offset = line_start + (location.column - 1) as usize;
    if offset > source_len {
        return Err(RewriteError {
            message: format!(
                "VALUES expression span at {}:{} is outside the source text",
                location.line, location.column
            ),
        });
    }
    Ok(offset)
}

fn widen_to_parentheses(
    chars: &[char],
    first: usize,
    after: usize,
) -> Result<InsertValuesSegment, RewriteError> {
    Ok(InsertValuesSegment {
        start_index: scan_back_to_open_paren(chars, first)?,
        stop_index: scan_forward_to_close_paren(chars, after)?,
    })
}

// Only whitespace and comments may sit between a tuple's expressions and its
// parentheses.
fn scan_back_to_open_paren(chars: &[char], first: usize) -> Result<usize, RewriteError> {
    let mut index = first;
    loop {
        if index == 0 {
            return Err(RewriteError {
                message: "no opening parenthesis before VALUES tuple".to_string(),
            });
        }
        index -= 1;
        let c = chars[index];
        if c == '(' {
            return Ok(index);
        }
        if c.is_whitespace() {
            continue;
        }
        if c == '/' && index > 0 && chars[index - 1] == '*' {
            index = block_comment_open(chars, index - 1)?;
            continue;
        }
        if let Some(dashes) = line_comment_start_on_line(chars, index) {
            index = dashes;
            continue;
        }
        // A unary sign of the row's first expression; expression spans start
        // at the operand.
        if c == '-' || c == '+' {
            continue;
        }
        return Err(RewriteError {
            message: format!("expected '(' before VALUES tuple, found '{c}'"),
        });
    }
}

fn scan_forward_to_close_paren(chars: &[char], after: usize) -> Result<usize, RewriteError> {
    let mut index = after;
    while let Some(&c) = chars.get(index) {
        if c == ')' {
            return Ok(index);
        }
        if c.is_whitespace() {
            index += 1;
            continue;
        }
        if c == '-' && chars.get(index + 1) == Some(&'-') {
            index += 2;
            while let Some(&c) = chars.get(index) {
                index += 1;
                if c == '\n' {
                    break;
                }
            }
            continue;
        }
        if c == '/' && chars.get(index + 1) == Some(&'*') {
            index = block_comment_close(chars, index + 2)?;
            continue;
        }
        return Err(RewriteError {
            message: format!("expected ')' after VALUES tuple, found '{c}'"),
        });
    }
    Err(RewriteError {
        message: "no closing parenthesis after VALUES tuple".to_string(),
    })
}

/// Given the position of the `*` in a closing `*/`, returns the position of
/// the `/` that opened the comment.
fn block_comment_open(chars: &[char], close_star: usize) -> Result<usize, RewriteError> {
    let mut index = close_star;
    while index > 1 {
        index -= 1;
        if chars[index] == '*' && chars[index - 1] == '/' {
            return Ok(index - 1);
        }
    }
    Err(RewriteError {
        message: "unterminated block comment before VALUES tuple".to_string(),
    })
}

/// Given the position just past an opening `/*`, returns the position just
/// past the closing `*/`.
fn block_comment_close(chars: &[char], open: usize) -> Result<usize, RewriteError> {
    let mut index = open;
    while index < chars.len() {
        if chars[index] == '*' && chars.get(index + 1) == Some(&'/') {
            return Ok(index + 2);
        }
        index += 1;
    }
    Err(RewriteError {
        message: "unterminated block comment after VALUES tuple".to_string(),
    })
}

/// If the character at `index` sits inside a `--` line comment, returns the
/// position of the comment's first dash.
fn line_comment_start_on_line(chars: &[char], index: usize) -> Option<usize> {
    let mut line_start = index;
    while line_start > 0 && chars[line_start - 1] != '\n' {
        line_start -= 1;
    }
    (line_start..=index).find(|&j| chars[j] == '-' && chars.get(j + 1) == Some(&'-'))
}

fn line_starts(chars: &[char]) -> Vec<usize> {
    let mut starts = vec![0];
    for (index, c) in chars.iter().enumerate() {
        if *c == '\n' {
            starts.push(index + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::{insert_values_segments, InsertValuesSegment};
    use sqlparser::ast::Statement;
    use sqlparser::dialect::GenericDialect;
    use sqlparser::parser::Parser;

    fn parse(sql: &str) -> Statement {
        Parser::parse_sql(&GenericDialect {}, sql)
            .expect("test SQL parses")
            .remove(0)
    }

    fn tuple_segment(sql: &str, tuple: &str) -> InsertValuesSegment {
        let start = sql.find(tuple).expect("tuple text present");
        InsertValuesSegment {
            start_index: start,
            stop_index: start + tuple.len() - 1,
        }
    }

    #[test]
    fn single_row_segment_covers_the_whole_tuple() {
        let sql = "INSERT INTO t (a, b) VALUES (1, 'x')";
        let segments = insert_values_segments(&parse(sql), sql).unwrap();
        assert_eq!(segments, vec![tuple_segment(sql, "(1, 'x')")]);
    }

    #[test]
    fn multi_row_segments_keep_row_order_and_inner_whitespace() {
        let sql = "INSERT INTO t (a, b) VALUES (1, 'x'), ( 2 , 'y' )";
        let segments = insert_values_segments(&parse(sql), sql).unwrap();
        assert_eq!(
            segments,
            vec![
                tuple_segment(sql, "(1, 'x')"),
                tuple_segment(sql, "( 2 , 'y' )"),
            ]
        );
    }

    #[test]
    fn block_comments_inside_the_tuple_stay_inside_the_segment() {
        let sql = "INSERT INTO t (a) VALUES (/* enc */ 1 /* audited */)";
        let segments = insert_values_segments(&parse(sql), sql).unwrap();
        assert_eq!(
            segments,
            vec![tuple_segment(sql, "(/* enc */ 1 /* audited */)")]
        );
    }

    #[test]
    fn line_comments_between_values_and_parentheses_are_skipped() {
        let sql = "INSERT INTO t (a, b) VALUES (-- pad\n  1, 2 -- tail\n)";
        let segments = insert_values_segments(&parse(sql), sql).unwrap();
        assert_eq!(
            segments,
            vec![tuple_segment(sql, "(-- pad\n  1, 2 -- tail\n)")]
        );
    }

    #[test]
    fn negative_first_values_widen_past_the_unary_sign() {
        let sql = "INSERT INTO t (a, b) VALUES (-1, 2)";
        let segments = insert_values_segments(&parse(sql), sql).unwrap();
        assert_eq!(segments, vec![tuple_segment(sql, "(-1, 2)")]);
    }

    #[test]
    fn multiline_insert_offsets_count_from_statement_start() {
        let sql = "INSERT INTO t (a)\nVALUES\n  (1),\n  (22)";
        let segments = insert_values_segments(&parse(sql), sql).unwrap();
        assert_eq!(
            segments,
            vec![tuple_segment(sql, "(1)"), tuple_segment(sql, "(22)")]
        );
    }

    #[test]
    fn non_insert_statements_have_no_segments() {
        let sql = "SELECT a FROM t";
        assert_eq!(insert_values_segments(&parse(sql), sql).unwrap(), vec![]);
    }

    #[test]
    fn insert_from_select_has_no_segments() {
        let sql = "INSERT INTO t (a) SELECT a FROM s";
        assert_eq!(insert_values_segments(&parse(sql), sql).unwrap(), vec![]);
    }

    #[test]
    fn placeholder_rows_are_located_like_literal_rows() {
        let sql = "INSERT INTO t (a, b) VALUES (?, ?)";
        let segments = insert_values_segments(&parse(sql), sql).unwrap();
        assert_eq!(segments, vec![tuple_segment(sql, "(?, ?)")]);
    }
}

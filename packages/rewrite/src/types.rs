#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// One cell of an optimized insert row: either a literal resolved at rewrite
/// time or a reference into the statement's parameter list (0-based).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ResolvedValue {
    Literal(Value),
    Placeholder(usize),
}

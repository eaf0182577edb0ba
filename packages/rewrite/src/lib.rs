mod error;
mod optimize;
mod rows;
mod rule;
mod segment;
mod token;
mod types;

pub use error::RewriteError;
pub use optimize::{InsertOptimizeUnit, InsertOptimizedStatement};
pub use rows::{resolve_insert_rows, resolve_values_rows};
pub use rule::{CipherColumnSource, EncryptRule};
pub use segment::{insert_values_segments, InsertValuesSegment};
pub use token::{
    build_insert_values_token, generate_insert_values_token, needs_rewrite, InsertValueToken,
    InsertValuesToken,
};
pub use types::{ResolvedValue, Value};

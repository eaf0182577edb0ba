mod generator;
mod insert_values;

pub use generator::{build_insert_values_token, generate_insert_values_token, needs_rewrite};
pub use insert_values::{InsertValueToken, InsertValuesToken};

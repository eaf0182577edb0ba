use std::collections::HashMap;

/// Supplies the logical-to-cipher column mapping for a table. A column absent
/// from the map is stored under its logical name; an unknown table yields an
/// empty map.
pub trait CipherColumnSource {
    fn cipher_columns_for(&self, table: &str) -> HashMap<String, String>;
}

#[derive(Debug, Clone, Default)]
pub struct EncryptRule {
    tables: HashMap<String, HashMap<String, String>>,
}

impl EncryptRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cipher_column(
        &mut self,
        table: impl Into<String>,
        logical: impl Into<String>,
        cipher: impl Into<String>,
    ) {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(logical.into(), cipher.into());
    }
}

impl CipherColumnSource for EncryptRule {
    fn cipher_columns_for(&self, table: &str) -> HashMap<String, String> {
        self.tables.get(table).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{CipherColumnSource, EncryptRule};

    #[test]
    fn unknown_table_yields_an_empty_map() {
        let rule = EncryptRule::new();
        assert!(rule.cipher_columns_for("users").is_empty());
    }

    #[test]
    fn mappings_are_scoped_per_table() {
        let mut rule = EncryptRule::new();
        rule.add_cipher_column("users", "ssn", "ssn_cipher");
        rule.add_cipher_column("orders", "card", "card_cipher");

        let users = rule.cipher_columns_for("users");
        assert_eq!(users.get("ssn").map(String::as_str), Some("ssn_cipher"));
        assert!(!users.contains_key("card"));
    }
}

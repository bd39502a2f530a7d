use serde::{Deserialize, Serialize};

/// One column of a customer table, as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

/// Observed customer values handed to the audience prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingData {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    pub products: Vec<String>,
    pub locations: Vec<String>,
    pub behaviors: Vec<String>,
}

impl GroundingData {
    /// True when no observed value was found in any grounding column.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.locations.is_empty() && self.behaviors.is_empty()
    }

    /// `name TYPE, name TYPE` summary of the table schema.
    pub fn schema_summary(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.data_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of a grounding lookup. Lookup failures are carried as the
/// `Unavailable` sentinel instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroundingContext {
    Available(GroundingData),
    Unavailable { reason: String },
}

impl GroundingContext {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        GroundingContext::Unavailable {
            reason: reason.into(),
        }
    }

    /// Usable data, if the lookup succeeded and found anything.
    pub fn data(&self) -> Option<&GroundingData> {
        match self {
            GroundingContext::Available(data) if !data.is_empty() => Some(data),
            _ => None,
        }
    }
}

/// Split delimiter-joined composite values into atomic, de-duplicated values.
///
/// `["Laptop, Tablet", "laptop", "Phone"]` becomes `["Laptop", "Tablet", "Phone"]`.
/// Order of first appearance is kept; comparison ignores case.
pub fn split_composite<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for value in raw {
        for part in value.as_ref().split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if seen.insert(part.to_lowercase()) {
                out.push(part.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_values_become_atomic() {
        let values = split_composite(["Laptop, Tablet"]);
        assert_eq!(values, vec!["Laptop", "Tablet"]);
        assert!(!values.contains(&"Laptop, Tablet".to_string()));
    }

    #[test]
    fn duplicates_across_rows_are_dropped() {
        let values = split_composite(["Laptop, Tablet", "tablet", "Phone,,Laptop", "  "]);
        assert_eq!(values, vec!["Laptop", "Tablet", "Phone"]);
    }

    #[test]
    fn empty_data_is_not_usable() {
        let context = GroundingContext::Available(GroundingData::default());
        assert!(context.data().is_none());
        assert!(GroundingContext::unavailable("down").data().is_none());
    }

    #[test]
    fn schema_summary_lists_columns() {
        let data = GroundingData {
            table: "customers".into(),
            columns: vec![
                ColumnInfo { name: "id".into(), data_type: "INTEGER".into() },
                ColumnInfo { name: "products".into(), data_type: "TEXT".into() },
            ],
            ..GroundingData::default()
        };
        assert_eq!(data.schema_summary(), "id INTEGER, products TEXT");
    }
}

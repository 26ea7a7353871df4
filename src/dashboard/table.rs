//! Dataset table as received by the dashboard
//!
//! Rows are kept as JSON objects; columns are the union of row keys in
//! order of first appearance.

use serde_json::{Map, Value};

use super::DashboardError;

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl Table {
    /// Accept only a non-empty array of objects
    pub fn from_json(payload: Value) -> Result<Self, DashboardError> {
        let items = match payload {
            Value::Array(items) => items,
            other => return Err(DashboardError::NotAList(json_kind(&other))),
        };

        if items.is_empty() {
            return Err(DashboardError::EmptyDataset);
        }

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => rows.push(map),
                other => {
                    return Err(DashboardError::RowNotObject {
                        index,
                        kind: json_kind(&other),
                    })
                }
            }
        }

        Ok(Self::from_rows(rows))
    }

    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Names from `required` that no row carries
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Numeric cells of a column; missing or non-numeric cells are `None`
    pub fn numeric(&self, column: &str) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| row.get(column).and_then(Value::as_f64).filter(|v| v.is_finite()))
            .collect()
    }

    /// Text cells of a column; missing or null cells are `None`
    pub fn text(&self, column: &str) -> Vec<Option<String>> {
        self.rows
            .iter()
            .map(|row| match row.get(column) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            })
            .collect()
    }

    /// Cell formatted for display; missing cells render as empty
    pub fn display_cell(&self, row: usize, column: &str) -> String {
        match self.rows.get(row).and_then(|r| r.get(column)) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
                Some(v) => format!("{:.2}", v),
                None => n.to_string(),
            },
            Some(other) => other.to_string(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_columns_in_first_appearance_order() {
        let table = Table::from_json(json!([
            {"Height": 150.0, "Weight": 50.0},
            {"Height": 160.0, "Age": 35.0, "Weight": 60.0}
        ]))
        .unwrap();

        assert_eq!(table.columns(), &["Height", "Weight", "Age"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.numeric("Age"), vec![None, Some(35.0)]);
    }

    #[test]
    fn test_rejects_non_list() {
        let err = Table::from_json(json!({"error": "boom"})).unwrap_err();
        assert!(matches!(err, DashboardError::NotAList("object")));
    }

    #[test]
    fn test_rejects_empty_list() {
        let err = Table::from_json(json!([])).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset));
    }

    #[test]
    fn test_rejects_non_object_rows() {
        let err = Table::from_json(json!([{"Age": 1}, 2])).unwrap_err();
        assert!(matches!(err, DashboardError::RowNotObject { index: 1, kind: "number" }));
    }

    #[test]
    fn test_missing_columns() {
        let table = Table::from_json(json!([{"Height": 150, "Age": 20}])).unwrap();
        assert_eq!(
            table.missing_columns(&["Height", "Age", "Weight", "Age_Group_30"]),
            vec!["Weight", "Age_Group_30"]
        );
    }

    #[test]
    fn test_text_and_display() {
        let table = Table::from_json(json!([
            {"Age_Group_30": "Under 30", "Age_Group": null, "BMI": 23.891, "Age": 20.0}
        ]))
        .unwrap();

        assert_eq!(table.text("Age_Group_30"), vec![Some("Under 30".to_string())]);
        assert_eq!(table.text("Age_Group"), vec![None]);
        assert_eq!(table.display_cell(0, "BMI"), "23.89");
        assert_eq!(table.display_cell(0, "Age"), "20");
        assert_eq!(table.display_cell(0, "Age_Group"), "");
        assert_eq!(table.display_cell(5, "Age"), "");
    }
}

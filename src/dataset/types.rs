//! Core data types for the obesity dataset
//!
//! - `Column`: allow-list of numeric columns that can be summarised
//! - `AgeGroup` / `AgeBand`: categorical columns derived from Age
//! - `CellValue`: a cleaned source cell
//! - `Record`: one cleaned row with its derived columns

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Derived column holding the four-way age bin
pub const AGE_GROUP_COLUMN: &str = "Age_Group";

/// Derived column holding the split at age 30
pub const AGE_GROUP_30_COLUMN: &str = "Age_Group_30";

/// Numeric columns that statistics may be requested for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Column {
    Height,
    Age,
    Weight,
}

impl Column {
    /// All allowed columns, in the order the dashboard offers them
    pub fn all() -> &'static [Column] {
        &[Column::Height, Column::Age, Column::Weight]
    }

    /// Header name of the column in the source CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Height => "Height",
            Column::Age => "Age",
            Column::Weight => "Weight",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected column name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Column '{0}' not found or not allowed")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    /// Column names are matched exactly, as they appear in the CSV header.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Height" => Ok(Column::Height),
            "Age" => Ok(Column::Age),
            "Weight" => Ok(Column::Weight),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

/// Age bins over the right-closed edges [0, 18, 30, 50, 100]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    Child,
    #[serde(rename = "Young Adult")]
    YoungAdult,
    Adult,
    Senior,
}

impl AgeGroup {
    /// Bin an age. Ages at or below 0 or above 100 fall outside every bin.
    pub fn from_age(age: f64) -> Option<Self> {
        if !(age > 0.0 && age <= 100.0) {
            return None;
        }
        Some(if age <= 18.0 {
            AgeGroup::Child
        } else if age <= 30.0 {
            AgeGroup::YoungAdult
        } else if age <= 50.0 {
            AgeGroup::Adult
        } else {
            AgeGroup::Senior
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Child => "Child",
            AgeGroup::YoungAdult => "Young Adult",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Binary split of ages at 30
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgeBand {
    #[serde(rename = "Under 30")]
    Under30,
    #[serde(rename = "30 and Above")]
    ThirtyAndAbove,
}

impl AgeBand {
    pub fn from_age(age: f64) -> Self {
        if age < 30.0 {
            AgeBand::Under30
        } else {
            AgeBand::ThirtyAndAbove
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Under30 => "Under 30",
            AgeBand::ThirtyAndAbove => "30 and Above",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A non-missing source cell
///
/// Integers serialize without a fractional part. The loader only keeps
/// `Integer` for columns whose every cell is integral.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numbers stay numbers, everything else is kept verbatim.
    /// Surrounding whitespace is ignored when reading a number.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return CellValue::Integer(v);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Widen an integer cell to a float one
    pub fn into_float(self) -> Self {
        match self {
            CellValue::Integer(v) => CellValue::Number(v as f64),
            other => other,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, CellValue::Integer(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(v) => Some(*v as f64),
            CellValue::Number(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One cleaned row of the dataset
///
/// `fields` keeps every source column in header order. The three numeric
/// columns are also held as plain floats for statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Vec<(String, CellValue)>,
    pub height: f64,
    pub weight: f64,
    pub age: f64,
    pub age_group: Option<AgeGroup>,
    pub age_group_30: AgeBand,
}

impl Record {
    /// Build a record from its cleaned cells; derived columns are computed here.
    pub fn new(fields: Vec<(String, CellValue)>, height: f64, weight: f64, age: f64) -> Self {
        Self {
            fields,
            height,
            weight,
            age,
            age_group: AgeGroup::from_age(age),
            age_group_30: AgeBand::from_age(age),
        }
    }

    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Height => self.height,
            Column::Age => self.age,
            Column::Weight => self.weight,
        }
    }

    /// Look up a source cell by header name
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(AGE_GROUP_COLUMN, &self.age_group)?;
        map.serialize_entry(AGE_GROUP_30_COLUMN, &self.age_group_30)?;
        map.end()
    }
}

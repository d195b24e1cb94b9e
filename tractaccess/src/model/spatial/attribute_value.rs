use serde::{Deserialize, Serialize};
use shapefile::dbase::FieldValue;

/// a single attribute of a vector feature, independent of the file format it
/// was read from
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// numeric value. text is parsed, so identifiers stored as strings
    /// ("12", " 3.5 ") are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok(),
            AttributeValue::Bool(_) | AttributeValue::Null => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    }

    /// textual value. whole numbers are rendered without a decimal part so
    /// that numeric identifiers keep their usual spelling.
    pub fn as_text(&self) -> Option<String> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::Bool(b) => Some(b.to_string()),
            AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            AttributeValue::Number(n) => Some(n.to_string()),
            AttributeValue::Text(s) => Some(s.clone()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttributeValue::Null => serde_json::Value::Null,
            AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
            AttributeValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            AttributeValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    pub fn from_json(value: &serde_json::Value) -> AttributeValue {
        match value {
            serde_json::Value::Null => AttributeValue::Null,
            serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(AttributeValue::Number)
                .unwrap_or(AttributeValue::Null),
            serde_json::Value::String(s) => AttributeValue::Text(s.clone()),
            other => AttributeValue::Text(other.to_string()),
        }
    }

    /// reads a csv cell. empty cells are null, numbers are kept as text so
    /// identifiers with leading zeros survive.
    pub fn from_csv(cell: &str) -> AttributeValue {
        if cell.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::Text(cell.to_string())
        }
    }
}

impl From<FieldValue> for AttributeValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Character(Some(s)) => AttributeValue::Text(s.trim_end().to_string()),
            FieldValue::Character(None) => AttributeValue::Null,
            FieldValue::Numeric(Some(n)) => AttributeValue::Number(n),
            FieldValue::Numeric(None) => AttributeValue::Null,
            FieldValue::Float(Some(f)) => AttributeValue::Number(f as f64),
            FieldValue::Float(None) => AttributeValue::Null,
            FieldValue::Logical(Some(b)) => AttributeValue::Bool(b),
            FieldValue::Logical(None) => AttributeValue::Null,
            FieldValue::Integer(i) => AttributeValue::Number(i as f64),
            FieldValue::Double(d) => AttributeValue::Number(d),
            FieldValue::Currency(c) => AttributeValue::Number(c),
            FieldValue::Memo(s) => AttributeValue::Text(s),
            other => AttributeValue::Text(format!("{other:?}")),
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_values() {
        let text = AttributeValue::from(FieldValue::Character(Some(String::from("Wake County  "))));
        assert_eq!(text, AttributeValue::Text(String::from("Wake County")));
        let num = AttributeValue::from(FieldValue::Numeric(Some(12.0)));
        assert_eq!(num.as_i64(), Some(12));
        assert_eq!(num.as_text(), Some(String::from("12")));
        assert!(AttributeValue::from(FieldValue::Numeric(None)).is_null());
    }

    #[test]
    fn test_text_numbers() {
        let v = AttributeValue::Text(String::from(" 3.5"));
        assert_eq!(v.as_f64(), Some(3.5));
        assert_eq!(v.as_i64(), None);
        assert_eq!(AttributeValue::from_csv(""), AttributeValue::Null);
        assert_eq!(
            AttributeValue::from_csv("037063001502").as_text(),
            Some(String::from("037063001502"))
        );
    }
}

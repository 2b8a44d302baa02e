use base64::prelude::*;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use std::collections::BTreeMap;

use crate::utils::error::ConversionError;

/// A typed attribute value as stored by DynamoDB.
///
/// Numbers travel as their decimal string form, exactly like the wire
/// format. With `arbitrary_precision` the JSON side keeps the digits too.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    S(String),
    N(String),
    B(Vec<u8>),
    Bool(bool),
    Null,
    L(Vec<AttributeValue>),
    M(BTreeMap<String, AttributeValue>),
    Ss(Vec<String>),
    Ns(Vec<String>),
    Bs(Vec<Vec<u8>>),
}

/// A single record returned by a statement
pub type Item = BTreeMap<String, AttributeValue>;

/// One page worth of statement input
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRequest {
    pub statement: String,
    pub parameters: Vec<AttributeValue>,
    pub consistent_read: bool,
    pub next_token: Option<String>,
}

/// One page of statement output
#[derive(Debug, Clone, Default)]
pub struct StatementPage {
    pub items: Vec<Item>,
    pub next_token: Option<String>,
}

/// One page of table names
#[derive(Debug, Clone, Default)]
pub struct TablePage {
    pub table_names: Vec<String>,
    pub last_evaluated_table_name: Option<String>,
}

impl StatementRequest {
    /// Create a first-page request for a statement
    pub fn new(statement: impl Into<String>, parameters: Vec<AttributeValue>) -> Self {
        Self {
            statement: statement.into(),
            parameters,
            consistent_read: false,
            next_token: None,
        }
    }

    /// Forward the consistent read flag
    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }
}

impl StatementPage {
    /// Create a page from items and an optional continuation token
    pub fn new(items: Vec<Item>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}

impl From<JsonValue> for AttributeValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => AttributeValue::Null,
            JsonValue::Bool(b) => AttributeValue::Bool(b),
            JsonValue::Number(n) => AttributeValue::N(n.to_string()),
            JsonValue::String(s) => AttributeValue::S(s),
            JsonValue::Array(values) => {
                AttributeValue::L(values.into_iter().map(AttributeValue::from).collect())
            }
            JsonValue::Object(fields) => AttributeValue::M(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, AttributeValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl AttributeValue {
    /// Convert to a generic JSON value.
    ///
    /// Binary values become standard base64 strings, sets become arrays.
    pub fn to_json(&self) -> Result<JsonValue, ConversionError> {
        Ok(match self {
            AttributeValue::S(s) => JsonValue::String(s.clone()),
            AttributeValue::N(n) => number_to_json(n)?,
            AttributeValue::B(bytes) => JsonValue::String(BASE64_STANDARD.encode(bytes)),
            AttributeValue::Bool(b) => JsonValue::Bool(*b),
            AttributeValue::Null => JsonValue::Null,
            AttributeValue::L(values) => JsonValue::Array(
                values
                    .iter()
                    .map(AttributeValue::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            AttributeValue::M(fields) => map_to_json(fields)?,
            AttributeValue::Ss(values) => {
                JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect())
            }
            AttributeValue::Ns(values) => JsonValue::Array(
                values
                    .iter()
                    .map(|n| number_to_json(n))
                    .collect::<Result<_, _>>()?,
            ),
            AttributeValue::Bs(values) => JsonValue::Array(
                values
                    .iter()
                    .map(|bytes| JsonValue::String(BASE64_STANDARD.encode(bytes)))
                    .collect(),
            ),
        })
    }
}

/// Convert a whole item to a JSON object
pub fn item_to_json(item: &Item) -> Result<JsonValue, ConversionError> {
    map_to_json(item)
}

fn map_to_json(fields: &BTreeMap<String, AttributeValue>) -> Result<JsonValue, ConversionError> {
    let mut object = JsonMap::new();
    for (key, value) in fields {
        object.insert(key.clone(), value.to_json()?);
    }
    Ok(JsonValue::Object(object))
}

fn number_to_json(raw: &str) -> Result<JsonValue, ConversionError> {
    serde_json::from_str::<JsonNumber>(raw.trim())
        .map(JsonValue::Number)
        .map_err(|_| ConversionError::InvalidNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_scalars_to_attributes() {
        assert_eq!(AttributeValue::from(json!(null)), AttributeValue::Null);
        assert_eq!(AttributeValue::from(json!(true)), AttributeValue::Bool(true));
        assert_eq!(AttributeValue::from(json!(42)), AttributeValue::N("42".to_string()));
        assert_eq!(AttributeValue::from(json!(-1.5)), AttributeValue::N("-1.5".to_string()));
        assert_eq!(AttributeValue::from(json!("abc")), AttributeValue::S("abc".to_string()));
    }

    #[test]
    fn test_json_containers_to_attributes() {
        let value = AttributeValue::from(json!({"tags": ["a", 1], "inner": {"ok": false}}));

        let mut inner = BTreeMap::new();
        inner.insert("ok".to_string(), AttributeValue::Bool(false));
        let mut expected = BTreeMap::new();
        expected.insert(
            "tags".to_string(),
            AttributeValue::L(vec![
                AttributeValue::S("a".to_string()),
                AttributeValue::N("1".to_string()),
            ]),
        );
        expected.insert("inner".to_string(), AttributeValue::M(inner));

        assert_eq!(value, AttributeValue::M(expected));
    }

    #[test]
    fn test_numbers_keep_integer_shape() {
        assert_eq!(AttributeValue::N("7".to_string()).to_json().unwrap(), json!(7));
        assert_eq!(
            AttributeValue::N("18446744073709551615".to_string()).to_json().unwrap(),
            json!(18446744073709551615u64)
        );
        assert_eq!(AttributeValue::N("2.25".to_string()).to_json().unwrap(), json!(2.25));
    }

    #[test]
    fn test_wide_numbers_keep_every_digit() {
        let wide = AttributeValue::N("12345678901234567890123".to_string());
        let precise = AttributeValue::N("0.12345678901234567890".to_string());

        assert_eq!(
            serde_json::to_string(&wide.to_json().unwrap()).unwrap(),
            "12345678901234567890123"
        );
        assert_eq!(
            serde_json::to_string(&precise.to_json().unwrap()).unwrap(),
            "0.12345678901234567890"
        );
    }

    #[test]
    fn test_wide_json_numbers_become_exact_attributes() {
        let value: JsonValue =
            serde_json::from_str("[12345678901234567890123, 0.12345678901234567890]").unwrap();
        assert_eq!(
            AttributeValue::from(value),
            AttributeValue::L(vec![
                AttributeValue::N("12345678901234567890123".to_string()),
                AttributeValue::N("0.12345678901234567890".to_string()),
            ])
        );
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        assert_eq!(
            AttributeValue::N("NaN".to_string()).to_json(),
            Err(ConversionError::InvalidNumber("NaN".to_string()))
        );
        assert_eq!(
            AttributeValue::N("twelve".to_string()).to_json(),
            Err(ConversionError::InvalidNumber("twelve".to_string()))
        );
    }

    #[test]
    fn test_sets_and_binary_to_json() {
        assert_eq!(AttributeValue::B(b"hi".to_vec()).to_json().unwrap(), json!("aGk="));
        assert_eq!(
            AttributeValue::Ss(vec!["x".to_string(), "y".to_string()]).to_json().unwrap(),
            json!(["x", "y"])
        );
        assert_eq!(
            AttributeValue::Ns(vec!["1".to_string(), "0.5".to_string()]).to_json().unwrap(),
            json!([1, 0.5])
        );
        assert_eq!(
            AttributeValue::Bs(vec![vec![0xff]]).to_json().unwrap(),
            json!(["/w=="])
        );
    }

    #[test]
    fn test_item_to_json_sorts_keys() {
        let mut item = Item::new();
        item.insert("pk".to_string(), AttributeValue::S("user#1".to_string()));
        item.insert("age".to_string(), AttributeValue::N("30".to_string()));
        item.insert("deleted".to_string(), AttributeValue::Null);

        let value = item_to_json(&item).unwrap();
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"age":30,"deleted":null,"pk":"user#1"}"#
        );
    }

    #[test]
    fn test_statement_request_builder() {
        let request = StatementRequest::new("SELECT * FROM t", vec![AttributeValue::Null])
            .with_consistent_read(true);
        assert_eq!(request.statement, "SELECT * FROM t");
        assert_eq!(request.parameters.len(), 1);
        assert!(request.consistent_read);
        assert!(request.next_token.is_none());
    }
}

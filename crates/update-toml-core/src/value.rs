//! Owned TOML values.
//!
//! [`TomlValue`] is what lookups return and what updates accept. It erases the
//! layout distinctions `toml_edit` keeps (standard vs. inline tables, arrays of
//! tables vs. inline arrays) and keeps only the data.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use toml_edit::{Array, Datetime, InlineTable, Item, Table, TableLike, Value};

/// A TOML value detached from any document.
///
/// # Examples
///
/// ```
/// use update_toml_core::TomlValue;
///
/// let value = TomlValue::from("10.0.0");
/// assert_eq!(value.as_str(), Some("10.0.0"));
/// assert_eq!(value.to_json().unwrap(), "\"10.0.0\"");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TomlValue {
    Table(BTreeMap<String, TomlValue>),
    Array(Vec<TomlValue>),
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(Datetime),
}

impl TomlValue {
    /// Convert a document item. `Item::None` has no value and yields `None`.
    pub fn from_item(item: &Item) -> Option<Self> {
        match item {
            Item::None => None,
            Item::Value(value) => Some(Self::from_value(value)),
            Item::Table(table) => Some(Self::from_table(table)),
            Item::ArrayOfTables(tables) => {
                Some(Self::Array(tables.iter().map(Self::from_table).collect()))
            }
        }
    }

    pub fn from_table(table: &Table) -> Self {
        Self::from_table_like(table)
    }

    /// Convert a standard or inline table.
    pub fn from_table_like(table: &dyn TableLike) -> Self {
        Self::Table(
            table
                .iter()
                .filter_map(|(key, item)| Some((key.to_string(), Self::from_item(item)?)))
                .collect(),
        )
    }

    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::String(s.value().clone()),
            Value::Integer(i) => Self::Integer(*i.value()),
            Value::Float(f) => Self::Float(*f.value()),
            Value::Boolean(b) => Self::Boolean(*b.value()),
            Value::Datetime(dt) => Self::Datetime(*dt.value()),
            Value::Array(array) => Self::Array(array.iter().map(Self::from_value).collect()),
            Value::InlineTable(table) => Self::Table(
                table
                    .iter()
                    .map(|(key, value)| (key.to_string(), Self::from_value(value)))
                    .collect(),
            ),
        }
    }

    /// Convert into a `toml_edit` value. Tables become inline tables.
    pub fn to_toml(&self) -> Value {
        match self {
            Self::Table(entries) => Value::InlineTable(
                entries
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.to_toml()))
                    .collect::<InlineTable>(),
            ),
            Self::Array(values) => {
                Value::Array(values.iter().map(Self::to_toml).collect::<Array>())
            }
            Self::String(s) => Value::from(s.as_str()),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Boolean(b) => Value::from(*b),
            Self::Datetime(dt) => Value::from(*dt),
        }
    }

    /// Human-readable type name, matching `toml_edit`'s naming.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Array(_) => "array",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Datetime(_) => "datetime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&BTreeMap<String, TomlValue>> {
        match self {
            Self::Table(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    /// Compact JSON encoding.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented JSON encoding.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Datetimes and non-finite floats serialize as their TOML text form.
impl Serialize for TomlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Table(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) if f.is_nan() => serializer.serialize_str("nan"),
            Self::Float(f) if f.is_infinite() => {
                serializer.serialize_str(if f.is_sign_negative() { "-inf" } else { "inf" })
            }
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Datetime(dt) => serializer.collect_str(dt),
        }
    }
}

impl From<&str> for TomlValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for TomlValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for TomlValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for TomlValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for TomlValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Datetime> for TomlValue {
    fn from(dt: Datetime) -> Self {
        Self::Datetime(dt)
    }
}

impl From<Vec<TomlValue>> for TomlValue {
    fn from(values: Vec<TomlValue>) -> Self {
        Self::Array(values)
    }
}

impl From<BTreeMap<String, TomlValue>> for TomlValue {
    fn from(entries: BTreeMap<String, TomlValue>) -> Self {
        Self::Table(entries)
    }
}

impl From<&Value> for TomlValue {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml_edit::DocumentMut;

    fn parse(content: &str) -> TomlValue {
        let doc = content.parse::<DocumentMut>().unwrap();
        TomlValue::from_table(doc.as_table())
    }

    #[test]
    fn test_scalars() {
        let value = parse(
            r#"
s = "text"
i = 42
f = 1.5
b = true
d = 1979-05-27T07:32:00Z
"#,
        );
        let table = value.as_table().unwrap();
        assert_eq!(table["s"], TomlValue::from("text"));
        assert_eq!(table["i"], TomlValue::Integer(42));
        assert_eq!(table["f"], TomlValue::Float(1.5));
        assert_eq!(table["b"], TomlValue::Boolean(true));
        assert_eq!(table["d"].type_name(), "datetime");
    }

    #[test]
    fn test_inline_and_standard_tables_are_equal() {
        let standard = parse("[project]\nname = \"demo\"\n");
        let inline = parse("project = { name = \"demo\" }\n");
        assert_eq!(standard, inline);
    }

    #[test]
    fn test_array_of_tables() {
        let value = parse(
            r#"
[[bin]]
name = "a"

[[bin]]
name = "b"
"#,
        );
        let bins = &value.as_table().unwrap()["bin"];
        let TomlValue::Array(items) = bins else {
            panic!("expected array, got {}", bins.type_name());
        };
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(TomlValue::is_table));
    }

    #[test]
    fn test_to_toml_preserves_data() {
        let original = parse(
            r#"
keywords = ["toml", "update"]
license = { text = "MIT" }
"#,
        );
        for value in original.as_table().unwrap().values() {
            assert_eq!(&TomlValue::from_value(&value.to_toml()), value);
        }
    }

    #[test]
    fn test_table_to_toml_is_inline() {
        let mut entries = BTreeMap::new();
        entries.insert("text".to_string(), TomlValue::from("MIT"));
        let value = TomlValue::Table(entries).to_toml();
        assert!(value.is_inline_table());
    }

    #[test]
    fn test_json_encoding() {
        let value = parse(
            r#"
[project]
name = "demo"
version = "0.0.1"
keywords = ["a", "b"]
"#,
        );
        insta::assert_snapshot!(
            value.to_json().unwrap(),
            @r#"{"project":{"keywords":["a","b"],"name":"demo","version":"0.0.1"}}"#
        );
    }

    #[test]
    fn test_datetime_json_is_string() {
        let value = parse("released = 1979-05-27\n");
        let json = value.to_json_value().unwrap();
        assert_eq!(json["released"], "1979-05-27");
    }

    #[test]
    fn test_non_finite_float_json() {
        let value = parse("a = nan\nb = +inf\nc = -inf\nd = 1.5\n");
        insta::assert_snapshot!(
            value.to_json().unwrap(),
            @r#"{"a":"nan","b":"inf","c":"-inf","d":1.5}"#
        );
    }

    #[test]
    fn test_parse_literal() {
        let literal = "[1, 2, 3]".parse::<Value>().unwrap();
        let value = TomlValue::from(&literal);
        assert_eq!(
            value,
            TomlValue::Array(vec![
                TomlValue::Integer(1),
                TomlValue::Integer(2),
                TomlValue::Integer(3),
            ])
        );
    }
}

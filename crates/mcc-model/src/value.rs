//! Attribute values and storage types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage type of a variable or attribute, using netCDF naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Byte,
    Short,
    Int,
    /// Stored as a 32-bit integer, same as [`DataType::Int`].
    Long,
    Float,
    Double,
    String,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
        }
    }

    /// Returns true if a value stored as `self` satisfies a requirement for `wanted`.
    ///
    /// Integer widths are not interchangeable, except `int` and `long`
    /// which share the same 32-bit storage.
    pub fn satisfies(&self, wanted: DataType) -> bool {
        self.storage() == wanted.storage()
    }

    fn storage(&self) -> DataType {
        match self {
            DataType::Long => DataType::Int,
            other => *other,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "byte" => Ok(DataType::Byte),
            "short" => Ok(DataType::Short),
            "int" => Ok(DataType::Int),
            "long" => Ok(DataType::Long),
            "float" => Ok(DataType::Float),
            "double" => Ok(DataType::Double),
            "string" | "str" | "char" => Ok(DataType::String),
            other => Err(format!("unknown data type: {other}")),
        }
    }
}

/// Value of a dataset or variable attribute.
///
/// Plain JSON scalars map to the natural variant. The `Typed` form carries
/// an explicit storage type for values whose width JSON cannot express,
/// e.g. `{"dtype": "float", "value": 45.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<AttrValue>),
    Typed {
        dtype: DataType,
        value: Box<AttrValue>,
    },
}

impl AttrValue {
    pub fn typed(dtype: DataType, value: impl Into<AttrValue>) -> Self {
        AttrValue::Typed {
            dtype,
            value: Box::new(value.into()),
        }
    }

    /// Storage type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            AttrValue::Bool(_) => DataType::Byte,
            AttrValue::Int(_) => DataType::Int,
            AttrValue::Float(_) => DataType::Double,
            AttrValue::Text(_) => DataType::String,
            AttrValue::List(items) => items
                .first()
                .map_or(DataType::String, AttrValue::data_type),
            AttrValue::Typed { dtype, .. } => *dtype,
        }
    }

    /// Borrow the value as text, looking through an explicit type wrapper.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            AttrValue::Typed { value, .. } => value.as_str(),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Int(value) => write!(f, "{value}"),
            AttrValue::Float(value) => write!(f, "{value}"),
            AttrValue::Text(value) => f.write_str(value),
            AttrValue::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            AttrValue::Typed { value, .. } => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_long_share_storage() {
        assert!(DataType::Long.satisfies(DataType::Int));
        assert!(DataType::Int.satisfies(DataType::Long));
        assert!(!DataType::Short.satisfies(DataType::Int));
        assert!(!DataType::Float.satisfies(DataType::Double));
    }

    #[test]
    fn typed_value_reports_explicit_type() {
        let value = AttrValue::typed(DataType::Float, 45.0);
        assert_eq!(value.data_type(), DataType::Float);
        assert_eq!(value.to_string(), "45");
        assert_eq!(AttrValue::from("K").data_type(), DataType::String);
    }

    #[test]
    fn untagged_json_picks_natural_variant() {
        let values: Vec<AttrValue> =
            serde_json::from_str(r#"[true, 3, 2.5, "x", {"dtype": "short", "value": 7}]"#)
                .expect("parse values");
        assert_eq!(values[0], AttrValue::Bool(true));
        assert_eq!(values[1], AttrValue::Int(3));
        assert_eq!(values[2], AttrValue::Float(2.5));
        assert_eq!(values[3].as_str(), Some("x"));
        assert_eq!(values[4].data_type(), DataType::Short);
    }
}

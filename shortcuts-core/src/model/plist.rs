use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    Bool(bool),
    Integer(i64),
    String(String),
    Data(Vec<u8>),
    Array(Vec<PlistValue>),
    Dict(IndexMap<String, PlistValue>),
}

impl PlistValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlistValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlistValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PlistValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            PlistValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, PlistValue>> {
        match self {
            PlistValue::Dict(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<&str> for PlistValue {
    fn from(value: &str) -> Self {
        PlistValue::String(value.to_owned())
    }
}

impl From<String> for PlistValue {
    fn from(value: String) -> Self {
        PlistValue::String(value)
    }
}

impl From<bool> for PlistValue {
    fn from(value: bool) -> Self {
        PlistValue::Bool(value)
    }
}

impl From<i64> for PlistValue {
    fn from(value: i64) -> Self {
        PlistValue::Integer(value)
    }
}

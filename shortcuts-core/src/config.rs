use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::FieldValue;

#[derive(Deserialize, Debug)]
pub struct Document {
    pub name: Option<String>,
    pub client_release: Option<String>,
    pub client_version: Option<String>,
    pub minimal_client_version: Option<i64>,
    #[serde(default)]
    pub action: Vec<ActionRecord>,
}

#[derive(Deserialize, Debug)]
pub struct ActionRecord {
    #[serde(rename = "type")]
    pub kind: String,
    /// Actions nested inside a control-flow record.
    #[serde(default)]
    pub action: Vec<ActionRecord>,
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldValue>,
}

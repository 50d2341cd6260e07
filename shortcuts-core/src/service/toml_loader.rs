use crate::config;
use crate::error::Result;
use crate::model::Shortcut;
use crate::service::document_parser;
use crate::service::grouping::GroupIdSource;

pub fn loads(source: &str, ids: &mut dyn GroupIdSource) -> Result<Shortcut> {
    let document: config::Document = toml::from_str(source)?;
    document_parser::build(document, ids)
}

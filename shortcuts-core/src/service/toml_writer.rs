use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::model::{Action, FieldValue, Shortcut};

#[derive(Serialize)]
struct Document<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_release: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimal_client_version: Option<i64>,
    action: Vec<IndexMap<String, FieldValue>>,
}

pub fn dumps(shortcut: &Shortcut) -> Result<String> {
    let defaults = Shortcut::default();
    let document = Document {
        name: (!shortcut.name.is_empty()).then_some(shortcut.name.as_str()),
        client_release: (shortcut.client_release != defaults.client_release)
            .then_some(shortcut.client_release.as_str()),
        client_version: (shortcut.client_version != defaults.client_version)
            .then_some(shortcut.client_version.as_str()),
        minimal_client_version: (shortcut.minimal_client_version
            != defaults.minimal_client_version)
            .then_some(shortcut.minimal_client_version),
        action: shortcut.actions.iter().map(record).collect(),
    };
    Ok(toml::to_string(&document)?)
}

// scalar fields are emitted before key/value lists so every field stays
// inside its own [[action]] table
fn record(action: &Action) -> IndexMap<String, FieldValue> {
    let mut fields = IndexMap::new();
    fields.insert(
        "type".to_owned(),
        FieldValue::Str(action.kind.tag().to_owned()),
    );
    for (name, value) in &action.data {
        if !matches!(value, FieldValue::Pairs(_)) {
            fields.insert(name.clone(), value.clone());
        }
    }
    for (name, value) in &action.data {
        if matches!(value, FieldValue::Pairs(_)) {
            fields.insert(name.clone(), value.clone());
        }
    }
    fields
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{ActionKind, KeyValue};

    fn text_action(text: &str) -> Action {
        let mut data = IndexMap::new();
        data.insert("text".to_owned(), FieldValue::Str(text.to_owned()));
        Action {
            kind: ActionKind::Text,
            data,
        }
    }

    #[test]
    fn test_dumps_actions_with_type_first() {
        let mut shortcut = Shortcut::default();
        shortcut.actions.push(text_action("hello"));

        let rendered = dumps(&shortcut).unwrap();
        assert!(rendered.contains("[[action]]"));
        let type_index = rendered.find("type = \"text\"").unwrap();
        let text_index = rendered.find("text = \"hello\"").unwrap();
        assert!(type_index < text_index);
    }

    #[test]
    fn test_default_metadata_is_omitted() {
        let rendered = dumps(&Shortcut::default()).unwrap();
        assert!(!rendered.contains("client_release"));
        assert!(!rendered.contains("client_version"));
        assert!(!rendered.contains("minimal_client_version"));
        assert!(!rendered.contains("name"));
    }

    #[test]
    fn test_named_document() {
        let shortcut = Shortcut {
            name: "demo".to_owned(),
            ..Shortcut::default()
        };
        assert!(dumps(&shortcut).unwrap().contains("name = \"demo\""));
    }

    #[test]
    fn test_round_trip_through_loader() {
        let mut data = IndexMap::new();
        data.insert("method".to_owned(), FieldValue::Str("POST".to_owned()));
        data.insert("advanced".to_owned(), FieldValue::Bool(true));
        data.insert(
            "headers".to_owned(),
            FieldValue::Pairs(vec![KeyValue {
                key: "authorization".to_owned(),
                value: "{{token}}".to_owned(),
            }]),
        );
        let mut shortcut = Shortcut::default();
        shortcut.actions.push(Action {
            kind: ActionKind::GetUrl,
            data,
        });

        let rendered = dumps(&shortcut).unwrap();
        let loaded = crate::service::toml_loader::loads(
            &rendered,
            &mut crate::service::grouping::UuidSource,
        )
        .unwrap();
        assert_eq!(shortcut, loaded);
    }
}

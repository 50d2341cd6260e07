use indexmap::IndexMap;

use crate::config;
use crate::error::{Error, Result};
use crate::model::{Action, ActionKind, FieldValue, FlowRole, Shortcut};
use crate::service::grouping::{GroupIdSource, GroupingResolver};

/// Walks the parsed document records left to right and assembles the ordered
/// action sequence, flattening nested control-flow blocks on the way.
pub fn build(document: config::Document, source: &mut dyn GroupIdSource) -> Result<Shortcut> {
    let mut shortcut = Shortcut::default();
    if let Some(name) = document.name {
        shortcut.name = name;
    }
    if let Some(client_release) = document.client_release {
        shortcut.client_release = client_release;
    }
    if let Some(client_version) = document.client_version {
        shortcut.client_version = client_version;
    }
    if let Some(minimal_client_version) = document.minimal_client_version {
        shortcut.minimal_client_version = minimal_client_version;
    }

    let mut resolver = GroupingResolver::new(source);
    let mut position = 0;
    append_records(
        document.action,
        &mut resolver,
        &mut shortcut.actions,
        &mut position,
    )?;
    Ok(shortcut)
}

fn append_records(
    records: Vec<config::ActionRecord>,
    resolver: &mut GroupingResolver<'_>,
    actions: &mut Vec<Action>,
    position: &mut usize,
) -> Result<()> {
    for record in records {
        append_record(record, resolver, actions, position)?;
    }
    Ok(())
}

fn append_record(
    record: config::ActionRecord,
    resolver: &mut GroupingResolver<'_>,
    actions: &mut Vec<Action>,
    position: &mut usize,
) -> Result<()> {
    *position += 1;
    let kind = ActionKind::from_tag(&record.kind)
        .ok_or_else(|| Error::UnknownActionType(record.kind.clone()))?;

    let mut data = record.fields;
    let explicit = match data.get("group_id") {
        None => None,
        Some(FieldValue::Str(id)) => Some(id.clone()),
        Some(_) => {
            return Err(Error::InvalidField {
                action: kind.tag().to_owned(),
                field: "group_id".to_owned(),
                reason: "expected a string".to_owned(),
            });
        }
    };
    if let Some(id) = resolver.resolve(kind, explicit, *position)? {
        // insert keeps the original slot when the key was already present
        data.insert("group_id".to_owned(), FieldValue::Str(id));
    }
    actions.push(Action { kind, data });

    if record.action.is_empty() {
        return Ok(());
    }
    append_records(record.action, resolver, actions, position)?;

    // a nested block closes itself once its children are exhausted
    if let (Some(FlowRole::Open), Some(closing)) = (kind.flow_role(), kind.closing()) {
        *position += 1;
        let mut data = IndexMap::new();
        if let Some(id) = resolver.resolve(closing, None, *position)? {
            data.insert("group_id".to_owned(), FieldValue::Str(id));
        }
        actions.push(Action {
            kind: closing,
            data,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    struct Counter(usize);

    impl GroupIdSource for Counter {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("id-{}", self.0)
        }
    }

    fn load(source: &str) -> Result<Shortcut> {
        let document: config::Document = toml::from_str(source).unwrap();
        build(document, &mut Counter(0))
    }

    #[test]
    fn test_explicit_group_id_is_kept_verbatim() {
        let shortcut = load(
            r#"
            [[action]]
            type = "if"
            condition = "equals"
            compare_with = "true"
            group_id = "123"

            [[action]]
            type = "else"
            group_id = "123"

            [[action]]
            type = "endif"
            group_id = "123"
            "#,
        )
        .unwrap();

        assert_eq!(3, shortcut.actions.len());
        let if_action = &shortcut.actions[0];
        assert_eq!(ActionKind::If, if_action.kind);
        assert_eq!(
            vec!["condition", "compare_with", "group_id"],
            if_action.data.keys().collect::<Vec<_>>(),
        );
        assert_eq!(Some("123"), if_action.data["group_id"].as_str());
        assert_eq!(Some("123"), shortcut.actions[1].data["group_id"].as_str());
        assert_eq!(Some("123"), shortcut.actions[2].data["group_id"].as_str());
    }

    #[test]
    fn test_minted_identifiers_differ_per_block() {
        let shortcut = load(
            r#"
            [[action]]
            type = "repeat_start"
            count = 2

            [[action]]
            type = "if"
            condition = "equals"
            compare_with = "x"

            [[action]]
            type = "endif"

            [[action]]
            type = "repeat_end"
            "#,
        )
        .unwrap();

        let repeat = shortcut.actions[0].data["group_id"].as_str().unwrap();
        let conditional = shortcut.actions[1].data["group_id"].as_str().unwrap();
        assert_ne!(repeat, conditional);
        assert_eq!(
            conditional,
            shortcut.actions[2].data["group_id"].as_str().unwrap(),
        );
        assert_eq!(
            repeat,
            shortcut.actions[3].data["group_id"].as_str().unwrap(),
        );
    }

    #[test]
    fn test_nested_block_is_flattened_and_closed() {
        let shortcut = load(
            r#"
            [[action]]
            type = "repeat_start"
            count = 3

                [[action.action]]
                type = "text"
                text = "hello"
            "#,
        )
        .unwrap();

        let kinds: Vec<_> = shortcut.actions.iter().map(|action| action.kind).collect();
        assert_eq!(
            vec![ActionKind::RepeatStart, ActionKind::Text, ActionKind::RepeatEnd],
            kinds,
        );
        assert_eq!(
            shortcut.actions[0].data["group_id"],
            shortcut.actions[2].data["group_id"],
        );
    }

    #[test]
    fn test_nested_else_continues_the_enclosing_block() {
        let shortcut = load(
            r#"
            [[action]]
            type = "if"
            condition = "equals"
            compare_with = "yes"

                [[action.action]]
                type = "show_result"
                text = "true!"

                [[action.action]]
                type = "else"

                [[action.action]]
                type = "show_result"
                text = "false!"
            "#,
        )
        .unwrap();

        let kinds: Vec<_> = shortcut.actions.iter().map(|action| action.kind).collect();
        assert_eq!(
            vec![
                ActionKind::If,
                ActionKind::ShowResult,
                ActionKind::Else,
                ActionKind::ShowResult,
                ActionKind::EndIf,
            ],
            kinds,
        );
        let group = &shortcut.actions[0].data["group_id"];
        assert_eq!(group, &shortcut.actions[2].data["group_id"]);
        assert_eq!(group, &shortcut.actions[4].data["group_id"]);
    }

    #[test]
    fn test_unknown_action_type() {
        let result = load("[[action]]\ntype = \"frobnicate\"\n");
        assert_matches!(result, Err(Error::UnknownActionType(tag)) if tag == "frobnicate");
    }

    #[test]
    fn test_unmatched_continuation_names_position() {
        let result = load(
            r#"
            [[action]]
            type = "text"
            text = "hello"

            [[action]]
            type = "endif"
            "#,
        );
        assert_matches!(
            result,
            Err(Error::MalformedControlFlow { action, position: 2, .. }) if action == "endif"
        );
    }

    #[test]
    fn test_metadata_overrides() {
        let shortcut = load("name = \"demo\"\nclient_version = \"800\"\n").unwrap();
        assert_eq!("demo", shortcut.name);
        assert_eq!("800", shortcut.client_version);
        assert_eq!("2.0", shortcut.client_release);
        assert_eq!(411, shortcut.minimal_client_version);
    }
}

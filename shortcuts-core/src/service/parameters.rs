use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::model::{Action, ActionKind, FieldValue, KeyValue, PlistValue};
use crate::service::encode;

const CONDITIONS: [(&str, &str); 4] = [
    ("equals", "Equals"),
    ("contains", "Contains"),
    ("greater_than", "Is Greater Than"),
    ("less_than", "Is Less Than"),
];

/// Produces the `WFWorkflowActionParameters` dictionary for one action.
pub fn to_parameters(action: &Action) -> Result<PlistValue> {
    let mut params = IndexMap::new();
    match action.kind {
        ActionKind::Text => {
            params.insert("WFTextActionText".to_owned(), rich(action, "text")?);
        }
        ActionKind::ShowResult => {
            params.insert("Text".to_owned(), rich(action, "text")?);
        }
        ActionKind::Url => {
            params.insert(
                "WFURLActionURL".to_owned(),
                PlistValue::from(string(action, "url")?),
            );
        }
        ActionKind::Comment => {
            params.insert(
                "WFCommentActionText".to_owned(),
                PlistValue::from(string(action, "text")?),
            );
        }
        ActionKind::Ask => {
            params.insert("WFAskActionPrompt".to_owned(), rich(action, "question")?);
            if action.data.contains_key("default_answer") {
                params.insert(
                    "WFAskActionDefaultAnswer".to_owned(),
                    rich(action, "default_answer")?,
                );
            }
        }
        ActionKind::SetVariable => {
            params.insert(
                "WFVariableName".to_owned(),
                PlistValue::from(string(action, "name")?),
            );
        }
        ActionKind::GetVariable => {
            params.insert(
                "WFVariable".to_owned(),
                encode::variable_attachment(string(action, "name")?),
            );
        }
        ActionKind::Wait => {
            params.insert(
                "WFDelayTime".to_owned(),
                PlistValue::from(integer(action, "time")?),
            );
        }
        ActionKind::Notification => {
            if action.data.contains_key("title") {
                params.insert(
                    "WFNotificationActionTitle".to_owned(),
                    rich(action, "title")?,
                );
            }
            params.insert("WFNotificationActionBody".to_owned(), rich(action, "text")?);
        }
        ActionKind::GetUrl => {
            if let Some(value) = action.data.get("method") {
                let method = value
                    .as_str()
                    .ok_or_else(|| invalid(action.kind, "method", "expected a string"))?;
                params.insert("WFHTTPMethod".to_owned(), PlistValue::from(method));
            }
            if let Some(value) = action.data.get("advanced") {
                let advanced = value
                    .as_bool()
                    .ok_or_else(|| invalid(action.kind, "advanced", "expected a boolean"))?;
                params.insert("Advanced".to_owned(), PlistValue::from(advanced));
            }
            if let Some(headers) = optional_pairs(action, "headers")? {
                params.insert("ShowHeaders".to_owned(), PlistValue::from(true));
                params.insert("WFHTTPHeaders".to_owned(), dictionary(action, "headers", headers)?);
            }
            if let Some(json) = optional_pairs(action, "json")? {
                params.insert("WFHTTPBodyType".to_owned(), PlistValue::from("Json"));
                params.insert("WFJSONValues".to_owned(), dictionary(action, "json", json)?);
            }
        }
        ActionKind::If => {
            params.insert(
                "WFCondition".to_owned(),
                PlistValue::from(condition_label(action)?),
            );
            params.insert(
                "WFConditionalActionString".to_owned(),
                PlistValue::from(string(action, "compare_with")?),
            );
        }
        ActionKind::RepeatStart => {
            params.insert(
                "WFRepeatCount".to_owned(),
                PlistValue::from(integer(action, "count")?),
            );
        }
        ActionKind::OpenUrl
        | ActionKind::Exit
        | ActionKind::Vibrate
        | ActionKind::GetClipboard
        | ActionKind::SetClipboard
        | ActionKind::Else
        | ActionKind::EndIf
        | ActionKind::RepeatEnd
        | ActionKind::RepeatEachStart
        | ActionKind::RepeatEachEnd => {}
    }

    if let Some(role) = action.kind.flow_role() {
        params.insert(
            "GroupingIdentifier".to_owned(),
            PlistValue::from(string(action, "group_id")?),
        );
        params.insert("WFControlFlowMode".to_owned(), PlistValue::from(role as i64));
    }

    Ok(PlistValue::Dict(params))
}

/// Reverse of [`to_parameters`]: reconstructs the raw `data` mapping from a
/// `WFWorkflowActionParameters` dictionary. Derived keys are dropped.
pub fn from_parameters(
    kind: ActionKind,
    params: &IndexMap<String, PlistValue>,
) -> Result<IndexMap<String, FieldValue>> {
    let mut data = IndexMap::new();
    match kind {
        ActionKind::Text => {
            decode_rich(params, "WFTextActionText", "text", &mut data)?;
        }
        ActionKind::ShowResult => {
            decode_rich(params, "Text", "text", &mut data)?;
        }
        ActionKind::Url => {
            decode_string(params, "WFURLActionURL", "url", &mut data)?;
        }
        ActionKind::Comment => {
            decode_string(params, "WFCommentActionText", "text", &mut data)?;
        }
        ActionKind::Ask => {
            decode_rich(params, "WFAskActionPrompt", "question", &mut data)?;
            decode_rich(params, "WFAskActionDefaultAnswer", "default_answer", &mut data)?;
        }
        ActionKind::SetVariable => {
            decode_string(params, "WFVariableName", "name", &mut data)?;
        }
        ActionKind::GetVariable => {
            if let Some(node) = params.get("WFVariable") {
                let name = encode::decode_variable_attachment(node)?;
                data.insert("name".to_owned(), FieldValue::Str(name));
            }
        }
        ActionKind::Wait => {
            if let Some(time) = params.get("WFDelayTime").and_then(PlistValue::as_integer) {
                data.insert("time".to_owned(), FieldValue::Int(time));
            }
        }
        ActionKind::Notification => {
            decode_rich(params, "WFNotificationActionTitle", "title", &mut data)?;
            decode_rich(params, "WFNotificationActionBody", "text", &mut data)?;
        }
        ActionKind::GetUrl => {
            decode_string(params, "WFHTTPMethod", "method", &mut data)?;
            if let Some(advanced) = params.get("Advanced").and_then(PlistValue::as_bool) {
                data.insert("advanced".to_owned(), FieldValue::Bool(advanced));
            }
            if let Some(node) = params.get("WFHTTPHeaders") {
                let headers = encode::decode_dictionary_field(node)?;
                data.insert("headers".to_owned(), FieldValue::Pairs(headers));
            }
            if let Some(node) = params.get("WFJSONValues") {
                let json = encode::decode_dictionary_field(node)?;
                data.insert("json".to_owned(), FieldValue::Pairs(json));
            }
        }
        ActionKind::If => {
            if let Some(label) = params.get("WFCondition").and_then(PlistValue::as_str) {
                let tag = CONDITIONS
                    .iter()
                    .find(|(_, known)| *known == label)
                    .map(|(tag, _)| *tag)
                    .ok_or_else(|| invalid(kind, "condition", "unknown condition"))?;
                data.insert("condition".to_owned(), FieldValue::Str(tag.to_owned()));
            }
            decode_string(params, "WFConditionalActionString", "compare_with", &mut data)?;
        }
        ActionKind::RepeatStart => {
            if let Some(count) = params.get("WFRepeatCount").and_then(PlistValue::as_integer) {
                data.insert("count".to_owned(), FieldValue::Int(count));
            }
        }
        ActionKind::OpenUrl
        | ActionKind::Exit
        | ActionKind::Vibrate
        | ActionKind::GetClipboard
        | ActionKind::SetClipboard
        | ActionKind::Else
        | ActionKind::EndIf
        | ActionKind::RepeatEnd
        | ActionKind::RepeatEachStart
        | ActionKind::RepeatEachEnd => {}
    }

    if kind.is_control_flow() {
        decode_string(params, "GroupingIdentifier", "group_id", &mut data)?;
    }
    Ok(data)
}

fn invalid(kind: ActionKind, field: &str, reason: &str) -> Error {
    Error::InvalidField {
        action: kind.tag().to_owned(),
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}

fn required<'a>(action: &'a Action, field: &str) -> Result<&'a FieldValue> {
    action.data.get(field).ok_or_else(|| Error::MissingField {
        action: action.kind.tag().to_owned(),
        field: field.to_owned(),
    })
}

fn string<'a>(action: &'a Action, field: &str) -> Result<&'a str> {
    required(action, field)?
        .as_str()
        .ok_or_else(|| invalid(action.kind, field, "expected a string"))
}

fn integer(action: &Action, field: &str) -> Result<i64> {
    required(action, field)?
        .as_int()
        .ok_or_else(|| invalid(action.kind, field, "expected an integer"))
}

fn optional_pairs<'a>(action: &'a Action, field: &str) -> Result<Option<&'a [KeyValue]>> {
    match action.data.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_pairs()
            .map(Some)
            .ok_or_else(|| invalid(action.kind, field, "expected a key/value list")),
    }
}

fn rich(action: &Action, field: &str) -> Result<PlistValue> {
    encode::text_token(string(action, field)?).map_err(|source| {
        Error::MalformedVariableReference {
            action: action.kind.tag().to_owned(),
            field: field.to_owned(),
            source,
        }
    })
}

fn dictionary(action: &Action, field: &str, pairs: &[KeyValue]) -> Result<PlistValue> {
    encode::dictionary_field(pairs).map_err(|source| Error::MalformedVariableReference {
        action: action.kind.tag().to_owned(),
        field: field.to_owned(),
        source,
    })
}

fn condition_label(action: &Action) -> Result<&'static str> {
    let condition = string(action, "condition")?;
    CONDITIONS
        .iter()
        .find(|(tag, _)| *tag == condition)
        .map(|(_, label)| *label)
        .ok_or_else(|| invalid(action.kind, "condition", "unknown condition"))
}

fn decode_rich(
    params: &IndexMap<String, PlistValue>,
    key: &str,
    field: &str,
    data: &mut IndexMap<String, FieldValue>,
) -> Result<()> {
    if let Some(node) = params.get(key) {
        let text = encode::decode_text_token(node)?;
        data.insert(field.to_owned(), FieldValue::Str(text));
    }
    Ok(())
}

fn decode_string(
    params: &IndexMap<String, PlistValue>,
    key: &str,
    field: &str,
    data: &mut IndexMap<String, FieldValue>,
) -> Result<()> {
    if let Some(value) = params.get(key).and_then(PlistValue::as_str) {
        data.insert(field.to_owned(), FieldValue::Str(value.to_owned()));
    }
    Ok(())
}

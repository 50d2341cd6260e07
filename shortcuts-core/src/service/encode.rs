use indexmap::IndexMap;

use crate::error::{Error, Result, TokenError};
use crate::model::{KeyValue, PlistValue, TokenAttachment, TokenText};

fn serialized(value: IndexMap<String, PlistValue>, kind: &str) -> PlistValue {
    let mut node = IndexMap::new();
    node.insert("Value".to_owned(), PlistValue::Dict(value));
    node.insert("WFSerializationType".to_owned(), PlistValue::from(kind));
    PlistValue::Dict(node)
}

/// Encodes text that may carry `{{variable}}` references as a
/// `WFTextTokenString` node.
pub fn text_token(raw: &str) -> Result<PlistValue, TokenError> {
    let text: TokenText = raw.parse()?;

    let mut ranges = IndexMap::new();
    for attachment in &text.attachments {
        let mut entry = IndexMap::new();
        entry.insert("Type".to_owned(), PlistValue::from("Variable"));
        entry.insert(
            "VariableName".to_owned(),
            PlistValue::from(attachment.name.clone()),
        );
        ranges.insert(format!("{{{}, 1}}", attachment.start), PlistValue::Dict(entry));
    }

    let mut value = IndexMap::new();
    value.insert("string".to_owned(), PlistValue::from(text.value));
    value.insert("attachmentsByRange".to_owned(), PlistValue::Dict(ranges));
    Ok(serialized(value, "WFTextTokenString"))
}

/// Encodes an ordered key/value list (HTTP headers, JSON body fields) as a
/// `WFDictionaryFieldValue` node. Keys and values are text-token encoded
/// independently.
pub fn dictionary_field(pairs: &[KeyValue]) -> Result<PlistValue, TokenError> {
    let mut items = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let mut item = IndexMap::new();
        item.insert("WFItemType".to_owned(), PlistValue::Integer(0));
        item.insert("WFKey".to_owned(), text_token(&pair.key)?);
        item.insert("WFValue".to_owned(), text_token(&pair.value)?);
        items.push(PlistValue::Dict(item));
    }

    let mut value = IndexMap::new();
    value.insert(
        "WFDictionaryFieldValueItems".to_owned(),
        PlistValue::Array(items),
    );
    Ok(serialized(value, "WFDictionaryFieldValue"))
}

/// Encodes a reference to a named variable as a `WFTextTokenAttachment` node.
pub fn variable_attachment(name: &str) -> PlistValue {
    let mut value = IndexMap::new();
    value.insert("Type".to_owned(), PlistValue::from("Variable"));
    value.insert("VariableName".to_owned(), PlistValue::from(name));
    serialized(value, "WFTextTokenAttachment")
}

fn serialized_value<'a>(
    node: &'a PlistValue,
    kind: &str,
) -> Result<&'a IndexMap<String, PlistValue>> {
    let entries = node
        .as_dict()
        .ok_or_else(|| Error::InvalidDocument(format!("{kind} node is not a dictionary")))?;
    let declared = entries
        .get("WFSerializationType")
        .and_then(PlistValue::as_str);
    if declared != Some(kind) {
        return Err(Error::InvalidDocument(format!(
            "expected a {kind} node, found {declared:?}"
        )));
    }
    entries
        .get("Value")
        .and_then(PlistValue::as_dict)
        .ok_or_else(|| Error::InvalidDocument(format!("{kind} node has no Value dictionary")))
}

fn parse_range_start(range: &str) -> Option<usize> {
    range
        .strip_prefix('{')?
        .strip_suffix('}')?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Decodes a `WFTextTokenString` node back into `{{variable}}` text.
pub fn decode_text_token(node: &PlistValue) -> Result<String> {
    let value = serialized_value(node, "WFTextTokenString")?;
    let string = value
        .get("string")
        .and_then(PlistValue::as_str)
        .ok_or_else(|| Error::InvalidDocument("text token has no string".to_owned()))?;

    let mut attachments = Vec::new();
    if let Some(ranges) = value.get("attachmentsByRange").and_then(PlistValue::as_dict) {
        for (range, attachment) in ranges {
            let start = parse_range_start(range).ok_or_else(|| {
                Error::InvalidDocument(format!("invalid attachment range `{range}`"))
            })?;
            let name = attachment
                .as_dict()
                .and_then(|entries| entries.get("VariableName"))
                .and_then(PlistValue::as_str)
                .ok_or_else(|| {
                    Error::InvalidDocument(format!("attachment at `{range}` has no variable name"))
                })?;
            attachments.push(TokenAttachment {
                name: name.to_owned(),
                start,
            });
        }
    }
    attachments.sort_by_key(|attachment| attachment.start);

    let text = TokenText {
        value: string.to_owned(),
        attachments,
    };
    Ok(text.to_source())
}

/// Decodes a `WFDictionaryFieldValue` node back into ordered key/value pairs.
pub fn decode_dictionary_field(node: &PlistValue) -> Result<Vec<KeyValue>> {
    let value = serialized_value(node, "WFDictionaryFieldValue")?;
    let items = value
        .get("WFDictionaryFieldValueItems")
        .and_then(PlistValue::as_array)
        .ok_or_else(|| Error::InvalidDocument("dictionary field has no items".to_owned()))?;

    let mut pairs = Vec::with_capacity(items.len());
    for item in items {
        let entries = item
            .as_dict()
            .ok_or_else(|| Error::InvalidDocument("dictionary field item is not a dictionary".to_owned()))?;
        let key = entries
            .get("WFKey")
            .map(decode_text_token)
            .transpose()?
            .ok_or_else(|| Error::InvalidDocument("dictionary field item has no key".to_owned()))?;
        let value = entries
            .get("WFValue")
            .map(decode_text_token)
            .transpose()?
            .ok_or_else(|| Error::InvalidDocument("dictionary field item has no value".to_owned()))?;
        pairs.push(KeyValue { key, value });
    }
    Ok(pairs)
}

/// Decodes a `WFTextTokenAttachment` node back into the referenced variable
/// name.
pub fn decode_variable_attachment(node: &PlistValue) -> Result<String> {
    let value = serialized_value(node, "WFTextTokenAttachment")?;
    value
        .get("VariableName")
        .and_then(PlistValue::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::InvalidDocument("attachment has no variable name".to_owned()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::ATTACHMENT_PLACEHOLDER;

    fn dict_of(node: &PlistValue) -> &IndexMap<String, PlistValue> {
        node.as_dict().expect("dictionary node")
    }

    #[test]
    fn test_text_token_without_references() {
        let node = text_token("plain").unwrap();
        let value = dict_of(dict_of(&node).get("Value").unwrap());
        assert_eq!(Some("plain"), value.get("string").unwrap().as_str());
        assert_eq!(
            Some(0),
            value
                .get("attachmentsByRange")
                .unwrap()
                .as_dict()
                .map(IndexMap::len),
        );
        assert_eq!(
            Some("WFTextTokenString"),
            dict_of(&node).get("WFSerializationType").unwrap().as_str(),
        );
    }

    #[test]
    fn test_text_token_single_reference() {
        let node = text_token("{{authorization}}").unwrap();
        let value = dict_of(dict_of(&node).get("Value").unwrap());
        assert_eq!(
            Some(ATTACHMENT_PLACEHOLDER.to_string().as_str()),
            value.get("string").unwrap().as_str(),
        );
        let ranges = value.get("attachmentsByRange").unwrap().as_dict().unwrap();
        assert_eq!(1, ranges.len());
        let attachment = dict_of(ranges.get("{0, 1}").unwrap());
        assert_eq!(Some("Variable"), attachment.get("Type").unwrap().as_str());
        assert_eq!(
            Some("authorization"),
            attachment.get("VariableName").unwrap().as_str(),
        );
    }

    #[test]
    fn test_text_token_multiple_references() {
        let node = text_token("a{{x}}b{{y}}").unwrap();
        let value = dict_of(dict_of(&node).get("Value").unwrap());
        let ranges = value.get("attachmentsByRange").unwrap().as_dict().unwrap();
        assert_eq!(2, ranges.len());
        assert!(ranges.contains_key("{1, 1}"));
        assert!(ranges.contains_key("{3, 1}"));
    }

    #[test]
    fn test_dictionary_field_preserves_order() {
        let pairs = vec![
            KeyValue {
                key: "header1".to_owned(),
                value: "value".to_owned(),
            },
            KeyValue {
                key: "authorization".to_owned(),
                value: "{{authorization}}".to_owned(),
            },
        ];
        let node = dictionary_field(&pairs).unwrap();
        let items = dict_of(dict_of(&node).get("Value").unwrap())
            .get("WFDictionaryFieldValueItems")
            .unwrap()
            .as_array()
            .unwrap();
        assert_eq!(2, items.len());
        let first_key = decode_text_token(dict_of(&items[0]).get("WFKey").unwrap()).unwrap();
        assert_eq!("header1", first_key);

        assert_eq!(pairs, decode_dictionary_field(&node).unwrap());
    }

    #[test]
    fn test_decode_text_token_round_trip() {
        for raw in ["", "plain", "{{a}}", "x {{a}} y {{b}}"] {
            let node = text_token(raw).unwrap();
            assert_eq!(raw, decode_text_token(&node).unwrap());
        }
    }

    #[test]
    fn test_variable_attachment_round_trip() {
        let node = variable_attachment("result");
        assert_eq!("result", decode_variable_attachment(&node).unwrap());
    }

    #[test]
    fn test_malformed_reference_is_rejected() {
        assert!(text_token("{{broken").is_err());
    }
}

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::model::{Action, ActionKind, PlistValue, Shortcut};
use crate::service::{parameters, plist_reader};

pub fn loads(source: &str) -> Result<Shortcut> {
    let value = plist_reader::parse(source)?;
    let document = value
        .as_dict()
        .ok_or_else(|| Error::InvalidDocument("top-level value is not a dictionary".to_owned()))?;

    let mut shortcut = Shortcut::default();
    if let Some(release) = document
        .get("WFWorkflowClientRelease")
        .and_then(PlistValue::as_str)
    {
        shortcut.client_release = release.to_owned();
    }
    if let Some(version) = document
        .get("WFWorkflowClientVersion")
        .and_then(PlistValue::as_str)
    {
        shortcut.client_version = version.to_owned();
    }

    let entries = document
        .get("WFWorkflowActions")
        .and_then(PlistValue::as_array)
        .unwrap_or_default();
    for entry in entries {
        shortcut.actions.push(action_from_entry(entry)?);
    }
    Ok(shortcut)
}

fn action_from_entry(entry: &PlistValue) -> Result<Action> {
    let entry = entry
        .as_dict()
        .ok_or_else(|| Error::InvalidDocument("action entry is not a dictionary".to_owned()))?;
    let identifier = entry
        .get("WFWorkflowActionIdentifier")
        .and_then(PlistValue::as_str)
        .ok_or_else(|| Error::InvalidDocument("action entry has no identifier".to_owned()))?;

    let empty = IndexMap::new();
    let params = entry
        .get("WFWorkflowActionParameters")
        .map(|params| {
            params.as_dict().ok_or_else(|| {
                Error::InvalidDocument("action parameters are not a dictionary".to_owned())
            })
        })
        .transpose()?
        .unwrap_or(&empty);

    let flow_mode = params.get("WFControlFlowMode").and_then(PlistValue::as_integer);
    let kind = ActionKind::from_identifier(identifier, flow_mode)
        .ok_or_else(|| Error::UnknownActionType(identifier.to_owned()))?;
    let data = parameters::from_parameters(kind, params)?;
    Ok(Action { kind, data })
}

use indexmap::IndexMap;

use crate::error::Result;
use crate::model::{PlistValue, Shortcut};
use crate::service::{parameters, plist_writer};

pub fn dumps(shortcut: &Shortcut) -> Result<String> {
    Ok(plist_writer::to_string(&document_value(shortcut)?))
}

/// Wraps the action sequence in the full workflow envelope.
pub fn document_value(shortcut: &Shortcut) -> Result<PlistValue> {
    let mut actions = Vec::with_capacity(shortcut.actions.len());
    for action in &shortcut.actions {
        let mut entry = IndexMap::new();
        entry.insert(
            "WFWorkflowActionIdentifier".to_owned(),
            PlistValue::from(action.kind.identifier()),
        );
        entry.insert(
            "WFWorkflowActionParameters".to_owned(),
            parameters::to_parameters(action)?,
        );
        actions.push(PlistValue::Dict(entry));
    }

    let mut document = IndexMap::new();
    document.insert("WFWorkflowActions".to_owned(), PlistValue::Array(actions));
    document.insert(
        "WFWorkflowClientRelease".to_owned(),
        PlistValue::from(shortcut.client_release.clone()),
    );
    document.insert(
        "WFWorkflowClientVersion".to_owned(),
        PlistValue::from(shortcut.client_version.clone()),
    );
    document.insert("WFWorkflowIcon".to_owned(), icon());
    document.insert("WFWorkflowImportQuestions".to_owned(), import_questions());
    document.insert(
        "WFWorkflowInputContentItemClasses".to_owned(),
        input_content_item_classes(),
    );
    document.insert("WFWorkflowTypes".to_owned(), workflow_types());
    Ok(PlistValue::Dict(document))
}

fn icon() -> PlistValue {
    let mut icon = IndexMap::new();
    icon.insert(
        "WFWorkflowIconGlyphNumber".to_owned(),
        PlistValue::Integer(59511),
    );
    icon.insert("WFWorkflowIconImageData".to_owned(), PlistValue::Data(vec![]));
    icon.insert(
        "WFWorkflowIconStartColor".to_owned(),
        PlistValue::Integer(431_817_727),
    );
    PlistValue::Dict(icon)
}

fn import_questions() -> PlistValue {
    PlistValue::Array(vec![])
}

fn input_content_item_classes() -> PlistValue {
    let classes = [
        "WFAppStoreAppContentItem",
        "WFArticleContentItem",
        "WFContactContentItem",
        "WFDateContentItem",
        "WFEmailAddressContentItem",
        "WFGenericFileContentItem",
        "WFImageContentItem",
        "WFiTunesProductContentItem",
        "WFLocationContentItem",
        "WFDCMapsLinkContentItem",
        "WFAVAssetContentItem",
        "WFPDFContentItem",
        "WFPhoneNumberContentItem",
        "WFRichTextContentItem",
        "WFSafariWebPageContentItem",
        "WFStringContentItem",
        "WFURLContentItem",
    ];
    PlistValue::Array(classes.iter().map(|class| PlistValue::from(*class)).collect())
}

fn workflow_types() -> PlistValue {
    PlistValue::Array(vec![PlistValue::from("NCWidget"), PlistValue::from("WatchKit")])
}

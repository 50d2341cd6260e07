use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub data: IndexMap<String, FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Pairs(Vec<KeyValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_pairs(&self) -> Option<&[KeyValue]> {
        match self {
            FieldValue::Pairs(pairs) => Some(pairs),
            _ => None,
        }
    }
}

/// Position of a control-flow action within its block, and the value of the
/// `WFControlFlowMode` parameter it serializes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRole {
    Open = 0,
    Middle = 1,
    Close = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Ask,
    Comment,
    Exit,
    GetClipboard,
    GetUrl,
    GetVariable,
    Notification,
    OpenUrl,
    SetClipboard,
    SetVariable,
    ShowResult,
    Text,
    Url,
    Vibrate,
    Wait,
    If,
    Else,
    EndIf,
    RepeatStart,
    RepeatEnd,
    RepeatEachStart,
    RepeatEachEnd,
}

impl ActionKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "ask" => ActionKind::Ask,
            "comment" => ActionKind::Comment,
            "exit" => ActionKind::Exit,
            "get_clipboard" => ActionKind::GetClipboard,
            "get_url" => ActionKind::GetUrl,
            "get_variable" => ActionKind::GetVariable,
            "notification" => ActionKind::Notification,
            "open_url" => ActionKind::OpenUrl,
            "set_clipboard" => ActionKind::SetClipboard,
            "set_variable" => ActionKind::SetVariable,
            "show_result" => ActionKind::ShowResult,
            "text" => ActionKind::Text,
            "url" => ActionKind::Url,
            "vibrate" => ActionKind::Vibrate,
            "wait" => ActionKind::Wait,
            "if" => ActionKind::If,
            "else" => ActionKind::Else,
            "endif" => ActionKind::EndIf,
            "repeat_start" => ActionKind::RepeatStart,
            "repeat_end" => ActionKind::RepeatEnd,
            "repeat_each_start" => ActionKind::RepeatEachStart,
            "repeat_each_end" => ActionKind::RepeatEachEnd,
            _ => return None,
        };
        Some(kind)
    }

    pub fn tag(self) -> &'static str {
        match self {
            ActionKind::Ask => "ask",
            ActionKind::Comment => "comment",
            ActionKind::Exit => "exit",
            ActionKind::GetClipboard => "get_clipboard",
            ActionKind::GetUrl => "get_url",
            ActionKind::GetVariable => "get_variable",
            ActionKind::Notification => "notification",
            ActionKind::OpenUrl => "open_url",
            ActionKind::SetClipboard => "set_clipboard",
            ActionKind::SetVariable => "set_variable",
            ActionKind::ShowResult => "show_result",
            ActionKind::Text => "text",
            ActionKind::Url => "url",
            ActionKind::Vibrate => "vibrate",
            ActionKind::Wait => "wait",
            ActionKind::If => "if",
            ActionKind::Else => "else",
            ActionKind::EndIf => "endif",
            ActionKind::RepeatStart => "repeat_start",
            ActionKind::RepeatEnd => "repeat_end",
            ActionKind::RepeatEachStart => "repeat_each_start",
            ActionKind::RepeatEachEnd => "repeat_each_end",
        }
    }

    /// The runtime action identifier serialized as `WFWorkflowActionIdentifier`.
    pub fn identifier(self) -> &'static str {
        match self {
            ActionKind::Ask => "is.workflow.actions.ask",
            ActionKind::Comment => "is.workflow.actions.comment",
            ActionKind::Exit => "is.workflow.actions.exit",
            ActionKind::GetClipboard => "is.workflow.actions.getclipboard",
            ActionKind::GetUrl => "is.workflow.actions.downloadurl",
            ActionKind::GetVariable => "is.workflow.actions.getvariable",
            ActionKind::Notification => "is.workflow.actions.notification",
            ActionKind::OpenUrl => "is.workflow.actions.openurl",
            ActionKind::SetClipboard => "is.workflow.actions.setclipboard",
            ActionKind::SetVariable => "is.workflow.actions.setvariable",
            ActionKind::ShowResult => "is.workflow.actions.showresult",
            ActionKind::Text => "is.workflow.actions.gettext",
            ActionKind::Url => "is.workflow.actions.url",
            ActionKind::Vibrate => "is.workflow.actions.vibrate",
            ActionKind::Wait => "is.workflow.actions.delay",
            ActionKind::If | ActionKind::Else | ActionKind::EndIf => {
                "is.workflow.actions.conditional"
            }
            ActionKind::RepeatStart | ActionKind::RepeatEnd => "is.workflow.actions.repeat.count",
            ActionKind::RepeatEachStart | ActionKind::RepeatEachEnd => {
                "is.workflow.actions.repeat.each"
            }
        }
    }

    pub fn flow_role(self) -> Option<FlowRole> {
        match self {
            ActionKind::If | ActionKind::RepeatStart | ActionKind::RepeatEachStart => {
                Some(FlowRole::Open)
            }
            ActionKind::Else => Some(FlowRole::Middle),
            ActionKind::EndIf | ActionKind::RepeatEnd | ActionKind::RepeatEachEnd => {
                Some(FlowRole::Close)
            }
            _ => None,
        }
    }

    pub fn is_control_flow(self) -> bool {
        self.flow_role().is_some()
    }

    /// The closing counterpart of an opening control-flow kind.
    pub fn closing(self) -> Option<Self> {
        match self {
            ActionKind::If => Some(ActionKind::EndIf),
            ActionKind::RepeatStart => Some(ActionKind::RepeatEnd),
            ActionKind::RepeatEachStart => Some(ActionKind::RepeatEachEnd),
            _ => None,
        }
    }

    pub fn from_identifier(identifier: &str, flow_mode: Option<i64>) -> Option<Self> {
        match identifier {
            "is.workflow.actions.conditional" => match flow_mode {
                Some(0) => Some(ActionKind::If),
                Some(1) => Some(ActionKind::Else),
                Some(2) => Some(ActionKind::EndIf),
                _ => None,
            },
            "is.workflow.actions.repeat.count" => match flow_mode {
                Some(0) => Some(ActionKind::RepeatStart),
                Some(2) => Some(ActionKind::RepeatEnd),
                _ => None,
            },
            "is.workflow.actions.repeat.each" => match flow_mode {
                Some(0) => Some(ActionKind::RepeatEachStart),
                Some(2) => Some(ActionKind::RepeatEachEnd),
                _ => None,
            },
            "is.workflow.actions.ask" => Some(ActionKind::Ask),
            "is.workflow.actions.comment" => Some(ActionKind::Comment),
            "is.workflow.actions.exit" => Some(ActionKind::Exit),
            "is.workflow.actions.getclipboard" => Some(ActionKind::GetClipboard),
            "is.workflow.actions.downloadurl" => Some(ActionKind::GetUrl),
            "is.workflow.actions.getvariable" => Some(ActionKind::GetVariable),
            "is.workflow.actions.notification" => Some(ActionKind::Notification),
            "is.workflow.actions.openurl" => Some(ActionKind::OpenUrl),
            "is.workflow.actions.setclipboard" => Some(ActionKind::SetClipboard),
            "is.workflow.actions.setvariable" => Some(ActionKind::SetVariable),
            "is.workflow.actions.showresult" => Some(ActionKind::ShowResult),
            "is.workflow.actions.gettext" => Some(ActionKind::Text),
            "is.workflow.actions.url" => Some(ActionKind::Url),
            "is.workflow.actions.vibrate" => Some(ActionKind::Vibrate),
            "is.workflow.actions.delay" => Some(ActionKind::Wait),
            _ => None,
        }
    }
}

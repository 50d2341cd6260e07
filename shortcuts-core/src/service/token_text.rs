use std::str::FromStr;

use regex::Regex;

use crate::error::TokenError;
use crate::model::{ATTACHMENT_PLACEHOLDER, TokenAttachment, TokenText};

impl FromStr for TokenText {
    type Err = TokenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let reference = Regex::new(r"\{\{\s*(.*?)\s*\}\}")?;

        let mut value = String::new();
        let mut attachments = Vec::new();
        let mut consumed = 0;
        let mut position = 0;
        for captures in reference.captures_iter(raw) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let Some(name) = captures.get(1) else {
                continue;
            };
            let name = name.as_str();
            if name.is_empty() {
                return Err(TokenError::EmptyName);
            }
            if name.contains('{') || name.contains('}') {
                return Err(TokenError::UnbalancedBraces);
            }

            let literal = &raw[consumed..whole.start()];
            value.push_str(literal);
            position += literal.chars().count();
            attachments.push(TokenAttachment {
                name: name.to_owned(),
                start: position,
            });
            value.push(ATTACHMENT_PLACEHOLDER);
            position += 1;
            consumed = whole.end();
        }
        value.push_str(&raw[consumed..]);

        if value.contains("{{") || value.contains("}}") {
            return Err(TokenError::UnbalancedBraces);
        }

        Ok(Self { value, attachments })
    }
}

impl TokenText {
    /// Reconstructs the human-readable text, each placeholder expanded back
    /// to its `{{name}}` reference.
    pub fn to_source(&self) -> String {
        let mut source = String::new();
        let mut attachments = self.attachments.iter().peekable();
        for (position, ch) in self.value.chars().enumerate() {
            match attachments.peek() {
                Some(attachment)
                    if attachment.start == position && ch == ATTACHMENT_PLACEHOLDER =>
                {
                    source.push_str("{{");
                    source.push_str(&attachment.name);
                    source.push_str("}}");
                    attachments.next();
                }
                _ => source.push(ch),
            }
        }
        source
    }
}

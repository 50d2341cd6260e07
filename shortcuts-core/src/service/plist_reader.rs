use std::iter::Peekable;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use logos::{Lexer, Logos};

use crate::error::{Error, Result};
use crate::model::PlistValue;

fn element_text(slice: &str, open: usize, close: usize) -> String {
    unescape(&slice[open..slice.len() - close])
}

fn key_text(lex: &mut Lexer<'_, Token>) -> String {
    element_text(lex.slice(), "<key>".len(), "</key>".len())
}

fn string_text(lex: &mut Lexer<'_, Token>) -> String {
    element_text(lex.slice(), "<string>".len(), "</string>".len())
}

fn integer_value(lex: &mut Lexer<'_, Token>) -> Option<i64> {
    let slice = lex.slice();
    slice["<integer>".len()..slice.len() - "</integer>".len()]
        .parse()
        .ok()
}

fn data_bytes(lex: &mut Lexer<'_, Token>) -> Option<Vec<u8>> {
    let slice = lex.slice();
    let encoded: String = slice["<data>".len()..slice.len() - "</data>".len()]
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
    if encoded.is_empty() {
        Some(Vec::new())
    } else {
        STANDARD.decode(encoded).ok()
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[regex(r"<\?xml[^>]*\?>", logos::skip)]
    #[regex(r"<!DOCTYPE[^>]*>", logos::skip)]
    #[regex(r"<plist[^>]*>", logos::skip)]
    #[token("</plist>", logos::skip)]
    Prologue,

    #[token("<dict>")]
    DictOpen,
    #[token("</dict>")]
    DictClose,
    #[token("<dict/>")]
    DictEmpty,
    #[token("<array>")]
    ArrayOpen,
    #[token("</array>")]
    ArrayClose,
    #[token("<array/>")]
    ArrayEmpty,
    #[token("<true/>")]
    True,
    #[token("<false/>")]
    False,
    #[regex(r"<key>[^<]*</key>", key_text)]
    Key(String),
    #[regex(r"<string>[^<]*</string>", string_text)]
    Str(String),
    #[regex(r"<integer>-?[0-9]+</integer>", integer_value)]
    Integer(i64),
    #[regex(r"<data>[^<]*</data>", data_bytes)]
    Data(Vec<u8>),
}

/// Parses the property-list text format into a value tree.
pub fn parse(source: &str) -> Result<PlistValue> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(Error::InvalidDocument(format!(
                    "unexpected content at offset {}",
                    lexer.span().start
                )));
            }
        }
    }

    let mut tokens = tokens.into_iter().peekable();
    let value = parse_value(&mut tokens)?;
    if tokens.peek().is_some() {
        return Err(Error::InvalidDocument(
            "trailing content after the document value".to_owned(),
        ));
    }
    Ok(value)
}

fn parse_value(tokens: &mut Peekable<std::vec::IntoIter<Token>>) -> Result<PlistValue> {
    match tokens.next() {
        Some(Token::DictOpen) => {
            let mut entries = IndexMap::new();
            loop {
                match tokens.next() {
                    Some(Token::DictClose) => break,
                    Some(Token::Key(key)) => {
                        entries.insert(key, parse_value(tokens)?);
                    }
                    other => {
                        return Err(Error::InvalidDocument(format!(
                            "expected a key in dictionary, found {other:?}"
                        )));
                    }
                }
            }
            Ok(PlistValue::Dict(entries))
        }
        Some(Token::DictEmpty) => Ok(PlistValue::Dict(IndexMap::new())),
        Some(Token::ArrayOpen) => {
            let mut items = Vec::new();
            while tokens.peek() != Some(&Token::ArrayClose) {
                items.push(parse_value(tokens)?);
            }
            tokens.next();
            Ok(PlistValue::Array(items))
        }
        Some(Token::ArrayEmpty) => Ok(PlistValue::Array(Vec::new())),
        Some(Token::True) => Ok(PlistValue::Bool(true)),
        Some(Token::False) => Ok(PlistValue::Bool(false)),
        Some(Token::Str(text)) => Ok(PlistValue::String(text)),
        Some(Token::Integer(number)) => Ok(PlistValue::Integer(number)),
        Some(Token::Data(bytes)) => Ok(PlistValue::Data(bytes)),
        Some(other) => Err(Error::InvalidDocument(format!(
            "unexpected {other:?} in document"
        ))),
        None => Err(Error::InvalidDocument(
            "unexpected end of document".to_owned(),
        )),
    }
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

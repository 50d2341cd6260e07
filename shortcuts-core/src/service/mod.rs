pub mod document_parser;
pub mod encode;
pub mod grouping;
pub mod parameters;
pub mod plist_dumper;
pub mod plist_loader;
pub mod plist_reader;
pub mod plist_writer;
pub mod token_text;
pub mod toml_loader;
pub mod toml_writer;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::model::PlistValue;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
<plist version=\"1.0\">\n";

/// Serializes a value tree to the property-list text format: tab indentation,
/// lexicographically sorted dictionary keys, one element per line.
pub fn to_string(value: &PlistValue) -> String {
    let mut out = String::from(HEADER);
    write_value(&mut out, value, 0);
    out.push_str("</plist>\n");
    out
}

fn write_value(out: &mut String, value: &PlistValue, level: usize) {
    match value {
        PlistValue::Bool(true) => write_line(out, level, "<true/>"),
        PlistValue::Bool(false) => write_line(out, level, "<false/>"),
        PlistValue::Integer(number) => {
            write_line(out, level, &format!("<integer>{number}</integer>"));
        }
        PlistValue::String(text) => {
            write_line(out, level, &format!("<string>{}</string>", escape(text)));
        }
        PlistValue::Data(bytes) => write_data(out, bytes, level),
        PlistValue::Array(items) if items.is_empty() => write_line(out, level, "<array/>"),
        PlistValue::Array(items) => {
            write_line(out, level, "<array>");
            for item in items {
                write_value(out, item, level + 1);
            }
            write_line(out, level, "</array>");
        }
        PlistValue::Dict(entries) if entries.is_empty() => write_line(out, level, "<dict/>"),
        PlistValue::Dict(entries) => {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            write_line(out, level, "<dict>");
            for key in keys {
                write_line(out, level + 1, &format!("<key>{}</key>", escape(key)));
                write_value(out, &entries[key.as_str()], level + 1);
            }
            write_line(out, level, "</dict>");
        }
    }
}

fn write_line(out: &mut String, level: usize, content: &str) {
    for _ in 0..level {
        out.push('\t');
    }
    out.push_str(content);
    out.push('\n');
}

fn write_data(out: &mut String, bytes: &[u8], level: usize) {
    write_line(out, level, "<data>");
    if !bytes.is_empty() {
        let encoded = STANDARD.encode(bytes);
        for chunk in encoded.as_bytes().chunks(76) {
            // chunks of a base64 string stay on char boundaries
            write_line(out, level, std::str::from_utf8(chunk).unwrap_or_default());
        }
    }
    write_line(out, level, "</data>");
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

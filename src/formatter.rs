use crate::model::{Member, Record};
use crate::text::clean_text;

/// Renders a record as an indexable text document.
///
/// Layout: header, description, properties, constructors, methods, code
/// examples, then a pseudo-declaration of the class. Empty sections are
/// left out. Lines are joined with `\n` and there is no trailing newline.
pub fn format_record(record: &Record) -> String {
    let name = clean_text(&record.name);
    let url = clean_text(&record.source_url);
    let description = clean_text(&record.description);

    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("// Unity Class: {}", name));
    if !url.is_empty() {
        lines.push(format!("// Documentation: {}", url));
    }
    lines.push(String::new());

    if !description.is_empty() {
        lines.push(format!("// Description: {}", description));
        lines.push(String::new());
    }

    push_members(&mut lines, "Properties", &record.properties, "");
    push_members(&mut lines, "Constructors", &record.constructors, "()");
    push_members(&mut lines, "Methods", &record.methods, "()");

    if !record.examples.is_empty() {
        lines.push("// Code Examples:".to_string());
        for (i, example) in record.examples.iter().enumerate() {
            lines.push(format!("// Example {}:", i + 1));
            for line in example.split('\n') {
                lines.push(format!("//   {}", line));
            }
            lines.push(String::new());
        }
    }

    lines.push(format!("// Pseudo-code representation of {}", name));
    lines.push(format!("public class {} {{", name));
    for (prop, desc) in named(&record.properties) {
        lines.push(format!("    public var {}; // {}", prop, desc));
    }
    for (method, desc) in named(&record.methods) {
        lines.push(format!("    public void {}(); // {}", method, desc));
    }
    lines.push("}".to_string());

    lines.join("\n")
}

fn push_members(lines: &mut Vec<String>, title: &str, members: &[Member], suffix: &str) {
    if members.is_empty() {
        return;
    }
    lines.push(format!("// {}:", title));
    for (name, desc) in named(members) {
        lines.push(format!("// - {}{}: {}", name, suffix, desc));
    }
    lines.push(String::new());
}

/// Cleaned (name, description) pairs, skipping members without a name.
fn named(members: &[Member]) -> impl Iterator<Item = (String, String)> + '_ {
    members
        .iter()
        .map(|m| (clean_text(&m.name), clean_text(&m.description)))
        .filter(|(name, _)| !name.is_empty())
}

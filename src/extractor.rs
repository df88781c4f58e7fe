use scraper::{ElementRef, Html, Selector};

use crate::config;
use crate::model::{Member, Record};
use crate::text::clean_text;

/// Code blocks at or below this many characters (after trimming) are dropped.
pub const MIN_EXAMPLE_LEN: usize = 20;

const PROPERTIES_HEADING: &str = "Properties";
const METHODS_HEADING: &str = "Public Methods";
const CONSTRUCTORS_HEADING: &str = "Constructors";

/// Turns a script-reference page into a [`Record`].
///
/// Extraction never fails: sections that cannot be located come back empty.
pub struct Extractor {
    base_url: String,
    section: Selector,
    heading: Selector,
    paragraph: Selector,
    row: Selector,
    cell: Selector,
    link: Selector,
    code_block: Selector,
}

impl Extractor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Extractor {
            base_url: base_url.into(),
            section: selector("div.section"),
            heading: selector("h3"),
            paragraph: selector("p"),
            row: selector("tr"),
            cell: selector("td, th"),
            link: selector("a"),
            code_block: selector("pre"),
        }
    }

    pub fn extract(&self, html: &str, identifier: &str) -> Record {
        let document = Html::parse_document(html);

        Record {
            name: identifier.to_string(),
            description: self.extract_description(&document),
            properties: self.extract_table(&document, PROPERTIES_HEADING),
            methods: self.extract_table(&document, METHODS_HEADING),
            constructors: self.extract_table(&document, CONSTRUCTORS_HEADING),
            examples: self.extract_examples(&document),
            source_url: config::page_url(&self.base_url, identifier),
        }
    }

    fn extract_description(&self, document: &Html) -> String {
        let Some(section) = document.select(&self.section).next() else {
            return String::new();
        };

        let labelled = section
            .select(&self.heading)
            .filter(|h3| element_text(h3).trim() == "Description")
            .find_map(|h3| next_sibling_named(h3, "p"))
            .map(|p| clean_text(&element_text(&p)))
            .filter(|text| !text.is_empty());

        if let Some(description) = labelled {
            return description;
        }

        section
            .select(&self.paragraph)
            .map(|p| clean_text(&element_text(&p)))
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    fn extract_table(&self, document: &Html, label: &str) -> Vec<Member> {
        let table = document
            .select(&self.heading)
            .find(|h3| element_text(h3).trim() == label)
            .and_then(|h3| next_sibling_named(h3, "table"));

        let Some(table) = table else {
            return Vec::new();
        };

        table
            .select(&self.row)
            .skip(1)
            .filter_map(|row| {
                let cells: Vec<ElementRef> = row.select(&self.cell).collect();
                if cells.len() < 2 {
                    return None;
                }
                let name = match cells[0].select(&self.link).next() {
                    Some(link) => element_text(&link),
                    None => element_text(&cells[0]),
                };
                Some(Member::new(clean_text(&name), clean_text(&element_text(&cells[1]))))
            })
            .collect()
    }

    fn extract_examples(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.code_block)
            .map(|pre| element_text(&pre).trim().to_string())
            .filter(|code| code.chars().count() > MIN_EXAMPLE_LEN)
            .collect()
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect()
}

/// First following sibling element with the given tag name.
fn next_sibling_named<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://docs.unity3d.com/ScriptReference";

    fn page(body: &str) -> String {
        format!("<html><head><title>t</title></head><body>{}</body></html>", body)
    }

    const FULL_PAGE: &str = r#"
        <div class="section">
          <h1>GameObject</h1>
          <p class="cl">class in UnityEngine</p>
          <h3>Description</h3>
          <p>Base class for   all
             entities in Unity Scenes.</p>
        </div>
        <div class="section">
          <h3>Properties</h3>
          <table class="list">
            <tr><th>Name</th><th>Description</th></tr>
            <tr><td class="lbl"><a href="GameObject-activeSelf.html">activeSelf</a></td>
                <td class="desc">The local active state
                    of this GameObject.</td></tr>
            <tr><td class="lbl">layer</td>
                <td class="desc">The layer the game object is in.</td></tr>
            <tr><td colspan="2">orphan</td></tr>
          </table>
          <h3>Constructors</h3>
          <table class="list">
            <tr><th>Name</th><th>Description</th></tr>
            <tr><td><a href="GameObject-ctor.html">GameObject</a></td>
                <td>Creates a new game object.</td></tr>
          </table>
          <h3>Public Methods</h3>
          <table class="list">
            <tr><th>Name</th><th>Description</th></tr>
            <tr><td><a href="GameObject.SetActive.html">SetActive</a></td>
                <td>Activates/Deactivates the GameObject.</td></tr>
          </table>
        </div>
        <pre class="codeExampleCS">using UnityEngine;
public class Example : MonoBehaviour { }</pre>
        <pre>short</pre>
    "#;

    #[test]
    fn extracts_all_sections() {
        let record = Extractor::new(BASE).extract(&page(FULL_PAGE), "GameObject");

        assert_eq!(record.name, "GameObject");
        assert_eq!(record.description, "Base class for all entities in Unity Scenes.");
        assert_eq!(
            record.properties,
            vec![
                Member::new("activeSelf", "The local active state of this GameObject."),
                Member::new("layer", "The layer the game object is in."),
            ]
        );
        assert_eq!(
            record.constructors,
            vec![Member::new("GameObject", "Creates a new game object.")]
        );
        assert_eq!(
            record.methods,
            vec![Member::new("SetActive", "Activates/Deactivates the GameObject.")]
        );
        assert_eq!(record.examples.len(), 1);
        assert!(record.examples[0].contains('\n'));
        assert_eq!(record.source_url, "https://docs.unity3d.com/ScriptReference/GameObject.html");
    }

    #[test]
    fn description_falls_back_to_first_non_empty_paragraph() {
        let html = page(r#"<div class="section"><p>   </p><p>Position, rotation
            and scale.</p><p>Second.</p></div>"#);
        let record = Extractor::new(BASE).extract(&html, "Transform");
        assert_eq!(record.description, "Position, rotation and scale.");
    }

    #[test]
    fn description_only_looks_in_first_section() {
        let html = page(r#"<div class="section"><h1>X</h1></div>
            <div class="section"><h3>Description</h3><p>Not this one.</p></div>"#);
        let record = Extractor::new(BASE).extract(&html, "X");
        assert_eq!(record.description, "");
    }

    #[test]
    fn missing_sections_yield_empty_fields() {
        let html = page(r#"<div class="section"><h3>Description</h3><p>Only text.</p></div>"#);
        let record = Extractor::new(BASE).extract(&html, "Bare");
        assert_eq!(record.description, "Only text.");
        assert!(record.properties.is_empty());
        assert!(record.methods.is_empty());
        assert!(record.constructors.is_empty());
        assert!(record.examples.is_empty());
    }

    #[test]
    fn heading_without_table_yields_nothing() {
        let html = page(r#"<div class="section"><h3>Properties</h3><p>None.</p></div>"#);
        let record = Extractor::new(BASE).extract(&html, "Empty");
        assert!(record.properties.is_empty());
    }

    #[test]
    fn example_length_threshold_is_exclusive() {
        let exactly = "a".repeat(20);
        let longer = "b".repeat(21);
        let html = page(&format!("<pre>  {}  </pre><pre>\n{}\n</pre>", exactly, longer));
        let record = Extractor::new(BASE).extract(&html, "Codes");
        assert_eq!(record.examples, vec![longer]);
    }

    #[test]
    fn garbage_input_does_not_fail() {
        let record = Extractor::new(BASE).extract("<<not html at all", "Weird");
        assert_eq!(record.name, "Weird");
        assert!(record.description.is_empty());
    }

    #[test]
    fn source_url_uses_identifier_not_resolved_candidate() {
        let record =
            Extractor::new(BASE).extract(&page(""), "UnityEngine.Accessibility.AccessibilityNode");
        assert_eq!(
            record.source_url,
            concat!(
                "https://docs.unity3d.com/ScriptReference/",
                "UnityEngine.Accessibility.AccessibilityNode.html"
            )
        );
    }
}

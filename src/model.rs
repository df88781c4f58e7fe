use serde::{Deserialize, Serialize};

/// One row of a properties, methods or constructors table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub name: String,
    pub description: String,
}

impl Member {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Structured content of one documentation page.
///
/// Missing keys in a persisted batch deserialize to empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "class_name")]
    pub name: String,
    pub description: String,
    pub properties: Vec<Member>,
    pub methods: Vec<Member>,
    pub constructors: Vec<Member>,
    pub examples: Vec<String>,
    #[serde(rename = "url")]
    pub source_url: String,
}

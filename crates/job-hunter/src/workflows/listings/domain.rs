use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One scraped job posting. Fields the gateway does not interpret are carried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobListing {
    pub fn new(title: impl Into<String>, is_remote: bool) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            is_remote,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

use crate::config::PropertySchema;
use crate::error::{NotionError, NotionResult};
use crate::notion::Page;
use serde_json::{json, Map, Value};
use std::fmt::{self, Display, Formatter};

/// A tracked manga, copied out of a database page for the length of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MangaRecord {
    pub id: String,
    pub title: String,
    pub chapter: f64,
    pub finished: bool,
}

impl MangaRecord {
    pub fn from_page(page: &Page, schema: &PropertySchema) -> NotionResult<Self> {
        let title = property(page, &schema.title, "title")?
            .as_array()
            .and_then(|fragments| fragments.first())
            .and_then(fragment_text)
            .unwrap_or_default()
            .to_string();

        // An empty number cell comes back as null.
        let chapter = property(page, &schema.chapter, "number")?
            .as_f64()
            .unwrap_or(0.0);

        let finished = property(page, &schema.finished, "checkbox")?
            .as_bool()
            .unwrap_or(false);

        Ok(Self {
            id: page.id.clone(),
            title,
            chapter,
            finished,
        })
    }
}

impl Display for MangaRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chapter {}, {})", self.title, self.chapter, self.id)
    }
}

fn property<'a>(page: &'a Page, name: &str, kind: &'static str) -> NotionResult<&'a Value> {
    let object: &Map<String, Value> = page
        .properties
        .get(name)
        .and_then(Value::as_object)
        .ok_or_else(|| NotionError::MissingProperty {
            page_id: page.id.clone(),
            property: name.to_string(),
        })?;

    object.get(kind).ok_or_else(|| NotionError::UnexpectedProperty {
        page_id: page.id.clone(),
        property: name.to_string(),
        expected: kind,
    })
}

fn fragment_text(fragment: &Value) -> Option<&str> {
    fragment
        .pointer("/text/content")
        .or_else(|| fragment.get("plain_text"))
        .and_then(Value::as_str)
}

/// What a lookup by exact title resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    NotFound(String),
    Found(MangaRecord),
    Ambiguous(Vec<MangaRecord>),
}

impl Lookup {
    pub fn resolve(name: &str, mut matches: Vec<MangaRecord>) -> Self {
        match matches.len() {
            0 => Lookup::NotFound(name.to_string()),
            1 => Lookup::Found(matches.remove(0)),
            _ => Lookup::Ambiguous(matches),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    Chapter(f64),
    Finished,
}

/// A single-property update for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePatch {
    pub page_id: String,
    pub title: String,
    pub change: Change,
}

impl PagePatch {
    pub fn next_chapter(record: &MangaRecord) -> Self {
        Self {
            page_id: record.id.clone(),
            title: record.title.clone(),
            change: Change::Chapter(record.chapter + 1.0),
        }
    }

    pub fn finish(record: &MangaRecord) -> Self {
        Self {
            page_id: record.id.clone(),
            title: record.title.clone(),
            change: Change::Finished,
        }
    }

    pub fn body(&self, schema: &PropertySchema) -> Value {
        let (name, value) = match self.change {
            Change::Chapter(chapter) => (&schema.chapter, json!({ "number": chapter_value(chapter) })),
            Change::Finished => (&schema.finished, json!({ "checkbox": true })),
        };

        let mut properties = Map::new();
        properties.insert(name.clone(), value);
        json!({ "properties": properties })
    }
}

impl Display for PagePatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.change {
            Change::Chapter(chapter) => write!(f, "{} -> chapter {}", self.title, chapter),
            Change::Finished => write!(f, "{} -> finished", self.title),
        }
    }
}

/// Whole chapters go over the wire as integers, half chapters as floats.
fn chapter_value(chapter: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if chapter.fract() == 0.0 && chapter.abs() < MAX_EXACT {
        json!(chapter as i64)
    } else {
        json!(chapter)
    }
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(PagePatch),
    Failed { patch: PagePatch, error: NotionError },
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }
}

impl Display for UpdateOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::Updated(PagePatch {
                title,
                change: Change::Chapter(chapter),
                ..
            }) => write!(f, "Updated {title} to chapter {chapter}"),
            UpdateOutcome::Updated(PagePatch {
                title,
                change: Change::Finished,
                ..
            }) => write!(f, "Marked {title} as finished"),
            UpdateOutcome::Failed { patch, error } => {
                write!(f, "Failed to update {}: {}", patch.title, error)
            }
        }
    }
}

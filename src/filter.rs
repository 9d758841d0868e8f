//! Database query filters and the client-side ignore list.

use crate::config::{CategoryKind, PropertySchema};
use crate::manga::MangaRecord;
use serde_json::{json, Value};
use std::collections::HashSet;

/// A Notion database filter, built fresh for every query.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Checkbox {
        property: String,
        equals: bool,
    },
    TitleEquals {
        property: String,
        value: String,
    },
    Category {
        property: String,
        kind: CategoryKind,
        value: String,
    },
}

impl Filter {
    /// Records that are not finished yet.
    pub fn unfinished(schema: &PropertySchema) -> Self {
        Filter::Checkbox {
            property: schema.finished.clone(),
            equals: false,
        }
    }

    /// Unfinished records tagged with `category`.
    pub fn unfinished_in_category(schema: &PropertySchema, category: &str) -> Self {
        Filter::And(vec![
            Self::unfinished(schema),
            Filter::Category {
                property: schema.category.clone(),
                kind: schema.category_kind,
                value: category.to_string(),
            },
        ])
    }

    pub fn title_equals(schema: &PropertySchema, name: &str) -> Self {
        Filter::TitleEquals {
            property: schema.title.clone(),
            value: name.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Filter::And(clauses) => json!({
                "and": clauses.iter().map(Filter::to_json).collect::<Vec<_>>()
            }),
            Filter::Checkbox { property, equals } => json!({
                "property": property,
                "checkbox": { "equals": equals }
            }),
            Filter::TitleEquals { property, value } => json!({
                "property": property,
                "title": { "equals": value }
            }),
            Filter::Category {
                property,
                kind: CategoryKind::Select,
                value,
            } => json!({
                "property": property,
                "select": { "equals": value }
            }),
            Filter::Category {
                property,
                kind: CategoryKind::MultiSelect,
                value,
            } => json!({
                "property": property,
                "multi_select": { "contains": value }
            }),
        }
    }
}

/// Drops every record whose title exactly matches an ignored name.
pub fn exclude_ignored(records: Vec<MangaRecord>, ignore: &[String]) -> Vec<MangaRecord> {
    if ignore.is_empty() {
        return records;
    }

    let ignored: HashSet<&str> = ignore.iter().map(String::as_str).collect();
    records
        .into_iter()
        .filter(|record| {
            let skip = ignored.contains(record.title.as_str());
            if skip {
                tracing::debug!(title = %record.title, "ignoring");
            }
            !skip
        })
        .collect()
}

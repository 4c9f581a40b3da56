use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ModelError;

/// Kind of study material a resource points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Note,
    Link,
    Video,
    Document,
    Command,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Note => "note",
            ResourceType::Link => "link",
            ResourceType::Video => "video",
            ResourceType::Document => "document",
            ResourceType::Command => "command",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(ResourceType::Note),
            "link" => Ok(ResourceType::Link),
            "video" => Ok(ResourceType::Video),
            "document" => Ok(ResourceType::Document),
            "command" => Ok(ResourceType::Command),
            other => Err(ModelError::invalid_field(
                "type",
                format!("Unknown resource type '{}'", other),
            )),
        }
    }
}

/// A study resource. Public resources and locker-scoped private resources
/// share this shape; private ones wrap it in `PrivateResource`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Incoming document for a create call
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl NewResource {
    /// Parse a create payload. Ownership and bookkeeping keys in the body are
    /// ignored so callers cannot choose their own id or timestamps.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let map = strip_reserved(value)?;
        serde_json::from_value(Value::Object(map)).map_err(|e| ModelError::Malformed(e.to_string()))
    }

    /// Validate required fields and build the stored document.
    pub fn into_resource(self, now: DateTime<Utc>) -> Result<Resource, ModelError> {
        let mut field_errors = HashMap::new();
        let title = self.title.trim().to_string();
        let category = self.category.trim().to_string();

        if title.is_empty() {
            field_errors.insert("title".to_string(), "This field is required".to_string());
        }
        if category.is_empty() {
            field_errors.insert("category".to_string(), "This field is required".to_string());
        }
        if !field_errors.is_empty() {
            return Err(ModelError::Validation {
                message: "Title and category are required".to_string(),
                field_errors,
            });
        }

        let resource_type = match self.resource_type.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => ResourceType::default(),
        };

        Ok(Resource {
            id: Uuid::new_v4(),
            title,
            description: self.description.unwrap_or_default(),
            resource_type,
            url: non_empty(self.url),
            content: non_empty(self.content),
            tags: normalize_list(self.tags),
            categories: merge_categories(&category, self.categories),
            category,
            created_at: now,
            updated_at: None,
        })
    }
}

/// Partial update. Absent fields are left untouched; an explicit `null`
/// (or blank string) clears `url` and `content`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub categories: Option<Vec<String>>,
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ResourcePatch {
    /// Parse a patch payload, dropping `id`, `_id`, `lockerId` and timestamp
    /// keys before any field is read.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let map = strip_reserved(value)?;
        serde_json::from_value(Value::Object(map)).map_err(|e| ModelError::Malformed(e.to_string()))
    }

    /// Apply to `resource`. Nothing is written unless the whole patch is valid.
    pub fn apply(self, resource: &mut Resource, now: DateTime<Utc>) -> Result<(), ModelError> {
        let title = match self.title {
            Some(t) if t.trim().is_empty() => {
                return Err(ModelError::invalid_field("title", "Title cannot be empty"));
            }
            other => other.map(|t| t.trim().to_string()),
        };
        let category = match self.category {
            Some(c) if c.trim().is_empty() => {
                return Err(ModelError::invalid_field("category", "Category cannot be empty"));
            }
            other => other.map(|c| c.trim().to_string()),
        };
        let resource_type = self
            .resource_type
            .map(|raw| raw.parse::<ResourceType>())
            .transpose()?;

        let previous_category = resource.category.clone();
        if let Some(title) = title {
            resource.title = title;
        }
        if let Some(category) = category {
            resource.category = category;
        }
        if let Some(resource_type) = resource_type {
            resource.resource_type = resource_type;
        }
        if let Some(description) = self.description {
            resource.description = description;
        }
        if let Some(url) = self.url {
            resource.url = non_empty(url);
        }
        if let Some(content) = self.content {
            resource.content = non_empty(content);
        }
        if let Some(tags) = self.tags {
            resource.tags = normalize_list(tags);
        }

        // A replaced primary category leaves the list along with it
        let categories = match self.categories {
            Some(categories) => categories,
            None => resource
                .categories
                .iter()
                .filter(|c| **c != previous_category)
                .cloned()
                .collect(),
        };
        resource.categories = merge_categories(&resource.category, categories);
        resource.updated_at = Some(now);
        Ok(())
    }
}

/// Optional filters for list calls
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceFilter {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

impl ResourceFilter {
    pub fn is_empty(&self) -> bool {
        self.resource_type.is_none() && self.tag.is_none() && self.category.is_none() && self.q.is_none()
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(kind) = self.resource_type.as_deref() {
            if !resource.resource_type.as_str().eq_ignore_ascii_case(kind.trim()) {
                return false;
            }
        }
        if let Some(tag) = self.tag.as_deref() {
            if !resource.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim())) {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref() {
            let category = category.trim();
            let hit = resource.category.eq_ignore_ascii_case(category)
                || resource.categories.iter().any(|c| c.eq_ignore_ascii_case(category));
            if !hit {
                return false;
            }
        }
        if let Some(q) = self.q.as_deref() {
            let needle = q.trim().to_lowercase();
            if !needle.is_empty() {
                let haystacks = [
                    Some(resource.title.as_str()),
                    Some(resource.description.as_str()),
                    resource.content.as_deref(),
                ];
                let hit = haystacks
                    .iter()
                    .flatten()
                    .any(|h| h.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }
        true
    }
}

const RESERVED_KEYS: [&str; 5] = ["id", "_id", "lockerId", "createdAt", "updatedAt"];

fn strip_reserved(value: Value) -> Result<Map<String, Value>, ModelError> {
    match value {
        Value::Object(mut map) => {
            for key in RESERVED_KEYS {
                map.remove(key);
            }
            Ok(map)
        }
        _ => Err(ModelError::Malformed("Request body must be a JSON object".to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        let v = v.trim().to_string();
        if !v.is_empty() && !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// The stored category list always carries the primary category, first.
fn merge_categories(primary: &str, categories: Vec<String>) -> Vec<String> {
    let mut out = vec![primary.to_string()];
    for c in normalize_list(categories) {
        if c != primary {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Resource {
        NewResource::from_value(json!({
            "title": "Ownership",
            "category": "rust",
            "type": "link",
            "url": "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
            "tags": ["borrowing", "borrowing", " "],
        }))
        .unwrap()
        .into_resource(Utc::now())
        .unwrap()
    }

    #[test]
    fn create_requires_title_and_category() {
        let err = NewResource::from_value(json!({ "title": "  " }))
            .unwrap()
            .into_resource(Utc::now())
            .unwrap_err();
        match err {
            ModelError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("title"));
                assert!(field_errors.contains_key("category"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn create_defaults_type_and_dedupes_lists() {
        let r = NewResource::from_value(json!({ "title": "T", "category": "C", "categories": ["X", "C"] }))
            .unwrap()
            .into_resource(Utc::now())
            .unwrap();
        assert_eq!(r.resource_type, ResourceType::Note);
        assert_eq!(r.categories, vec!["C".to_string(), "X".to_string()]);
        assert!(r.updated_at.is_none());

        let s = sample();
        assert_eq!(s.tags, vec!["borrowing".to_string()]);
    }

    #[test]
    fn create_rejects_unknown_type() {
        let err = NewResource::from_value(json!({ "title": "T", "category": "C", "type": "podcast" }))
            .unwrap()
            .into_resource(Utc::now())
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation { .. }));
    }

    #[test]
    fn create_ignores_caller_supplied_id() {
        let supplied = Uuid::new_v4();
        let r = NewResource::from_value(json!({ "id": supplied, "title": "T", "category": "C" }))
            .unwrap()
            .into_resource(Utc::now())
            .unwrap();
        assert_ne!(r.id, supplied);
    }

    #[test]
    fn patch_merges_present_fields_only() {
        let mut r = sample();
        let original_url = r.url.clone();
        let patch = ResourcePatch::from_value(json!({ "description": "Chapter 4", "category": "systems" })).unwrap();
        let now = Utc::now();
        patch.apply(&mut r, now).unwrap();

        assert_eq!(r.description, "Chapter 4");
        assert_eq!(r.category, "systems");
        assert_eq!(r.categories[0], "systems");
        assert_eq!(r.url, original_url);
        assert_eq!(r.updated_at, Some(now));
    }

    #[test]
    fn patch_rejects_blank_title() {
        let mut r = sample();
        let patch = ResourcePatch::from_value(json!({ "title": "" })).unwrap();
        assert!(patch.apply(&mut r, Utc::now()).is_err());
        assert_eq!(r.title, "Ownership");
    }

    #[test]
    fn patch_body_must_be_object() {
        assert!(matches!(
            ResourcePatch::from_value(json!(["title"])),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn filter_matches_type_tag_category_and_text() {
        let r = sample();
        let by_type = ResourceFilter { resource_type: Some("LINK".into()), ..Default::default() };
        let by_tag = ResourceFilter { tag: Some("borrowing".into()), ..Default::default() };
        let by_text = ResourceFilter { q: Some("owner".into()), ..Default::default() };
        let miss = ResourceFilter { category: Some("python".into()), ..Default::default() };

        assert!(by_type.matches(&r));
        assert!(by_tag.matches(&r));
        assert!(by_text.matches(&r));
        assert!(!miss.matches(&r));
        assert!(ResourceFilter::default().is_empty());
    }

    #[test]
    fn serializes_camel_case_with_type_key() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], "link");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_none());
        assert!(value.get("content").is_none());
    }

    #[test]
    fn patch_category_replaces_old_primary() {
        let mut r = NewResource::from_value(json!({ "title": "T", "category": "rust", "categories": ["reading"] }))
            .unwrap()
            .into_resource(Utc::now())
            .unwrap();
        assert_eq!(r.categories, vec!["rust", "reading"]);

        ResourcePatch::from_value(json!({ "category": "systems" }))
            .unwrap()
            .apply(&mut r, Utc::now())
            .unwrap();
        assert_eq!(r.category, "systems");
        assert_eq!(r.categories, vec!["systems", "reading"]);

        // An explicit list still wins
        ResourcePatch::from_value(json!({ "category": "rust", "categories": ["systems"] }))
            .unwrap()
            .apply(&mut r, Utc::now())
            .unwrap();
        assert_eq!(r.categories, vec!["rust", "systems"]);
    }

    #[test]
    fn patch_null_clears_optional_text() {
        let mut r = sample();
        r.content = Some("notes".to_string());

        ResourcePatch::from_value(json!({ "title": "Renamed" }))
            .unwrap()
            .apply(&mut r, Utc::now())
            .unwrap();
        assert!(r.url.is_some());
        assert_eq!(r.content.as_deref(), Some("notes"));

        ResourcePatch::from_value(json!({ "url": null, "content": "" }))
            .unwrap()
            .apply(&mut r, Utc::now())
            .unwrap();
        assert!(r.url.is_none());
        assert!(r.content.is_none());
    }
}

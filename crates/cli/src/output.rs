use gallery_core::ProjectRecord;
use serde_json::{Map, Value};

/// JSON object for one record, restricted to `fields` (all when empty).
pub fn project_json(record: &ProjectRecord, fields: &[String]) -> Value {
    let full = serde_json::json!({
        "id": record.id,
        "title": record.title,
        "tags": record.tags,
        "img_url": record.img_url,
    });
    if fields.is_empty() {
        return full;
    }
    let mut out = Map::new();
    for field in fields {
        if let Some(v) = full.get(field.as_str()) {
            out.insert(field.clone(), v.clone());
        }
    }
    Value::Object(out)
}

pub fn projects_json(records: &[&ProjectRecord], fields: &[String]) -> Value {
    Value::Array(records.iter().map(|r| project_json(r, fields)).collect())
}

/// One line per record: id, title, `[tags]`, image URL.
pub fn project_line(record: &ProjectRecord, fields: &[String]) -> String {
    let wanted = |name: &str| fields.is_empty() || fields.iter().any(|f| f == name);
    let mut parts = Vec::new();
    if wanted("id") {
        parts.push(format!("{:>4}", record.id.to_string()));
    }
    if wanted("title") {
        parts.push(record.title.clone());
    }
    if wanted("tags") && !record.tags.is_empty() {
        parts.push(format!("[{}]", record.tags.join(", ")));
    }
    if wanted("img_url") {
        if let Some(url) = &record.img_url {
            parts.push(url.clone());
        }
    }
    parts.join("   ")
}

pub fn render_projects(records: &[&ProjectRecord], fields: &[String]) -> String {
    if records.is_empty() {
        return "No projects found.".to_string();
    }
    records
        .iter()
        .map(|r| project_line(r, fields))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Filter chips: the `all` sentinel followed by every tag in use.
pub fn render_tags(tags: &[String]) -> String {
    std::iter::once(gallery_core::filter::ALL)
        .chain(tags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("  ")
}

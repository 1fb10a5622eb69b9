use remote::ProjectRecord;
use std::collections::HashSet;

/// Distinct tags across `records`, in first-seen order.
pub fn extract_tags(records: &[ProjectRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut tags = Vec::new();
    for tag in records.iter().flat_map(|r| r.tags.iter()) {
        if seen.insert(tag.as_str()) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Splits form input like `"web/ ui//"` into `["web", "ui"]`.
pub fn parse_tag_input(input: &str) -> Vec<String> {
    input
        .split('/')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`parse_tag_input`], used to prefill edits.
pub fn join_tags(tags: &[String]) -> String {
    tags.join("/")
}

//! Property tests for the pure list operations.

use gallery_core::filter::{select, FilterState};
use gallery_core::store::ProjectListStore;
use gallery_core::tags::extract_tags;
use gallery_core::{ProjectFields, ProjectId, ProjectRecord};
use proptest::prelude::*;
use std::collections::HashSet;

/// Small tag alphabet so filters and duplicates actually hit.
fn tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["web", "ui", "api", "Web", "cli", "rust"]).prop_map(str::to_string)
}

/// Records with unique, descending ids (newest first).
fn records() -> impl Strategy<Value = Vec<ProjectRecord>> {
    prop::collection::vec(prop::collection::vec(tag(), 0..4), 0..12).prop_map(|tag_lists| {
        let n = tag_lists.len() as i64;
        tag_lists
            .into_iter()
            .enumerate()
            .map(|(i, tags)| {
                ProjectRecord::from_fields(
                    ProjectId::Number(n - i as i64),
                    ProjectFields {
                        title: format!("project {i}"),
                        tags,
                        img_url: None,
                    },
                )
            })
            .collect()
    })
}

fn record(id: i64, title: &str) -> ProjectRecord {
    ProjectRecord::from_fields(
        ProjectId::Number(id),
        ProjectFields {
            title: title.to_string(),
            tags: vec![],
            img_url: None,
        },
    )
}

proptest! {
    #[test]
    fn prop_all_filter_is_identity(list in records()) {
        let selected: Vec<ProjectRecord> = select(&list, &FilterState::All).into_iter().cloned().collect();
        prop_assert_eq!(selected, list);
    }

    #[test]
    fn prop_tag_filter_partitions_list(list in records(), t in tag()) {
        let active = FilterState::Tag(t.clone());
        let selected = select(&list, &active);
        for r in &selected {
            prop_assert!(r.tags.contains(&t));
        }
        for r in list.iter().filter(|r| !selected.iter().any(|s| s.id == r.id)) {
            prop_assert!(!r.tags.contains(&t));
        }
    }

    #[test]
    fn prop_tags_are_distinct_union(list in records()) {
        let tags = extract_tags(&list);
        let unique: HashSet<&String> = tags.iter().collect();
        prop_assert_eq!(unique.len(), tags.len());

        let union: HashSet<&String> = list.iter().flat_map(|r| r.tags.iter()).collect();
        prop_assert_eq!(unique, union);
    }

    #[test]
    fn prop_insert_puts_record_first(list in records()) {
        let mut store = ProjectListStore::from(list.clone());
        let fresh = record(1_000, "fresh");
        store.insert(fresh.clone());
        prop_assert_eq!(&store.records()[0], &fresh);
        prop_assert_eq!(&store.records()[1..], list.as_slice());
    }

    #[test]
    fn prop_update_absent_id_is_noop(list in records()) {
        let mut store = ProjectListStore::from(list.clone());
        let changed = store.apply_update(&ProjectId::Number(-1), record(-1, "ghost"));
        prop_assert!(!changed);
        prop_assert_eq!(store.records(), list.as_slice());
    }

    #[test]
    fn prop_update_present_id_keeps_position(list in records(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!list.is_empty());
        let pos = pick.index(list.len());
        let id = list[pos].id.clone();
        let mut store = ProjectListStore::from(list.clone());

        let replacement = ProjectRecord { title: "edited".into(), ..list[pos].clone() };
        prop_assert!(store.apply_update(&id, replacement.clone()));

        let mut expected = list.clone();
        expected[pos] = replacement;
        prop_assert_eq!(store.records(), expected.as_slice());
    }

    #[test]
    fn prop_remove_drops_exactly_one(list in records(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!list.is_empty());
        let pos = pick.index(list.len());
        let id = list[pos].id.clone();
        let mut store = ProjectListStore::from(list.clone());

        prop_assert_eq!(store.remove(&id), Some(list[pos].clone()));
        prop_assert_eq!(store.len(), list.len() - 1);
        prop_assert!(store.get(&id).is_none());

        let before = store.records().to_vec();
        prop_assert_eq!(store.remove(&id), None);
        prop_assert_eq!(store.records(), before.as_slice());
    }
}

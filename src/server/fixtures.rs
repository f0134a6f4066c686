use crate::server::{
    fixtures::Error::{FileReadError, FormatError, ParseError},
    state::{FixtureStore, Resource},
};
use serde_json::Value;
use std::{fs, path::Path};
use thiserror::Error;

pub const TASKS_PREFIX: &str = "/api/v1/tasks";
pub const LABELS_PREFIX: &str = "/api/v1/labels";
pub const PROJECTS_PREFIX: &str = "/api/v1/projects";
pub const SECTIONS_PREFIX: &str = "/api/v1/sections";

/// Literal query string the task CLI sends for its default "today or overdue"
/// task view. Matched verbatim against the request's path suffix.
pub const TODAY_FILTER_QUERY: &str = "?filter=%28today+%7C+overdue%29";

const FIXTURE_FILES: &[(&str, &str)] = &[
    ("tasks.json", TASKS_PREFIX),
    ("labels.json", LABELS_PREFIX),
    ("projects.json", PROJECTS_PREFIX),
    ("sections.json", SECTIONS_PREFIX),
];

const TASKS_PARTIAL_FILE: &str = "tasks_partial.json";

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read fixture file: {0}")]
    FileReadError(String),
    #[error("cannot parse fixture file {0}: {1}")]
    ParseError(String, serde_json::Error),
    #[error("fixture file {0} does not contain a JSON array")]
    FormatError(String),
}

/// Reads the fixture file set from `dir` and builds the store served by the
/// request handler.
///
/// All four resource files are required; a missing or malformed file aborts
/// startup. `tasks_partial.json` is optional and seeds the tasks resource's
/// filter-query view with the ids it contains. Without it the filter view
/// starts out as the full task list.
pub fn read_fixture_store<P: AsRef<Path>>(dir: P) -> Result<FixtureStore, Error> {
    let dir = dir.as_ref();
    let mut store = FixtureStore::new();

    for (file, prefix) in FIXTURE_FILES {
        let items = read_items(&dir.join(file))?;
        store.add_resource(Resource::new(*prefix, items));
    }

    let partial_path = dir.join(TASKS_PARTIAL_FILE);
    let filter_ids = if partial_path.exists() {
        Some(item_ids(&read_items(&partial_path)?))
    } else {
        None
    };
    store.add_view(TASKS_PREFIX, TODAY_FILTER_QUERY, filter_ids.as_deref());

    Ok(store)
}

fn read_items(path: &Path) -> Result<Vec<Value>, Error> {
    tracing::info!("loading fixture file '{}'", path.display());

    let content = fs::read_to_string(path)
        .map_err(|err| FileReadError(format!("{}: {}", path.display(), err)))?;

    let value: Value = serde_json::from_str(&content)
        .map_err(|err| ParseError(path.display().to_string(), err))?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(FormatError(path.display().to_string())),
    }
}

fn item_ids(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::state::{Fixture, FixtureStateManager, StateManager};
    use std::path::PathBuf;

    fn fixture_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    #[test]
    fn loads_all_resources_in_route_order() {
        let store = read_fixture_store(fixture_dir()).unwrap();
        let state = FixtureStateManager::new(store);

        assert_eq!(
            state.route_prefixes(),
            vec![TASKS_PREFIX, LABELS_PREFIX, PROJECTS_PREFIX, SECTIONS_PREFIX]
        );
    }

    #[test]
    fn indexes_tasks_by_id() {
        let store = read_fixture_store(fixture_dir()).unwrap();
        let state = FixtureStateManager::new(store);

        match state.fixture(TASKS_PREFIX, "/7000003") {
            Some(Fixture::Item(item)) => assert_eq!(item["id"], "7000003"),
            other => panic!("expected item, got {:?}", other),
        }
    }

    #[test]
    fn partial_fixture_seeds_the_filter_view() {
        let store = read_fixture_store(fixture_dir()).unwrap();
        let state = FixtureStateManager::new(store);

        match state.fixture(TASKS_PREFIX, TODAY_FILTER_QUERY) {
            Some(Fixture::Collection(items)) => {
                let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
                assert_eq!(ids, vec!["7000000", "7000001", "7000003"]);
            }
            other => panic!("expected collection, got {:?}", other),
        }
    }

    #[test]
    fn missing_fixture_directory_fails_loudly() {
        let result = read_fixture_store(fixture_dir().join("does-not-exist"));
        assert!(matches!(result, Err(Error::FileReadError(_))));
    }
}

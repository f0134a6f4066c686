use serde_json::Value;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

/// A fixture value resolved from the store.
///
/// Collections render as the pagination envelope on the wire, single items are
/// returned verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Fixture {
    Collection(Vec<Value>),
    Item(Value),
}

/// One REST resource: the backing fixture list plus every key it is reachable
/// under.
///
/// `ids` maps an item's `id` field to its position in `items`, and every view
/// holds positions into the same list. Mutating `items[pos]` is therefore
/// visible through the per-id lookup and through all views at once.
pub struct Resource {
    prefix: String,
    items: Vec<Value>,
    ids: HashMap<String, usize>,
    views: BTreeMap<String, Vec<usize>>,
}

impl Resource {
    /// Creates a resource from a parsed fixture list. The `"/"` view initially
    /// holds the full list in fixture order. Items without a string `id` field
    /// stay in the list but are not reachable by id.
    pub fn new<S: Into<String>>(prefix: S, items: Vec<Value>) -> Self {
        let ids = items
            .iter()
            .enumerate()
            .filter_map(|(pos, item)| {
                item.get("id")
                    .and_then(Value::as_str)
                    .map(|id| (id.to_string(), pos))
            })
            .collect();

        let mut views: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        views.insert("/".to_string(), (0..items.len()).collect());

        Resource {
            prefix: prefix.into(),
            items,
            ids,
            views,
        }
    }

    fn add_view(&mut self, key: &str, ids: Option<&[String]>) {
        let positions = match ids {
            Some(ids) => ids.iter().filter_map(|id| self.ids.get(id).copied()).collect(),
            None => (0..self.items.len()).collect(),
        };
        self.views.insert(key.to_string(), positions);
    }

    fn lookup(&self, key: &str) -> Option<Fixture> {
        if let Some(positions) = self.views.get(key) {
            return Some(Fixture::Collection(self.render(positions)));
        }

        let id = key.strip_prefix('/')?;
        self.ids
            .get(id)
            .map(|pos| Fixture::Item(self.items[*pos].clone()))
    }

    fn render(&self, positions: &[usize]) -> Vec<Value> {
        positions.iter().map(|pos| self.items[*pos].clone()).collect()
    }

    /// Replaces every view of this resource with the positions of the items
    /// whose `checked` field is currently false. This is a fresh filter over
    /// the full backing list, not a removal from the previous view contents.
    fn refilter_views(&mut self) {
        let unchecked: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.get("checked").and_then(Value::as_bool) == Some(false))
            .map(|(pos, _)| pos)
            .collect();

        for positions in self.views.values_mut() {
            *positions = unchecked.clone();
        }
    }
}

/// The in-memory fixture data, loaded once at startup and mutated in place by
/// POST handlers. Resources keep their insertion order because GET routing
/// matches route prefixes in that order.
pub struct FixtureStore {
    resources: Vec<Resource>,
}

impl FixtureStore {
    pub fn new() -> Self {
        FixtureStore {
            resources: Vec::new(),
        }
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// Registers an extra view under `key` for the resource at `prefix`,
    /// holding the items with the given ids in order. With `None`, the view
    /// holds the full list.
    pub fn add_view(&mut self, prefix: &str, key: &str, ids: Option<&[String]>) {
        if let Some(resource) = self.resource_mut(prefix) {
            resource.add_view(key, ids);
        }
    }

    fn resource(&self, prefix: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.prefix == prefix)
    }

    fn resource_mut(&mut self, prefix: &str) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.prefix == prefix)
    }

    fn prefixes(&self) -> Vec<String> {
        self.resources.iter().map(|r| r.prefix.clone()).collect()
    }

    fn lookup(&self, prefix: &str, key: &str) -> Option<Fixture> {
        self.resource(prefix).and_then(|r| r.lookup(key))
    }

    fn set_content(&mut self, prefix: &str, position: usize, content: &str) -> bool {
        let item = self
            .resource_mut(prefix)
            .and_then(|r| r.items.get_mut(position));

        match item.and_then(Value::as_object_mut) {
            Some(obj) => {
                obj.insert("content".to_string(), Value::String(content.to_string()));
                true
            }
            None => false,
        }
    }

    fn check_item(&mut self, prefix: &str, id: &str) -> bool {
        let Some(resource) = self.resource_mut(prefix) else {
            return false;
        };
        let Some(pos) = resource.ids.get(id).copied() else {
            return false;
        };

        if let Some(obj) = resource.items[pos].as_object_mut() {
            obj.insert("checked".to_string(), Value::Bool(true));
        }
        resource.refilter_views();
        true
    }
}

/// Store operations the request handler is written against.
pub trait StateManager {
    /// Route prefixes in insertion order.
    fn route_prefixes(&self) -> Vec<String>;

    /// Resolves a path-suffix key against the resource at `prefix`.
    fn fixture(&self, prefix: &str, key: &str) -> Option<Fixture>;

    /// Overwrites the `content` field of the item at `position` in the backing
    /// list. Returns false if there is no such item.
    fn set_content(&self, prefix: &str, position: usize, content: &str) -> bool;

    /// Marks the item with the given id as `checked` and re-filters every view
    /// of the resource down to the unchecked items. Returns false if the id is
    /// unknown.
    fn check_item(&self, prefix: &str, id: &str) -> bool;
}

/// Owns the fixture store and serializes all access to it. The listener spawns
/// one task per connection, so handlers go through this single mutex and
/// mutations stay request-at-a-time.
pub struct FixtureStateManager {
    state: Mutex<FixtureStore>,
}

impl FixtureStateManager {
    pub fn new(store: FixtureStore) -> Self {
        Self {
            state: Mutex::new(store),
        }
    }
}

impl StateManager for FixtureStateManager {
    fn route_prefixes(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.prefixes()
    }

    fn fixture(&self, prefix: &str, key: &str) -> Option<Fixture> {
        let state = self.state.lock().unwrap();
        state.lookup(prefix, key)
    }

    fn set_content(&self, prefix: &str, position: usize, content: &str) -> bool {
        let mut state = self.state.lock().unwrap();

        tracing::debug!("setting content of item {} under {}", position, prefix);
        state.set_content(prefix, position, content)
    }

    fn check_item(&self, prefix: &str, id: &str) -> bool {
        let mut state = self.state.lock().unwrap();

        tracing::debug!("checking item {} under {}", id, prefix);
        state.check_item(prefix, id)
    }
}

//! Case-insensitive substring search over view models.

/// Something the search box can match against.
pub trait Searchable {
    /// Values the query is matched against; `None` entries are skipped.
    fn search_fields(&self) -> Vec<Option<String>>;
}

/// Lower-cased, trimmed form of a raw query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Keeps the items where at least one selected field contains `query`.
///
/// A blank query returns every item. The source slice is never modified and
/// a new list is always returned.
pub fn filter<T, F, I>(items: &[T], query: &str, fields: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> I,
    I: IntoIterator<Item = Option<String>>,
{
    let needle = normalize_query(query);
    if needle.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| {
            fields(item)
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

pub fn filter_searchable<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    filter(items, query, Searchable::search_fields)
}

/// Full list plus the currently visible, filtered slice of it.
///
/// Kept by in-process consumers between reloads; see [`crate::utils::debounce::drive`].
#[derive(Debug, Clone)]
pub struct SearchableList<T> {
    all: Vec<T>,
    visible: Vec<T>,
    query: String,
}

impl<T> Default for SearchableList<T> {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
        }
    }
}

impl<T: Searchable + Clone> SearchableList<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut list = Self::default();
        list.replace_all(items);
        list
    }

    /// Swaps in a freshly loaded list, keeping the current query applied.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.all = items;
        self.visible = filter_searchable(&self.all, &self.query);
    }

    pub fn apply_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.visible = filter_searchable(&self.all, &self.query);
    }

    pub fn all(&self) -> &[T] {
        &self.all
    }

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

use crate::error::{Error, Result};
use crate::session::view::ViewId;
use indexmap::IndexMap;

/// Key of the placeholder entry, standing in for "no files open".
pub const PLACEHOLDER: &str = "";

/// An open file with its view.
#[derive(Debug)]
pub struct Entry<V> {
    fullname: String,
    file: String,
    id: ViewId,
    view: V,
}

impl<V> Entry<V> {
    pub fn new(fullname: impl Into<String>, file: impl Into<String>, id: ViewId, view: V) -> Self {
        Self {
            fullname: fullname.into(),
            file: file.into(),
            id,
            view,
        }
    }

    /// Absolute file path, entry key.
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    /// Display name (short file name).
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn is_placeholder(&self) -> bool {
        self.fullname == PLACEHOLDER
    }

    pub fn into_view(self) -> V {
        self.view
    }
}

/// Open files keyed by absolute path. Iteration order is the order of opening (tab order).
#[derive(Debug)]
pub struct EntryTable<V> {
    entries: IndexMap<String, Entry<V>>,
}

impl<V> Default for EntryTable<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V> EntryTable<V> {
    pub fn contains(&self, fullname: &str) -> bool {
        self.entries.contains_key(fullname)
    }

    pub fn get(&self, fullname: &str) -> Option<&Entry<V>> {
        self.entries.get(fullname)
    }

    pub fn get_mut(&mut self, fullname: &str) -> Option<&mut Entry<V>> {
        self.entries.get_mut(fullname)
    }

    /// Add an entry at the end of the table.
    pub fn insert(&mut self, entry: Entry<V>) -> Result<&mut Entry<V>> {
        match self.entries.entry(entry.fullname.clone()) {
            indexmap::map::Entry::Occupied(_) => Err(Error::DuplicateEntry(entry.fullname)),
            indexmap::map::Entry::Vacant(v) => Ok(v.insert(entry)),
        }
    }

    /// Remove an entry keeping the order of others.
    pub fn remove(&mut self, fullname: &str) -> Option<Entry<V>> {
        self.entries.shift_remove(fullname)
    }

    /// Find an entry owning view `id`.
    pub fn find_by_id(&self, id: ViewId) -> Option<&Entry<V>> {
        self.entries.values().find(|e| e.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: ViewId) -> Option<&mut Entry<V>> {
        self.entries.values_mut().find(|e| e.id == id)
    }

    /// Position of an entry owning view `id` in table order.
    pub fn position(&self, id: ViewId) -> Option<usize> {
        self.entries.values().position(|e| e.id == id)
    }

    /// Remove an entry owning view `id` keeping the order of others.
    pub fn remove_by_id(&mut self, id: ViewId) -> Option<Entry<V>> {
        let idx = self.position(id)?;
        self.entries.shift_remove_index(idx).map(|(_, entry)| entry)
    }

    pub fn get_index(&self, idx: usize) -> Option<&Entry<V>> {
        self.entries.get_index(idx).map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<V>> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry<V>> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the table holds the placeholder entry only.
    pub fn is_placeholder_only(&self) -> bool {
        self.entries.len() == 1 && self.entries.contains_key(PLACEHOLDER)
    }

    /// Number of entries for real files.
    pub fn real_len(&self) -> usize {
        self.entries.len() - usize::from(self.entries.contains_key(PLACEHOLDER))
    }
}

use std::fmt;

/// Exclusive attachment category on a holder. At most one item per slot is
/// equipped at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub u8);

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Static description of an item type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquippableData {
    pub name: String,
    pub slot: Slot,
}

impl EquippableData {
    pub fn new(name: impl Into<String>, slot: Slot) -> Self {
        Self {
            name: name.into(),
            slot,
        }
    }
}

/// Every item the game knows about. Lookups ignore ASCII case and return
/// the canonical entry.
#[derive(Clone, Debug, Default)]
pub struct EquippableCatalog {
    entries: Vec<EquippableData>,
}

impl EquippableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<EquippableData>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    /// Adds an entry, replacing any entry with the same name.
    pub fn insert(&mut self, data: EquippableData) {
        self.entries
            .retain(|entry| !entry.name.eq_ignore_ascii_case(&data.name));
        self.entries.push(data);
    }

    pub fn find(&self, name: &str) -> Option<&EquippableData> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use crate::{
    types::EntityId,
    world::{
        entity::entity_directory::EntityDirectory,
        equip::{catalog::Slot, equippable::Equippable},
    },
};

/// The items attached to one holder, in attachment order.
///
/// This is a derived collection: each item's `HumanId` property is the
/// source of truth, and which item is active is read from the items
/// themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Equippables {
    items: Vec<EntityId>,
}

impl Equippables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    pub fn contains(&self, item: &EntityId) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The equipped item in `slot`, if any.
    pub fn active(&self, directory: &EntityDirectory, slot: Slot) -> Option<EntityId> {
        self.items.iter().copied().find(|item| {
            directory
                .find_typed::<Equippable>(item)
                .is_some_and(|equippable| equippable.is_active() && equippable.slot() == Some(slot))
        })
    }

    /// Every attached item that occupies `slot`.
    pub fn in_slot(&self, directory: &EntityDirectory, slot: Slot) -> Vec<EntityId> {
        self.items
            .iter()
            .copied()
            .filter(|item| slot_of(directory, item) == Some(slot))
            .collect()
    }

    /// The next item that could be equipped. With a slot, the first inactive
    /// item in that slot. Without one, the first inactive item whose slot
    /// has no active occupant.
    pub fn next_item(&self, directory: &EntityDirectory, slot: Option<Slot>) -> Option<EntityId> {
        self.items.iter().copied().find(|item| {
            let Some(equippable) = directory.find_typed::<Equippable>(item) else {
                return false;
            };
            let Some(item_slot) = equippable.slot() else {
                return false;
            };
            if equippable.is_active() {
                return false;
            }
            match slot {
                Some(slot) => item_slot == slot,
                None => self.active(directory, item_slot).is_none(),
            }
        })
    }

    pub(crate) fn add(&mut self, item: EntityId) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub(crate) fn remove(&mut self, item: &EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|existing| existing != item);
        before != self.items.len()
    }
}

fn slot_of(directory: &EntityDirectory, item: &EntityId) -> Option<Slot> {
    directory
        .find_typed::<Equippable>(item)
        .and_then(|equippable| equippable.slot())
}

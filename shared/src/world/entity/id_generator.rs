use crate::{types::EntityId, world::entity::error::DirectoryError};

/// Hands out entity ids on the host. Ids are never recycled, which keeps a
/// late update for a deleted entity from landing on a new one.
pub struct EntityIdGenerator {
    next: u32,
}

impl EntityIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn generate(&mut self) -> Result<EntityId, DirectoryError> {
        let id = EntityId::new(self.next);
        self.next = self.next.checked_add(1).ok_or(DirectoryError::IdsExhausted)?;
        Ok(id)
    }

    /// Makes sure ids registered from elsewhere are never handed out again.
    pub fn skip_past(&mut self, id: EntityId) {
        if id.value() >= self.next {
            self.next = id.value().saturating_add(1);
        }
    }
}

impl Default for EntityIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

use log::error;

use crate::{
    random::StateRandom,
    types::EntityId,
    world::{
        component::{
            error::PropertyError,
            property::{PropertyDescriptor, PropertyIndex},
            property_value::{PropertyValue, ValueKind, MAX_TEXT_BYTES},
        },
        entity::entity::{Entity, EntityKind},
        equip::{
            catalog::{EquippableData, Slot},
            slots::{self, DropPlacement},
        },
        error::ApplyError,
        events::EntityEvent,
        simulation::Simulation,
    },
};

pub const ITEM_NAME: PropertyIndex = 2;
pub const HUMAN_ID: PropertyIndex = 3;
pub const EQUIPPED: PropertyIndex = 4;
pub const RANDOM_ACCUMULATOR: PropertyIndex = 5;

/// An item that can lie in the world or be held by a [`Human`].
///
/// [`Human`]: crate::Human
#[derive(Clone, Debug)]
pub struct Equippable {
    pub(crate) item_name: String,
    pub(crate) human_id: Option<EntityId>,
    pub(crate) equipped: bool,
    pub(crate) active: bool,
    pub(crate) random: StateRandom,
    pub(crate) human: Option<EntityId>,
    pub(crate) data: Option<EquippableData>,
    pub(crate) drop_placement: Option<DropPlacement>,
}

impl Equippable {
    pub fn new(id: EntityId) -> Self {
        Self {
            item_name: String::new(),
            human_id: None,
            equipped: false,
            active: false,
            random: StateRandom::new(u64::from(id.value())),
            human: None,
            data: None,
            drop_placement: None,
        }
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// The replicated holder id. May point at an entity that is not
    /// registered yet.
    pub fn human_id(&self) -> Option<EntityId> {
        self.human_id
    }

    /// The resolved holder. Set once `human_id` resolves to a registered
    /// Human and the item is attached to it.
    pub fn human(&self) -> Option<EntityId> {
        self.human
    }

    /// The replicated Equipped flag.
    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    /// Whether equip effects are currently applied, i.e. the item occupies
    /// its slot on its holder.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Catalog entry, created when a known ItemName arrives.
    pub fn data(&self) -> Option<&EquippableData> {
        self.data.as_ref()
    }

    pub fn slot(&self) -> Option<Slot> {
        self.data.as_ref().map(|data| data.slot)
    }

    pub fn random(&self) -> &StateRandom {
        &self.random
    }

    /// Where the item was placed the last time it was dropped.
    pub fn drop_placement(&self) -> Option<DropPlacement> {
        self.drop_placement
    }
}

pub(crate) fn descriptors() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor::new("ItemName", ValueKind::Text, get_item_name, apply_item_name)
            .required(),
        PropertyDescriptor::new("HumanId", ValueKind::Entity, get_human_id, apply_human_id),
        PropertyDescriptor::new("Equipped", ValueKind::Bool, get_equipped, apply_equipped),
        PropertyDescriptor::new(
            "RandomAccumulator",
            ValueKind::Int,
            get_random_accumulator,
            apply_random_accumulator,
        ),
    ]
}

// Authoritative entry points. Each one goes through `Simulation::apply`, the
// same path replicated values take.

pub fn set_item_name(sim: &mut Simulation, item: EntityId, name: &str) -> Result<(), ApplyError> {
    sim.apply(item, ITEM_NAME, PropertyValue::Text(name.to_string()))
}

pub fn set_human_id(
    sim: &mut Simulation,
    item: EntityId,
    human: Option<EntityId>,
) -> Result<(), ApplyError> {
    sim.apply(item, HUMAN_ID, PropertyValue::Entity(human))
}

pub fn set_equipped(sim: &mut Simulation, item: EntityId, equipped: bool) -> Result<(), ApplyError> {
    sim.apply(item, EQUIPPED, PropertyValue::Bool(equipped))
}

/// Picks the item up for `interactee` if nobody holds it. Returns whether it
/// was picked up.
pub fn interact(
    sim: &mut Simulation,
    item: EntityId,
    interactee: EntityId,
) -> Result<bool, ApplyError> {
    if sim.equippable(item)?.human.is_some() {
        return Ok(false);
    }
    set_human_id(sim, item, Some(interactee))?;
    Ok(true)
}

/// Draws from the item's deterministic stream. The new invocation count is
/// replicated so clients can follow the same stream.
pub fn next_random(sim: &mut Simulation, item: EntityId) -> Result<u32, ApplyError> {
    let value = sim.equippable_mut(item)?.random.next_u32();
    sim.touch(item, RANDOM_ACCUMULATOR);
    Ok(value)
}

pub fn random_range_f32(
    sim: &mut Simulation,
    item: EntityId,
    min: f32,
    max: f32,
) -> Result<f32, ApplyError> {
    let value = sim.equippable_mut(item)?.random.range_f32(min, max);
    sim.touch(item, RANDOM_ACCUMULATOR);
    Ok(value)
}

pub(crate) fn tick(sim: &mut Simulation, item: EntityId) {
    slots::resolve_holder(sim, item);
}

pub(crate) fn on_delete(sim: &mut Simulation, item: EntityId) {
    let holder = match sim.equippable(item) {
        Ok(equippable) => equippable.human,
        Err(_) => return,
    };
    if let Some(holder) = holder {
        slots::release(sim, item, holder);
    }
}

// Getters

fn get_item_name(entity: &Entity) -> Option<PropertyValue> {
    as_equippable(entity).map(|item| PropertyValue::Text(item.item_name.clone()))
}

fn get_human_id(entity: &Entity) -> Option<PropertyValue> {
    as_equippable(entity).map(|item| PropertyValue::Entity(item.human_id))
}

fn get_equipped(entity: &Entity) -> Option<PropertyValue> {
    as_equippable(entity).map(|item| PropertyValue::Bool(item.equipped))
}

fn get_random_accumulator(entity: &Entity) -> Option<PropertyValue> {
    as_equippable(entity).map(|item| {
        PropertyValue::Int(i32::try_from(item.random.invocations()).unwrap_or(i32::MAX))
    })
}

fn as_equippable(entity: &Entity) -> Option<&Equippable> {
    match entity.kind() {
        EntityKind::Equippable(equippable) => Some(equippable),
        _ => None,
    }
}

// Setters

fn apply_item_name(
    sim: &mut Simulation,
    item: EntityId,
    value: PropertyValue,
) -> Result<(), ApplyError> {
    let name = value.into_text("ItemName")?;
    if name.len() > MAX_TEXT_BYTES {
        return Err(PropertyError::TextTooLong {
            property: "ItemName",
            length: name.len(),
            max: MAX_TEXT_BYTES,
        }
        .into());
    }

    let data = sim.catalog().find(&name).cloned();
    sim.equippable_mut(item)?.item_name = name.clone();
    sim.touch(item, ITEM_NAME);

    let Some(data) = data else {
        error!("Missing Equippable: {}", name);
        if sim.is_host() {
            // cannot ever be made valid, so the host gets rid of it
            sim.delete(item);
        } else {
            sim.push_event(EntityEvent::DataError {
                entity: item,
                item_name: name.clone(),
            });
        }
        return Err(ApplyError::MissingEquippable { entity: item, name });
    };

    let equippable = sim.equippable_mut(item)?;
    equippable.item_name = data.name.clone();
    if equippable.data.as_ref() == Some(&data) {
        return Ok(());
    }
    let slot_changed = equippable.slot().is_some_and(|slot| slot != data.slot);
    equippable.data = Some(data.clone());

    sim.push_event(EntityEvent::RepresentationCreated {
        entity: item,
        item_name: data.name,
        slot: data.slot,
    });
    if slot_changed {
        slots::vacate(sim, item);
    }
    slots::sync_equipped(sim, item);
    Ok(())
}

fn apply_human_id(
    sim: &mut Simulation,
    item: EntityId,
    value: PropertyValue,
) -> Result<(), ApplyError> {
    let human_id = value.into_entity("HumanId")?;
    let equippable = sim.equippable_mut(item)?;
    let cached = equippable.human;
    equippable.human_id = human_id;
    sim.touch(item, HUMAN_ID);

    if let Some(holder) = cached {
        if Some(holder) == human_id {
            return Ok(());
        }
        slots::drop_from(sim, item, holder);
    }

    slots::resolve_holder(sim, item);
    Ok(())
}

fn apply_equipped(
    sim: &mut Simulation,
    item: EntityId,
    value: PropertyValue,
) -> Result<(), ApplyError> {
    let equipped = value.into_bool("Equipped")?;
    slots::write_equipped(sim, item, equipped)
}

fn apply_random_accumulator(
    sim: &mut Simulation,
    item: EntityId,
    value: PropertyValue,
) -> Result<(), ApplyError> {
    let target = value.into_int("RandomAccumulator")?;
    let target = u32::try_from(target).map_err(|_| PropertyError::OutOfRange {
        property: "RandomAccumulator",
        value: i64::from(target),
    })?;

    // the host owns the stream, only clients resynchronize
    let is_host = sim.is_host();
    let equippable = sim.equippable_mut(item)?;
    if !is_host && equippable.random.invocations() != target {
        equippable.random = StateRandom::with_invocations(u64::from(item.value()), target);
    }
    sim.touch(item, RANDOM_ACCUMULATOR);
    Ok(())
}

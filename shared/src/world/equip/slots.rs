//! Attachment and slot resolution between Equippables and their holders.
//!
//! The replicated `HumanId` and `Equipped` properties are the source of
//! truth. Everything in here derives the holder's item list and the active
//! item per slot from them, and fires equip effects only on transitions.

use log::{debug, error, warn};

use crate::{
    math::Vec3,
    types::EntityId,
    world::{
        component::property_value::PropertyValue,
        entity::entity::{ANGLES, ORIGIN},
        equip::{
            catalog::Slot,
            equippable::{EQUIPPED, HUMAN_ID},
            error::SlotError,
            human::Human,
        },
        error::ApplyError,
        events::EntityEvent,
        simulation::Simulation,
    },
};

const DROP_OFFSET: f32 = 0.25;
const DROP_FORWARD_FORCE: f32 = 1.5;
const DROP_TORQUE: f32 = 5.0;

/// Where and how a dropped item leaves its holder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropPlacement {
    pub origin: Vec3,
    pub angles: Vec3,
    pub force: Vec3,
    pub torque: Vec3,
}

impl DropPlacement {
    /// Slightly forward, right and below the holder, thrown along the
    /// holder's facing direction.
    pub fn from_holder(origin: Vec3, angles: Vec3, velocity: Vec3) -> Self {
        let forward = Vec3::forward_from_angles(angles);
        let right = Vec3::right_from_angles(angles);
        Self {
            origin: origin
                + forward * DROP_OFFSET
                + right * DROP_OFFSET
                + Vec3::DOWN * DROP_OFFSET,
            angles,
            force: velocity.normalized() + forward * DROP_FORWARD_FORCE,
            torque: forward * DROP_TORQUE,
        }
    }
}

/// Adds `item` to `holder`'s items. The item is equipped right away when its
/// slot is free on the holder.
pub fn attach(sim: &mut Simulation, item: EntityId, holder: EntityId) -> Result<(), SlotError> {
    let equippable = sim
        .equippable(item)
        .map_err(|_| SlotError::NotAnEquippable { entity: item })?;
    if let Some(current) = equippable.human {
        if current != holder {
            return Err(SlotError::AlreadyAttached {
                item,
                holder: current,
            });
        }
    }
    let slot = equippable
        .slot()
        .ok_or(SlotError::MissingRepresentation { item })?;

    sim.human_mut(holder)
        .map_err(|_| SlotError::HolderNotFound { item, holder })?
        .equippables_mut()
        .add(item);

    let human_id_changed = {
        let equippable = sim
            .equippable_mut(item)
            .map_err(|_| SlotError::NotAnEquippable { entity: item })?;
        equippable.human = Some(holder);
        let changed = equippable.human_id != Some(holder);
        equippable.human_id = Some(holder);
        changed
    };
    if human_id_changed {
        sim.touch(item, HUMAN_ID);
    }

    if active_in_slot(sim, holder, slot).is_none() {
        if let Err(error) = write_equipped(sim, item, true) {
            warn!("Could not equip {} on {}: {}", item, holder, error);
        }
    } else {
        sync_equipped(sim, item);
    }
    Ok(())
}

/// Enforces one item per slot on the holder: every other item in `item`'s
/// slot is dropped. If one of them was active, `item` takes its place.
pub fn displace(sim: &mut Simulation, item: EntityId) -> Result<(), SlotError> {
    let (holder, slot) = holder_and_slot(sim, item)?;

    let others: Vec<EntityId> = {
        let directory = sim.directory();
        directory
            .find_typed::<Human>(&holder)
            .map(|human| human.equippables().in_slot(directory, slot))
            .unwrap_or_default()
    };

    for other in others.into_iter().rev() {
        if other == item {
            continue;
        }
        let other_active = sim
            .equippable(other)
            .map(|equippable| equippable.is_active())
            .unwrap_or(false);
        if other_active {
            if let Err(error) = write_equipped(sim, item, true) {
                warn!("Could not equip {} over {}: {}", item, other, error);
            }
        }
        if let Err(error) = drop(sim, other) {
            warn!("Could not drop displaced item {}: {}", other, error);
        }
    }
    Ok(())
}

/// Removes `item` from its holder without a drop placement and clears its
/// `HumanId`.
pub fn detach(sim: &mut Simulation, item: EntityId) -> Result<(), SlotError> {
    let holder = sim
        .equippable(item)
        .map_err(|_| SlotError::NotAnEquippable { entity: item })?
        .human;
    let Some(holder) = holder else {
        error!("Cannot detach {}, it is not held", item);
        return Err(SlotError::NoHolder { item });
    };

    release(sim, item, holder);
    if let Ok(equippable) = sim.equippable_mut(item) {
        equippable.human_id = None;
    }
    sim.touch(item, HUMAN_ID);
    Ok(())
}

/// Drops `item` from its holder. Goes through the `HumanId` property so the
/// drop replicates, and returns the placement it was given.
pub fn drop(sim: &mut Simulation, item: EntityId) -> Result<DropPlacement, ApplyError> {
    let holder = sim.equippable(item)?.human;
    if holder.is_none() {
        error!("Cannot drop {}, it is not held", item);
        return Err(SlotError::NoHolder { item }.into());
    }

    sim.apply(item, HUMAN_ID, PropertyValue::Entity(None))?;

    let placement = sim.equippable(item)?.drop_placement;
    placement.ok_or_else(|| SlotError::NoHolder { item }.into())
}

/// The active item of `holder` in `slot`.
pub fn active_in_slot(sim: &Simulation, holder: EntityId, slot: Slot) -> Option<EntityId> {
    let directory = sim.directory();
    directory
        .find_typed::<Human>(&holder)
        .and_then(|human| human.equippables().active(directory, slot))
}

// Internal transitions

/// Attaches a pending item once both its catalog data and its holder exist.
/// Until then the request stays in `HumanId` and is retried every tick.
pub(crate) fn resolve_holder(sim: &mut Simulation, item: EntityId) {
    let Ok(equippable) = sim.equippable(item) else {
        return;
    };
    if equippable.human.is_some() {
        return;
    }
    let Some(holder) = equippable.human_id else {
        return;
    };
    if equippable.data.is_none() {
        debug!("{} waits for its item data before attaching to {}", item, holder);
        return;
    }
    if sim.directory().find_typed::<Human>(&holder).is_none() {
        debug!("{} waits for holder {} to be registered", item, holder);
        return;
    }

    if let Err(error) = attach(sim, item, holder) {
        warn!("Could not attach {} to {}: {}", item, holder, error);
        return;
    }
    if let Err(error) = displace(sim, item) {
        warn!("Could not resolve slot of {}: {}", item, error);
    }
}

/// Detaches `item` from a previous holder and places it in the world next to
/// it. `HumanId` has already been changed by the caller.
pub(crate) fn drop_from(sim: &mut Simulation, item: EntityId, holder: EntityId) {
    let placement = placement_for(sim, holder);
    release(sim, item, holder);

    let Some(placement) = placement else {
        return;
    };
    // clients get the placed pose replicated with the drop
    if sim.is_host() {
        if let Ok(entity) = sim.entity_mut(item) {
            entity.set_origin(placement.origin);
            entity.set_angles(placement.angles);
        }
        sim.touch(item, ORIGIN);
        sim.touch(item, ANGLES);
    }
    if let Ok(equippable) = sim.equippable_mut(item) {
        equippable.drop_placement = Some(placement);
    }
    sim.push_event(EntityEvent::Dropped {
        item,
        holder,
        placement,
    });
}

/// Takes `item` off `holder`, unequipping it. If it was the active item, the
/// next available item on the holder is equipped instead.
pub(crate) fn release(sim: &mut Simulation, item: EntityId, holder: EntityId) {
    let (was_active, raw_equipped, slot) = match sim.equippable(item) {
        Ok(equippable) => (equippable.active, equippable.equipped, equippable.slot()),
        Err(_) => return,
    };

    if let Ok(human) = sim.human_mut(holder) {
        human.equippables_mut().remove(&item);
    }
    if raw_equipped {
        if let Err(error) = write_equipped(sim, item, false) {
            warn!("Could not unequip {}: {}", item, error);
        }
    }
    if let Ok(equippable) = sim.equippable_mut(item) {
        equippable.human = None;
    }
    // no holder means nothing is applied, whatever the flag said
    sync_equipped(sim, item);

    if !was_active {
        return;
    }
    let successor = {
        let directory = sim.directory();
        directory.find_typed::<Human>(&holder).and_then(|human| {
            human
                .equippables()
                .next_item(directory, slot)
                .or_else(|| human.equippables().next_item(directory, None))
        })
    };
    if let Some(successor) = successor {
        debug!("{} takes over from {} on {}", successor, item, holder);
        if let Err(error) = write_equipped(sim, successor, true) {
            warn!("Could not equip {}: {}", successor, error);
        }
    }
}

/// Clears an item's holder because the holder itself is being deleted.
pub(crate) fn orphan(sim: &mut Simulation, item: EntityId, holder: EntityId) {
    let raw_equipped = match sim.equippable(item) {
        Ok(equippable) if equippable.human == Some(holder) => equippable.equipped,
        _ => return,
    };
    if raw_equipped {
        if let Err(error) = write_equipped(sim, item, false) {
            warn!("Could not unequip {}: {}", item, error);
        }
    }
    if let Ok(equippable) = sim.equippable_mut(item) {
        equippable.human = None;
        equippable.human_id = None;
    }
    sim.touch(item, HUMAN_ID);
    sync_equipped(sim, item);
}

/// Turns equip effects off for an item whose slot is about to change, so it
/// can be re-resolved in its new slot.
pub(crate) fn vacate(sim: &mut Simulation, item: EntityId) {
    let holder = match sim.equippable_mut(item) {
        Ok(equippable) if equippable.active => {
            equippable.active = false;
            equippable.human
        }
        _ => return,
    };
    sim.push_event(EntityEvent::Unequipped { item, holder });
}

/// Writes the replicated Equipped flag and reconciles equip effects.
pub(crate) fn write_equipped(
    sim: &mut Simulation,
    item: EntityId,
    equipped: bool,
) -> Result<(), ApplyError> {
    sim.equippable_mut(item)?.equipped = equipped;
    sim.touch(item, EQUIPPED);
    sync_equipped(sim, item);
    Ok(())
}

/// Applies or removes equip effects when the effective state differs from
/// what is applied. Effects need the flag, a resolved holder and item data.
pub(crate) fn sync_equipped(sim: &mut Simulation, item: EntityId) {
    let Ok(equippable) = sim.equippable(item) else {
        return;
    };
    let desired =
        equippable.equipped && equippable.human.is_some() && equippable.data.is_some();
    if equippable.equipped && !desired {
        debug!("Equip of {} deferred until it is attached", item);
    }
    if desired == equippable.active {
        return;
    }
    let holder = equippable.human;
    let slot = equippable.slot();

    if !desired {
        if let Ok(equippable) = sim.equippable_mut(item) {
            equippable.active = false;
        }
        sim.push_event(EntityEvent::Unequipped { item, holder });
        return;
    }

    let (Some(holder), Some(slot)) = (holder, slot) else {
        return;
    };

    // at most one active item per slot
    let rivals: Vec<EntityId> = {
        let directory = sim.directory();
        directory
            .find_typed::<Human>(&holder)
            .map(|human| human.equippables().in_slot(directory, slot))
            .unwrap_or_default()
    };
    for rival in rivals {
        if rival == item {
            continue;
        }
        let rival_active = sim
            .equippable(rival)
            .map(|equippable| equippable.active)
            .unwrap_or(false);
        if rival_active {
            if let Err(error) = write_equipped(sim, rival, false) {
                warn!("Could not unequip {}: {}", rival, error);
            }
        }
    }

    if let Ok(equippable) = sim.equippable_mut(item) {
        equippable.active = true;
    }
    sim.push_event(EntityEvent::Equipped { item, holder, slot });
}

fn holder_and_slot(sim: &Simulation, item: EntityId) -> Result<(EntityId, Slot), SlotError> {
    let equippable = sim
        .equippable(item)
        .map_err(|_| SlotError::NotAnEquippable { entity: item })?;
    let holder = equippable.human.ok_or(SlotError::NoHolder { item })?;
    let slot = equippable
        .slot()
        .ok_or(SlotError::MissingRepresentation { item })?;
    Ok((holder, slot))
}

fn placement_for(sim: &Simulation, holder: EntityId) -> Option<DropPlacement> {
    let entity = sim.directory().find(&holder)?;
    let human = sim.directory().find_typed::<Human>(&holder)?;
    Some(DropPlacement::from_holder(
        entity.origin(),
        entity.angles(),
        human.velocity(),
    ))
}

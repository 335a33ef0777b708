use fragnet_shared::{EquippableCatalog, EquippableData, Slot};

pub const RIFLE: &str = "Rifle";
pub const SHOTGUN: &str = "Shotgun";
pub const PISTOL: &str = "Pistol";
pub const KNIFE: &str = "Knife";

/// Rifle and Shotgun share the primary slot.
pub fn test_catalog() -> EquippableCatalog {
    EquippableCatalog::with_entries(vec![
        EquippableData::new(RIFLE, Slot(0)),
        EquippableData::new(SHOTGUN, Slot(0)),
        EquippableData::new(PISTOL, Slot(1)),
        EquippableData::new(KNIFE, Slot(2)),
    ])
}

pub mod catalog;
pub mod equippable;
pub mod equippables;
pub mod error;
pub mod human;
pub mod slots;

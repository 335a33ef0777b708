pub mod component;
pub mod entity;
pub mod equip;
pub mod error;
pub mod events;
pub mod simulation;

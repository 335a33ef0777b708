pub mod error;
pub mod property;
pub mod property_value;
pub mod registry;

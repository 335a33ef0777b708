pub mod entity;
pub mod entity_directory;
pub mod error;
pub mod id_generator;
pub mod retired_ids;

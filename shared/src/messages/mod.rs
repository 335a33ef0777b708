pub mod entity_message;
pub mod error;
pub mod ingest;
pub mod packet;

pub mod actor;
pub mod message;
pub mod store_actor_sqlite;

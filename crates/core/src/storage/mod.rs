pub mod keys;
pub mod manager;
pub mod store;

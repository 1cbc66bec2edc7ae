pub mod config;
pub mod entry;
pub mod map;
pub mod shared;

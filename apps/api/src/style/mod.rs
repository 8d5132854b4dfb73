// Editor style settings: one JSON file, overwritten wholesale on save.

pub mod handlers;
pub mod store;

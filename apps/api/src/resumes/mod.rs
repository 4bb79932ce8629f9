// Resume and version persistence plus the CRUD endpoints the history views
// read from.

pub mod handlers;
pub mod store;

pub mod catalog;
pub mod delivery;
pub mod dialog;
pub mod presenter;
pub mod waiter;

pub use catalog::{CatalogEndpoints, CatalogService, SourceLookup};
pub use dialog::DialogService;
pub use waiter::Selection;

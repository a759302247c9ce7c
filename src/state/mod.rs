//! View-state machinery: the closed load-state type and the controllers
//! that own one state each and drive fetches against the stores.

mod categories;
mod content;
mod load;

pub use categories::CategoriesController;
pub use content::ContentController;
pub use load::LoadState;

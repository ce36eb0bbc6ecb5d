mod load;
mod model;

pub use load::load_collection;
pub use model::{Document, DocumentCollection, Section};

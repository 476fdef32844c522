//! Infrastructure seams over the three external services.

pub mod model;
pub mod searcher;
pub mod sheet;

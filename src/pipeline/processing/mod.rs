// Pipeline processing: cell normalization and catalog transformation

pub mod catalog;
pub mod normalize;

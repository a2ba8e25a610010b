pub mod data_transformer;

pub use data_transformer::*;

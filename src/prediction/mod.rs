pub mod label_metadata;
pub mod rank;
pub mod rows;

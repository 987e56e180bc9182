pub mod product;
pub mod scan;
pub mod sound;

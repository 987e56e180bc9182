pub mod catalog;
pub mod export;
pub mod product;
pub mod scan;
pub mod sound;
pub mod statistics;

pub mod into_liter;
pub mod sequence;

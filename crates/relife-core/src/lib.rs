//! Pure turn-resolution engine: the built-in catalog plus the rules that
//! mutate a run month by month and convert terminal runs into soul points.

pub mod catalog;
pub mod engine;

//! Per-document-type parse/emit functions (spec §4.5, component C5).

pub mod defaults;
pub mod obsoletes;
pub mod packager;
pub mod stream;
pub mod translation;

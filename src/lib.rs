//! Module metadata document model, YAML codec, index, and merger
//! (SPEC_FULL.md). Grounded throughout on `original_source/`'s libmodulemd
//! and on the teacher repo's idioms for errors, logging, and config.

pub mod config;
pub mod entities;
pub mod error;
pub mod identity;
pub mod index;
pub mod merger;
pub mod module;
pub mod stream;
pub mod value;
pub mod yaml;

pub use error::{Error, ErrorKind, Result, YamlErrorKind};
pub use index::ModuleIndex;
pub use merger::IndexMerger;
pub use module::Module;
pub use stream::{ModuleStream, PackagerV3};
pub use yaml::{Document, ParseOptions, SubdocumentInfo};

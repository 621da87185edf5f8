//! Leaf entities (spec §4.2, component C2): simple value objects with a
//! uniform `new` / `copy` / `validate` surface.

pub mod buildopts;
pub mod component;
pub mod defaults;
pub mod dependencies;
pub mod obsoletes;
pub mod profile;
pub mod rpm_map_entry;
pub mod service_level;
pub mod translation;

pub use buildopts::Buildopts;
pub use component::{ModuleComponent, RpmComponent};
pub use defaults::DefaultsV1;
pub use dependencies::Dependencies;
pub use obsoletes::Obsoletes;
pub use profile::Profile;
pub use rpm_map_entry::RpmMapEntry;
pub use service_level::ServiceLevel;
pub use translation::{Translation, TranslationEntry};

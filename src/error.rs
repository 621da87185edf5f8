//! Error domains for the crate's public surface (spec §7).
//!
//! The source splits errors across a "general" domain and a "YAML" domain.
//! Both carry a kind and a human-readable message; we fold them into one
//! enum so callers match on a single type while still being able to tell
//! the two domains apart via [`ErrorKind`] / [`YamlErrorKind`].

use thiserror::Error;

/// General-domain error kinds (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Cross-version upgrade cannot be performed automatically.
    Upgrade,
    /// Structural invariant violated (missing required field, inconsistent
    /// mdversion, ambiguous default).
    Validate,
    /// I/O adapter failure.
    FileAccess,
    /// A search or get-by-NSVCA query matched nothing.
    NoMatches,
    /// A search or get-by-NSVCA query matched more than one entry.
    TooManyMatches,
    /// Compression detection failed.
    Magic,
    /// Feature unavailable in this build.
    NotImplemented,
    /// Caller passed `None`/empty where a value is required.
    MissingRequired,
}

/// YAML-domain error kinds (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YamlErrorKind {
    /// Could not open the input/output stream.
    Open,
    /// Internal invariant violated; indicates a bug in this crate.
    Programming,
    /// Input violates the YAML 1.1 grammar itself.
    Unparseable,
    /// Input is valid YAML but violates the module-metadata schema.
    Parse,
    /// Failed while emitting.
    Emit,
    /// A required field was missing from a parsed document.
    MissingRequired,
    /// Failed to initialize a YAML event.
    EventInit,
    /// Two related fields disagree (e.g. `nevra` != the assembled form).
    Inconsistent,
    /// Strict mode rejected a key it does not recognize.
    UnknownAttr,
}

/// The crate's single error type, tagging which domain produced it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind:?}: {message}")]
    General { kind: ErrorKind, message: String },

    #[error("yaml {kind:?}: {message}")]
    Yaml {
        kind: YamlErrorKind,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn general(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error::General {
            kind,
            message: message.into(),
        }
    }

    pub fn yaml(kind: YamlErrorKind, message: impl Into<String>) -> Self {
        Error::Yaml {
            kind,
            message: message.into(),
        }
    }

    /// The general-domain kind, if this is a general error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::General { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The YAML-domain kind, if this is a YAML error.
    pub fn yaml_kind(&self) -> Option<YamlErrorKind> {
        match self {
            Error::Yaml { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

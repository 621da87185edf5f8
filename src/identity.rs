//! Stream identity (NSVCA) shared by all three stream versions (spec §3.1,
//! §9 "shared fields factored into a `StreamIdentity` struct").

/// Maximum length of `context` once a stream reaches the v3 schema.
pub const V3_MAX_CONTEXT_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamIdentity {
    pub name: Option<String>,
    pub stream: Option<String>,
    pub version: u64,
    pub context: Option<String>,
    pub arch: Option<String>,
}

impl StreamIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name:stream:version:context:arch`, or `None` if either `name` or
    /// `stream` is unset.
    pub fn nsvca(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        let stream = self.stream.as_ref()?;
        Some(format!(
            "{}:{}:{}:{}:{}",
            name,
            stream,
            self.version,
            self.context.as_deref().unwrap_or(""),
            self.arch.as_deref().unwrap_or("")
        ))
    }

    /// `name:stream:version:context`, the NSVC prefix without `arch`.
    pub fn nsvc(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        let stream = self.stream.as_ref()?;
        Some(format!(
            "{}:{}:{}:{}",
            name,
            stream,
            self.version,
            self.context.as_deref().unwrap_or("")
        ))
    }

    pub fn validate(&self, enforce_context_len: bool) -> crate::error::Result<()> {
        use crate::error::{Error, ErrorKind};

        match &self.name {
            Some(n) if !n.is_empty() => {}
            _ => {
                return Err(Error::general(
                    ErrorKind::Validate,
                    "module stream must have a non-empty name",
                ))
            }
        }
        match &self.stream {
            Some(s) if !s.is_empty() => {}
            _ => {
                return Err(Error::general(
                    ErrorKind::Validate,
                    "module stream must have a non-empty stream",
                ))
            }
        }
        if enforce_context_len {
            if let Some(context) = &self.context {
                if context.len() > V3_MAX_CONTEXT_LEN {
                    return Err(Error::general(
                        ErrorKind::Validate,
                        format!(
                            "context {:?} exceeds the {}-character limit",
                            context, V3_MAX_CONTEXT_LEN
                        ),
                    ));
                }
                if !context.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(Error::general(
                        ErrorKind::Validate,
                        format!("context {:?} must be alphanumeric", context),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nsvca_is_none_without_name_or_stream() {
        let mut id = StreamIdentity::new();
        assert_eq!(id.nsvca(), None);
        id.name = Some("foo".to_owned());
        assert_eq!(id.nsvca(), None);
    }

    #[test]
    fn nsvca_formats_canonically() {
        let id = StreamIdentity {
            name: Some("foo".to_owned()),
            stream: Some("stream".to_owned()),
            version: 42,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        assert_eq!(id.nsvca().unwrap(), "foo:stream:42:c0ffee:x86_64");
        assert_eq!(id.nsvc().unwrap(), "foo:stream:42:c0ffee");
    }

    #[test]
    fn v3_context_length_is_enforced() {
        let id = StreamIdentity {
            name: Some("foo".to_owned()),
            stream: Some("s".to_owned()),
            version: 1,
            context: Some("elevenchars".to_owned()),
            arch: None,
        };
        assert!(id.validate(true).is_err());
        assert!(id.validate(false).is_ok());
    }
}

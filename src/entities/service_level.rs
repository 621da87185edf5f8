//! `ServiceLevel` — a named lifecycle phase with an optional EOL date
//! (spec §3.2). Grounded on `modulemd-service-level.h` in
//! `original_source/`.

use chrono::NaiveDate;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone)]
pub struct ServiceLevel {
    pub name: String,
    pub eol: Option<NaiveDate>,
}

impl ServiceLevel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eol: None,
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "service level must have a non-empty name",
            ));
        }
        Ok(())
    }

    pub fn parse_eol(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| {
            Error::general(
                ErrorKind::Validate,
                format!("invalid EOL date {:?}: {}", s, err),
            )
        })
    }

    pub fn emit_eol(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Two service levels are equal iff their names match and both EOLs are
/// either both absent or both present and equal (spec §3.2).
impl PartialEq for ServiceLevel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.eol == other.eol
    }
}
impl Eq for ServiceLevel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_matching_eol() {
        let a = ServiceLevel::new("rawhide");
        let mut b = ServiceLevel::new("rawhide");
        assert_eq!(a, b);
        b.eol = Some(ServiceLevel::parse_eol("2024-01-01").unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn eol_roundtrips_through_string_form() {
        let date = ServiceLevel::parse_eol("2024-05-17").unwrap();
        assert_eq!(ServiceLevel::emit_eol(&date), "2024-05-17");
    }

    #[test]
    fn validate_rejects_empty_name() {
        let sl = ServiceLevel {
            name: String::new(),
            eol: None,
        };
        assert!(sl.validate().is_err());
    }
}

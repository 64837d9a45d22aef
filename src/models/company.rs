//! Company information shown on reports.

use serde::{Deserialize, Serialize};

use super::{nullable, require_text};
use crate::error::LedgerResult;

const ENTITY: &str = "company";

/// The organisation running the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Company name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Logo URL.
    #[serde(default)]
    pub logo: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "My Printing Press".to_string(),
            address: "123 Print Street, Inkville".to_string(),
            logo: None,
        }
    }
}

impl CompanyInfo {
    /// Checks the name is present.
    pub fn validate(&self) -> LedgerResult<()> {
        require_text(ENTITY, "name", &self.name)
    }
}

/// The mutable fields of the company info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyInfoPatch {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New logo URL; `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    pub logo: Option<Option<String>>,
}

impl CompanyInfoPatch {
    /// Applies the patch.
    pub fn apply(self, info: &mut CompanyInfo) -> LedgerResult<()> {
        if let Some(name) = &self.name {
            require_text(ENTITY, "name", name)?;
        }
        if let Some(name) = self.name {
            info.name = name;
        }
        if let Some(address) = self.address {
            info.address = address;
        }
        if let Some(logo) = self.logo {
            info.logo = logo;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_company_info() {
        let info = CompanyInfo::default();
        assert_eq!(info.name, "My Printing Press");
        assert_eq!(info.logo, None);
    }

    #[test]
    fn test_patch_clears_logo_with_null() {
        let mut info = CompanyInfo {
            logo: Some("https://example.com/logo.png".to_string()),
            ..Default::default()
        };
        let patch: CompanyInfoPatch = serde_json::from_str(r#"{"logo": null}"#).unwrap();
        patch.apply(&mut info).unwrap();
        assert_eq!(info.logo, None);
    }

    #[test]
    fn test_patch_without_logo_keeps_it() {
        let mut info = CompanyInfo {
            logo: Some("logo.png".to_string()),
            ..Default::default()
        };
        let patch: CompanyInfoPatch =
            serde_json::from_str(r#"{"name": "Inkwell Press"}"#).unwrap();
        patch.apply(&mut info).unwrap();
        assert_eq!(info.name, "Inkwell Press");
        assert_eq!(info.logo.as_deref(), Some("logo.png"));
    }
}

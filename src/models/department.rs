//! Department model.

use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::LedgerResult;

const ENTITY: &str = "department";

/// An organisational unit, e.g. "Printing" or "Binding".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier for the department.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl Department {
    /// Checks the name is present.
    pub fn validate(&self) -> LedgerResult<()> {
        require_text(ENTITY, "name", &self.name)
    }
}

/// Form for adding a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDepartment {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl NewDepartment {
    /// Validates the form and builds the record.
    pub fn into_department(self, id: String) -> LedgerResult<Department> {
        require_text(ENTITY, "name", &self.name)?;
        Ok(Department {
            id,
            name: self.name,
            description: self.description,
        })
    }
}

/// The mutable fields of a department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl DepartmentPatch {
    /// Applies the patch.
    pub fn apply(self, department: &mut Department) -> LedgerResult<()> {
        if let Some(name) = self.name {
            require_text(ENTITY, "name", &name)?;
            department.name = name;
        }
        if let Some(description) = self.description {
            department.description = description;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_rejected() {
        let form = NewDepartment {
            name: String::new(),
            description: "Finishing".to_string(),
        };
        assert!(form.into_department("dep_001".to_string()).is_err());
    }
}

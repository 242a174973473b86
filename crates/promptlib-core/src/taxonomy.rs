//! Department and category taxonomies.
//!
//! Both are closed sets. The wire and storage form is the kebab-case
//! identifier returned by `as_str`; `parse` is the only way back in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Departments a prompt can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Department {
    ProjectManagement,
    Marketing,
    Sales,
    Engineering,
    Hr,
    Finance,
    Design,
    CustomerSupport,
    Executive,
    Operations,
}

impl Department {
    /// Returns every department in display order.
    pub fn all() -> &'static [Department] {
        &[
            Department::ProjectManagement,
            Department::Marketing,
            Department::Sales,
            Department::Engineering,
            Department::Hr,
            Department::Finance,
            Department::Design,
            Department::CustomerSupport,
            Department::Executive,
            Department::Operations,
        ]
    }

    /// Convert to the stored identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::ProjectManagement => "project-management",
            Department::Marketing => "marketing",
            Department::Sales => "sales",
            Department::Engineering => "engineering",
            Department::Hr => "hr",
            Department::Finance => "finance",
            Department::Design => "design",
            Department::CustomerSupport => "customer-support",
            Department::Executive => "executive",
            Department::Operations => "operations",
        }
    }

    /// Parse from the stored identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "project-management" => Some(Department::ProjectManagement),
            "marketing" => Some(Department::Marketing),
            "sales" => Some(Department::Sales),
            "engineering" => Some(Department::Engineering),
            "hr" => Some(Department::Hr),
            "finance" => Some(Department::Finance),
            "design" => Some(Department::Design),
            "customer-support" => Some(Department::CustomerSupport),
            "executive" => Some(Department::Executive),
            "operations" => Some(Department::Operations),
            _ => None,
        }
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Department::ProjectManagement => "Project Management",
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::Engineering => "Engineering",
            Department::Hr => "Human Resources",
            Department::Finance => "Finance",
            Department::Design => "Design",
            Department::CustomerSupport => "Customer Support",
            Department::Executive => "Executive",
            Department::Operations => "Operations",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a prompt helps with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Email,
    Documentation,
    Planning,
    Analysis,
    Communication,
    Reporting,
    TeamManagement,
}

impl Category {
    /// Returns every category.
    pub fn all() -> &'static [Category] {
        &[
            Category::Email,
            Category::Documentation,
            Category::Planning,
            Category::Analysis,
            Category::Communication,
            Category::Reporting,
            Category::TeamManagement,
        ]
    }

    /// Convert to the stored identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Email => "email",
            Category::Documentation => "documentation",
            Category::Planning => "planning",
            Category::Analysis => "analysis",
            Category::Communication => "communication",
            Category::Reporting => "reporting",
            Category::TeamManagement => "team-management",
        }
    }

    /// Parse from the stored identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Category::Email),
            "documentation" => Some(Category::Documentation),
            "planning" => Some(Category::Planning),
            "analysis" => Some(Category::Analysis),
            "communication" => Some(Category::Communication),
            "reporting" => Some(Category::Reporting),
            "team-management" => Some(Category::TeamManagement),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

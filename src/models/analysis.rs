//! Analysis result types: topics and the fixed classification set.

use serde::{Deserialize, Serialize};

/// The closed set of transcript categories.
///
/// Labels are the exact strings the classification prompt enumerates and
/// the model is expected to echo back. The set is fixed at compile time;
/// there is no runtime extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    TechnicalIssues,
    CommercialSupport,
    AdministrativeRequests,
    GeneralInquiries,
    Complaints,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TechnicalIssues,
        Category::CommercialSupport,
        Category::AdministrativeRequests,
        Category::GeneralInquiries,
        Category::Complaints,
    ];

    /// The label used in prompts and expected in model responses.
    pub fn label(&self) -> &'static str {
        match self {
            Category::TechnicalIssues => "Problemas Técnicos",
            Category::CommercialSupport => "Soporte Comercial",
            Category::AdministrativeRequests => "Solicitudes Administrativas",
            Category::GeneralInquiries => "Consultas Generales",
            Category::Complaints => "Reclamos",
        }
    }

    /// Comma-separated label list for prompt interpolation.
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(Category::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.label() == s)
            .copied()
            .ok_or_else(|| format!("not a known category: {}", s))
    }
}

/// Outcome of classifying one transcript.
///
/// A response that matches an enumerated label verbatim becomes
/// `Category`; anything else is kept as `Unverified` raw text so model
/// drift reaches human review instead of being coerced or discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Classification {
    Category(Category),
    Unverified(String),
}

impl Classification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Classification::Category(_))
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Category(c) => write!(f, "{}", c),
            Classification::Unverified(raw) => write!(f, "{} (unverified)", raw),
        }
    }
}

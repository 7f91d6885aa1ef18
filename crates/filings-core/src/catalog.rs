//! Choices offered by the upload and compliance forms

use serde::Serialize;

use crate::compliance::SUGGESTED_QUESTIONS;
use crate::types::FilingType;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub value: &'static str,
    pub label: &'static str,
}

const fn entry(value: &'static str, label: &'static str) -> CatalogEntry {
    CatalogEntry { value, label }
}

pub const PEER_COMPANIES: &[CatalogEntry] = &[
    entry("apple", "Apple Inc."),
    entry("microsoft", "Microsoft Corporation"),
    entry("amazon", "Amazon.com Inc."),
    entry("google", "Alphabet Inc."),
    entry("meta", "Meta Platforms Inc."),
];

pub const PEER_REPORTS: &[CatalogEntry] = &[
    entry("10K-2023", "10-K (2023)"),
    entry("10K-2022", "10-K (2022)"),
    entry("10Q-2023-Q3", "10-Q (2023 Q3)"),
    entry("10Q-2023-Q2", "10-Q (2023 Q2)"),
    entry("10Q-2023-Q1", "10-Q (2023 Q1)"),
];

pub const PEER_SECTIONS: &[CatalogEntry] = &[
    entry("risk-factors", "Risk Factors"),
    entry("md&a", "Management's Discussion & Analysis"),
    entry("financial-statements", "Financial Statements"),
    entry("business", "Business Description"),
    entry("legal", "Legal Proceedings"),
];

pub const FOCUS_STYLES: &[CatalogEntry] = &[
    entry("financials", "Financial Metrics"),
    entry("risks", "Risk Factors"),
    entry("management", "Management Discussion"),
    entry("outlook", "Future Outlook"),
];

pub const UPLOAD_FILING_TYPES: [FilingType; 4] = [
    FilingType::Form10K,
    FilingType::Form10Q,
    FilingType::Form8K,
    FilingType::FormS1,
];

pub const COMPLIANCE_FILING_TYPES: [FilingType; 2] = [FilingType::Form10K, FilingType::Form10Q];

#[derive(Debug, Clone, Serialize)]
pub struct FilingTypeInfo {
    pub value: FilingType,
    pub label: &'static str,
}

/// Everything a client needs to populate its selectors
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub companies: &'static [CatalogEntry],
    pub reports: &'static [CatalogEntry],
    pub sections: &'static [CatalogEntry],
    pub focus_styles: &'static [CatalogEntry],
    pub upload_filing_types: Vec<FilingTypeInfo>,
    pub compliance_filing_types: Vec<FilingTypeInfo>,
    pub suggested_questions: &'static [&'static str],
}

fn filing_types(types: &[FilingType]) -> Vec<FilingTypeInfo> {
    types
        .iter()
        .map(|t| FilingTypeInfo {
            value: *t,
            label: t.label(),
        })
        .collect()
}

pub fn catalog() -> Catalog {
    Catalog {
        companies: PEER_COMPANIES,
        reports: PEER_REPORTS,
        sections: PEER_SECTIONS,
        focus_styles: FOCUS_STYLES,
        upload_filing_types: filing_types(&UPLOAD_FILING_TYPES),
        compliance_filing_types: filing_types(&COMPLIANCE_FILING_TYPES),
        suggested_questions: &SUGGESTED_QUESTIONS,
    }
}

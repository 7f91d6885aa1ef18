//! Compliance review page model and response templates
//!
//! Response selection is a plain case-insensitive substring match on the
//! question. "risk" wins over "financial"/"reporting"; everything else gets
//! the general review.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::COMPLIANCE_FILING_TYPES;
use crate::error::{AnalysisError, ValidationError};
use crate::report::{Report, ReportKind};
use crate::routing::PageRedirect;
use crate::slot::{RequestSlot, RequestToken, SlotOutcome};
use crate::store::DocumentStore;
use crate::types::FilingType;

/// How many recent questions the page lists
pub const VISIBLE_HISTORY: usize = 3;

/// Oldest exchanges past this are dropped
pub const MAX_HISTORY: usize = 50;

pub const SUGGESTED_QUESTIONS: [&str; 3] = [
    "Are there any risk disclosure compliance issues?",
    "Does the financial reporting meet SEC standards?",
    "Identify any compliance gaps in this document.",
];

pub const NO_DOCUMENT_NOTICE: &str = "No document found. Please upload a document first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceTopic {
    RiskFactors,
    FinancialReporting,
    General,
}

impl ComplianceTopic {
    pub fn classify(question: &str) -> Self {
        let lowered = question.to_lowercase();
        if lowered.contains("risk") {
            ComplianceTopic::RiskFactors
        } else if lowered.contains("financial") || lowered.contains("reporting") {
            ComplianceTopic::FinancialReporting
        } else {
            ComplianceTopic::General
        }
    }

    pub fn report(&self) -> Report {
        let (kind, title, body, footnotes) = match self {
            ComplianceTopic::RiskFactors => (
                ReportKind::RiskFactors,
                "Risk Factor Compliance Analysis",
                RISK_FACTORS_BODY,
                RISK_FACTORS_FOOTNOTES,
            ),
            ComplianceTopic::FinancialReporting => (
                ReportKind::FinancialReporting,
                "Financial Reporting Compliance Analysis",
                FINANCIAL_REPORTING_BODY,
                FINANCIAL_REPORTING_FOOTNOTES,
            ),
            ComplianceTopic::General => (
                ReportKind::GeneralCompliance,
                "General Compliance Review",
                GENERAL_BODY,
                GENERAL_FOOTNOTES,
            ),
        };
        Report {
            kind,
            title: title.to_string(),
            body: body.to_string(),
            footnotes: footnotes.iter().map(|f| f.to_string()).collect(),
        }
    }
}

const RISK_FACTORS_BODY: &str = r#"## Risk Factor Compliance Analysis

Based on the document provided, I've analyzed the risk factor disclosures:

### Compliance Status: ✅ Mostly Compliant

The risk factors section generally meets SEC requirements under Item 1A of Form 10-K, but has the following issues:

1. **Specificity Improvement Needed**: Some risk factors are too generic and should be tailored to the company's specific circumstances^fn1^
2. **Quantification Missing**: Financial impacts of risks are not adequately quantified where possible^fn2^
3. **Prioritization Required**: Risk factors should be presented in order of materiality

### Recommendations

1. Add specific examples of how each risk factor could impact operations
2. Where possible, include quantitative assessments of potential financial impacts
3. Reorganize risk factors to present the most material risks first
4. Add a section addressing emerging cybersecurity risks as per recent SEC guidance"#;

const RISK_FACTORS_FOOTNOTES: &[&str] = &[
    "SEC Regulation S-K Item 105 requires clear organization and specificity in risk factors.",
    "Recent SEC comment letters indicate increased focus on quantification of risk impacts.",
];

const FINANCIAL_REPORTING_BODY: &str = r#"## Financial Reporting Compliance Analysis

Based on my review of the financial disclosures:

### Compliance Status: ✅ Compliant

The financial statements appear to comply with Regulation S-X requirements, with:

1. **Proper Presentation**: Balance sheet, income statement, and cash flow statement follow required formats^fn1^
2. **Footnote Disclosures**: Adequate footnotes explaining accounting policies and material items
3. **MD&A Sections**: Management Discussion & Analysis provides sufficient analysis of financial conditions^fn2^

### Recommendations

1. Consider enhanced segment reporting to provide more granular performance metrics
2. Expand liquidity discussion to include more forward-looking analysis
3. Include a more detailed breakdown of revenue sources in line with recent SEC comment letter trends"#;

const FINANCIAL_REPORTING_FOOTNOTES: &[&str] = &[
    "Regulation S-X Rules 5-02 and 5-03 govern balance sheet and income statement presentations.",
    "SEC Release No. 33-10890 provides updated guidance on MD&A requirements.",
];

const GENERAL_BODY: &str = r#"## General Compliance Review

Based on my analysis of the document:

### Compliance Status: ✅ Generally Compliant

The filing generally complies with SEC requirements, but attention should be paid to:

1. **Forward-Looking Statements**: Ensure all forward-looking statements are properly identified and accompanied by meaningful cautionary language^fn1^
2. **Non-GAAP Measures**: Verify all non-GAAP financial measures are reconciled to the most directly comparable GAAP measure
3. **Disclosure Controls**: Enhance the discussion of disclosure controls and procedures^fn2^

### Recommendations

1. Update the Safe Harbor statement to reflect the latest SEC guidance
2. Provide more specific discussion of how management evaluates disclosure controls
3. Review recent SEC comment letters in your industry for emerging disclosure trends"#;

const GENERAL_FOOTNOTES: &[&str] = &[
    "Securities Act Section 27A and Exchange Act Section 21E provide safe harbor for forward-looking statements.",
    "Item 307 of Regulation S-K requires disclosure of management's conclusions regarding effectiveness of disclosure controls.",
];

/// One question and, once it arrives, its response
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceExchange {
    pub question: String,
    pub response: Option<Report>,
    pub asked_at: DateTime<Utc>,
    #[serde(skip)]
    token: RequestToken,
}

/// Questions asked this session, most recent first
#[derive(Debug, Clone, Default)]
pub struct QuestionHistory {
    entries: VecDeque<ComplianceExchange>,
}

impl QuestionHistory {
    fn push(&mut self, question: String, token: RequestToken) {
        self.entries.push_front(ComplianceExchange {
            question,
            response: None,
            asked_at: Utc::now(),
            token,
        });
        self.entries.truncate(MAX_HISTORY);
    }

    fn answer(&mut self, token: RequestToken, report: Report) {
        if let Some(exchange) = self.entries.iter_mut().find(|e| e.token == token) {
            exchange.response = Some(report);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exchanges(&self) -> impl Iterator<Item = &ComplianceExchange> {
        self.entries.iter()
    }

    /// The questions shown under "Recent Questions"
    pub fn recent(&self) -> Vec<&str> {
        self.entries
            .iter()
            .take(VISIBLE_HISTORY)
            .map(|e| e.question.as_str())
            .collect()
    }
}

/// An accepted ask, ready to hand to the provider
#[derive(Debug, Clone)]
pub struct ComplianceAsk {
    pub token: RequestToken,
    pub superseded: Option<RequestToken>,
    pub question: String,
    pub primary_text: String,
}

/// State of the compliance page
#[derive(Debug, Clone)]
pub struct ComplianceDesk {
    primary_text: String,
    question: String,
    filing_type: FilingType,
    show_preview: bool,
    history: QuestionHistory,
    slot: RequestSlot<Report>,
    store_generation: u64,
}

impl ComplianceDesk {
    /// Read the primary text from the store, or send the user to upload
    pub fn mount(store: &DocumentStore) -> Result<Self, PageRedirect> {
        let Some(primary) = store.primary_text() else {
            info!("Compliance page has no primary document, redirecting to upload");
            return Err(PageRedirect::to_upload(NO_DOCUMENT_NOTICE));
        };
        Ok(Self {
            primary_text: primary.to_string(),
            question: String::new(),
            filing_type: FilingType::Form10K,
            show_preview: false,
            history: QuestionHistory::default(),
            slot: RequestSlot::new(),
            store_generation: store.generation(),
        })
    }

    pub fn is_current(&self, store: &DocumentStore) -> bool {
        self.store_generation == store.generation()
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Only the filing types the compliance page lists are accepted
    pub fn set_filing_type(&mut self, filing_type: FilingType) -> Result<(), ValidationError> {
        if !COMPLIANCE_FILING_TYPES.contains(&filing_type) {
            return Err(ValidationError::UnsupportedFilingType(filing_type));
        }
        self.filing_type = filing_type;
        Ok(())
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.show_preview = !self.show_preview;
        self.show_preview
    }

    pub fn can_ask(&self) -> bool {
        !self.slot.is_pending()
            && !self.question.trim().is_empty()
            && !self.primary_text.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_pending()
    }

    /// Validate the question and claim the request slot.
    ///
    /// `question` replaces the draft, but only once it passes validation.
    /// The question goes to the front of the history immediately.
    pub fn begin_ask(&mut self, question: Option<String>) -> Result<ComplianceAsk, ValidationError> {
        let question = question.unwrap_or_else(|| self.question.clone());
        if question.trim().is_empty() {
            return Err(ValidationError::BlankQuestion);
        }
        if self.primary_text.is_empty() {
            return Err(ValidationError::MissingComplianceDocument);
        }
        self.question = question;
        let (token, superseded) = self.slot.begin();
        self.history.push(self.question.clone(), token);
        debug!("Compliance question {} queued", token.value());
        Ok(ComplianceAsk {
            token,
            superseded,
            question: self.question.clone(),
            primary_text: self.primary_text.clone(),
        })
    }

    pub fn finish_ask(
        &mut self,
        token: RequestToken,
        result: Result<Report, AnalysisError>,
    ) -> SlotOutcome {
        if let Ok(report) = &result {
            if self.slot.owns(token) {
                self.history.answer(token, report.clone());
            }
        }
        let outcome = self.slot.complete(token, result);
        if outcome == SlotOutcome::Applied {
            self.question.clear();
        }
        outcome
    }

    pub fn response(&self) -> Option<&Report> {
        self.slot.value()
    }

    pub fn history(&self) -> &QuestionHistory {
        &self.history
    }

    pub fn view(&self) -> ComplianceView {
        ComplianceView {
            filing_type: self.filing_type,
            primary_text: self.show_preview.then(|| self.primary_text.clone()),
            show_preview: self.show_preview,
            question: self.question.clone(),
            suggested_questions: SUGGESTED_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            recent_questions: self.history.recent().into_iter().map(String::from).collect(),
            is_loading: self.is_loading(),
            can_ask: self.can_ask(),
            response: self.response().map(|r| r.rendered_body()),
            footnotes: self.response().map(|r| r.footnotes.clone()),
            error: self.slot.error().map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceView {
    pub filing_type: FilingType,
    /// Only present while the preview is open
    pub primary_text: Option<String>,
    pub show_preview: bool,
    pub question: String,
    pub suggested_questions: Vec<String>,
    pub recent_questions: Vec<String>,
    pub is_loading: bool,
    pub can_ask: bool,
    pub response: Option<String>,
    pub footnotes: Option<Vec<String>>,
    pub error: Option<String>,
}

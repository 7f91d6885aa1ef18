//! Error types for the filings workflow
//!
//! Every variant is a user-facing notice. None of them is fatal and none
//! of them changes state that was in place before the failing call.

use thiserror::Error;

use crate::routing::PageRedirect;
use crate::types::FilingType;

/// File intake rejections
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please upload a valid document file (PDF, TXT, DOC, DOCX)")]
    UnsupportedType(String),

    #[error("File size exceeds 20MB limit")]
    TooLarge { byte_size: u64, limit: u64 },

    #[error("Please upload a file first")]
    NoFile,
}

/// Input and precondition failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter some text to process")]
    BlankPaste,

    #[error("Please complete all peer filing fields")]
    IncompletePeerSelection { missing: Vec<&'static str> },

    #[error("Please extract text before continuing")]
    NothingExtracted,

    #[error("Both primary and peer documents are required for benchmarking")]
    MissingBenchmarkDocuments,

    #[error("Please enter a question")]
    BlankQuestion,

    #[error("No document found for compliance review")]
    MissingComplianceDocument,

    #[error("Please choose a 10-K or 10-Q filing type for compliance review")]
    UnsupportedFilingType(FilingType),
}

/// Failures reported by an analysis provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Analysis service unavailable: {0}")]
    Unavailable(String),

    #[error("Analysis rejected input: {0}")]
    Rejected(String),
}

/// Any failure surfaced by the workflow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilingsError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("{}", .0.notice)]
    Redirect(PageRedirect),
}

pub type Result<T> = std::result::Result<T, FilingsError>;

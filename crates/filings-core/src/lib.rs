//! Filings Lens core
//!
//! Domain model for the document workflow: file intake, extraction of
//! primary and peer filings, peer benchmarking and compliance questions.
//! Analysis sits behind [`AnalysisProvider`]; the shipped
//! [`MockAnalysisProvider`] answers with fixed reports after fixed delays.
//!
//! Page state lives in a [`SessionHandle`] per browser session:
//!
//! - [`UploadWorkflow`] - intake, extraction requests, "continue"
//! - [`BenchmarkingDesk`] - peer comparison runs
//! - [`ComplianceDesk`] - questions, history and responses

pub mod benchmarking;
pub mod catalog;
pub mod compliance;
pub mod error;
pub mod intake;
pub mod mock;
pub mod provider;
pub mod report;
pub mod routing;
pub mod session;
pub mod slot;
pub mod store;
pub mod types;
pub mod upload;

pub use benchmarking::{BenchmarkingDesk, BenchmarkingView};
pub use compliance::{ComplianceDesk, ComplianceTopic, ComplianceView};
pub use error::{AnalysisError, FilingsError, IntakeError, ValidationError};
pub use mock::{Latencies, MockAnalysisProvider};
pub use provider::{AnalysisProvider, ExtractionInput};
pub use report::{Report, ReportKind};
pub use routing::{PageRedirect, Route};
pub use session::SessionHandle;
pub use slot::RequestToken;
pub use types::{
    DocumentFormat, DocumentOrigin, ExtractedDocument, FilingType, InputMode, PeerSelection,
    UploadTab, UploadedFile, MAX_UPLOAD_BYTES,
};
pub use upload::{UploadView, UploadWorkflow};

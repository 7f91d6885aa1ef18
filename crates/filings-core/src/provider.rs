//! The analysis capability behind extraction, benchmarking and compliance
//!
//! [`MockAnalysisProvider`](crate::mock::MockAnalysisProvider) is the only
//! implementation shipped. A client for a real analysis service would be
//! another implementation of the same trait.

use async_trait::async_trait;

use crate::error::{AnalysisError, ValidationError};
use crate::report::Report;
use crate::types::{DocumentOrigin, ExtractedDocument, PeerSelection, UploadedFile};

/// Raw input to the extraction stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionInput {
    File(UploadedFile),
    Paste(String),
    Peer(PeerSelection),
}

impl ExtractionInput {
    pub fn origin(&self) -> DocumentOrigin {
        match self {
            ExtractionInput::File(_) => DocumentOrigin::File,
            ExtractionInput::Paste(_) => DocumentOrigin::Paste,
            ExtractionInput::Peer(_) => DocumentOrigin::PeerSelection,
        }
    }

    /// Input checks that must pass before any request is issued.
    ///
    /// File inputs are checked at intake, so they always pass here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ExtractionInput::File(_) => Ok(()),
            ExtractionInput::Paste(text) if text.trim().is_empty() => {
                Err(ValidationError::BlankPaste)
            }
            ExtractionInput::Paste(_) => Ok(()),
            ExtractionInput::Peer(selection) => {
                let missing = selection.missing_fields();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(ValidationError::IncompletePeerSelection { missing })
                }
            }
        }
    }
}

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short name for logs and the health endpoint
    fn name(&self) -> &str;

    async fn extract(&self, input: ExtractionInput) -> Result<ExtractedDocument, AnalysisError>;

    async fn benchmark(&self, primary: &str, peer: &str) -> Result<Report, AnalysisError>;

    async fn answer_compliance(
        &self,
        primary: &str,
        question: &str,
    ) -> Result<Report, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_paste_fails_validation() {
        for text in ["", "   ", "\n\t "] {
            assert_eq!(
                ExtractionInput::Paste(text.to_string()).validate(),
                Err(ValidationError::BlankPaste)
            );
        }
        assert!(ExtractionInput::Paste("Revenue rose".into()).validate().is_ok());
    }

    #[test]
    fn test_peer_validation_lists_missing_fields() {
        let selection = PeerSelection {
            company: "meta".into(),
            ..PeerSelection::default()
        };
        assert_eq!(
            ExtractionInput::Peer(selection).validate(),
            Err(ValidationError::IncompletePeerSelection {
                missing: vec!["report_id", "section", "focus_style"]
            })
        );
    }
}

//! Simulated analysis: fixed output after a fixed delay
//!
//! Input content never influences the output. Only the compliance
//! question's keywords pick which template comes back.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::benchmarking::benchmark_report;
use crate::compliance::ComplianceTopic;
use crate::error::AnalysisError;
use crate::provider::{AnalysisProvider, ExtractionInput};
use crate::report::Report;
use crate::types::ExtractedDocument;

pub const FILE_PLACEHOLDER: &str = "This is simulated extracted text from your financial filing. The AI has processed your document and extracted the relevant information for analysis.";

pub const PASTE_PLACEHOLDER: &str = "This is simulated extracted text from your pasted content. The AI has processed your text and extracted the relevant information for analysis.";

pub const PEER_PLACEHOLDER: &str = "This is simulated extracted text from the peer filing. The AI has processed the requested document and extracted the relevant information for comparison.";

/// Simulated processing time per stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latencies {
    pub extraction: Duration,
    pub peer_extraction: Duration,
    pub benchmark: Duration,
    pub compliance: Duration,
}

impl Default for Latencies {
    fn default() -> Self {
        Self {
            extraction: Duration::from_millis(1500),
            peer_extraction: Duration::from_millis(1500),
            benchmark: Duration::from_millis(3000),
            compliance: Duration::from_millis(2500),
        }
    }
}

impl Latencies {
    pub fn none() -> Self {
        Self {
            extraction: Duration::ZERO,
            peer_extraction: Duration::ZERO,
            benchmark: Duration::ZERO,
            compliance: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockAnalysisProvider {
    latencies: Latencies,
}

impl MockAnalysisProvider {
    pub fn new(latencies: Latencies) -> Self {
        Self { latencies }
    }
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl AnalysisProvider for MockAnalysisProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, input: ExtractionInput) -> Result<ExtractedDocument, AnalysisError> {
        input
            .validate()
            .map_err(|e| AnalysisError::Rejected(e.to_string()))?;

        let (delay, text) = match &input {
            ExtractionInput::File(file) => {
                debug!("Simulating extraction of {}", file.name);
                (self.latencies.extraction, FILE_PLACEHOLDER)
            }
            ExtractionInput::Paste(_) => (self.latencies.extraction, PASTE_PLACEHOLDER),
            ExtractionInput::Peer(selection) => {
                debug!(
                    "Simulating peer extraction: {} {} {}",
                    selection.company, selection.report_id, selection.section
                );
                (self.latencies.peer_extraction, PEER_PLACEHOLDER)
            }
        };
        simulate(delay).await;

        Ok(ExtractedDocument {
            text: text.to_string(),
            origin: input.origin(),
        })
    }

    async fn benchmark(&self, _primary: &str, _peer: &str) -> Result<Report, AnalysisError> {
        simulate(self.latencies.benchmark).await;
        Ok(benchmark_report())
    }

    async fn answer_compliance(
        &self,
        _primary: &str,
        question: &str,
    ) -> Result<Report, AnalysisError> {
        let topic = ComplianceTopic::classify(question);
        debug!("Compliance question classified as {:?}", topic);
        simulate(self.latencies.compliance).await;
        Ok(topic.report())
    }
}

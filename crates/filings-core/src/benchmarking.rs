//! Peer benchmarking page model and the fixed comparison report

use serde::Serialize;
use tracing::info;

use crate::error::{AnalysisError, ValidationError};
use crate::report::{Report, ReportKind};
use crate::routing::PageRedirect;
use crate::slot::{RequestSlot, RequestToken, SlotOutcome};
use crate::store::DocumentStore;

pub const NO_DOCUMENTS_NOTICE: &str = "No documents found. Please upload documents first.";

const BENCHMARK_BODY: &str = r#"## Peer Benchmarking Analysis

### Key Financial Metrics Comparison
- **Revenue Growth**: Your company shows a 15% YoY growth versus the peer's 12%^fn1^
- **Profit Margin**: 8.5% versus peer's 10.2%
- **Operating Expenses**: 42% of revenue versus peer's 38%
- **R&D Investment**: 14% of revenue versus peer's 16%

### Risk Assessment
Your company has identified fewer regulatory risks compared to peer, but has more exposure to supply chain disruptions.^fn2^

### Strategic Positioning
Your company is more focused on domestic market expansion, while the peer is aggressively pursuing international markets.

### Recommendations
1. Consider increasing R&D investment to maintain competitive edge
2. Explore supply chain diversification strategies
3. Evaluate international expansion opportunities based on peer success model"#;

const BENCHMARK_FOOTNOTES: &[&str] = &[
    "Growth and margin figures are drawn from the income statements of the most recent annual filings.",
    "Risk comparison is based on the Item 1A risk factor disclosures of both filings.",
];

pub fn benchmark_report() -> Report {
    Report {
        kind: ReportKind::PeerBenchmark,
        title: "Peer Benchmarking Analysis".to_string(),
        body: BENCHMARK_BODY.to_string(),
        footnotes: BENCHMARK_FOOTNOTES.iter().map(|f| f.to_string()).collect(),
    }
}

/// An accepted run, ready to hand to the provider
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub token: RequestToken,
    pub superseded: Option<RequestToken>,
    pub primary_text: String,
    pub peer_text: String,
}

#[derive(Debug, Clone)]
pub struct BenchmarkingDesk {
    primary_text: String,
    peer_text: String,
    slot: RequestSlot<Report>,
    store_generation: u64,
}

impl BenchmarkingDesk {
    /// Mounts with whatever text exists; redirects only when both are missing
    pub fn mount(store: &DocumentStore) -> Result<Self, PageRedirect> {
        let primary = store.primary_text();
        let peer = store.peer_text();
        if primary.is_none() && peer.is_none() {
            info!("Benchmarking page has no documents, redirecting to upload");
            return Err(PageRedirect::to_upload(NO_DOCUMENTS_NOTICE));
        }
        Ok(Self {
            primary_text: primary.unwrap_or_default().to_string(),
            peer_text: peer.unwrap_or_default().to_string(),
            slot: RequestSlot::new(),
            store_generation: store.generation(),
        })
    }

    pub fn is_current(&self, store: &DocumentStore) -> bool {
        self.store_generation == store.generation()
    }

    pub fn has_documents(&self) -> bool {
        !self.primary_text.is_empty() && !self.peer_text.is_empty()
    }

    pub fn can_run(&self) -> bool {
        self.has_documents() && !self.slot.is_pending()
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_pending()
    }

    pub fn begin_run(&mut self) -> Result<BenchmarkRun, ValidationError> {
        if !self.has_documents() {
            return Err(ValidationError::MissingBenchmarkDocuments);
        }
        let (token, superseded) = self.slot.begin();
        Ok(BenchmarkRun {
            token,
            superseded,
            primary_text: self.primary_text.clone(),
            peer_text: self.peer_text.clone(),
        })
    }

    pub fn finish_run(
        &mut self,
        token: RequestToken,
        result: Result<Report, AnalysisError>,
    ) -> SlotOutcome {
        self.slot.complete(token, result)
    }

    pub fn report(&self) -> Option<&Report> {
        self.slot.value()
    }

    pub fn view(&self) -> BenchmarkingView {
        BenchmarkingView {
            primary_text: (!self.primary_text.is_empty()).then(|| self.primary_text.clone()),
            peer_text: (!self.peer_text.is_empty()).then(|| self.peer_text.clone()),
            is_loading: self.is_loading(),
            can_run: self.can_run(),
            report: self.report().map(|r| r.rendered_body()),
            footnotes: self.report().map(|r| r.footnotes.clone()),
            error: self.slot.error().map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkingView {
    pub primary_text: Option<String>,
    pub peer_text: Option<String>,
    pub is_loading: bool,
    pub can_run: bool,
    pub report: Option<String>,
    pub footnotes: Option<Vec<String>>,
    pub error: Option<String>,
}

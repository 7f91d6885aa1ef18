//! Per-browser application state and stage orchestration
//!
//! A [`SessionHandle`] owns the document store and every page model behind
//! one async mutex. Stage methods validate and claim their slot while the
//! lock is held, then spawn the provider call. The spawned task re-locks to
//! hand its result back; the slot drops it if a newer request took over.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::benchmarking::{BenchmarkingDesk, BenchmarkingView};
use crate::compliance::{ComplianceDesk, ComplianceView};
use crate::error::{AnalysisError, FilingsError, Result};
use crate::provider::AnalysisProvider;
use crate::routing::{PageRedirect, Route};
use crate::slot::{RequestToken, SlotOutcome};
use crate::store::DocumentStore;
use crate::types::{FilingType, InputMode, PeerSelection, UploadTab, UploadedFile};
use crate::upload::{ExtractionRequest, ExtractionTarget, UploadView, UploadWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Stage {
    PrimaryExtraction,
    PeerExtraction,
    Benchmark,
    Compliance,
}

impl From<ExtractionTarget> for Stage {
    fn from(target: ExtractionTarget) -> Self {
        match target {
            ExtractionTarget::Primary => Stage::PrimaryExtraction,
            ExtractionTarget::Peer => Stage::PeerExtraction,
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    store: DocumentStore,
    upload: UploadWorkflow,
    benchmarking: Option<BenchmarkingDesk>,
    compliance: Option<ComplianceDesk>,
    tasks: HashMap<Stage, AbortHandle>,
}

impl Session {
    fn abort(&mut self, stage: Stage) {
        if let Some(task) = self.tasks.remove(&stage) {
            task.abort();
        }
    }

    /// Reuse the mounted page unless the store changed underneath it
    fn benchmarking(&mut self) -> std::result::Result<&mut BenchmarkingDesk, PageRedirect> {
        match self.benchmarking.take() {
            Some(desk) if desk.is_current(&self.store) => Ok(self.benchmarking.insert(desk)),
            stale => {
                if stale.is_some() {
                    self.abort(Stage::Benchmark);
                }
                let desk = BenchmarkingDesk::mount(&self.store)?;
                Ok(self.benchmarking.insert(desk))
            }
        }
    }

    fn compliance(&mut self) -> std::result::Result<&mut ComplianceDesk, PageRedirect> {
        match self.compliance.take() {
            Some(desk) if desk.is_current(&self.store) => Ok(self.compliance.insert(desk)),
            stale => {
                if stale.is_some() {
                    self.abort(Stage::Compliance);
                }
                let desk = ComplianceDesk::mount(&self.store)?;
                Ok(self.compliance.insert(desk))
            }
        }
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
    provider: Arc<dyn AnalysisProvider>,
}

impl SessionHandle {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Session::default())),
            provider,
        }
    }

    /// Run the provider call off the lock and apply its result afterwards
    fn spawn<T, W, A>(&self, session: &mut Session, stage: Stage, work: W, apply: A)
    where
        T: Send + 'static,
        W: Future<Output = std::result::Result<T, AnalysisError>> + Send + 'static,
        A: FnOnce(&mut Session, std::result::Result<T, AnalysisError>) -> SlotOutcome
            + Send
            + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = work.await;
            if let Err(err) = &result {
                warn!("{:?} failed: {}", stage, err);
            }
            let mut session = inner.lock().await;
            if apply(&mut session, result) == SlotOutcome::Stale {
                debug!("{:?} result arrived after being replaced", stage);
            }
        });
        if let Some(previous) = session.tasks.insert(stage, task.abort_handle()) {
            previous.abort();
        }
    }

    // Upload page

    pub async fn upload_view(&self) -> UploadView {
        self.inner.lock().await.upload.view()
    }

    pub async fn accept_file(&self, file: UploadedFile) -> Result<UploadedFile> {
        let mut session = self.inner.lock().await;
        Ok(session.upload.accept_file(file)?)
    }

    pub async fn remove_file(&self) -> Option<UploadedFile> {
        self.inner.lock().await.upload.remove_file()
    }

    pub async fn set_tab(&self, tab: UploadTab) {
        self.inner.lock().await.upload.set_tab(tab);
    }

    pub async fn set_input_mode(&self, mode: InputMode) {
        self.inner.lock().await.upload.set_input_mode(mode);
    }

    pub async fn set_upload_filing_type(&self, filing_type: FilingType) {
        self.inner.lock().await.upload.set_filing_type(filing_type);
    }

    pub async fn set_focus_style(&self, focus_style: String) {
        self.inner.lock().await.upload.set_focus_style(focus_style);
    }

    pub async fn extract_file(&self) -> Result<RequestToken> {
        let mut session = self.inner.lock().await;
        let request = session.upload.begin_file_extraction()?;
        Ok(self.start_extraction(&mut session, request))
    }

    pub async fn extract_paste(&self, text: String) -> Result<RequestToken> {
        let mut session = self.inner.lock().await;
        let request = session.upload.begin_paste_extraction(text)?;
        Ok(self.start_extraction(&mut session, request))
    }

    pub async fn extract_peer(&self, selection: PeerSelection) -> Result<RequestToken> {
        let mut session = self.inner.lock().await;
        let request = session.upload.begin_peer_extraction(selection)?;
        Ok(self.start_extraction(&mut session, request))
    }

    fn start_extraction(&self, session: &mut Session, request: ExtractionRequest) -> RequestToken {
        let ExtractionRequest {
            target,
            token,
            input,
            ..
        } = request;
        info!("Extraction started for {:?} ({:?})", target, input.origin());
        let provider = Arc::clone(&self.provider);
        self.spawn(
            session,
            target.into(),
            async move { provider.extract(input).await },
            move |session, result| session.upload.finish_extraction(target, token, result),
        );
        token
    }

    pub async fn continue_to_analysis(&self) -> Result<Route> {
        let mut session = self.inner.lock().await;
        let Session { store, upload, .. } = &mut *session;
        Ok(upload.continue_to_analysis(store)?)
    }

    // Benchmarking page

    pub async fn benchmarking_view(&self) -> std::result::Result<BenchmarkingView, PageRedirect> {
        let mut session = self.inner.lock().await;
        Ok(session.benchmarking()?.view())
    }

    pub async fn run_benchmark(&self) -> Result<RequestToken> {
        let mut session = self.inner.lock().await;
        let run = session
            .benchmarking()
            .map_err(FilingsError::Redirect)?
            .begin_run()?;
        info!("Peer benchmarking started ({})", run.token.value());

        let provider = Arc::clone(&self.provider);
        let token = run.token;
        self.spawn(
            &mut session,
            Stage::Benchmark,
            async move { provider.benchmark(&run.primary_text, &run.peer_text).await },
            move |session, result| match session.benchmarking.as_mut() {
                Some(desk) => desk.finish_run(token, result),
                None => SlotOutcome::Stale,
            },
        );
        Ok(token)
    }

    // Compliance page

    pub async fn compliance_view(&self) -> std::result::Result<ComplianceView, PageRedirect> {
        let mut session = self.inner.lock().await;
        Ok(session.compliance()?.view())
    }

    pub async fn set_question(&self, question: String) -> Result<()> {
        let mut session = self.inner.lock().await;
        session
            .compliance()
            .map_err(FilingsError::Redirect)?
            .set_question(question);
        Ok(())
    }

    pub async fn set_compliance_filing_type(&self, filing_type: FilingType) -> Result<()> {
        let mut session = self.inner.lock().await;
        session
            .compliance()
            .map_err(FilingsError::Redirect)?
            .set_filing_type(filing_type)?;
        Ok(())
    }

    pub async fn toggle_preview(&self) -> Result<bool> {
        let mut session = self.inner.lock().await;
        Ok(session
            .compliance()
            .map_err(FilingsError::Redirect)?
            .toggle_preview())
    }

    /// Ask the drafted question, or `question` if one is given
    pub async fn ask_compliance(&self, question: Option<String>) -> Result<RequestToken> {
        let mut session = self.inner.lock().await;
        let ask = session
            .compliance()
            .map_err(FilingsError::Redirect)?
            .begin_ask(question)?;
        info!("Compliance question asked ({})", ask.token.value());

        let provider = Arc::clone(&self.provider);
        let token = ask.token;
        self.spawn(
            &mut session,
            Stage::Compliance,
            async move {
                provider
                    .answer_compliance(&ask.primary_text, &ask.question)
                    .await
            },
            move |session, result| match session.compliance.as_mut() {
                Some(desk) => desk.finish_ask(token, result),
                None => SlotOutcome::Stale,
            },
        );
        Ok(token)
    }
}

//! Upload page model: intake, extraction requests and "continue"

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AnalysisError, FilingsError, IntakeError, ValidationError};
use crate::intake::FileIntake;
use crate::provider::ExtractionInput;
use crate::routing::Route;
use crate::slot::{RequestSlot, RequestToken, SlotOutcome};
use crate::store::{DocumentStore, PEER_TEXT_KEY, PRIMARY_TEXT_KEY};
use crate::types::{ExtractedDocument, FilingType, InputMode, PeerSelection, UploadTab, UploadedFile};

/// Which extracted document a request fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTarget {
    Primary,
    Peer,
}

/// An accepted extraction, ready to hand to the provider
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub target: ExtractionTarget,
    pub token: RequestToken,
    pub superseded: Option<RequestToken>,
    pub input: ExtractionInput,
}

#[derive(Debug, Clone, Default)]
pub struct UploadWorkflow {
    filing_type: Option<FilingType>,
    tab: UploadTab,
    input_mode: InputMode,
    intake: FileIntake,
    pasted_text: String,
    peer_selection: PeerSelection,
    primary: RequestSlot<ExtractedDocument>,
    peer: RequestSlot<ExtractedDocument>,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept_file(&mut self, file: UploadedFile) -> Result<UploadedFile, IntakeError> {
        self.intake.accept(file).cloned()
    }

    pub fn remove_file(&mut self) -> Option<UploadedFile> {
        self.intake.remove()
    }

    pub fn current_file(&self) -> Option<&UploadedFile> {
        self.intake.current()
    }

    pub fn set_tab(&mut self, tab: UploadTab) {
        self.tab = tab;
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn set_filing_type(&mut self, filing_type: FilingType) {
        self.filing_type = Some(filing_type);
    }

    /// Focus style is shared between the primary and peer forms
    pub fn set_focus_style(&mut self, focus_style: impl Into<String>) {
        self.peer_selection.focus_style = focus_style.into();
    }

    pub fn begin_file_extraction(&mut self) -> Result<ExtractionRequest, FilingsError> {
        let file = self.intake.current().cloned().ok_or(IntakeError::NoFile)?;
        Ok(self.begin(ExtractionTarget::Primary, ExtractionInput::File(file)))
    }

    /// Extract pasted text. The form keeps its previous text and mode
    /// unless `text` is accepted.
    pub fn begin_paste_extraction(
        &mut self,
        text: impl Into<String>,
    ) -> Result<ExtractionRequest, FilingsError> {
        let text = text.into();
        let input = ExtractionInput::Paste(text.clone());
        input.validate()?;
        self.input_mode = InputMode::Text;
        self.pasted_text = text;
        Ok(self.begin(ExtractionTarget::Primary, input))
    }

    /// Extract a peer filing. A rejected selection leaves the form as it was.
    pub fn begin_peer_extraction(
        &mut self,
        selection: PeerSelection,
    ) -> Result<ExtractionRequest, FilingsError> {
        let input = ExtractionInput::Peer(selection.clone());
        input.validate()?;
        self.peer_selection = selection;
        Ok(self.begin(ExtractionTarget::Peer, input))
    }

    fn begin(&mut self, target: ExtractionTarget, input: ExtractionInput) -> ExtractionRequest {
        let (token, superseded) = self.slot_mut(target).begin();
        debug!("Extraction {} started for {:?}", token.value(), target);
        ExtractionRequest {
            target,
            token,
            superseded,
            input,
        }
    }

    pub fn finish_extraction(
        &mut self,
        target: ExtractionTarget,
        token: RequestToken,
        result: Result<ExtractedDocument, AnalysisError>,
    ) -> SlotOutcome {
        self.slot_mut(target).complete(token, result)
    }

    fn slot_mut(&mut self, target: ExtractionTarget) -> &mut RequestSlot<ExtractedDocument> {
        match target {
            ExtractionTarget::Primary => &mut self.primary,
            ExtractionTarget::Peer => &mut self.peer,
        }
    }

    pub fn is_extracting(&self, target: ExtractionTarget) -> bool {
        match target {
            ExtractionTarget::Primary => self.primary.is_pending(),
            ExtractionTarget::Peer => self.peer.is_pending(),
        }
    }

    pub fn primary_text(&self) -> Option<&str> {
        self.primary.value().map(|d| d.text.as_str())
    }

    pub fn peer_text(&self) -> Option<&str> {
        self.peer.value().map(|d| d.text.as_str())
    }

    pub fn can_continue(&self) -> bool {
        self.primary_text().is_some() || (self.peer_text().is_some() && self.tab == UploadTab::Peer)
    }

    /// Write both texts to the store and pick the analysis page.
    ///
    /// The store is written even when no route is available.
    pub fn continue_to_analysis(&self, store: &mut DocumentStore) -> Result<Route, ValidationError> {
        store.set(PRIMARY_TEXT_KEY, self.primary_text().unwrap_or_default());
        store.set(PEER_TEXT_KEY, self.peer_text().unwrap_or_default());

        let route = if self.tab == UploadTab::Peer && self.peer_text().is_some() {
            Route::Benchmarking
        } else if self.primary_text().is_some() {
            Route::Compliance
        } else {
            return Err(ValidationError::NothingExtracted);
        };
        info!("Continuing to {}", route.path());
        Ok(route)
    }

    pub fn view(&self) -> UploadView {
        UploadView {
            filing_type: self.filing_type,
            tab: self.tab,
            input_mode: self.input_mode,
            file: self.intake.current().cloned(),
            file_size: self.intake.current().map(|f| f.display_size()),
            pasted_text: self.pasted_text.clone(),
            peer_selection: self.peer_selection.clone(),
            primary_text: self.primary_text().map(String::from),
            peer_text: self.peer_text().map(String::from),
            extracting_primary: self.primary.is_pending(),
            extracting_peer: self.peer.is_pending(),
            can_continue: self.can_continue(),
            error: self
                .primary
                .error()
                .or_else(|| self.peer.error())
                .map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadView {
    pub filing_type: Option<FilingType>,
    pub tab: UploadTab,
    pub input_mode: InputMode,
    pub file: Option<UploadedFile>,
    pub file_size: Option<String>,
    pub pasted_text: String,
    pub peer_selection: PeerSelection,
    pub primary_text: Option<String>,
    pub peer_text: Option<String>,
    pub extracting_primary: bool,
    pub extracting_peer: bool,
    pub can_continue: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentOrigin;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn doc(text: &str, origin: DocumentOrigin) -> ExtractedDocument {
        ExtractedDocument {
            text: text.to_string(),
            origin,
        }
    }

    fn complete_selection() -> PeerSelection {
        PeerSelection {
            company: "microsoft".into(),
            report_id: "10K-2023".into(),
            section: "risk-factors".into(),
            focus_style: "risks".into(),
        }
    }

    #[test]
    fn test_file_extraction_requires_accepted_file() {
        let mut upload = UploadWorkflow::new();
        assert_eq!(
            upload.begin_file_extraction().unwrap_err(),
            FilingsError::Intake(IntakeError::NoFile)
        );
        upload
            .accept_file(UploadedFile::new("a.pdf", 10, "application/pdf"))
            .unwrap();
        let request = upload.begin_file_extraction().unwrap();
        assert_eq!(request.target, ExtractionTarget::Primary);
        assert!(upload.is_extracting(ExtractionTarget::Primary));
    }

    #[test]
    fn test_blank_paste_issues_no_request() {
        let mut upload = UploadWorkflow::new();
        upload.begin_paste_extraction("kept text").unwrap();
        upload.set_input_mode(InputMode::File);

        assert_eq!(
            upload.begin_paste_extraction("  \n ").unwrap_err(),
            FilingsError::Validation(ValidationError::BlankPaste)
        );
        let view = upload.view();
        assert_eq!(view.pasted_text, "kept text");
        assert_eq!(view.input_mode, InputMode::File);
    }

    #[test]
    fn test_rejected_peer_selection_keeps_previous_form() {
        let mut upload = UploadWorkflow::new();
        upload.begin_peer_extraction(complete_selection()).unwrap();

        let mut incomplete = complete_selection();
        incomplete.company = "apple".into();
        incomplete.focus_style = String::new();
        assert!(upload.begin_peer_extraction(incomplete).is_err());
        assert_eq!(upload.view().peer_selection, complete_selection());

        upload.set_focus_style("outlook");
        assert_eq!(upload.view().peer_selection.focus_style, "outlook");
    }

    #[test]
    fn test_continue_with_only_primary_goes_to_compliance() {
        let mut upload = UploadWorkflow::new();
        let mut store = DocumentStore::new();
        let request = upload.begin_paste_extraction("pasted filing").unwrap();
        upload.finish_extraction(
            request.target,
            request.token,
            Ok(doc("primary", DocumentOrigin::Paste)),
        );

        assert_eq!(upload.continue_to_analysis(&mut store), Ok(Route::Compliance));
        assert_eq!(store.get(PRIMARY_TEXT_KEY), Some("primary"));
        assert_eq!(store.get(PEER_TEXT_KEY), Some(""));
    }

    #[test]
    fn test_continue_on_peer_tab_goes_to_benchmarking() {
        let mut upload = UploadWorkflow::new();
        let mut store = DocumentStore::new();
        let request = upload.begin_peer_extraction(complete_selection()).unwrap();
        upload.finish_extraction(
            request.target,
            request.token,
            Ok(doc("peer", DocumentOrigin::PeerSelection)),
        );

        // Peer text alone only counts from the peer tab
        assert!(!upload.can_continue());
        assert_eq!(
            upload.continue_to_analysis(&mut store),
            Err(ValidationError::NothingExtracted)
        );

        upload.set_tab(UploadTab::Peer);
        assert!(upload.can_continue());
        assert_eq!(upload.continue_to_analysis(&mut store), Ok(Route::Benchmarking));
        assert_eq!(store.peer_text(), Some("peer"));
    }

    #[test]
    fn test_stale_extraction_does_not_overwrite() {
        let mut upload = UploadWorkflow::new();
        let first = upload.begin_paste_extraction("first").unwrap();
        let second = upload.begin_paste_extraction("second").unwrap();

        upload.finish_extraction(second.target, second.token, Ok(doc("new", DocumentOrigin::Paste)));
        let outcome =
            upload.finish_extraction(first.target, first.token, Ok(doc("old", DocumentOrigin::Paste)));
        assert_eq!(outcome, SlotOutcome::Stale);
        assert_eq!(upload.primary_text(), Some("new"));
    }

    proptest! {
        /// Property: peer extraction never starts with a blank field
        #[test]
        fn peer_extraction_requires_all_fields(
            company in "( |[a-z]{1,6})",
            report_id in "( |[a-z]{1,6})",
            section in "( |[a-z]{1,6})",
            focus_style in "( |[a-z]{1,6})",
        ) {
            let selection = PeerSelection { company, report_id, section, focus_style };
            let complete = selection.is_complete();
            let mut upload = UploadWorkflow::new();
            prop_assert_eq!(upload.begin_peer_extraction(selection).is_ok(), complete);
            prop_assert_eq!(upload.is_extracting(ExtractionTarget::Peer), complete);
        }
    }
}

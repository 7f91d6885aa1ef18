//! API handlers for the Filings Lens server
//!
//! Provides:
//! - Page views for `/`, `/upload`, `/benchmarking`, `/compliance`
//! - Upload endpoints (intake, extraction, continue)
//! - Benchmarking and compliance triggers
//! - Session creation, catalog and health

use axum::{extract::State, http::StatusCode, http::Uri, Json};
use filings_core::benchmarking::NO_DOCUMENTS_NOTICE;
use filings_core::catalog::{catalog, Catalog};
use filings_core::compliance::NO_DOCUMENT_NOTICE;
use filings_core::routing::Route;
use filings_core::{
    BenchmarkingView, ComplianceView, FilingType, InputMode, PageRedirect, PeerSelection,
    RequestToken, UploadTab, UploadView, UploadedFile,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ServerError;
use crate::sessions::CurrentSession;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub sessions: usize,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "filings-server",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name().to_string(),
        sessions: state.sessions.len().await,
    })
}

/// Handler: GET /api/catalog
pub async fn handle_catalog() -> Json<Catalog> {
    Json(catalog())
}

#[derive(Serialize)]
pub struct SessionCreatedResponse {
    pub success: bool,
    pub session_id: String,
}

/// Handler: POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let id = state.sessions.create(state.provider.clone()).await;
    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            success: true,
            session_id: id.to_string(),
        }),
    )
}

// ----------------------------------------------------------------------------
// Pages
// ----------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
}

#[derive(Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

#[derive(Serialize)]
pub struct LandingView {
    pub title: &'static str,
    pub tagline: &'static str,
    pub start: &'static str,
    pub features: Vec<FeatureCard>,
    pub navigation: Vec<NavLink>,
}

/// Handler: GET /
pub async fn handle_landing() -> Json<LandingView> {
    Json(LandingView {
        title: "AI-Powered Financial Document Analysis",
        tagline: "Extract insights, benchmark against peers, and ensure compliance from your financial filings",
        start: Route::Upload.path(),
        features: vec![
            FeatureCard {
                title: "Document Upload",
                description: "Upload or paste financial filings for AI-powered text extraction",
                route: Route::Upload.path(),
            },
            FeatureCard {
                title: "Peer Benchmarking",
                description: "Compare financial metrics against competitors in your industry",
                route: Route::Benchmarking.path(),
            },
            FeatureCard {
                title: "Compliance Review",
                description: "Ensure regulatory compliance with AI-powered document analysis",
                route: Route::Compliance.path(),
            },
        ],
        navigation: Route::navigation()
            .into_iter()
            .map(|(route, label)| NavLink {
                label,
                path: route.path(),
            })
            .collect(),
    })
}

/// Handler: GET /upload
pub async fn handle_upload_page(CurrentSession(session): CurrentSession) -> Json<UploadView> {
    Json(session.upload_view().await)
}

/// Handler: GET /benchmarking
///
/// Without a session there are no documents, so this redirects like an
/// empty store would.
pub async fn handle_benchmarking_page(
    session: Option<CurrentSession>,
) -> Result<Json<BenchmarkingView>, ServerError> {
    let Some(CurrentSession(session)) = session else {
        return Err(PageRedirect::to_upload(NO_DOCUMENTS_NOTICE).into());
    };
    Ok(Json(session.benchmarking_view().await?))
}

/// Handler: GET /compliance
pub async fn handle_compliance_page(
    session: Option<CurrentSession>,
) -> Result<Json<ComplianceView>, ServerError> {
    let Some(CurrentSession(session)) = session else {
        return Err(PageRedirect::to_upload(NO_DOCUMENT_NOTICE).into());
    };
    Ok(Json(session.compliance_view().await?))
}

/// Fallback for every unknown path
pub async fn handle_not_found(uri: Uri) -> ServerError {
    debug!("No page at {}", uri.path());
    ServerError::PageNotFound(uri.path().to_string())
}

// ----------------------------------------------------------------------------
// Upload
// ----------------------------------------------------------------------------

/// File reference chosen by the user. Only metadata crosses the wire.
#[derive(Deserialize)]
pub struct FileRequest {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
}

#[derive(Serialize)]
pub struct FileResponse {
    pub success: bool,
    pub message: &'static str,
    pub file: Option<UploadedFile>,
}

/// Handler: POST /api/upload/file
pub async fn handle_accept_file(
    CurrentSession(session): CurrentSession,
    Json(req): Json<FileRequest>,
) -> Result<Json<FileResponse>, ServerError> {
    info!("File selected: {} ({} bytes)", req.name, req.byte_size);
    let file = session
        .accept_file(UploadedFile::new(req.name, req.byte_size, req.mime_type))
        .await?;
    Ok(Json(FileResponse {
        success: true,
        message: "File uploaded successfully",
        file: Some(file),
    }))
}

/// Handler: DELETE /api/upload/file
pub async fn handle_remove_file(CurrentSession(session): CurrentSession) -> Json<FileResponse> {
    let removed = session.remove_file().await;
    Json(FileResponse {
        success: true,
        message: "File removed",
        file: removed,
    })
}

/// A stage request was accepted and is now running
#[derive(Serialize)]
pub struct StartedResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: RequestToken,
}

fn started(message: &'static str, token: RequestToken) -> (StatusCode, Json<StartedResponse>) {
    (
        StatusCode::ACCEPTED,
        Json(StartedResponse {
            success: true,
            message,
            token,
        }),
    )
}

/// Handler: POST /api/upload/extract
pub async fn handle_extract_file(
    CurrentSession(session): CurrentSession,
) -> Result<(StatusCode, Json<StartedResponse>), ServerError> {
    let token = session.extract_file().await?;
    Ok(started("Text extraction started", token))
}

#[derive(Deserialize)]
pub struct PasteRequest {
    #[serde(default)]
    pub text: String,
}

/// Handler: POST /api/upload/paste
pub async fn handle_extract_paste(
    CurrentSession(session): CurrentSession,
    Json(req): Json<PasteRequest>,
) -> Result<(StatusCode, Json<StartedResponse>), ServerError> {
    let token = session.extract_paste(req.text).await?;
    Ok(started("Text processing started", token))
}

/// Handler: POST /api/upload/peer
pub async fn handle_extract_peer(
    CurrentSession(session): CurrentSession,
    Json(selection): Json<PeerSelection>,
) -> Result<(StatusCode, Json<StartedResponse>), ServerError> {
    let token = session.extract_peer(selection).await?;
    Ok(started("Peer filing extraction started", token))
}

#[derive(Deserialize)]
pub struct TabRequest {
    pub tab: UploadTab,
}

/// Handler: PUT /api/upload/tab
pub async fn handle_set_tab(
    CurrentSession(session): CurrentSession,
    Json(req): Json<TabRequest>,
) -> Json<UploadView> {
    session.set_tab(req.tab).await;
    Json(session.upload_view().await)
}

#[derive(Deserialize)]
pub struct InputModeRequest {
    pub mode: InputMode,
}

/// Handler: PUT /api/upload/input-mode
pub async fn handle_set_input_mode(
    CurrentSession(session): CurrentSession,
    Json(req): Json<InputModeRequest>,
) -> Json<UploadView> {
    session.set_input_mode(req.mode).await;
    Json(session.upload_view().await)
}

#[derive(Deserialize)]
pub struct FocusStyleRequest {
    pub focus_style: String,
}

/// Handler: PUT /api/upload/focus-style
pub async fn handle_set_focus_style(
    CurrentSession(session): CurrentSession,
    Json(req): Json<FocusStyleRequest>,
) -> Json<UploadView> {
    session.set_focus_style(req.focus_style).await;
    Json(session.upload_view().await)
}

#[derive(Deserialize)]
pub struct FilingTypeRequest {
    pub filing_type: FilingType,
}

/// Handler: PUT /api/upload/filing-type
pub async fn handle_set_upload_filing_type(
    CurrentSession(session): CurrentSession,
    Json(req): Json<FilingTypeRequest>,
) -> Json<UploadView> {
    session.set_upload_filing_type(req.filing_type).await;
    Json(session.upload_view().await)
}

#[derive(Serialize)]
pub struct ContinueResponse {
    pub success: bool,
    pub redirect: &'static str,
}

/// Handler: POST /api/upload/continue
pub async fn handle_continue(
    CurrentSession(session): CurrentSession,
) -> Result<Json<ContinueResponse>, ServerError> {
    let route = session.continue_to_analysis().await?;
    Ok(Json(ContinueResponse {
        success: true,
        redirect: route.path(),
    }))
}

// ----------------------------------------------------------------------------
// Benchmarking
// ----------------------------------------------------------------------------

/// Handler: POST /api/benchmarking/run
pub async fn handle_run_benchmark(
    CurrentSession(session): CurrentSession,
) -> Result<(StatusCode, Json<StartedResponse>), ServerError> {
    let token = session.run_benchmark().await?;
    Ok(started("Peer benchmarking analysis started", token))
}

// ----------------------------------------------------------------------------
// Compliance
// ----------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: String,
}

/// Handler: PUT /api/compliance/question
pub async fn handle_set_question(
    CurrentSession(session): CurrentSession,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<ComplianceView>, ServerError> {
    session.set_question(req.question).await?;
    Ok(Json(session.compliance_view().await?))
}

#[derive(Deserialize)]
pub struct AskRequest {
    /// Overrides the drafted question when present
    pub question: Option<String>,
}

/// Handler: POST /api/compliance/ask
pub async fn handle_ask(
    CurrentSession(session): CurrentSession,
    req: Option<Json<AskRequest>>,
) -> Result<(StatusCode, Json<StartedResponse>), ServerError> {
    let question = req.and_then(|Json(r)| r.question);
    let token = session.ask_compliance(question).await?;
    Ok(started("Processing your compliance question", token))
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub show_preview: bool,
}

/// Handler: POST /api/compliance/preview
pub async fn handle_toggle_preview(
    CurrentSession(session): CurrentSession,
) -> Result<Json<PreviewResponse>, ServerError> {
    let show_preview = session.toggle_preview().await?;
    Ok(Json(PreviewResponse {
        success: true,
        show_preview,
    }))
}

/// Handler: PUT /api/compliance/filing-type
pub async fn handle_set_compliance_filing_type(
    CurrentSession(session): CurrentSession,
    Json(req): Json<FilingTypeRequest>,
) -> Result<Json<ComplianceView>, ServerError> {
    session.set_compliance_filing_type(req.filing_type).await?;
    Ok(Json(session.compliance_view().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_landing_lists_three_features() {
        let response = handle_landing().await;
        assert_eq!(response.features.len(), 3);
        assert_eq!(response.start, "/upload");
        assert_eq!(response.navigation[1].path, "/benchmarking");
    }

    #[tokio::test]
    async fn test_catalog_has_all_peer_companies() {
        let response = handle_catalog().await;
        assert_eq!(response.companies.len(), 5);
        assert_eq!(response.compliance_filing_types.len(), 2);
    }
}

//! Tests for the Filings Lens server API
//!
//! Test categories:
//! - Request body fuzzing for intake and peer selection
//! - HTTP endpoint tests through the full router
//! - Regression tests for whole workflows

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use filings_core::routing::Route;
    use filings_core::{ComplianceTopic, PeerSelection};

    fn known_path() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("/"),
            Just("/upload"),
            Just("/benchmarking"),
            Just("/compliance"),
        ]
    }

    proptest! {
        /// Property: known pages survive query strings and trailing slashes
        #[test]
        fn known_paths_resolve(path in known_path(), query in "[a-z]{0,8}") {
            let decorated = if path == "/" {
                format!("/?{}", query)
            } else {
                format!("{}/?{}", path, query)
            };
            let route = Route::from_path(&decorated);
            prop_assert_eq!(route.path(), path);
        }

        /// Property: anything outside the page set is a 404
        #[test]
        fn unknown_paths_not_found(segment in "[a-z]{3,12}") {
            prop_assume!(!["upload", "benchmarking", "compliance"].contains(&segment.as_str()));
            prop_assert_eq!(Route::from_path(&format!("/{}", segment)), Route::NotFound);
        }

        /// Property: any peer selection JSON with a blank field is incomplete
        #[test]
        fn peer_selection_with_blank_field_is_incomplete(
            company in "[a-z]{1,10}",
            section in "[a-z]{1,10}",
        ) {
            let selection: PeerSelection = serde_json::from_value(serde_json::json!({
                "company": company,
                "section": section,
                "focus_style": "financials",
            }))
            .unwrap();
            prop_assert!(!selection.is_complete());
            prop_assert_eq!(selection.missing_fields(), vec!["report_id"]);
        }

        /// Property: any question mentioning risk gets the risk template
        #[test]
        fn risk_questions_route_to_risk(prefix in "[a-zA-Z ]{0,20}", suffix in "[a-zA-Z ]{0,20}") {
            let question = format!("{}RISK{}", prefix, suffix);
            prop_assert_eq!(ComplianceTopic::classify(&question), ComplianceTopic::RiskFactors);
        }
    }
}

#[cfg(test)]
mod http_endpoint_tests {
    //! HTTP endpoint integration tests using axum-test

    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;

    use filings_core::mock::{FILE_PLACEHOLDER, PEER_PLACEHOLDER};
    use filings_core::{Latencies, MockAnalysisProvider};

    use crate::sessions::SESSION_HEADER;
    use crate::{router, AppState};

    /// Create a test server with the full router and an instant provider
    fn create_test_server() -> TestServer {
        let state = AppState::new(Arc::new(MockAnalysisProvider::new(Latencies::none())));
        TestServer::new(router(state)).unwrap()
    }

    async fn create_session(server: &TestServer) -> (HeaderName, HeaderValue) {
        let response = server.post("/api/sessions").await;
        response.assert_status(StatusCode::CREATED);
        let json = response.json::<serde_json::Value>();
        let id = json["session_id"].as_str().unwrap().to_string();
        (
            HeaderName::from_static(SESSION_HEADER),
            HeaderValue::from_str(&id).unwrap(),
        )
    }

    /// Background stages finish almost immediately with zero latency
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    async fn upload_pdf(server: &TestServer, name: &HeaderName, value: &HeaderValue) {
        server
            .post("/api/upload/file")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "name": "annual-report.pdf",
                "byte_size": 2 * 1024 * 1024,
                "mime_type": "application/pdf"
            }))
            .await
            .assert_status_ok();
        server
            .post("/api/upload/extract")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::ACCEPTED);
        settle().await;
    }

    #[tokio::test]
    async fn test_health_returns_200() {
        let server = create_test_server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "filings-server");
        assert_eq!(json["sessions"], 0);
    }

    #[tokio::test]
    async fn test_create_session_counts_in_health() {
        let server = create_test_server();
        create_session(&server).await;
        create_session(&server).await;

        let json = server.get("/health").await.json::<serde_json::Value>();
        assert_eq!(json["sessions"], 2);
    }

    #[tokio::test]
    async fn test_upload_page_requires_session_header() {
        let server = create_test_server();
        let response = server.get("/upload").await;
        response.assert_status_bad_request();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "MISSING_SESSION");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let server = create_test_server();
        let response = server
            .get("/upload")
            .add_header(
                HeaderName::from_static(SESSION_HEADER),
                HeaderValue::from_static("6f1c8e7a-1d2b-4c3d-9e8f-0a1b2c3d4e5f"),
            )
            .await;
        response.assert_status_not_found();
        assert_eq!(
            response.json::<serde_json::Value>()["code"],
            "SESSION_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_accept_file_reports_size() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server
            .post("/api/upload/file")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "name": "q3.docx",
                "byte_size": 1_572_864,
                "mime_type": "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }))
            .await;
        response.assert_status_ok();

        let view = server
            .get("/upload")
            .add_header(name, value)
            .await
            .json::<serde_json::Value>();
        assert_eq!(view["file"]["name"], "q3.docx");
        assert_eq!(view["file_size"], "1.50 MB");
    }

    #[tokio::test]
    async fn test_accept_file_rejects_unsupported_type() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server
            .post("/api/upload/file")
            .add_header(name, value)
            .json(&json!({
                "name": "chart.png",
                "byte_size": 1024,
                "mime_type": "image/png"
            }))
            .await;
        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Please upload a valid document file (PDF, TXT, DOC, DOCX)"
        );
    }

    #[tokio::test]
    async fn test_accept_file_rejects_oversized() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server
            .post("/api/upload/file")
            .add_header(name, value)
            .json(&json!({
                "name": "huge.pdf",
                "byte_size": 20 * 1024 * 1024 + 1,
                "mime_type": "application/pdf"
            }))
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "File size exceeds 20MB limit"
        );
    }

    #[tokio::test]
    async fn test_extract_without_file_is_rejected() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server
            .post("/api/upload/extract")
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_blank_paste_is_rejected() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server
            .post("/api/upload/paste")
            .add_header(name, value)
            .json(&json!({ "text": "   \n" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Please enter some text to process"
        );
    }

    #[tokio::test]
    async fn test_incomplete_peer_selection_is_rejected() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server
            .post("/api/upload/peer")
            .add_header(name, value)
            .json(&json!({ "company": "apple", "section": "risk-factors" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<serde_json::Value>()["code"],
            "VALIDATION_FAILED"
        );
    }

    #[tokio::test]
    async fn test_continue_before_extraction_is_rejected() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server
            .post("/api/upload/continue")
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Please extract text before continuing"
        );
    }

    #[tokio::test]
    async fn test_benchmarking_without_session_redirects_to_upload() {
        let server = create_test_server();
        let response = server.get("/benchmarking").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/upload");

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["redirect"], "/upload");
        assert_eq!(
            json["error"],
            "No documents found. Please upload documents first."
        );
    }

    #[tokio::test]
    async fn test_compliance_with_empty_store_redirects_to_upload() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;

        let response = server.get("/compliance").add_header(name, value).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/upload");
    }

    #[tokio::test]
    async fn test_unknown_page_is_404() {
        let server = create_test_server();
        let response = server.get("/reports/archive").await;
        response.assert_status_not_found();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "PAGE_NOT_FOUND");
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_pdf_extraction_then_continue_to_compliance() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;
        upload_pdf(&server, &name, &value).await;

        let view = server
            .get("/upload")
            .add_header(name.clone(), value.clone())
            .await
            .json::<serde_json::Value>();
        assert_eq!(view["primary_text"], FILE_PLACEHOLDER);
        assert_eq!(view["extracting_primary"], false);
        assert_eq!(view["can_continue"], true);

        let response = server
            .post("/api/upload/continue")
            .add_header(name, value)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["redirect"], "/compliance");
    }

    #[tokio::test]
    async fn test_risk_question_renders_footnotes() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;
        upload_pdf(&server, &name, &value).await;
        server
            .post("/api/upload/continue")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status_ok();

        server
            .post("/api/compliance/ask")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "question": "What are the key risk factors?" }))
            .await
            .assert_status(StatusCode::ACCEPTED);
        settle().await;

        let view = server
            .get("/compliance")
            .add_header(name, value)
            .await
            .json::<serde_json::Value>();
        assert_eq!(view["is_loading"], false);
        assert_eq!(view["question"], "");
        assert_eq!(view["recent_questions"][0], "What are the key risk factors?");

        let body = view["response"].as_str().unwrap();
        assert!(body.contains("Risk Factor Compliance Analysis"));
        assert!(body.contains(r#"data-footnote="1""#));
        assert!(body.contains(r#"data-footnote="2""#));
        assert!(!body.contains("^fn"));
        assert_eq!(view["footnotes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;
        upload_pdf(&server, &name, &value).await;
        server
            .post("/api/upload/continue")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status_ok();

        let response = server
            .post("/api/compliance/ask")
            .add_header(name, value)
            .json(&json!({ "question": "  " }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Please enter a question"
        );
    }

    #[tokio::test]
    async fn test_peer_benchmark_flow() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;
        upload_pdf(&server, &name, &value).await;

        server
            .put("/api/upload/tab")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "tab": "peer" }))
            .await
            .assert_status_ok();
        server
            .post("/api/upload/peer")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "company": "microsoft",
                "report_id": "10K-2023",
                "section": "risk-factors",
                "focus_style": "financials"
            }))
            .await
            .assert_status(StatusCode::ACCEPTED);
        settle().await;

        let response = server
            .post("/api/upload/continue")
            .add_header(name.clone(), value.clone())
            .await;
        assert_eq!(
            response.json::<serde_json::Value>()["redirect"],
            "/benchmarking"
        );

        let view = server
            .get("/benchmarking")
            .add_header(name.clone(), value.clone())
            .await
            .json::<serde_json::Value>();
        assert_eq!(view["peer_text"], PEER_PLACEHOLDER);
        assert_eq!(view["can_run"], true);
        assert!(view["report"].is_null());

        server
            .post("/api/benchmarking/run")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::ACCEPTED);
        settle().await;

        let view = server
            .get("/benchmarking")
            .add_header(name, value)
            .await
            .json::<serde_json::Value>();
        assert_eq!(view["is_loading"], false);
        assert!(view["report"]
            .as_str()
            .unwrap()
            .contains("Peer Benchmarking Analysis"));
    }

    #[tokio::test]
    async fn test_toggle_preview_shows_primary_text() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;
        upload_pdf(&server, &name, &value).await;
        server
            .post("/api/upload/continue")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status_ok();

        let response = server
            .post("/api/compliance/preview")
            .add_header(name.clone(), value.clone())
            .await;
        assert_eq!(response.json::<serde_json::Value>()["show_preview"], true);

        let view = server
            .get("/compliance")
            .add_header(name, value)
            .await
            .json::<serde_json::Value>();
        assert_eq!(view["primary_text"], FILE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_compliance_filing_type_outside_list_is_rejected() {
        let server = create_test_server();
        let (name, value) = create_session(&server).await;
        upload_pdf(&server, &name, &value).await;
        server
            .post("/api/upload/continue")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status_ok();

        let response = server
            .put("/api/compliance/filing-type")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "filing_type": "S1" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<serde_json::Value>()["code"],
            "VALIDATION_FAILED"
        );

        let view = server
            .put("/api/compliance/filing-type")
            .add_header(name, value)
            .json(&json!({ "filing_type": "10Q" }))
            .await
            .json::<serde_json::Value>();
        assert_eq!(view["filing_type"], "10Q");
    }

    #[tokio::test]
    async fn test_catalog_lists_peer_options() {
        let server = create_test_server();
        let response = server.get("/api/catalog").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["companies"].as_array().unwrap().len(), 5);
        assert_eq!(json["suggested_questions"].as_array().unwrap().len(), 3);
    }
}

#[cfg(test)]
mod regression_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use filings_core::{Latencies, MockAnalysisProvider, SessionHandle};

    /// Regression: a second question asked before the first answer lands
    /// must win, and the first answer must never appear.
    #[tokio::test(start_paused = true)]
    async fn replaced_question_never_shows_stale_answer() {
        let session = SessionHandle::new(Arc::new(MockAnalysisProvider::new(Latencies::default())));
        session
            .extract_paste("Revenue grew 12% year over year.".to_string())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1600)).await;
        session.continue_to_analysis().await.unwrap();

        session
            .ask_compliance(Some("Summarize the risk disclosures".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        session
            .ask_compliance(Some("How is revenue recognized?".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2600)).await;

        let view = session.compliance_view().await.unwrap();
        assert!(!view.is_loading);
        let body = view.response.unwrap();
        assert!(body.contains("General Compliance Review"));
        assert!(!body.contains("Risk Factor Compliance Analysis"));
    }
}

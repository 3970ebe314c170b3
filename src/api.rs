//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing keyword search, question answering, document
//! augmentation, and system status for the bill search service.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with queries, questions, uploads, share links
//! - **Output**: JSON responses with context windows, answers, document stats
//! - **Endpoints**: Search, ask, upload, fetch, document, health
//!
//! ## Key Features
//! - Distinguishes empty-query from zero-match states in search responses
//! - Collaborator failures (downloads, answer generation) are returned as
//!   structured error payloads; nothing aborts the session
//! - CORS support for web frontends, payload size limits per config

use crate::errors::BillSearchError;
use crate::ingestion::remote::RemoteSource;
use crate::ingestion::upload::UploadSource;
use crate::ingestion::DocumentSource;
use crate::search::MatchWindow;
use crate::utils::TextUtils;
use crate::{AppState, SourceRecord};
use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// API server wrapping the shared application state
pub struct ApiServer {
    app_state: AppState,
}

/// Keyword search request payload
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Keyword search response payload
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub matches: Vec<MatchWindow>,
    pub total_matches: usize,
    pub query_time_ms: u64,
    /// User-facing state message; distinguishes "enter a search term" from
    /// "no matches found"
    pub message: Option<String>,
}

/// Question request payload
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Question response payload
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: Option<String>,
    pub context_used_chars: usize,
    pub message: Option<String>,
}

/// Upload query parameters
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

/// Remote fetch request payload
#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub url: String,
}

/// Response for document augmentation endpoints
#[derive(Debug, Serialize)]
pub struct AugmentResponse {
    pub source: SourceRecord,
    pub total_chars: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub document_loaded: bool,
    pub document_chars: usize,
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server
    pub async fn run(self) -> crate::Result<()> {
        let app_state = self.app_state;
        let config = app_state.config.clone();
        let bind_addr = format!("{}:{}", config.server.host, config.server.port);
        let max_payload = config.server.max_payload_size_mb * 1024 * 1024;
        let enable_cors = config.server.enable_cors;

        tracing::info!("Starting API server on {}", bind_addr);

        // Bind and start in a separate statement so the non-Send builder
        // temporaries are dropped before the await; the Server future is Send.
        let server = HttpServer::new(move || {
            App::new()
                .wrap(Condition::new(enable_cors, Cors::permissive()))
                .app_data(web::Data::new(app_state.clone()))
                .app_data(web::PayloadConfig::new(max_payload))
                .route("/search", web::post().to(search_handler))
                .route("/ask", web::post().to(ask_handler))
                .route("/upload", web::post().to(upload_handler))
                .route("/fetch", web::post().to(fetch_handler))
                .route("/document", web::get().to(document_handler))
                .route("/health", web::get().to(health_handler))
                .route("/", web::get().to(index_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| BillSearchError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| BillSearchError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Map an error to a structured HTTP error response
fn error_response(err: &BillSearchError) -> HttpResponse {
    let body = serde_json::json!({
        "error": err.category(),
        "message": err.to_string(),
        "retryable": err.is_user_retryable(),
    });

    match err {
        BillSearchError::InvalidApiRequest { .. } | BillSearchError::InvalidShareLink { .. } => {
            HttpResponse::BadRequest().json(body)
        }
        BillSearchError::UploadExtractionFailed { .. }
        | BillSearchError::UnsupportedFileType { .. } => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        BillSearchError::RemoteDownloadFailed { .. }
        | BillSearchError::AnswerGenerationFailed { .. }
        | BillSearchError::AnswerResponseMalformed { .. }
        | BillSearchError::NetworkError { .. } => HttpResponse::BadGateway().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Keyword search endpoint handler
async fn search_handler(
    app_state: web::Data<AppState>,
    request: web::Json<SearchRequest>,
) -> ActixResult<HttpResponse> {
    let start_time = std::time::Instant::now();
    let query = request.query.trim();

    // Input-absent is "do nothing", not an error
    if query.is_empty() {
        return Ok(HttpResponse::Ok().json(SearchResponse {
            matches: Vec::new(),
            total_matches: 0,
            query_time_ms: 0,
            message: Some("Enter a search term.".to_string()),
        }));
    }

    if let Err(e) = app_state.searcher.validate_query(query) {
        return Ok(error_response(&e));
    }

    let store = app_state.store.read().await;
    let matches = app_state.searcher.search(store.document().text(), query);
    drop(store);

    let total_matches = matches.len();
    let message = if total_matches == 0 {
        Some("No matches found.".to_string())
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(SearchResponse {
        matches,
        total_matches,
        query_time_ms: start_time.elapsed().as_millis() as u64,
        message,
    }))
}

/// Question answering endpoint handler
async fn ask_handler(
    app_state: web::Data<AppState>,
    request: web::Json<AskRequest>,
) -> ActixResult<HttpResponse> {
    let question = request.question.trim();

    if question.is_empty() {
        return Ok(HttpResponse::Ok().json(AskResponse {
            answer: None,
            context_used_chars: 0,
            message: Some("Enter a question.".to_string()),
        }));
    }

    // Select context against the current snapshot, then release the lock
    // before the network call.
    let context = {
        let store = app_state.store.read().await;
        app_state.selector.select(store.document().text(), question)
    };
    let context_used_chars = context.chars().count();

    if context.is_empty() {
        tracing::warn!(question = %TextUtils::truncate(question, 80),
            "No relevant paragraphs found; answering with empty context");
    }

    match app_state.answerer.ask(&context, question).await {
        Ok(answer) => {
            tracing::info!(
                question = %TextUtils::truncate(question, 80),
                answer_preview = %TextUtils::truncate(&answer, 80),
                "Question answered"
            );
            Ok(HttpResponse::Ok().json(AskResponse {
                answer: Some(answer),
                context_used_chars,
                message: None,
            }))
        }
        Err(e) => {
            tracing::error!(category = e.category(), "Answer generation failed: {}", e);
            Ok(error_response(&e))
        }
    }
}

/// Upload endpoint handler: raw body bytes plus a filename query parameter
async fn upload_handler(
    app_state: web::Data<AppState>,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let source = UploadSource::new(params.filename.clone(), body.to_vec());

    match source.acquire().await {
        Ok(acquired) => {
            let mut store = app_state.store.write().await;
            let record = store.append(&acquired.name, acquired.kind, acquired.text);
            let total_chars = store.document().char_count();
            Ok(HttpResponse::Ok().json(AugmentResponse {
                source: record,
                total_chars,
            }))
        }
        Err(e) => {
            tracing::error!(category = e.category(), "Upload failed: {}", e);
            Ok(error_response(&e))
        }
    }
}

/// Remote fetch endpoint handler
async fn fetch_handler(
    app_state: web::Data<AppState>,
    request: web::Json<FetchRequest>,
) -> ActixResult<HttpResponse> {
    let source = match RemoteSource::new(app_state.config.fetch.clone(), request.url.clone()) {
        Ok(source) => source,
        Err(e) => return Ok(error_response(&e)),
    };

    match source.acquire().await {
        Ok(acquired) => {
            let mut store = app_state.store.write().await;
            let record = store.append(&acquired.name, acquired.kind, acquired.text);
            let total_chars = store.document().char_count();
            Ok(HttpResponse::Ok().json(AugmentResponse {
                source: record,
                total_chars,
            }))
        }
        Err(e) => {
            tracing::error!(category = e.category(), "Remote fetch failed: {}", e);
            Ok(error_response(&e))
        }
    }
}

/// Document statistics endpoint handler
async fn document_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let store = app_state.store.read().await;
    Ok(HttpResponse::Ok().json(store.stats()))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let store = app_state.store.read().await;
    let document_chars = store.document().char_count();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        document_loaded: document_chars > 0,
        document_chars,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Index page handler
async fn index_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let html = format!(
        r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>{title}</title>
        <style>
            body {{ font-family: Arial, sans-serif; margin: 40px; }}
            .header {{ color: #2c3e50; }}
            .endpoint {{ margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }}
            .method {{ font-weight: bold; color: #27ae60; }}
        </style>
    </head>
    <body>
        <h1 class="header">{title}</h1>
        <p>Search the bill by keyword, augment it with your own documents, and ask free-text questions.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">POST</span> /search
            <p>Keyword search returning each match with surrounding context lines.</p>
        </div>

        <div class="endpoint">
            <span class="method">POST</span> /ask
            <p>Ask a question; answered by a language model grounded in relevant bill excerpts.</p>
        </div>

        <div class="endpoint">
            <span class="method">POST</span> /upload?filename=...
            <p>Append an uploaded text or PDF file to the document.</p>
        </div>

        <div class="endpoint">
            <span class="method">POST</span> /fetch
            <p>Append a file fetched from a shareable link.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /document
            <p>Current document statistics and source records.</p>
        </div>

        <h2>Example Search Request</h2>
        <pre>{{
  "query": "bargaining unit"
}}</pre>
    </body>
    </html>
    "#,
        title = app_state.config.document.title
    );

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::ContextSelector;
    use crate::document::DocumentStore;
    use crate::llm::AnswerClient;
    use crate::search::KeywordSearch;
    use crate::SourceKind;
    use actix_web::{test, App};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn test_state(document_text: &str) -> AppState {
        let config = Arc::new(Config::default());
        let mut store = DocumentStore::empty();
        if !document_text.is_empty() {
            store.append("test.txt", SourceKind::Base, document_text.to_string());
        }

        AppState {
            config: config.clone(),
            store: Arc::new(RwLock::new(store)),
            searcher: Arc::new(KeywordSearch::new(config.search.clone())),
            selector: Arc::new(ContextSelector::new(config.context.clone())),
            answerer: Arc::new(AnswerClient::new(config.llm.clone()).unwrap()),
        }
    }

    #[actix_web::test]
    async fn test_search_empty_query_vs_zero_matches() {
        let state = test_state("alpha\nbeta\ngamma");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/search", web::post().to(search_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/search")
            .set_json(serde_json::json!({"query": ""}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_matches"], 0);
        assert_eq!(body["message"], "Enter a search term.");

        let req = test::TestRequest::post()
            .uri("/search")
            .set_json(serde_json::json!({"query": "zeta"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_matches"], 0);
        assert_eq!(body["message"], "No matches found.");
    }

    #[actix_web::test]
    async fn test_search_returns_context_windows() {
        let state = test_state("alpha\nbeta NATCA\ngamma\ndelta\nepsilon");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/search", web::post().to(search_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/search")
            .set_json(serde_json::json!({"query": "natca"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_matches"], 1);
        assert_eq!(
            body["matches"][0]["text"],
            "alpha\nbeta NATCA\ngamma\ndelta\nepsilon"
        );
    }

    #[actix_web::test]
    async fn test_upload_appends_to_document() {
        let state = test_state("base text");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/upload", web::post().to(upload_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/upload?filename=extra.txt")
            .set_payload("appended section")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["source"]["kind"], "upload");

        let store = state.store.read().await;
        assert_eq!(store.document().text(), "base text\n\nappended section");
    }

    #[actix_web::test]
    async fn test_document_stats_endpoint() {
        let state = test_state("one\ntwo\n\nthree");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/document", web::get().to(document_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/document").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_paragraphs"], 2);
        assert_eq!(body["sources"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let state = test_state("some text");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/health", web::get().to(health_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["document_loaded"], true);
    }

    #[actix_web::test]
    async fn test_ask_empty_question_is_noop() {
        let state = test_state("some text");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/ask", web::post().to(ask_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ask")
            .set_json(serde_json::json!({"question": "  "}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["answer"].is_null());
        assert_eq!(body["message"], "Enter a question.");
    }
}

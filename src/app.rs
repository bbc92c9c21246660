use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;

use crate::appender::{GoogleSheetsClient, SheetDestination, SpreadsheetAppender};
use crate::config::AppConfig;
use crate::grant::{COLUMNS, SampleGrants};
use crate::mailer::{Notifier, SmtpMailTransport};
use crate::pipeline::{GrantSearch, RunReport};

const REPORT_TEMPLATE: &str = "report";

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

pub struct AppState {
    // Held for the whole run so clicks are processed one at a time
    search: Arc<Mutex<GrantSearch>>,
    templates: Handlebars<'static>,
}

impl AppState {
    /// Run a search on its own task
    ///
    /// The run completes even if the client goes away and the handler is dropped.
    async fn run_search(&self) -> Result<RunReport, tokio::task::JoinError> {
        let search = Arc::clone(&self.search);
        let today = chrono::Local::now().date_naive();
        log::info!("grant search triggered");
        tokio::spawn(async move {
            let search = search.lock().await;
            search.run(today).await
        })
        .await
    }
}

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = config.server.timeout();

    // Wire the pipeline from configuration
    let sheets = GoogleSheetsClient::new(&config.service_account_json()?, timeout)?;
    let appender = SpreadsheetAppender::new(
        Box::new(sheets),
        SheetDestination {
            spreadsheet_id: config.sheet.spreadsheet_id.clone(),
            sheet_name: config.sheet.sheet_name.clone(),
        },
        config.sheet.header_mode,
    );
    let transport = SmtpMailTransport::new(&config.gmail, timeout)?;
    let notifier = Notifier::new(
        Box::new(transport),
        config.gmail.sender.clone(),
        config.gmail.recipient.clone(),
    );
    let search = GrantSearch::new(Box::new(SampleGrants), appender, notifier);

    let app = router(search)?;

    // Start server
    let listener = TcpListener::bind(&config.server.bind).await?;
    log::info!("Listening on http://{}", config.server.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router around a ready pipeline
pub fn router(search: GrantSearch) -> Result<Router, handlebars::TemplateError> {
    let mut templates = Handlebars::new();
    templates.register_template_string(REPORT_TEMPLATE, include_str!("./static/report.hbs"))?;

    let app_state = Arc::new(AppState {
        search: Arc::new(Mutex::new(search)),
        templates,
    });

    Ok(Router::new()
        .route("/", get(serve_landing))
        .route("/run", post(run_search_page))
        .route("/api/run", post(run_search_api))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(app_state))
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn run_search_page(State(state): State<Arc<AppState>>) -> Response {
    let report = match state.run_search().await {
        Ok(report) => report,
        Err(e) => return run_failed(e),
    };

    let context = serde_json::json!({
        "date": report.date,
        "columns": COLUMNS,
        "grants": report.grants,
        "steps": report.steps,
    });

    match state.templates.render(REPORT_TEMPLATE, &context) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            log::error!("failed to render report page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render report").into_response()
        }
    }
}

async fn run_search_api(State(state): State<Arc<AppState>>) -> Response {
    match state.run_search().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => run_failed(e),
    }
}

fn run_failed(e: tokio::task::JoinError) -> Response {
    log::error!("grant search task failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Grant search failed").into_response()
}

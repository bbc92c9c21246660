use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppendError;
use crate::grant::{COLUMNS, GrantRecord};

/// Where appended rows land
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetDestination {
    pub spreadsheet_id: String,
    /// Sheet name or A1 range; rows go after its existing content
    pub sheet_name: String,
}

/// Whether a header row is sent ahead of the values on every append
///
/// `WithHeader` writes the column labels again on each run, so repeated runs
/// leave duplicate header rows in the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    #[default]
    ValuesOnly,
    WithHeader,
}

/// Result of one successful append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendSummary {
    pub updated_rows: usize,
    pub updated_range: Option<String>,
}

/// A remote tabular store that accepts appended rows
#[async_trait]
pub trait SheetsApi: Send + Sync {
    async fn append_rows(
        &self,
        destination: &SheetDestination,
        rows: Vec<Vec<String>>,
    ) -> Result<AppendSummary, AppendError>;
}

/// Writes grants to the end of a spreadsheet
pub struct SpreadsheetAppender {
    api: Box<dyn SheetsApi>,
    destination: SheetDestination,
    header_mode: HeaderMode,
}

impl SpreadsheetAppender {
    pub fn new(api: Box<dyn SheetsApi>, destination: SheetDestination, header_mode: HeaderMode) -> Self {
        SpreadsheetAppender {
            api,
            destination,
            header_mode,
        }
    }

    pub fn destination(&self) -> &SheetDestination {
        &self.destination
    }

    /// Append all grants with a single request
    ///
    /// No retry; a failed request leaves the sheet unchanged from our side.
    pub async fn append(&self, grants: &[GrantRecord]) -> Result<AppendSummary, AppendError> {
        let rows = build_rows(grants, self.header_mode);
        log::debug!(
            "appending {} rows to {}!{}",
            rows.len(),
            self.destination.spreadsheet_id,
            self.destination.sheet_name
        );
        self.api.append_rows(&self.destination, rows).await
    }
}

/// Convert grants to the 2-D payload sent to the sheet
pub fn build_rows(grants: &[GrantRecord], header_mode: HeaderMode) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(grants.len() + 1);
    if header_mode == HeaderMode::WithHeader {
        rows.push(COLUMNS.iter().map(|c| c.to_string()).collect());
    }
    rows.extend(grants.iter().map(GrantRecord::to_row));
    rows
}

#[cfg(feature = "web")]
pub use google::GoogleSheetsClient;

#[cfg(feature = "web")]
mod google {
    use super::{AppendSummary, SheetDestination, SheetsApi};
    use crate::error::{AppendError, ConfigError};
    use async_trait::async_trait;
    use gcp_auth::{CustomServiceAccount, TokenProvider};
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
    const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

    #[derive(Serialize)]
    struct ValueRange<'a> {
        values: &'a [Vec<String>],
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct AppendResponse {
        pub(super) updates: Option<UpdateValuesResponse>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct UpdateValuesResponse {
        pub(super) updated_range: Option<String>,
        pub(super) updated_rows: Option<usize>,
    }

    /// Google Sheets v4 client authorised by a service account
    pub struct GoogleSheetsClient {
        http: reqwest::Client,
        auth: CustomServiceAccount,
        timeout: Duration,
    }

    impl GoogleSheetsClient {
        /// Build a client from the service account key JSON
        ///
        /// Each append, token exchange included, is bounded by `timeout`.
        pub fn new(service_account_json: &str, timeout: Duration) -> Result<Self, ConfigError> {
            let auth = CustomServiceAccount::from_json(service_account_json)
                .map_err(|e| ConfigError::ServiceAccount(e.to_string()))?;
            let http = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ConfigError::ServiceAccount(e.to_string()))?;
            Ok(GoogleSheetsClient {
                http,
                auth,
                timeout,
            })
        }

        async fn authorized_append(
            &self,
            destination: &SheetDestination,
            rows: Vec<Vec<String>>,
        ) -> Result<AppendSummary, AppendError> {
            let token = self
                .auth
                .token(&[SHEETS_SCOPE])
                .await
                .map_err(|e| AppendError::Auth(e.to_string()))?;

            let response = self
                .http
                .post(append_url(SHEETS_BASE_URL, destination))
                .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
                .bearer_auth(token.as_str())
                .json(&ValueRange { values: &rows })
                .send()
                .await
                .map_err(|e| AppendError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| AppendError::Transport(e.to_string()))?;
            if !status.is_success() {
                return Err(AppendError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }

            summarize(&body, rows.len())
        }
    }

    #[async_trait]
    impl SheetsApi for GoogleSheetsClient {
        async fn append_rows(
            &self,
            destination: &SheetDestination,
            rows: Vec<Vec<String>>,
        ) -> Result<AppendSummary, AppendError> {
            // Covers the token exchange as well
            tokio::time::timeout(self.timeout, self.authorized_append(destination, rows))
                .await
                .map_err(|_| AppendError::Transport(format!("timed out after {:?}", self.timeout)))?
        }
    }

    pub(super) fn append_url(base: &str, destination: &SheetDestination) -> String {
        format!(
            "{}/{}/values/{}:append",
            base,
            urlencoding::encode(&destination.spreadsheet_id),
            urlencoding::encode(&destination.sheet_name)
        )
    }

    pub(super) fn summarize(body: &str, sent_rows: usize) -> Result<AppendSummary, AppendError> {
        let response: AppendResponse =
            serde_json::from_str(body).map_err(|e| AppendError::Response(e.to_string()))?;
        let updates = response.updates;
        Ok(AppendSummary {
            updated_rows: updates
                .as_ref()
                .and_then(|u| u.updated_rows)
                .unwrap_or(sent_rows),
            updated_range: updates.and_then(|u| u.updated_range),
        })
    }
}

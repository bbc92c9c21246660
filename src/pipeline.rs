use chrono::NaiveDate;
use serde::Serialize;

use crate::appender::SpreadsheetAppender;
use crate::formatter::format_html_table;
use crate::grant::{GrantRecord, GrantSource};
use crate::mailer::Notifier;

/// External step reported back to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Sheet,
    Email,
}

/// How one step of a run went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    pub ok: bool,
    pub message: String,
}

impl StepOutcome {
    fn success(step: Step, message: impl Into<String>) -> Self {
        StepOutcome {
            step,
            ok: true,
            message: message.into(),
        }
    }

    fn failure(step: Step, message: impl Into<String>) -> Self {
        StepOutcome {
            step,
            ok: false,
            message: message.into(),
        }
    }
}

/// Everything a single run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub date: String,
    pub grants: Vec<GrantRecord>,
    pub html: String,
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step)
    }

    pub fn all_ok(&self) -> bool {
        self.steps.iter().all(|s| s.ok)
    }
}

/// The grant search triggered from the UI
///
/// A run generates grants, appends them to the sheet, formats them and emails
/// the table. Each step reports its own failure and the run always continues.
/// Nothing reconciles the sheet and the mailbox if only one of them succeeds.
pub struct GrantSearch {
    source: Box<dyn GrantSource>,
    appender: SpreadsheetAppender,
    notifier: Notifier,
}

impl GrantSearch {
    pub fn new(source: Box<dyn GrantSource>, appender: SpreadsheetAppender, notifier: Notifier) -> Self {
        GrantSearch {
            source,
            appender,
            notifier,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> RunReport {
        let grants = self.source.grants(today);
        log::info!("generated {} grants", grants.len());

        let mut steps = Vec::with_capacity(2);

        match self.appender.append(&grants).await {
            Ok(summary) => {
                log::info!(
                    "appended {} rows to {}",
                    summary.updated_rows,
                    self.appender.destination().spreadsheet_id
                );
                steps.push(StepOutcome::success(Step::Sheet, "✅ Saved to Google Sheet!"));
            }
            Err(e) => {
                log::error!("sheet append failed: {}", e);
                steps.push(StepOutcome::failure(
                    Step::Sheet,
                    format!("❌ Failed to save to Google Sheet: {}", e),
                ));
            }
        }

        let html = format_html_table(&grants);

        match self.notifier.notify(&html, today).await {
            Ok(()) => {
                log::info!("grant report emailed to {}", self.notifier.recipient());
                steps.push(StepOutcome::success(Step::Email, "📧 Email sent successfully!"));
            }
            Err(e) => {
                log::error!("email send failed: {}", e);
                steps.push(StepOutcome::failure(
                    Step::Email,
                    format!("❌ Failed to send email: {}", e),
                ));
            }
        }

        let report = RunReport {
            date: crate::grant::format_date(today),
            grants,
            html,
            steps,
        };
        if report.all_ok() {
            log::info!("grant search finished");
        } else {
            log::warn!("grant search finished with failed steps");
        }
        report
    }
}

/*!
# Grant Finder

A small web tool that runs a grant search on demand, records the results in a
Google Sheet and emails them as an HTML table.

## Overview

The landing page shows a single button. Each click runs one search to
completion before the next one starts:

1. Generate the grants (a fixed sample set stamped with today's date)
2. Append them to the configured spreadsheet
3. Format them as an HTML table
4. Email the table to the configured recipient

Every external step reports its own success or failure on the result page. A
failed append does not stop the email from going out.

## Architecture

### Frontend Layer
- **Technologies**: HTML, CSS
- Landing page with the trigger button, result page with the grant table and
  one banner per step

### Backend Layer
- **Technologies**: Rust, axum, handlebars
- **Core Components**:
  - Record Generator - Produces the grants for a run
  - Table Formatter - Renders grants as an HTML document
  - Spreadsheet Appender - Appends grant rows via the Sheets v4 API
  - Notifier - Sends the report over SMTP
  - Grant Search - Runs the steps in order and collects outcomes

### Configuration
- Secrets file in TOML (service account key, mail credentials, sheet ID),
  loaded once at startup and passed to each component

## Modules

- **grant**: GrantRecord and the sample generator
- **formatter**: HTML table rendering
- **appender**: Sheets API seam and the Google client
- **mailer**: Mail transport seam and the SMTP client
- **pipeline**: The grant search run and its report
- **config**: Secrets file loading
- **error**: Error types
- **app**: Routing and handlers

## REST API Endpoints

- `GET /` - Landing page
- `POST /run` - Runs a search and renders the result page
- `POST /api/run` - Runs a search and returns the report as JSON
*/

pub mod appender;
pub mod config;
pub mod error;
pub mod formatter;
pub mod grant;
pub mod mailer;
pub mod pipeline;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the everyday types to make them easier to use
pub use appender::{HeaderMode, SheetDestination, SheetsApi, SpreadsheetAppender};
pub use config::AppConfig;
pub use error::{AppendError, ConfigError, MailError};
pub use formatter::format_html_table;
pub use grant::{GrantRecord, GrantSource, SampleGrants, sample_grants};
pub use mailer::{Email, MailTransport, Notifier};
pub use pipeline::{GrantSearch, RunReport, Step, StepOutcome};

use chrono::NaiveDate;
use serde::Serialize;

/// Date format used for every date shown to users or written to the sheet
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Column labels, in field order
pub const COLUMNS: [&str; 7] = [
    "Grant Name",
    "Amount",
    "Funder",
    "Eligibility",
    "Deadline",
    "Application Link",
    "Date Found",
];

/// A single funding opportunity
///
/// Fields are private so a record cannot change after it is created.
/// The order of [`COLUMNS`] matches the order of [`GrantRecord::to_row`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantRecord {
    name: String,
    amount: String,
    funder: String,
    eligibility: String,
    deadline: String,
    application_link: String,
    date_found: String,
}

impl GrantRecord {
    /// Create a record discovered on `found`
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        funder: impl Into<String>,
        eligibility: impl Into<String>,
        deadline: impl Into<String>,
        application_link: impl Into<String>,
        found: NaiveDate,
    ) -> Self {
        GrantRecord {
            name: name.into(),
            amount: amount.into(),
            funder: funder.into(),
            eligibility: eligibility.into(),
            deadline: deadline.into(),
            application_link: application_link.into(),
            date_found: format_date(found),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn funder(&self) -> &str {
        &self.funder
    }

    pub fn eligibility(&self) -> &str {
        &self.eligibility
    }

    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    pub fn application_link(&self) -> &str {
        &self.application_link
    }

    pub fn date_found(&self) -> &str {
        &self.date_found
    }

    /// Values in column order, as written to a spreadsheet row
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.amount.clone(),
            self.funder.clone(),
            self.eligibility.clone(),
            self.deadline.clone(),
            self.application_link.clone(),
            self.date_found.clone(),
        ]
    }
}

/// Format a date as `MM/DD/YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Anything that can produce the grants for one search run
pub trait GrantSource: Send + Sync {
    fn grants(&self, today: NaiveDate) -> Vec<GrantRecord>;
}

/// The built-in sample set
///
/// There is no live discovery; every run yields the same two grants.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleGrants;

impl GrantSource for SampleGrants {
    fn grants(&self, today: NaiveDate) -> Vec<GrantRecord> {
        sample_grants(today)
    }
}

/// Build the fixed sample grants, stamped with `today`
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use grant_finder::grant::sample_grants;
///
/// let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let grants = sample_grants(today);
/// assert_eq!(grants.len(), 2);
/// assert_eq!(grants[0].date_found(), "07/01/2025");
/// ```
pub fn sample_grants(today: NaiveDate) -> Vec<GrantRecord> {
    vec![
        GrantRecord::new(
            "Community Empowerment Grant",
            "$15,000",
            "ABC Foundation",
            "Nonprofits Nationwide",
            "07/31/2025",
            "https://example.com/apply",
            today,
        ),
        GrantRecord::new(
            "Youth Education Grant",
            "$5,000",
            "XYZ Trust",
            "501(c)(3) Youth Orgs",
            "08/15/2025",
            "https://example.org/youth-grant",
            today,
        ),
    ]
}

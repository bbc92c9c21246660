use crate::grant::{COLUMNS, GrantRecord};
use handlebars::html_escape;

/// Convert grants to an HTML report
///
/// This function renders grants as a complete HTML document suitable for an email body.
/// It creates a table where:
/// - The header row holds one `<th>` per column label
/// - Each grant becomes one `<tr>` with its values in column order
/// - Labels and values are HTML-escaped
///
/// # Arguments
/// * `grants` - Grants to render, in display order
///
/// # Returns
/// * `String` - The HTML document
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use grant_finder::formatter::format_html_table;
/// use grant_finder::grant::sample_grants;
///
/// let grants = sample_grants(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
/// let html = format_html_table(&grants);
/// assert!(html.contains("<td>Youth Education Grant</td>"));
/// ```
pub fn format_html_table(grants: &[GrantRecord]) -> String {
    let mut html = String::from("<html><body>\n<h3>New Grant Opportunities:</h3>\n");
    html.push_str("<table border=\"1\" cellspacing=\"0\" cellpadding=\"4\">\n");

    // Header row with column labels
    html.push_str("<tr>");
    for label in COLUMNS {
        html.push_str(&format!("<th>{}</th>", html_escape(label)));
    }
    html.push_str("</tr>\n");

    // One row per grant
    for grant in grants {
        html.push_str("<tr>");
        for value in grant.to_row() {
            html.push_str(&format!("<td>{}</td>", html_escape(&value)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::sample_grants;
    use chrono::NaiveDate;

    fn grants() -> Vec<GrantRecord> {
        sample_grants(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
    }

    #[test]
    fn one_header_cell_per_column() {
        let html = format_html_table(&grants());
        assert_eq!(html.matches("<th>").count(), COLUMNS.len());
        for label in COLUMNS {
            assert!(html.contains(&format!("<th>{}</th>", label)));
        }
    }

    #[test]
    fn one_row_per_grant_plus_header() {
        let grants = grants();
        let html = format_html_table(&grants);
        assert_eq!(html.matches("<tr>").count(), grants.len() + 1);
        assert_eq!(html.matches("<td>").count(), grants.len() * COLUMNS.len());
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(format_html_table(&grants()), format_html_table(&grants()));
    }

    #[test]
    fn values_appear_in_field_order() {
        let html = format_html_table(&grants());
        let name = html.find("<td>Community Empowerment Grant</td>").unwrap();
        let amount = html.find("<td>$15,000</td>").unwrap();
        let link = html.find("<td>https://example.com/apply</td>").unwrap();
        let second = html.find("<td>Youth Education Grant</td>").unwrap();
        assert!(name < amount && amount < link && link < second);
    }

    #[test]
    fn empty_input_still_has_header() {
        let html = format_html_table(&[]);
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(!html.contains("<td>"));
    }

    #[test]
    fn markup_in_values_is_escaped() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let grant = GrantRecord::new(
            "Arts & <Culture>",
            "$1",
            "A \"Trust\"",
            "Any",
            "09/01/2025",
            "https://example.com/?a=1&b=2",
            today,
        );
        let html = format_html_table(&[grant]);
        assert!(html.contains("<td>Arts &amp; &lt;Culture&gt;</td>"));
        assert!(html.contains("&quot;Trust&quot;"));
        assert!(!html.contains("<Culture>"));
    }
}

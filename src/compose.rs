//! Message composition: merge-tag substitution and the HTML fragments that
//! fill the templates.
//!
//! Templates are plain HTML bodies with bracketed merge tags. Tags without a
//! supplied value stay in the output verbatim, so a typo in a template shows
//! up in the drafted message instead of failing the batch.

use crate::record::{Candidate, FIELD_NAMES};
use crate::workflow::Status;

pub const TAG_CANDIDATE_NAME: &str = "[CANDIDATE NAME]";
pub const TAG_HOSTING_DATE: &str = "[HOSTING DATE]";
pub const TAG_HOST_NAME: &str = "[HOST NAME]";
pub const TAG_PREFERENCE_TABLE: &str = "[PREFERENCE TABLE]";
pub const TAG_SIGNATURE: &str = "[SIGNATURE]";
pub const TAG_PLEA_TABLE: &str = "[PLEA TABLE]";

/// Replaces each supplied merge tag with its value.
pub fn render(template: &str, fields: &[(&str, &str)]) -> String {
    let mut body = template.to_string();
    for (tag, value) in fields {
        body = body.replace(tag, value);
    }
    body
}

/// Extracts the name to address a candidate by.
///
/// Candidates often enter a legal name plus a preferred name in parentheses
/// or double quotes; the preferred name wins. Otherwise the first whitespace
/// token of the full name is used.
pub fn first_name(full_name: &str) -> &str {
    if let (Some(open), Some(close)) = (full_name.find('('), full_name.find(')'))
        && close > open
    {
        return &full_name[open + 1..close];
    }
    if let Some(open) = full_name.find('"')
        && let Some(close) = full_name[open + 1..].find('"').map(|i| i + open + 1)
    {
        return &full_name[open + 1..close];
    }
    full_name.split_whitespace().next().unwrap_or(full_name)
}

/// Two-column HTML table of a candidate's hosting preferences, used in the
/// receipt confirmation body.
pub fn preference_table(candidate: &Candidate) -> String {
    let mut table = String::from("<table>");
    for (i, title) in FIELD_NAMES.iter().enumerate() {
        let value = candidate.field(i + 1).unwrap_or_default();
        table.push_str(&format!(
            "<tr><td><b>{title}</b></td><td>{value}</td></tr>"
        ));
    }
    table.push_str("</table>");
    table
}

/// Anonymized HTML table of candidates still in need of a host, used in the
/// plea broadcast. Only receipt-pending and pairing-pending candidates are
/// listed; no names or contact details appear.
pub fn plea_table(candidates: &[Candidate]) -> String {
    let mut table = String::from("<table border=\"1\" style=\"borderStyle:solid\"><tr>");
    for header in [
        "Date of Hosting",
        "Candidate Gender",
        "Alma Mater",
        "Preferred Host Gender",
        "Allergies",
        "Interest Groups",
    ] {
        table.push_str(&format!("<th>{header}</th>"));
    }
    table.push_str("</tr>");
    for c in candidates {
        if !matches!(c.status, Status::ReceiptPending | Status::PairingPending) {
            continue;
        }
        table.push_str(&format!(
            "<tr><td style=\"color:red\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            c.hosting_date, c.gender, c.undergrad, c.preferred_host_gender, c.allergies, c.interest_groups
        ));
    }
    table.push_str("</table>");
    table
}

/// Fills the receipt confirmation template for one candidate.
pub fn receipt_message(template: &str, candidate: &Candidate, signature: &str) -> String {
    render(
        template,
        &[
            (TAG_CANDIDATE_NAME, first_name(&candidate.name)),
            (TAG_HOSTING_DATE, &candidate.hosting_date),
            (TAG_PREFERENCE_TABLE, &preference_table(candidate)),
            (TAG_SIGNATURE, signature),
        ],
    )
}

/// Fills the pairing announcement template for one candidate.
pub fn pairing_message(template: &str, candidate: &Candidate, signature: &str) -> String {
    render(
        template,
        &[
            (TAG_CANDIDATE_NAME, first_name(&candidate.name)),
            (TAG_HOSTING_DATE, &candidate.hosting_date),
            (TAG_HOST_NAME, &candidate.host_name),
            (TAG_SIGNATURE, signature),
        ],
    )
}

/// Fills the plea template with the anonymized candidate table.
pub fn plea_message(template: &str, candidates: &[Candidate], signature: &str) -> String {
    render(
        template,
        &[
            (TAG_PLEA_TABLE, &plea_table(candidates)),
            (TAG_SIGNATURE, signature),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> Candidate {
        Candidate {
            host_name: "Dana Host".into(),
            name: "Alex Doe".into(),
            gender: "F".into(),
            hosting_date: "03/02/2024".into(),
            email: "alex@example.edu".into(),
            undergrad: "State College".into(),
            preferred_host_gender: "No preference".into(),
            allergies: "peanuts".into(),
            interest_groups: "surgery".into(),
            status: Status::ReceiptPending,
            row: 7,
            ..Candidate::default()
        }
    }

    #[test]
    fn render_replaces_tags() {
        let out = render(
            "<p>Hi [CANDIDATE NAME], see you [HOSTING DATE].</p>",
            &[
                (TAG_CANDIDATE_NAME, "Alex"),
                (TAG_HOSTING_DATE, "03/02/2024"),
            ],
        );
        assert_eq!(out, "<p>Hi Alex, see you 03/02/2024.</p>");
    }

    #[test]
    fn unresolved_tags_stay_verbatim() {
        let out = render("Hi [CANDIDATE NAME], [UNKNOWN TAG]", &[(TAG_CANDIDATE_NAME, "Alex")]);
        assert_eq!(out, "Hi Alex, [UNKNOWN TAG]");
    }

    #[test]
    fn repeated_tags_all_replaced() {
        let out = render("[SIGNATURE] and [SIGNATURE]", &[(TAG_SIGNATURE, "Sam")]);
        assert_eq!(out, "Sam and Sam");
    }

    #[test]
    fn first_name_takes_first_token() {
        assert_eq!(first_name("Alex Doe"), "Alex");
        assert_eq!(first_name("Alex"), "Alex");
    }

    #[test]
    fn first_name_prefers_parenthesized_name() {
        assert_eq!(first_name("Robert (Bob) Smith"), "Bob");
    }

    #[test]
    fn first_name_prefers_quoted_name() {
        assert_eq!(first_name("Katherine \"Kat\" Jones"), "Kat");
    }

    #[test]
    fn first_name_handles_empty_input() {
        assert_eq!(first_name(""), "");
        assert_eq!(first_name("   "), "   ");
    }

    #[test]
    fn preference_table_lists_every_field() {
        let table = preference_table(&candidate());
        assert!(table.starts_with("<table>"));
        assert!(table.contains("<b>Candidate Name</b></td><td>Alex Doe"));
        assert!(table.contains("<b>Allergies</b></td><td>peanuts"));
        assert!(table.contains("<b>Interest Groups</b></td><td>surgery"));
        assert!(!table.contains("Dana Host"));
    }

    #[test]
    fn plea_table_filters_by_status_and_hides_names() {
        let mut pending = candidate();
        pending.status = Status::PairingPending;
        let mut paired = candidate();
        paired.status = Status::Paired;
        paired.hosting_date = "09/09/2024".into();

        let table = plea_table(&[pending, paired]);
        assert!(table.contains("03/02/2024"));
        assert!(!table.contains("09/09/2024"));
        assert!(!table.contains("Alex"));
        assert!(!table.contains("example.edu"));
    }

    #[test]
    fn receipt_message_fills_template() {
        let template = "<p>Hi [CANDIDATE NAME],</p>[PREFERENCE TABLE]<p>[SIGNATURE]</p>";
        let body = receipt_message(template, &candidate(), "Sam Coordinator");
        assert!(body.contains("Hi Alex,"));
        assert!(body.contains("<b>Hosting Date</b></td><td>03/02/2024"));
        assert!(body.contains("Sam Coordinator"));
    }

    #[test]
    fn pairing_message_names_the_host() {
        let template = "[CANDIDATE NAME] meets [HOST NAME] on [HOSTING DATE]. [SIGNATURE]";
        let body = pairing_message(template, &candidate(), "Sam");
        assert_eq!(body, "Alex meets Dana Host on 03/02/2024. Sam");
    }
}

//! Mailbox URL construction
//!
//! Renders the `notmuch:` mailbox URL that neomutt's notmuch backend opens
//! with `-f`. The scheme is followed by two slashes and the percent-encoded
//! mail root, then a query string whose parameters appear in a fixed order:
//! `query`, then `type`, then `limit`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::ResultType;

/// A virtual mailbox URL understood by neomutt's notmuch backend
///
/// # Example
///
/// ```text
/// notmuch:///home/user/Mail?query=tag%3Ainbox&type=threads&limit=20
/// ```
#[derive(Debug, Clone)]
pub struct MailboxUrl {
    /// Filesystem root of the notmuch mail store
    pub mail_root: PathBuf,
    /// Search query carried in the `query` parameter
    pub query: String,
    /// Optional result granularity carried in the `type` parameter
    pub result_type: Option<ResultType>,
    /// Optional result cap carried in the `limit` parameter
    pub limit: Option<usize>,
}

impl MailboxUrl {
    /// Render the URL string
    ///
    /// The mail root keeps its `/` separators; every other reserved byte in
    /// the path and in the parameter values is percent-encoded, spaces
    /// included (`%20`, never `+`).
    pub fn encode(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![("query", self.query.clone())];
        if let Some(result_type) = self.result_type {
            pairs.push(("type", result_type.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        format!(
            "notmuch://{}?{}",
            encode_path(&self.mail_root),
            encode_pairs(&pairs)
        )
    }
}

impl fmt::Display for MailboxUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Percent-encode a filesystem path, segment by segment, preserving `/`
fn encode_path(path: &Path) -> String {
    path.to_string_lossy()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Render `key=value` pairs joined with `&`, both sides percent-encoded
fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::MailboxUrl;
    use crate::cli::ResultType;

    fn url(query: &str) -> MailboxUrl {
        MailboxUrl {
            mail_root: PathBuf::from("/home/user/Mail"),
            query: query.to_owned(),
            result_type: None,
            limit: None,
        }
    }

    #[test]
    fn encodes_a_minimal_url() {
        assert_eq!(
            url("tag:inbox").encode(),
            "notmuch:///home/user/Mail?query=tag%3Ainbox"
        );
    }

    #[test]
    fn parameters_keep_a_fixed_order() {
        let mailbox = MailboxUrl {
            result_type: Some(ResultType::Threads),
            limit: Some(20),
            ..url("tag:inbox")
        };
        assert_eq!(
            mailbox.encode(),
            "notmuch:///home/user/Mail?query=tag%3Ainbox&type=threads&limit=20"
        );
    }

    #[test]
    fn spaces_and_quotes_are_percent_encoded() {
        let mailbox = MailboxUrl {
            mail_root: PathBuf::from("/home/user/My Mail"),
            result_type: Some(ResultType::Threads),
            limit: Some(20),
            ..url(r#"tag:inbox and from:"a b""#)
        };
        assert_eq!(
            mailbox.encode(),
            "notmuch:///home/user/My%20Mail?query=tag%3Ainbox%20and%20from%3A%22a%20b%22&type=threads&limit=20"
        );
    }

    #[test]
    fn non_ascii_encodes_as_utf8_octets() {
        assert_eq!(
            url("from:béa").encode(),
            "notmuch:///home/user/Mail?query=from%3Ab%C3%A9a"
        );
    }

    #[test]
    fn separator_bytes_in_values_are_escaped() {
        // `&` and `=` inside a value must not read as pair structure
        assert_eq!(
            url("a&b=c").encode(),
            "notmuch:///home/user/Mail?query=a%26b%3Dc"
        );
    }

    #[test]
    fn query_component_decodes_back_to_the_query() {
        let mailbox = url(r#"tag:inbox and from:"a b""#);
        let encoded = mailbox.encode();
        let component = encoded
            .split_once("query=")
            .map(|(_, rest)| rest)
            .expect("query parameter present");
        let decoded = urlencoding::decode(component).expect("valid percent encoding");
        assert_eq!(decoded, mailbox.query);
    }

    #[test]
    fn relative_mail_root_has_no_leading_slash_segment() {
        let mailbox = MailboxUrl {
            mail_root: PathBuf::from("Mail/work"),
            ..url("tag:todo")
        };
        assert_eq!(mailbox.encode(), "notmuch://Mail/work?query=tag%3Atodo");
    }
}

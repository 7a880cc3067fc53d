//! Search query assembly
//!
//! Joins the positional search terms into the single query string that ends
//! up in the mailbox URL, optionally wrapped for notmuch's s-expression
//! parser.

use crate::cli::QuerySyntax;

/// Build the notmuch query from the raw search terms
///
/// Terms are joined with single spaces. With [`QuerySyntax::Sexp`] the
/// joined string becomes the quoted argument of a `sexp:` prefix, so the
/// infix parser hands the whole thing to the s-expression parser unchanged.
///
/// # Example
///
/// ```
/// let terms = vec!["(and".to_owned(), "(from alice))".to_owned()];
/// assert_eq!(
///     build_query(&terms, QuerySyntax::Sexp),
///     r#"sexp:"(and (from alice))""#
/// );
/// ```
pub fn build_query(terms: &[String], syntax: QuerySyntax) -> String {
    let joined = terms.join(" ");
    match syntax {
        QuerySyntax::Infix => joined,
        QuerySyntax::Sexp => format!("sexp:{}", infix_quote(&joined)),
    }
}

/// Quote a string for notmuch's infix query parser
///
/// Wraps the string in double quotes; literal double quotes are doubled,
/// so `a"b` becomes `"a""b"`.
fn infix_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::{build_query, infix_quote};
    use crate::cli::QuerySyntax;

    fn terms(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| (*t).to_owned()).collect()
    }

    /// Inverse of [`infix_quote`], for round-trip checks
    fn infix_unquote(s: &str) -> String {
        let inner = s
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .expect("quoted string");
        inner.replace("\"\"", "\"")
    }

    #[test]
    fn infix_terms_join_with_spaces() {
        assert_eq!(
            build_query(&terms(&["tag:inbox", "from:alice"]), QuerySyntax::Infix),
            "tag:inbox from:alice"
        );
    }

    #[test]
    fn infix_terms_pass_through_unquoted() {
        assert_eq!(
            build_query(&terms(&[r#"subject:"hi there""#]), QuerySyntax::Infix),
            r#"subject:"hi there""#
        );
    }

    #[test]
    fn sexp_terms_gain_the_quoted_prefix() {
        assert_eq!(
            build_query(&terms(&["(and", "(from alice))"]), QuerySyntax::Sexp),
            r#"sexp:"(and (from alice))""#
        );
    }

    #[test]
    fn sexp_wrapping_doubles_embedded_quotes() {
        assert_eq!(
            build_query(&terms(&[r#"(subject "a b")"#]), QuerySyntax::Sexp),
            r#"sexp:"(subject ""a b"")""#
        );
    }

    #[test]
    fn infix_quote_round_trips() {
        for input in ["", "plain", r#"a"b"#, r#""""#, r#"tag:"x y""#] {
            assert_eq!(infix_unquote(&infix_quote(input)), input, "{input:?}");
        }
    }

    #[test]
    fn empty_terms_produce_an_empty_query() {
        assert_eq!(build_query(&[], QuerySyntax::Infix), "");
        assert_eq!(build_query(&[], QuerySyntax::Sexp), r#"sexp:"""#);
    }
}

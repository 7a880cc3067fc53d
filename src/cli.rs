//! Command-line surface
//!
//! Parsing happens in two stages. A normalization pre-pass walks the raw
//! argument vector to handle the parts of the surface `clap` does not
//! express: the `+R` spelling of `--read-write`, the verbatim remainder
//! captured by `--neomutt-args`, and the convention that unrecognized
//! option-like tokens are forwarded to neomutt instead of rejected. The
//! normalized vector is then handed to a regular `clap` parser.

use std::fmt;
use std::path::Path;

use clap::{Parser, ValueEnum};

/// Fallback program name when `argv[0]` is unavailable
const PROG_NAME: &str = "notmuch-neomutt";

/// Option-like tokens that take no value and belong to this program
const KNOWN_FLAGS: &[&str] = &[
    "--showcmd",
    "--showurl",
    "--showquery",
    "-R",
    "--read-only",
    "--read-write",
    "--neomutt-help",
    "-h",
    "--help",
    "-V",
    "--version",
];

/// Option-like tokens that consume a following value token
const KNOWN_VALUE_FLAGS: &[&str] = &["--limit", "-t", "--type", "--query", "--neomutt-exe"];

/// Parsed command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "notmuch-neomutt",
    version,
    about = "Launch neomutt(1) to view the results of a notmuch-search(1) query.",
    after_help = "Read-only mode configurable via \
                  `notmuch config set neomutt.read_only true`."
)]
pub struct Cli {
    /// Show the command only
    #[arg(long, group = "show")]
    pub showcmd: bool,
    /// Show the mailbox URL only
    #[arg(long, group = "show")]
    pub showurl: bool,
    /// Show the query only
    #[arg(long, group = "show")]
    pub showquery: bool,
    /// Open mailbox in read-only mode
    #[arg(short = 'R', long)]
    pub read_only: bool,
    /// Open mailbox in read-write mode (also spelled `+R`)
    #[arg(long, conflicts_with = "read_only")]
    pub read_write: bool,
    /// Restricts the number of messages/threads in the result
    #[arg(long, value_name = "number")]
    pub limit: Option<usize>,
    /// Reads only matching messages, or whole threads (default: use NeoMutt
    /// configuration)
    #[arg(short = 't', long = "type", value_name = "type", value_enum)]
    pub result_type: Option<ResultType>,
    /// Notmuch query type
    #[arg(
        long = "query",
        value_name = "syntax",
        value_enum,
        default_value = "infix"
    )]
    pub query_syntax: QuerySyntax,
    /// Search terms joined into a single notmuch query
    #[arg(value_name = "search-term")]
    pub search_terms: Vec<String>,
    /// Neomutt executable to invoke
    #[arg(
        long,
        value_name = "path",
        env = "NOTMUCH_NEOMUTT_EXE",
        default_value = "neomutt"
    )]
    pub neomutt_exe: String,
    /// Show neomutt help
    #[arg(long)]
    pub neomutt_help: bool,
    /// Remaining arguments to be passed to neomutt
    // Filled in by the normalization pre-pass, never by `clap` itself: every
    // token after `--neomutt-args` is taken verbatim, then unrecognized
    // option-like tokens from earlier in the command line are appended. The
    // declaration exists so the flag shows up in `--help`.
    #[arg(long, value_name = "arg", num_args = 0.., allow_hyphen_values = true)]
    pub neomutt_args: Vec<String>,
}

impl Cli {
    /// Parse the process argument vector
    ///
    /// Prints a diagnostic and terminates the process when parsing fails,
    /// exactly like [`Parser::parse`].
    pub fn from_env() -> Self {
        match Self::try_from_argv(std::env::args().collect()) {
            Ok(cli) => cli,
            Err(err) => err.exit(),
        }
    }

    /// Parse an explicit argument vector, `argv[0]` included
    fn try_from_argv(argv: Vec<String>) -> Result<Self, clap::Error> {
        let (head, passthrough) = normalize_args(argv);
        let mut cli = Self::try_parse_from(head)?;
        cli.neomutt_args = passthrough;
        Ok(cli)
    }

    /// Requested display short-circuit, if any
    pub fn show_mode(&self) -> Option<ShowMode> {
        if self.showcmd {
            Some(ShowMode::Command)
        } else if self.showurl {
            Some(ShowMode::Url)
        } else if self.showquery {
            Some(ShowMode::Query)
        } else {
            None
        }
    }

    /// Explicit read-only choice from the flags, if one was given
    ///
    /// `None` means neither `-R` nor `+R` appeared and the notmuch
    /// configuration decides.
    pub fn read_only_override(&self) -> Option<bool> {
        if self.read_only {
            Some(true)
        } else if self.read_write {
            Some(false)
        } else {
            None
        }
    }
}

/// Display short-circuit selected on the command line
///
/// The three `--show*` flags are mutually exclusive, so at most one mode is
/// ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowMode {
    /// Print the shell-quoted command line instead of running it
    Command,
    /// Print the mailbox URL
    Url,
    /// Print the notmuch query
    Query,
}

/// Result granularity for the mailbox view
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResultType {
    /// Read only the matching messages
    #[value(alias = "m")]
    Messages,
    /// Read whole threads containing a match
    #[value(alias = "t")]
    Threads,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Messages => "messages",
            Self::Threads => "threads",
        })
    }
}

/// Notmuch query syntax selected with `--query`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuerySyntax {
    /// Traditional notmuch infix syntax
    Infix,
    /// S-expression syntax, wrapped as `sexp:"..."`
    Sexp,
}

/// Program name for user-facing messages
///
/// Taken from the basename of `argv[0]`, falling back to the crate name
/// when unavailable.
pub fn prog_name() -> String {
    let argv0 = std::env::args().next().unwrap_or_default();
    Path::new(&argv0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| PROG_NAME.to_owned())
}

/// Kinds of token the pre-pass distinguishes
#[derive(Debug, PartialEq, Eq)]
enum TokenKind {
    /// Known flag without a value; kept for `clap`
    Flag,
    /// Known flag that consumes the next token as its value
    ValueFlag,
    /// Option-like token this program does not recognize
    Unknown,
    /// Plain argument
    Positional,
}

/// Split the raw argument vector into a `clap`-parseable head and the
/// passthrough arguments destined for neomutt
///
/// Tokens are matched exactly against the known surface. `+R` is rewritten
/// to `--read-write`. Everything after a first `--neomutt-args` is captured
/// verbatim, and unrecognized `-`/`+` tokens are collected; the passthrough
/// list is the captured remainder followed by the collected tokens. A bare
/// `--` ends the scan and forwards the rest to `clap` as positionals.
fn normalize_args(argv: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut head: Vec<String> = Vec::with_capacity(argv.len());
    let mut remainder: Vec<String> = Vec::new();
    let mut unknown: Vec<String> = Vec::new();

    let mut iter = argv.into_iter().peekable();
    if let Some(program) = iter.next() {
        head.push(program);
    }

    while let Some(token) = iter.next() {
        if token == "--" {
            head.push(token);
            head.extend(iter.by_ref());
            break;
        }
        if token == "--neomutt-args" {
            remainder.extend(iter.by_ref());
            break;
        }
        if token == "+R" {
            head.push("--read-write".to_owned());
            continue;
        }
        match classify(&token) {
            TokenKind::Flag | TokenKind::Positional => head.push(token),
            TokenKind::ValueFlag => {
                let has_inline_value = token.contains('=');
                head.push(token);
                if !has_inline_value && iter.peek().is_some_and(|next| !looks_like_option(next)) {
                    if let Some(value) = iter.next() {
                        head.push(value);
                    }
                }
            }
            TokenKind::Unknown => unknown.push(token),
        }
    }

    remainder.extend(unknown);
    (head, remainder)
}

fn classify(token: &str) -> TokenKind {
    if !looks_like_option(token) {
        return TokenKind::Positional;
    }
    let name = token.split_once('=').map_or(token, |(name, _)| name);
    if KNOWN_FLAGS.contains(&name) {
        return TokenKind::Flag;
    }
    if KNOWN_VALUE_FLAGS.contains(&name) {
        return TokenKind::ValueFlag;
    }
    // attached short value, e.g. `-tm`
    if name.starts_with("-t") && !name.starts_with("--") && name.len() > 2 {
        return TokenKind::Flag;
    }
    TokenKind::Unknown
}

fn looks_like_option(token: &str) -> bool {
    (token.starts_with('-') || token.starts_with('+')) && token.len() > 1
}

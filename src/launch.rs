//! Command assembly and dispatch
//!
//! Owns the pipeline from parsed arguments to the final neomutt invocation:
//! build the query, the mailbox URL, and the argument vector, honor the
//! `--show*` short-circuits, and finally replace the current process image
//! with neomutt.

use std::process::Command;

use tracing::debug;

use crate::cli::{Cli, ShowMode};
use crate::errors::{AppError, AppResult};
use crate::mailbox::MailboxUrl;
use crate::notmuch;
use crate::query::build_query;

/// Run the launcher
///
/// Follows a fixed precedence: neomutt help first, then the usage check,
/// then each pipeline stage up to its display short-circuit. Work happens
/// only as needed, so `--showquery` never touches the notmuch
/// configuration and the read-only preference is read only when a full
/// command line is actually assembled.
///
/// On the exec paths this function does not return on success.
///
/// # Errors
///
/// Returns usage, configuration, and subprocess errors; `main` maps them
/// to exit codes.
pub fn run(cli: &Cli) -> AppResult<()> {
    if cli.neomutt_help {
        let cmd = build_help_command(&cli.neomutt_exe);
        // --neomutt-help may be combined with --showcmd
        if cli.show_mode() == Some(ShowMode::Command) {
            println!("{}", shell_join(&cmd)?);
            return Ok(());
        }
        return Err(replace_process(&cmd));
    }

    if cli.search_terms.is_empty() {
        return Err(AppError::usage(format!(
            "{} requires at least one search term.",
            crate::cli::prog_name()
        )));
    }
    let query = build_query(&cli.search_terms, cli.query_syntax);
    if cli.show_mode() == Some(ShowMode::Query) {
        println!("{query}");
        return Ok(());
    }

    let mailbox = MailboxUrl {
        mail_root: notmuch::mail_root()?,
        query,
        result_type: cli.result_type,
        limit: cli.limit,
    };
    if cli.show_mode() == Some(ShowMode::Url) {
        println!("{mailbox}");
        return Ok(());
    }

    let read_only = match cli.read_only_override() {
        Some(choice) => choice,
        None => notmuch::config_get_bool(notmuch::READ_ONLY_KEY, true)?.unwrap_or(false),
    };
    let cmd = build_command(&cli.neomutt_exe, read_only, &mailbox.encode(), &cli.neomutt_args);
    if cli.show_mode() == Some(ShowMode::Command) {
        println!("{}", shell_join(&cmd)?);
        return Ok(());
    }
    Err(replace_process(&cmd))
}

/// Build the full neomutt argument vector
///
/// Layout: `[exe, ("-R")?, "-f", url, passthrough...]`.
fn build_command(exe: &str, read_only: bool, url: &str, passthrough: &[String]) -> Vec<String> {
    let mut cmd = vec![exe.to_owned()];
    if read_only {
        cmd.push("-R".to_owned());
    }
    cmd.push("-f".to_owned());
    cmd.push(url.to_owned());
    cmd.extend(passthrough.iter().cloned());
    cmd
}

/// Build the argument vector for neomutt's own help output
fn build_help_command(exe: &str) -> Vec<String> {
    vec![exe.to_owned(), "-h".to_owned()]
}

/// Render an argument vector as one shell-safe line
fn shell_join(cmd: &[String]) -> AppResult<String> {
    shlex::try_join(cmd.iter().map(String::as_str))
        .map_err(|err| AppError::Internal(format!("cannot shell-quote command: {err}")))
}

/// Replace the current process image with the given command
///
/// `execvp(3)` semantics: the executable is looked up on `PATH`, and on
/// success nothing after this call runs. Returns the spawn error otherwise.
#[cfg(unix)]
fn replace_process(cmd: &[String]) -> AppError {
    use std::os::unix::process::CommandExt;

    let Some((exe, args)) = cmd.split_first() else {
        return AppError::Internal("empty command line".to_owned());
    };
    debug!(command = ?cmd, "replacing process image");
    let source = Command::new(exe).args(args).exec();
    AppError::CommandSpawn {
        command: exe.clone(),
        source,
    }
}

/// Closest portable equivalent of process replacement: run the command,
/// wait for it, and exit with its status code.
#[cfg(not(unix))]
fn replace_process(cmd: &[String]) -> AppError {
    let Some((exe, args)) = cmd.split_first() else {
        return AppError::Internal("empty command line".to_owned());
    };
    debug!(command = ?cmd, "running neomutt");
    match Command::new(exe).args(args).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => AppError::CommandSpawn {
            command: exe.clone(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{build_command, build_help_command, shell_join};

    fn passthrough(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|a| (*a).to_owned()).collect()
    }

    #[test]
    fn command_places_read_only_before_the_mailbox() {
        let cmd = build_command("neomutt", true, "notmuch:///m?query=x", &[]);
        assert_eq!(cmd, ["neomutt", "-R", "-f", "notmuch:///m?query=x"]);
    }

    #[test]
    fn command_omits_read_only_when_writable() {
        let cmd = build_command("neomutt", false, "notmuch:///m?query=x", &[]);
        assert_eq!(cmd, ["neomutt", "-f", "notmuch:///m?query=x"]);
    }

    #[test]
    fn passthrough_arguments_come_last_verbatim() {
        let extra = passthrough(&["-e", "set wait_key=no", "+R"]);
        let cmd = build_command("neomutt", false, "notmuch:///m?query=x", &extra);
        assert_eq!(
            cmd,
            ["neomutt", "-f", "notmuch:///m?query=x", "-e", "set wait_key=no", "+R"]
        );
    }

    #[test]
    fn help_command_is_exe_dash_h() {
        assert_eq!(build_help_command("/opt/bin/neomutt"), ["/opt/bin/neomutt", "-h"]);
    }

    #[test]
    fn shell_join_leaves_plain_words_unquoted() {
        let cmd = passthrough(&["neomutt", "-h"]);
        assert_eq!(shell_join(&cmd).expect("joinable"), "neomutt -h");
    }

    #[test]
    fn shell_join_round_trips_through_a_shell_lexer() {
        let cmd = passthrough(&[
            "neomutt",
            "-R",
            "-f",
            "notmuch:///home/user/My Mail?query=tag%3Ainbox%20and%20from%3A%22a%20b%22",
            "-e",
            "set wait_key=no",
        ]);
        let line = shell_join(&cmd).expect("joinable");
        assert_eq!(line.lines().count(), 1);
        assert_eq!(shlex::split(&line).expect("lexable"), cmd);
    }
}

use deployer_core::dispatcher::CommandResult;
use deployer_core::error::DeployError;
use deployer_core::log::{LogLevel, LogSink};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// How much of each output line's tail is dropped before logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTrim {
    /// Only the line terminator.
    Terminator,
    /// Terminator plus any trailing whitespace (remote output).
    TrailingWhitespace,
}

impl LineTrim {
    fn apply<'a>(&self, line: &'a str) -> &'a str {
        match self {
            LineTrim::Terminator => {
                let line = line.strip_suffix('\n').unwrap_or(line);
                line.strip_suffix('\r').unwrap_or(line)
            }
            LineTrim::TrailingWhitespace => line.trim_end(),
        }
    }
}

enum Source {
    Stdout,
    Stderr,
}

/// Spawn `command` and log every output line as `> line` while the process
/// is still running. Stdout lines go to the sink at `Info`, stderr lines at
/// `stderr_level`. Returns once both streams hit EOF and the child has been
/// reaped.
pub async fn stream_process(
    mut command: Command,
    sink: &dyn LogSink,
    trim: LineTrim,
    stderr_level: LogLevel,
) -> Result<CommandResult, DeployError> {
    let program = command.as_std().get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| DeployError::Transport(format!("Failed to spawn {}: {}", program, e)))?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(out), Some(err)) => (out, err),
        _ => return Err(DeployError::Transport("child output was not captured".into())),
    };
    let mut stdout = BufReader::new(stdout);
    let mut stderr = BufReader::new(stderr);
    let (mut out_buf, mut err_buf) = (Vec::new(), Vec::new());
    let (mut out_open, mut err_open) = (true, true);
    let mut lines = 0;

    while out_open || err_open {
        // read_until keeps partial bytes in the buffer when the other branch wins
        let (source, read) = tokio::select! {
            r = stdout.read_until(b'\n', &mut out_buf), if out_open => (Source::Stdout, r),
            r = stderr.read_until(b'\n', &mut err_buf), if err_open => (Source::Stderr, r),
            else => break,
        };
        let (buf, open, level) = match source {
            Source::Stdout => (&mut out_buf, &mut out_open, LogLevel::Info),
            Source::Stderr => (&mut err_buf, &mut err_open, stderr_level),
        };

        match read {
            Ok(n) => {
                if n == 0 {
                    *open = false;
                }
                if !buf.is_empty() {
                    let line = String::from_utf8_lossy(&buf[..]);
                    sink.log(&format!("> {}", trim.apply(&line)), level);
                    buf.clear();
                    lines += 1;
                }
            }
            Err(e) => {
                warn!("Reading output of {} failed: {}", program, e);
                // kill() also reaps the child
                let _ = child.kill().await;
                return Err(DeployError::Io(e));
            }
        }
    }

    let status = child.wait().await?;
    let exit_code = status.code().unwrap_or(-1);
    debug!("{} exited with {} after {} lines", program, exit_code, lines);

    Ok(CommandResult { exit_code, lines })
}

#[cfg(test)]
mod tests {
    use super::LineTrim;

    #[test]
    fn terminator_only_strips_newline() {
        assert_eq!(LineTrim::Terminator.apply("a b  \n"), "a b  ");
        assert_eq!(LineTrim::Terminator.apply("crlf\r\n"), "crlf");
        assert_eq!(LineTrim::Terminator.apply("last"), "last");
    }

    #[test]
    fn trailing_whitespace_strips_everything_after_text() {
        assert_eq!(LineTrim::TrailingWhitespace.apply("a b \t \n"), "a b");
        assert_eq!(LineTrim::TrailingWhitespace.apply("  lead\n"), "  lead");
    }
}

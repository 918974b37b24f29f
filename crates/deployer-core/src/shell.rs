use std::fmt;

/// Characters that force `quote_arg` to quote its input.
const SHELL_META: &[char] = &[
    ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}', '<',
    '>', '|', '&', ';', '#', '~',
];

/// Escape a string into a single shell word. Always single-quotes, so the
/// result is safe for any path or argument coming from outside.
pub fn escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Quote an argument only if it needs it. Used for program names and
/// `user@host`, where plain values should stay readable in the log.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }
    escape(arg)
}

/// Escape every argument and join with single spaces.
pub fn escape_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| escape(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join path segments with exactly one `/` at each seam. Empty segments are
/// skipped; nothing else is normalized. Remote targets are POSIX hosts, so
/// the separator is fixed regardless of where the deployer itself runs.
pub fn concatenate_paths<S: AsRef<str>>(parts: &[S]) -> String {
    let mut result = String::new();
    for part in parts.iter().map(AsRef::as_ref) {
        if part.is_empty() {
            continue;
        }
        if result.is_empty() {
            let trimmed = part.trim_end_matches('/');
            result = if trimmed.is_empty() {
                "/".to_string()
            } else {
                trimmed.to_string()
            };
            continue;
        }
        let trimmed = part.trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        if !result.ends_with('/') {
            result.push('/');
        }
        result.push_str(trimmed);
    }
    result
}

/// A command line made of one or more steps, rendered joined by ` && `.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellCommand {
    steps: Vec<String>,
}

impl ShellCommand {
    pub fn new(step: impl Into<String>) -> Self {
        Self {
            steps: vec![step.into()],
        }
    }

    pub fn chain<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// `<binary> <escaped args...>`. The binary is operator configuration
    /// (it may carry its own flags) and is taken verbatim.
    pub fn program<S: AsRef<str>>(binary: &str, args: &[S]) -> Self {
        if args.is_empty() {
            return Self::new(binary);
        }
        Self::new(format!("{} {}", binary, escape_args(args)))
    }

    /// `cd <escaped dir>` as a first step.
    pub fn cd(directory: &str) -> Self {
        Self::new(format!("cd {}", escape(directory)))
    }

    /// `test <flag> <escaped path>`.
    pub fn test(flag: &str, path: &str) -> Self {
        Self::new(format!("test {} {}", flag, escape(path)))
    }

    pub fn then(mut self, next: ShellCommand) -> Self {
        self.steps.extend(next.steps);
        self
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.steps.join(" && "))
    }
}

impl From<&str> for ShellCommand {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ShellCommand {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

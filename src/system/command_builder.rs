// src/system/command_builder.rs

//! Composes command lines to be typed into a terminal session.
//!
//! Every rule depends on two inputs only: the target [`ShellDialect`] and the
//! [`HostOs`]. [`ShellTarget`] bundles them; [`ShellCommandBuilder`] detects
//! the dialect on each call and hands out a fresh target.

use crate::models::{HostOs, ShellDialect};
use crate::system::shell::{self, CurrentShellHint};

/// Switches the `cmd.exe` code page to UTF-8; gated so a failure stops the line.
const CMD_UTF8_PROLOGUE: &str = "chcp 65001 > nul && ";

/// Switches the PowerShell console output encoding to UTF-8.
const POWERSHELL_UTF8_PROLOGUE: &str = "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; ";

/// Characters that force single-quoting in PowerShell.
const POWERSHELL_QUOTE_TRIGGERS: &[char] = &[' ', '$', '`', ';'];

/// A dialect on a given host. All methods are pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellTarget {
    /// The shell syntax to produce.
    pub dialect: ShellDialect,
    /// The OS the shell runs on.
    pub host: HostOs,
}

impl ShellTarget {
    /// Creates a target for `dialect` running on `host`.
    pub fn new(dialect: ShellDialect, host: HostOs) -> Self {
        Self { dialect, host }
    }

    /// POSIX shells on Windows (Git Bash, WSL) expect forward slashes.
    fn rewrites_separators(&self) -> bool {
        self.dialect.is_posix() && self.host.is_windows()
    }

    /// Makes a path use the separator convention of the target.
    ///
    /// Only POSIX dialects on a Windows host are rewritten; cmd and
    /// PowerShell accept native separators. Idempotent.
    pub fn normalize_path(&self, path: &str) -> String {
        if self.rewrites_separators() {
            path.replace('\\', "/")
        } else {
            path.to_string()
        }
    }

    /// Like [`normalize_path`](Self::normalize_path), but flags are never touched.
    pub fn normalize_arg(&self, token: &str) -> String {
        if token.starts_with('-') {
            token.to_string()
        } else {
            self.normalize_path(token)
        }
    }

    /// Normalizes and quotes a single argument token.
    pub fn escape_arg(&self, token: &str) -> String {
        let token = self.normalize_arg(token);
        match self.dialect {
            ShellDialect::WindowsPowerShell => {
                if token.contains(POWERSHELL_QUOTE_TRIGGERS) {
                    format!("'{}'", token.replace('\'', "''"))
                } else {
                    token
                }
            }
            _ => {
                if token.contains(' ') && !is_quoted(&token) {
                    format!("\"{}\"", token)
                } else {
                    token
                }
            }
        }
    }

    /// Escapes every token and joins them with single spaces.
    pub fn escape_args<S: AsRef<str>>(&self, args: &[S]) -> String {
        args.iter()
            .map(|arg| self.escape_arg(arg.as_ref()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The UTF-8 switch that must precede a command on this target, if any.
    pub fn encoding_prologue(&self) -> &'static str {
        if !self.host.is_windows() {
            return "";
        }
        match self.dialect {
            ShellDialect::WindowsCmd => CMD_UTF8_PROLOGUE,
            ShellDialect::WindowsPowerShell => POWERSHELL_UTF8_PROLOGUE,
            ShellDialect::PosixSh | ShellDialect::PosixBash | ShellDialect::PosixZsh => "",
        }
    }

    /// Assembles `prologue + executable + arguments` into one line.
    ///
    /// An executable containing a space is double-quoted; on PowerShell the
    /// quoted path is prefixed with the call operator `&`.
    pub fn build_command<S: AsRef<str>>(&self, executable: &str, args: &[S]) -> String {
        let exe = self.normalize_path(executable);
        let exe = if exe.contains(' ') && !is_quoted(&exe) {
            format!("\"{}\"", exe)
        } else {
            exe
        };
        let exe = if self.dialect == ShellDialect::WindowsPowerShell && is_quoted(&exe) {
            format!("& {}", exe)
        } else {
            exe
        };

        let mut line = String::from(self.encoding_prologue());
        line.push_str(&exe);
        let escaped = self.escape_args(args);
        if !escaped.is_empty() {
            line.push(' ');
            line.push_str(&escaped);
        }
        line
    }

    /// The separator used between sequenced commands.
    ///
    /// PowerShell runs every command regardless of failures (`; `); every
    /// other dialect stops at the first failure (` && `).
    pub fn command_separator(&self) -> &'static str {
        match self.dialect {
            ShellDialect::WindowsPowerShell => "; ",
            _ => " && ",
        }
    }

    /// Joins pre-built command lines for sequential execution in one session.
    pub fn join_commands<S: AsRef<str>>(&self, commands: &[S]) -> String {
        commands
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(self.command_separator())
    }
}

fn is_quoted(token: &str) -> bool {
    token.starts_with('"') || token.starts_with('\'')
}

/// Builds terminal command lines for whatever shell the hint source reports.
#[derive(Debug, Clone)]
pub struct ShellCommandBuilder<H> {
    host: HostOs,
    hint: H,
}

impl<H: CurrentShellHint> ShellCommandBuilder<H> {
    /// A builder for the running OS.
    pub fn new(hint: H) -> Self {
        Self::for_host(HostOs::current(), hint)
    }

    /// A builder for an explicit host.
    pub fn for_host(host: HostOs, hint: H) -> Self {
        Self { host, hint }
    }

    /// Detects the dialect in effect right now.
    pub fn detect_shell(&self) -> ShellDialect {
        shell::detect_dialect(self.host, &self.hint)
    }

    /// The detected dialect bundled with this builder's host.
    pub fn target(&self) -> ShellTarget {
        ShellTarget::new(self.detect_shell(), self.host)
    }

    /// See [`ShellTarget::escape_args`].
    pub fn escape_args<S: AsRef<str>>(&self, args: &[S]) -> String {
        self.target().escape_args(args)
    }

    /// See [`ShellTarget::build_command`].
    pub fn build_command<S: AsRef<str>>(&self, executable: &str, args: &[S]) -> String {
        let target = self.target();
        let line = target.build_command(executable, args);
        log::debug!("Built {} command: {}", target.dialect, line);
        line
    }

    /// See [`ShellTarget::join_commands`].
    pub fn join_commands<S: AsRef<str>>(&self, commands: &[S]) -> String {
        self.target().join_commands(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::shell::Fixed;

    const ALL_HOSTS: [HostOs; 3] = [HostOs::Windows, HostOs::Linux, HostOs::MacOs];

    fn target(dialect: ShellDialect, host: HostOs) -> ShellTarget {
        ShellTarget::new(dialect, host)
    }

    #[test]
    fn test_plain_token_is_never_quoted() {
        for host in ALL_HOSTS {
            for dialect in ShellDialect::ALL {
                assert_eq!(target(dialect, host).escape_args(&["plain"]), "plain");
            }
        }
    }

    #[test]
    fn test_empty_argument_list_is_empty_string() {
        let empty: [&str; 0] = [];
        for dialect in ShellDialect::ALL {
            assert_eq!(target(dialect, HostOs::Linux).escape_args(&empty), "");
        }
    }

    #[test]
    fn test_powershell_quotes_statement_separator_and_doubles_quotes() {
        let ps = target(ShellDialect::WindowsPowerShell, HostOs::Windows);
        assert!(ps.escape_args(&["a;b"]).contains("'a;b'"));
        assert_eq!(ps.escape_arg("it's a test"), "'it''s a test'");
        assert_eq!(ps.escape_arg("$env:PATH"), "'$env:PATH'");
        assert_eq!(ps.escape_arg("`n"), "'`n'");
        assert_eq!(ps.escape_arg("it's"), "it's");
    }

    #[test]
    fn test_double_quotes_for_spaces_in_other_dialects() {
        for dialect in [
            ShellDialect::WindowsCmd,
            ShellDialect::PosixBash,
            ShellDialect::PosixSh,
            ShellDialect::PosixZsh,
        ] {
            assert_eq!(target(dialect, HostOs::Linux).escape_args(&["a b"]), "\"a b\"");
        }
        let bash = target(ShellDialect::PosixBash, HostOs::Linux);
        assert_eq!(bash.escape_arg("\"already quoted\""), "\"already quoted\"");
        assert_eq!(bash.escape_arg("'single quoted'"), "'single quoted'");
        assert_eq!(bash.escape_arg("a;b"), "a;b");
    }

    #[test]
    fn test_flags_are_not_quoted_or_rewritten() {
        let bash_on_windows = target(ShellDialect::PosixBash, HostOs::Windows);
        assert_eq!(bash_on_windows.escape_arg("--ibconnection"), "--ibconnection");
        assert_eq!(bash_on_windows.normalize_arg("-Path\\x"), "-Path\\x");
        assert_eq!(bash_on_windows.normalize_arg("C:\\src\\cf"), "C:/src/cf");
    }

    #[test]
    fn test_separator_rewrite_only_for_posix_on_windows() {
        let path = "C:\\Program Files\\1cv8\\bin";
        assert_eq!(
            target(ShellDialect::PosixBash, HostOs::Windows).normalize_path(path),
            "C:/Program Files/1cv8/bin"
        );
        assert_eq!(
            target(ShellDialect::WindowsCmd, HostOs::Windows).normalize_path(path),
            path
        );
        assert_eq!(
            target(ShellDialect::WindowsPowerShell, HostOs::Windows).normalize_path(path),
            path
        );
        assert_eq!(
            target(ShellDialect::PosixBash, HostOs::Linux).normalize_path("a\\b"),
            "a\\b"
        );
    }

    #[test]
    fn test_normalize_path_is_idempotent() {
        let t = target(ShellDialect::PosixZsh, HostOs::Windows);
        assert_eq!(t.normalize_path("C:/already/forward"), "C:/already/forward");
        let once = t.normalize_path("C:\\a\\b/c");
        assert_eq!(t.normalize_path(&once), once);
    }

    #[test]
    fn test_encoding_prologue_per_target() {
        assert_eq!(
            target(ShellDialect::WindowsCmd, HostOs::Windows).encoding_prologue(),
            "chcp 65001 > nul && "
        );
        assert_eq!(
            target(ShellDialect::WindowsPowerShell, HostOs::Windows).encoding_prologue(),
            "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; "
        );
        assert_eq!(
            target(ShellDialect::PosixBash, HostOs::Windows).encoding_prologue(),
            ""
        );
        for dialect in ShellDialect::ALL {
            assert_eq!(target(dialect, HostOs::Linux).encoding_prologue(), "");
        }
    }

    #[test]
    fn test_build_command_for_cmd_on_windows() {
        let line = target(ShellDialect::WindowsCmd, HostOs::Windows).build_command(
            "C:\\Program Files\\OneScript\\bin\\vrunner.bat",
            &["init-dev", "--src", "src\\cf", "--ibconnection", "/F./build/ib"],
        );
        assert_eq!(
            line,
            "chcp 65001 > nul && \"C:\\Program Files\\OneScript\\bin\\vrunner.bat\" init-dev --src src\\cf --ibconnection /F./build/ib"
        );
    }

    #[test]
    fn test_build_command_for_bash_on_windows_rewrites_paths() {
        let line = target(ShellDialect::PosixBash, HostOs::Windows)
            .build_command("C:\\tools\\vrunner.bat", &["compile", "--src", "src\\my cf"]);
        assert_eq!(line, "C:/tools/vrunner.bat compile --src \"src/my cf\"");
    }

    #[test]
    fn test_build_command_for_powershell_uses_call_operator_for_quoted_exe() {
        let ps = target(ShellDialect::WindowsPowerShell, HostOs::Windows);
        assert_eq!(
            ps.build_command("C:\\Program Files\\opm\\opm.bat", &["install", "-l"]),
            "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; & \"C:\\Program Files\\opm\\opm.bat\" install -l"
        );
        assert_eq!(
            ps.build_command("opm", &["run", "a;b"]),
            "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; opm run 'a;b'"
        );
    }

    #[test]
    fn test_build_command_without_args_has_no_trailing_space() {
        let empty: [&str; 0] = [];
        assert_eq!(
            target(ShellDialect::PosixSh, HostOs::Linux).build_command("oscript", &empty),
            "oscript"
        );
    }

    #[test]
    fn test_join_commands_separator_law() {
        assert_eq!(
            target(ShellDialect::WindowsPowerShell, HostOs::Windows).join_commands(&["A", "B"]),
            "A; B"
        );
        assert_eq!(
            target(ShellDialect::WindowsCmd, HostOs::Windows).join_commands(&["A", "B"]),
            "A && B"
        );
        assert_eq!(
            target(ShellDialect::PosixBash, HostOs::Linux).join_commands(&["A", "B", "C"]),
            "A && B && C"
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            target(ShellDialect::PosixBash, HostOs::Linux).join_commands(&empty),
            ""
        );
    }

    #[test]
    fn test_builder_detects_dialect_per_call() {
        let builder = ShellCommandBuilder::for_host(HostOs::Windows, Fixed(ShellDialect::WindowsCmd));
        assert_eq!(builder.detect_shell(), ShellDialect::WindowsCmd);
        assert_eq!(builder.join_commands(&["a", "b"]), "a && b");
        assert_eq!(
            builder.build_command("vrunner", &["run"]),
            "chcp 65001 > nul && vrunner run"
        );
        assert_eq!(builder.escape_args(&["x y"]), "\"x y\"");
    }
}

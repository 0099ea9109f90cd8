//! Input source detection.

use std::io::{self, IsTerminal, Read};

use tracing::debug;

use crate::error::InsertError;

/// Terminal state of the current invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    /// Stdin is a pipe or a redirected file.
    pub stdin_piped: bool,
    /// The user may be prompted.
    pub interactive: bool,
    /// Stdout is a terminal.
    pub stdout_terminal: bool,
}

impl Session {
    /// Inspect the process's standard streams.
    ///
    /// Prompts are drawn on stderr, so the session is interactive only when
    /// stderr is a terminal and `--no-interactive` was not given.
    pub fn detect(no_interactive: bool) -> Self {
        let session = Self {
            stdin_piped: stdin_is_piped(),
            interactive: !no_interactive && io::stderr().is_terminal(),
            stdout_terminal: io::stdout().is_terminal(),
        };
        debug!(
            stdin_piped = session.stdin_piped,
            interactive = session.interactive,
            stdout_terminal = session.stdout_terminal,
            "session detected"
        );
        session
    }
}

#[cfg(unix)]
fn stdin_is_piped() -> bool {
    use std::fs::File;
    use std::os::unix::fs::FileTypeExt;
    use std::os::unix::io::AsFd;

    let stdin = io::stdin();
    let Ok(fd) = stdin.as_fd().try_clone_to_owned() else {
        return false;
    };
    match File::from(fd).metadata() {
        Ok(meta) => {
            let kind = meta.file_type();
            kind.is_fifo() || kind.is_file() || kind.is_socket()
        }
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn stdin_is_piped() -> bool {
    !io::stdin().is_terminal()
}

/// Read all of `input`.
///
/// # Errors
///
/// Returns `InsertError::Io` with the number of bytes read before the failure.
pub fn read_piped(input: &mut dyn Read) -> Result<Vec<u8>, InsertError> {
    let mut buf = Vec::new();
    match input.read_to_end(&mut buf) {
        Ok(read) => {
            debug!(bytes = read, "read piped input");
            Ok(buf)
        }
        Err(source) => Err(InsertError::Io {
            read: buf.len(),
            source,
        }),
    }
}

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config;

/// The target archive sits next to the frontend executable.
pub fn archive_path(root: &Path) -> PathBuf {
    root.join(config::ARCHIVE_NAME)
}

/// The one line fed to the command interpreter: runtime invocation, quoted
/// archive path, and at most one quoted forwarded argument. Arguments past
/// the first are dropped by the caller.
pub fn shell_command(archive: &Path, forwarded: Option<&str>) -> String {
    let mut line = format!("{}\"{}\"", config::JAVA_INVOCATION, archive.display());
    if let Some(arg) = forwarded {
        line.push_str(&format!(" \"{arg}\""));
    }
    line
}

/// Starts the archive through a hidden shell. Fire and forget.
pub fn launch(root: &Path, forwarded: Option<&str>) -> Result<()> {
    launch_with(root, forwarded, spawn_shell)
}

pub fn launch_with(
    root: &Path,
    forwarded: Option<&str>,
    spawn: impl FnOnce(&str) -> Result<()>,
) -> Result<()> {
    let archive = archive_path(root);
    if !archive.exists() {
        bail!(
            "Unable to find {}. {} must be located in the same directory to run properly.",
            config::ARCHIVE_NAME,
            config::PRODUCT_NAME,
        );
    }
    spawn(&shell_command(&archive, forwarded))
}

/// Spawns `cmd.exe` with piped stdio and no window, writes the command
/// line, and detaches without waiting on the child.
fn spawn_shell(line: &str) -> Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut cmd = Command::new("cmd.exe");
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped());
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    let mut child = cmd.spawn().context("spawn cmd.exe")?;
    let mut stdin = child.stdin.take().context("cmd.exe stdin unavailable")?;
    writeln!(stdin, "{line}").context("write launch command")?;
    // Dropping the child detaches; the frontend never collects its status.
    Ok(())
}

/*!
 * Clipboard support for treeclip
 *
 * The export is handed to whichever clipboard tool the platform offers,
 * by piping it into the tool's stdin.
 */

use std::env;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;
use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to run the clipboard tool
    #[error("{tool}: {reason}")]
    CommandFailed {
        /// Tool that was invoked
        tool: &'static str,
        /// What went wrong
        reason: String,
    },

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Something that can receive text for the system clipboard
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Clipboard tools treeclip knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux paste buffer, forwarded to the outer terminal
    Tmux,
    /// macOS pasteboard
    MacOS,
    /// Windows clipboard (native or through WSL)
    Windows,
    /// Wayland clipboard
    Wayland,
    /// X11 clipboard with xsel
    Xsel,
    /// X11 clipboard with xclip
    Xclip,
    /// Termux clipboard on Android
    Termux,
}

impl ClipboardProvider {
    /// Command and arguments that read the text from stdin
    fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Windows => ("clip.exe", &[]),
            Self::Wayland => ("wl-copy", &[]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    /// Providers available on this machine, most preferred first
    pub fn detect() -> Vec<Self> {
        let mut providers = Vec::new();

        if command_exists("tmux") && is_tmux_running() {
            providers.push(Self::Tmux);
        }

        let candidates: &[Self] = if cfg!(target_os = "macos") {
            &[Self::MacOS]
        } else if cfg!(target_os = "windows") || env::var("WSL_DISTRO_NAME").is_ok() {
            &[Self::Windows]
        } else if cfg!(target_os = "android") {
            &[Self::Termux]
        } else {
            &[Self::Wayland, Self::Xsel, Self::Xclip]
        };

        providers.extend(
            candidates
                .iter()
                .copied()
                .filter(|provider| command_exists(provider.command().0)),
        );

        providers
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (tool, args) = self.command();
        debug!("copying {} bytes with {}", text.len(), tool);
        pipe_to_command(tool, args, text)
    }
}

/// Copy text to the clipboard
///
/// Uses the first provider [`ClipboardProvider::detect`] reports.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let provider = ClipboardProvider::detect()
        .into_iter()
        .next()
        .ok_or(ClipboardError::NoClipboardFound)?;

    provider.copy_to_clipboard(text)
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| Path::new(&dir).join(command).is_file()) {
            return true;
        }
    }

    // Fall back to running it, for shells that resolve commands elsewhere
    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Spawn `tool`, write `text` to its stdin and wait for it to exit
fn pipe_to_command(tool: &'static str, args: &[&str], text: &str) -> Result<()> {
    let failed = |reason: String| ClipboardError::CommandFailed { tool, reason };

    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| failed(format!("failed to spawn: {}", e)))?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| failed("failed to open stdin".to_string()))?;
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| failed(format!("failed to write: {}", e)))?;
    }
    // Close stdin so the tool sees EOF
    drop(child.stdin.take());

    let status = child
        .wait()
        .map_err(|e| failed(format!("failed to wait: {}", e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(failed(format!("exited with status: {}", status)))
    }
}

/// Check if tmux is running and available for clipboard operations
fn is_tmux_running() -> bool {
    if env::var("TMUX").is_ok() {
        return true;
    }

    Command::new("tmux")
        .args(["list-buffers"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

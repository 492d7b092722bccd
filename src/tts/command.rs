//! Shared plumbing for backends that shell out to a command-line synthesizer.
//!
//! * [`scratch_wav`] hands out a uniquely named `.wav` path that is deleted
//!   when the returned guard drops: on success, on engine failure, on
//!   timeout, and on early `?` returns alike.
//! * [`run`] executes a prepared command with a time budget.  On timeout the
//!   child is killed (`kill_on_drop`) before the error is returned.

use std::process::{Output, Stdio};
use std::time::Duration;

use tempfile::TempPath;
use tokio::process::Command;

use crate::tts::engine::{EngineError, EngineName};

/// Acquire a fresh, unique scratch path for one synthesis call.
///
/// The file exists (empty) when this returns so that no other caller can be
/// handed the same name.
pub(crate) fn scratch_wav(engine: EngineName) -> Result<TempPath, EngineError> {
    tempfile::Builder::new()
        .prefix("speech-")
        .suffix(".wav")
        .tempfile()
        .map(|file| file.into_temp_path())
        .map_err(|e| EngineError::execution(engine, format!("scratch file: {e}")))
}

/// Run `cmd` to completion, bounded by `timeout`.
///
/// A non-zero exit status is an [`EngineError::Execution`] carrying the
/// trimmed stderr of the child.
pub(crate) async fn run(
    engine: EngineName,
    mut cmd: Command,
    timeout: Duration,
) -> Result<Output, EngineError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| EngineError::Timeout {
            engine,
            secs: timeout.as_secs(),
        })?
        .map_err(|e| EngineError::execution(engine, format!("failed to launch: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            output.status.to_string()
        } else {
            format!("{}: {stderr}", output.status)
        };
        return Err(EngineError::execution(engine, message));
    }

    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

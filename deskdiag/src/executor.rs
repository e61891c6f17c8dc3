// ABOUTME: runs one validated command through a controlled shell with a wall-clock bound.
// ABOUTME: every outcome, including timeout and spawn failure, is returned as result data.

use std::process::Stdio;
use std::time::{Duration, Instant};

use deskdiag_common::ExecutionResult;
use tokio::process::Command;
use tracing::{debug, warn};

/// Fixed marker appended when output exceeds the configured cap.
pub const TRUNCATION_MARKER: &str = "\n... (output truncated)";

/// Execute a command string the validator already accepted. The string is
/// passed to the platform shell verbatim so the executed text is exactly the
/// text that was validated.
pub async fn execute(command: &str, timeout: Duration, max_output: usize) -> ExecutionResult {
    let started = Instant::now();
    debug!(command, timeout_secs = timeout.as_secs_f64(), "spawning command");

    let mut cmd = shell_command(command);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    // Backstop for the timeout path: even when the group kill cannot be
    // delivered, dropping the wait future still kills the shell.
    cmd.kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(command, error = %err, "command could not be spawned");
            return ExecutionResult {
                success: false,
                output: String::new(),
                error: Some(format!("Command execution failed: {err}")),
                return_code: None,
                truncated: false,
                duration_ms: started.elapsed().as_millis() as u64,
            };
        }
    };
    let group = child.id();

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => {
            warn!(command, error = %err, "command failed while running");
            return ExecutionResult {
                success: false,
                output: String::new(),
                error: Some(format!("Command execution failed: {err}")),
                return_code: None,
                truncated: false,
                duration_ms: started.elapsed().as_millis() as u64,
            };
        }
        Err(_) => {
            kill_group(group);
            warn!(command, "command timed out and was killed");
            return ExecutionResult {
                success: false,
                output: String::new(),
                error: Some(format!(
                    "Command timed out after {} seconds",
                    timeout.as_secs_f64()
                )),
                return_code: None,
                truncated: false,
                duration_ms: started.elapsed().as_millis() as u64,
            };
        }
    };

    let success = output.status.success();
    let return_code = output.status.code();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    // Failed commands often write only to stderr; fall back so the caller
    // never sees an empty result for a failure that explained itself.
    let raw_output = if stdout.is_empty() && !success {
        stderr.clone()
    } else {
        stdout
    };
    let (output_text, truncated) = truncate_output(&raw_output, max_output);

    debug!(
        command,
        return_code = ?return_code,
        truncated,
        duration_ms = started.elapsed().as_millis() as u64,
        "command finished"
    );

    ExecutionResult {
        success,
        output: output_text,
        error: if stderr.is_empty() { None } else { Some(stderr) },
        return_code,
        truncated,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

/// Cap output at `max_chars` characters (not bytes) and append the fixed
/// marker when anything was dropped.
fn truncate_output(text: &str, max_chars: usize) -> (String, bool) {
    if text.len() <= max_chars {
        return (text.to_string(), false);
    }
    if text.chars().count() <= max_chars {
        return (text.to_string(), false);
    }

    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(TRUNCATION_MARKER);
    (out, true)
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    // Own process group, so the timeout path can kill the shell and
    // anything it forked with one signal.
    cmd.process_group(0);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// SIGKILL the whole process group. The shell is its group leader, so this
/// reaches commands the shell forked rather than exec'd.
#[cfg(not(windows))]
fn kill_group(id: Option<u32>) {
    if let Some(id) = id {
        unsafe { libc::kill(-(id as i32), libc::SIGKILL) };
    }
}

#[cfg(windows)]
fn kill_group(_id: Option<u32>) {}

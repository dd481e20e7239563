// src/exec/launcher.rs

//! Process creation helpers.
//!
//! Every child is started in a process group of its own, so signals reach
//! whatever the shell forked as well. Before exec, every descriptor above
//! stderr is marked close-on-exec, including ones inherited from whoever
//! launched us, so a child only ever sees its own stdio.

use std::io;
use std::process::Stdio;

use anyhow::anyhow;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use crate::errors::{FeedError, Result};

/// A freshly spawned command whose stdout we read.
#[derive(Debug)]
pub struct Launched {
    pub child: Child,
    pub stdout: ChildStdout,
}

/// `/bin/sh -c <cmd>`, isolated with [`isolate`].
pub fn shell_command(cmd: &str) -> Command {
    let mut c = Command::new("/bin/sh");
    c.arg("-c").arg(cmd);
    isolate(&mut c);
    c
}

/// Put the child in its own process group and hide our descriptors from it.
pub fn isolate(command: &mut Command) {
    // Sampled here: sysconf(3) is not async-signal-safe.
    let max_fd = open_max();
    command.process_group(0);
    // SAFETY: the hook runs between fork and exec and only issues
    // close_range(2) and fcntl(2), which are async-signal-safe.
    unsafe {
        command.pre_exec(move || cloexec_from(3, max_fd));
    }
}

fn open_max() -> libc::c_int {
    // SAFETY: sysconf has no memory-safety preconditions.
    let max = unsafe { libc::sysconf(libc::_SC_OPEN_MAX) };
    if max <= 0 {
        1024
    } else {
        libc::c_int::try_from(max).unwrap_or(libc::c_int::MAX)
    }
}

/// Mark every descriptor from `first` upwards close-on-exec.
///
/// Closing them outright would also close the pipe the standard library uses
/// to report exec failures back to the parent.
fn cloexec_from(first: libc::c_int, max_fd: libc::c_int) -> io::Result<()> {
    // SAFETY: plain integer arguments.
    let rc = unsafe {
        libc::syscall(
            libc::SYS_close_range,
            first as libc::c_uint,
            libc::c_uint::MAX,
            libc::CLOSE_RANGE_CLOEXEC,
        )
    };
    if rc == 0 {
        return Ok(());
    }

    // Kernels before 5.9 have no close_range.
    for fd in first..max_fd {
        // SAFETY: fcntl on an unused descriptor just fails with EBADF.
        unsafe {
            libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC);
        }
    }
    Ok(())
}

/// Spawn `cmd` through the shell with its stdout connected to a pipe.
///
/// Stdin is closed and stderr is inherited, so diagnostics of the command
/// end up next to ours.
pub fn spawn_reader(cmd: &str) -> Result<Launched> {
    let mut command = shell_command(cmd);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| FeedError::SpawnError {
        command: cmd.to_string(),
        source,
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("no stdout pipe for '{cmd}'"))?;

    debug!(cmd = %cmd, pid = ?child.id(), "spawned reader process");
    Ok(Launched { child, stdout })
}

/// Spawn `argv` directly (no shell) with its stdin connected to a pipe.
pub fn spawn_writer(argv: &[String]) -> Result<(Child, ChildStdin)> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| FeedError::ConfigError("empty bar command".to_string()))?;

    let mut command = Command::new(program);
    isolate(&mut command);
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| FeedError::SpawnError {
        command: argv.join(" "),
        source,
    })?;

    let stdin = child.stdin.take().ok_or_else(|| {
        FeedError::SinkError(format!("no stdin pipe for '{program}'"))
    })?;

    debug!(program = %program, pid = ?child.id(), "spawned writer process");
    Ok((child, stdin))
}

/// Send `signal` to the process group led by `child`.
///
/// Does nothing once the child has been reaped.
pub fn signal_group(child: &Child, signal: libc::c_int) {
    let Some(pid) = child.id() else {
        return;
    };

    // SAFETY: kill(2) takes plain integers. `pid` is our own unreaped child
    // and leads its group, so neither id can have been recycled.
    let rc = unsafe { libc::kill(-(pid as libc::pid_t), signal) };
    if rc != 0 {
        let error = io::Error::last_os_error();
        // ESRCH: the whole group is already gone.
        if error.raw_os_error() != Some(libc::ESRCH) {
            warn!(pid, signal, error = %error, "failed to signal process group");
        }
    }
}

/// SIGTERM the group of `child` and wait for `child` to exit, without a
/// timeout.
pub async fn terminate(child: &mut Child) {
    signal_group(child, libc::SIGTERM);
    match child.wait().await {
        Ok(status) => debug!(%status, "child terminated"),
        Err(e) => warn!(error = %e, "failed to wait for child"),
    }
}

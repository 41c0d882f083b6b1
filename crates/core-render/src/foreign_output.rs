//! Foreign-output detection via stat snapshots.
//!
//! Portable but coarse, per the design note: stat stdout/stderr before and
//! after each write; if the *next* render's pre-write stat disagrees with
//! the previous post-write stat, something else wrote to the tty in
//! between and the caller should force an `AbandonLine` reset. A platform
//! may additionally check the tty's cursor position if it can; this crate
//! does not.

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
    pub dev: u64,
    pub ino: u64,
    pub size: u64,
    pub mtime: i64,
}

#[cfg(unix)]
fn stat_raw_fd(raw_fd: std::os::fd::RawFd) -> Result<FileStat> {
    use std::fs::File;
    use std::mem::ManuallyDrop;
    use std::os::fd::FromRawFd;
    use std::os::unix::fs::MetadataExt;

    // SAFETY: we never let this `File` close the fd; stdout/stderr are owned
    // by the process, not by us, so the handle is wrapped in `ManuallyDrop`.
    let file = ManuallyDrop::new(unsafe { File::from_raw_fd(raw_fd) });
    let meta = file.metadata()?;
    Ok(FileStat {
        dev: meta.dev(),
        ino: meta.ino(),
        size: meta.size(),
        mtime: meta.mtime(),
    })
}

#[cfg(not(unix))]
fn stat_raw_fd(_raw_fd: i32) -> Result<FileStat> {
    // No portable stat-by-fd on this platform; foreign-output detection is
    // simply disabled (always reports "no change").
    Ok(FileStat::default())
}

pub fn stat_stdout() -> Result<FileStat> {
    #[cfg(unix)]
    {
        use std::os::fd::AsRawFd;
        stat_raw_fd(std::io::stdout().as_raw_fd())
    }
    #[cfg(not(unix))]
    {
        stat_raw_fd(1)
    }
}

pub fn stat_stderr() -> Result<FileStat> {
    #[cfg(unix)]
    {
        use std::os::fd::AsRawFd;
        stat_raw_fd(std::io::stderr().as_raw_fd())
    }
    #[cfg(not(unix))]
    {
        stat_raw_fd(2)
    }
}

/// True if `post` (the stat taken right after the previous render's write)
/// no longer matches `current_pre` (a fresh stat taken just now). A mismatch
/// means some other process wrote to the descriptor between renders.
pub fn foreign_output_detected(post: Option<FileStat>, current_pre: &FileStat) -> bool {
    match post {
        Some(p) => &p != current_pre,
        None => false,
    }
}

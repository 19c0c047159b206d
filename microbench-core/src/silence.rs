//! Output Silencing
//!
//! Benchmarked functions may print. While they run, the process stdout and
//! stderr descriptors are pointed at the null device; the originals are put back
//! when the guard drops, including during unwinding.
//!
//! Redirection is done at the descriptor level, so it also covers writes that
//! bypass `std::io::stdout()` (C libraries, `libc::write`). Only one silenced
//! section can be active in the process at a time.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

static SILENCE_LOCK: Mutex<()> = Mutex::new(());

/// Scoped redirection of stdout and stderr to the null device.
///
/// The redirection is process-wide: output of every thread is discarded while
/// the guard is alive, not only output of the benchmarked code. Under `cargo
/// test` this includes the harness's own `test ... ok` lines from other
/// threads; run with `--test-threads=1` to see all of them.
pub struct OutputSilencer {
    #[cfg(unix)]
    saved: [(libc::c_int, libc::c_int); 2],
    _lock: MutexGuard<'static, ()>,
}

impl OutputSilencer {
    /// Flush pending output and redirect stdout/stderr until the guard drops.
    ///
    /// Blocks while another silencer is active.
    #[cfg(unix)]
    pub fn engage() -> std::io::Result<Self> {
        // A panic while silenced poisons the lock; the descriptors were still
        // restored by Drop, so the lock stays usable.
        let lock = SILENCE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        flush_std();

        let null = unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY | libc::O_CLOEXEC) };
        if null < 0 {
            return Err(std::io::Error::last_os_error());
        }

        let mut saved = [(libc::STDOUT_FILENO, -1), (libc::STDERR_FILENO, -1)];
        let mut result = Ok(());
        for (fd, copy) in saved.iter_mut() {
            let dup = unsafe { libc::dup(*fd) };
            if dup < 0 || unsafe { libc::dup2(null, *fd) } < 0 {
                result = Err(std::io::Error::last_os_error());
                if dup >= 0 {
                    unsafe { libc::close(dup) };
                }
                break;
            }
            *copy = dup;
        }
        unsafe { libc::close(null) };

        let silencer = Self {
            saved,
            _lock: lock,
        };
        // On failure, dropping restores whatever was already redirected
        result.map(|()| silencer)
    }

    /// No descriptor redirection on this platform; output is only serialized.
    #[cfg(not(unix))]
    pub fn engage() -> std::io::Result<Self> {
        let lock = SILENCE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        flush_std();
        Ok(Self { _lock: lock })
    }
}

impl Drop for OutputSilencer {
    fn drop(&mut self) {
        // Anything still buffered belongs to the silenced code
        flush_std();

        #[cfg(unix)]
        for (fd, copy) in self.saved {
            if copy >= 0 {
                unsafe {
                    libc::dup2(copy, fd);
                    libc::close(copy);
                }
            }
        }
    }
}

fn flush_std() {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}

/// Serializes tests that silence output or inspect the standard descriptors.
#[cfg(test)]
pub(crate) fn serial_guard() -> MutexGuard<'static, ()> {
    static SERIAL: Mutex<()> = Mutex::new(());
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn identity(fd: libc::c_int) -> (u64, u64) {
        let mut stat = std::mem::MaybeUninit::<libc::stat>::zeroed();
        let rc = unsafe { libc::fstat(fd, stat.as_mut_ptr()) };
        assert_eq!(rc, 0);
        let stat = unsafe { stat.assume_init() };
        (stat.st_dev as u64, stat.st_ino as u64)
    }

    fn null_identity() -> (u64, u64) {
        let file = std::fs::File::open("/dev/null").unwrap();
        identity(std::os::unix::io::AsRawFd::as_raw_fd(&file))
    }

    #[test]
    fn test_redirects_and_restores() {
        let _serial = serial_guard();
        let before = (identity(1), identity(2));
        {
            let _silencer = OutputSilencer::engage().unwrap();
            assert_eq!(identity(1), null_identity());
            assert_eq!(identity(2), null_identity());
        }
        assert_eq!((identity(1), identity(2)), before);
    }

    #[test]
    fn test_redirection_is_process_wide() {
        let _serial = serial_guard();
        let _silencer = OutputSilencer::engage().unwrap();
        let seen = std::thread::spawn(|| (identity(1), identity(2))).join().unwrap();
        assert_eq!(seen, (null_identity(), null_identity()));
    }

    #[test]
    fn test_restores_on_panic() {
        let _serial = serial_guard();
        let before = (identity(1), identity(2));
        let result = std::panic::catch_unwind(|| {
            let _silencer = OutputSilencer::engage().unwrap();
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!((identity(1), identity(2)), before);

        // Lock is usable again after the poisoning panic
        drop(OutputSilencer::engage().unwrap());
    }
}

//! Raw OS primitives for process priority and termination.
//!
//! Unix uses nice values through `setpriority`/`getpriority` and sends
//! `SIGTERM`. Windows maps nice values onto priority classes and uses
//! `TerminateProcess`.

use crate::error::ControlError;

#[cfg(unix)]
pub use unix_impl::{get_priority, set_priority, terminate};

#[cfg(windows)]
pub use windows_impl::{get_priority, set_priority, terminate};

#[cfg(not(any(unix, windows)))]
pub use fallback_impl::{get_priority, set_priority, terminate};

/// Reject pids the OS would interpret as something other than one process.
///
/// Pid 0 addresses the caller's process group for `kill`, and values above
/// `i32::MAX` turn negative once cast to `pid_t`.
fn checked_pid(pid: u32) -> Result<i32, ControlError> {
    if pid == 0 || pid > i32::MAX as u32 {
        return Err(ControlError::invalid_argument(format!("pid {} is not a single process", pid)));
    }
    Ok(pid as i32)
}

#[cfg(unix)]
mod unix_impl {
    use std::io;

    use super::checked_pid;
    use crate::error::ControlError;

    fn map_os_error(pid: u32, err: io::Error) -> ControlError {
        match err.raw_os_error() {
            Some(libc::ESRCH) => ControlError::NotFound(pid),
            Some(libc::EPERM) | Some(libc::EACCES) => ControlError::PermissionDenied(pid),
            Some(libc::EINVAL) => {
                ControlError::invalid_argument(format!("OS rejected request for pid {}", pid))
            }
            _ => ControlError::Os(err),
        }
    }

    pub fn set_priority(pid: u32, priority: i32) -> Result<(), ControlError> {
        let target = checked_pid(pid)?;

        let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, target as libc::id_t, priority) };
        if rc == 0 {
            Ok(())
        } else {
            Err(map_os_error(pid, io::Error::last_os_error()))
        }
    }

    /// Current nice value, or `None` if the process is gone.
    pub fn get_priority(pid: u32) -> Option<i32> {
        let target = checked_pid(pid).ok()?;

        let value = unsafe { libc::getpriority(libc::PRIO_PROCESS, target as libc::id_t) };
        if value != -1 {
            return Some(value);
        }

        // -1 is also a valid nice value; signal 0 tells the two apart.
        let alive = unsafe { libc::kill(target, 0) } == 0
            || io::Error::last_os_error().raw_os_error() == Some(libc::EPERM);
        alive.then_some(-1)
    }

    pub fn terminate(pid: u32) -> Result<(), ControlError> {
        let target = checked_pid(pid)?;

        let rc = unsafe { libc::kill(target, libc::SIGTERM) };
        if rc == 0 {
            Ok(())
        } else {
            Err(map_os_error(pid, io::Error::last_os_error()))
        }
    }
}

#[cfg(windows)]
mod windows_impl {
    use std::io;

    use winapi::shared::minwindef::DWORD;
    use winapi::shared::winerror::{ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER};
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{
        GetPriorityClass, OpenProcess, SetPriorityClass, TerminateProcess,
    };
    use winapi::um::winbase::{
        ABOVE_NORMAL_PRIORITY_CLASS, BELOW_NORMAL_PRIORITY_CLASS, HIGH_PRIORITY_CLASS,
        IDLE_PRIORITY_CLASS, NORMAL_PRIORITY_CLASS, REALTIME_PRIORITY_CLASS,
    };
    use winapi::um::winnt::{
        HANDLE, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_SET_INFORMATION, PROCESS_TERMINATE,
    };

    use super::checked_pid;
    use crate::error::ControlError;

    struct ProcessHandle(HANDLE);

    impl ProcessHandle {
        fn open(pid: u32, access: DWORD) -> Result<Self, ControlError> {
            checked_pid(pid)?;
            let handle = unsafe { OpenProcess(access, 0, pid) };
            if handle.is_null() {
                Err(map_os_error(pid, io::Error::last_os_error()))
            } else {
                Ok(Self(handle))
            }
        }
    }

    impl Drop for ProcessHandle {
        fn drop(&mut self) {
            unsafe {
                CloseHandle(self.0);
            }
        }
    }

    fn map_os_error(pid: u32, err: io::Error) -> ControlError {
        match err.raw_os_error() {
            Some(code) if code == ERROR_INVALID_PARAMETER as i32 => ControlError::NotFound(pid),
            Some(code) if code == ERROR_ACCESS_DENIED as i32 => ControlError::PermissionDenied(pid),
            _ => ControlError::Os(err),
        }
    }

    fn priority_class(priority: i32) -> DWORD {
        match priority {
            i32::MIN..=-15 => HIGH_PRIORITY_CLASS,
            -14..=-1 => ABOVE_NORMAL_PRIORITY_CLASS,
            0 => NORMAL_PRIORITY_CLASS,
            1..=14 => BELOW_NORMAL_PRIORITY_CLASS,
            _ => IDLE_PRIORITY_CLASS,
        }
    }

    fn nice_value(class: DWORD) -> Option<i32> {
        match class {
            REALTIME_PRIORITY_CLASS => Some(-20),
            HIGH_PRIORITY_CLASS => Some(-15),
            ABOVE_NORMAL_PRIORITY_CLASS => Some(-5),
            NORMAL_PRIORITY_CLASS => Some(0),
            BELOW_NORMAL_PRIORITY_CLASS => Some(5),
            IDLE_PRIORITY_CLASS => Some(19),
            _ => None,
        }
    }

    pub fn set_priority(pid: u32, priority: i32) -> Result<(), ControlError> {
        let handle = ProcessHandle::open(pid, PROCESS_SET_INFORMATION)?;
        if unsafe { SetPriorityClass(handle.0, priority_class(priority)) } == 0 {
            return Err(map_os_error(pid, io::Error::last_os_error()));
        }
        Ok(())
    }

    pub fn get_priority(pid: u32) -> Option<i32> {
        let handle = ProcessHandle::open(pid, PROCESS_QUERY_LIMITED_INFORMATION).ok()?;
        nice_value(unsafe { GetPriorityClass(handle.0) })
    }

    pub fn terminate(pid: u32) -> Result<(), ControlError> {
        let handle = ProcessHandle::open(pid, PROCESS_TERMINATE)?;
        if unsafe { TerminateProcess(handle.0, 1) } == 0 {
            return Err(map_os_error(pid, io::Error::last_os_error()));
        }
        Ok(())
    }
}

#[cfg(not(any(unix, windows)))]
mod fallback_impl {
    use crate::error::ControlError;

    pub fn set_priority(_pid: u32, _priority: i32) -> Result<(), ControlError> {
        Err(ControlError::Unsupported("set_priority"))
    }

    pub fn get_priority(_pid: u32) -> Option<i32> {
        None
    }

    pub fn terminate(_pid: u32) -> Result<(), ControlError> {
        Err(ControlError::Unsupported("terminate"))
    }
}

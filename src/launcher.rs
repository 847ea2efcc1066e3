//! Child process creation and supervision.
//!
//! The parent waits synchronously for the single shell child; there is no
//! timeout and no signal forwarding.

use log::debug;

use crate::command_line::Invocation;
use crate::error::{ScriptError, ScriptResult};

/// Exit code of the finished child, or the reason it never started.
pub type LaunchOutcome = ScriptResult<i32>;

const CREATE_PROCESS_CALL: &str = "Failed to create process";

/// Run `invocation` with PATH overridden and wait for it to exit.
pub fn launch(invocation: &Invocation) -> LaunchOutcome {
    debug!(
        "launch event=spawn program={:?} title={:?}",
        invocation.program, invocation.title
    );
    let code = platform::spawn_and_wait(invocation)?;
    debug!("launch event=exit code={code}");
    Ok(code)
}

#[cfg(not(windows))]
mod platform {
    use std::os::unix::process::ExitStatusExt;
    use std::process::{Command, ExitStatus};

    use super::*;

    pub(super) fn spawn_and_wait(invocation: &Invocation) -> LaunchOutcome {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .env("PATH", &invocation.path_env)
            .spawn()
            .map_err(|err| ScriptError::launch(CREATE_PROCESS_CALL, &err))?;
        debug!("launch event=spawned pid={}", child.id());
        let status = child
            .wait()
            .map_err(|err| ScriptError::launch("Failed to wait for process", &err))?;
        Ok(exit_status_code(status))
    }

    pub(super) fn exit_status_code(status: ExitStatus) -> i32 {
        if let Some(code) = status.code() {
            code
        } else if let Some(sig) = status.signal() {
            128 + sig
        } else {
            1
        }
    }
}

#[cfg(windows)]
mod platform {
    use std::ffi::{OsStr, OsString};
    use std::io;
    use std::os::windows::ffi::OsStrExt;

    use windows::core::{PCWSTR, PWSTR};
    use windows::Win32::Foundation::{CloseHandle, BOOL, HANDLE, WAIT_FAILED, WIN32_ERROR};
    use windows::Win32::System::Threading::{
        CreateProcessW, GetExitCodeProcess, WaitForSingleObject, CREATE_UNICODE_ENVIRONMENT,
        INFINITE, PROCESS_INFORMATION, STARTUPINFOW,
    };

    use super::*;

    /// Closes the wrapped handle on drop.
    struct OwnedHandle(HANDLE);

    impl Drop for OwnedHandle {
        fn drop(&mut self) {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }

    fn wide(value: &OsStr) -> Vec<u16> {
        value.encode_wide().chain(std::iter::once(0)).collect()
    }

    fn win_error(call: &str, err: &windows::core::Error) -> ScriptError {
        // HRESULT_FROM_WIN32 keeps the Win32 code in the low word.
        let code = err.code().0 & 0xFFFF;
        ScriptError::launch(call, &io::Error::from_raw_os_error(code))
    }

    /// A failed wait means the exit code would be read from a live process.
    fn check_wait(event: WIN32_ERROR) -> ScriptResult<()> {
        if event == WAIT_FAILED {
            return Err(win_error(
                "Failed to wait for process",
                &windows::core::Error::from_win32(),
            ));
        }
        Ok(())
    }

    /// Environment block of this process with PATH replaced.
    fn environment_block(path_env: &str) -> Vec<u16> {
        let mut vars: Vec<(OsString, OsString)> = std::env::vars_os()
            .filter(|(key, _)| !key.to_string_lossy().eq_ignore_ascii_case("PATH"))
            .collect();
        vars.push(("PATH".into(), path_env.into()));
        vars.sort_by_key(|(key, _)| key.to_string_lossy().to_uppercase());

        let mut block = Vec::new();
        for (key, value) in vars {
            block.extend(key.encode_wide());
            block.push('=' as u16);
            block.extend(value.encode_wide());
            block.push(0);
        }
        block.push(0);
        block
    }

    pub(super) fn spawn_and_wait(invocation: &Invocation) -> LaunchOutcome {
        let mut command_line = wide(OsStr::new(&invocation.command_line));
        let mut title = wide(OsStr::new(&invocation.title));
        let environment = environment_block(&invocation.path_env);

        let startup = STARTUPINFOW {
            cb: std::mem::size_of::<STARTUPINFOW>() as u32,
            lpTitle: PWSTR(title.as_mut_ptr()),
            ..Default::default()
        };
        let mut info = PROCESS_INFORMATION::default();

        unsafe {
            CreateProcessW(
                PCWSTR::null(),
                PWSTR(command_line.as_mut_ptr()),
                None,
                None,
                BOOL::from(true),
                CREATE_UNICODE_ENVIRONMENT,
                Some(environment.as_ptr().cast()),
                PCWSTR::null(),
                &startup,
                &mut info,
            )
        }
        .map_err(|err| win_error(CREATE_PROCESS_CALL, &err))?;

        let process = OwnedHandle(info.hProcess);
        let _thread = OwnedHandle(info.hThread);
        debug!("launch event=spawned pid={}", info.dwProcessId);

        check_wait(unsafe { WaitForSingleObject(process.0, INFINITE) })?;
        let mut code = 0u32;
        unsafe { GetExitCodeProcess(process.0, &mut code) }
            .map_err(|err| win_error("Failed to get process exit code", &err))?;
        Ok(code as i32)
    }

}

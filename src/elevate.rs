use anyhow::Result;
use std::path::{Path, PathBuf};

/// Decision to re-execute ourselves, kept as a value so the orchestration
/// can be tested without touching the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaunchRequest {
    pub exe: PathBuf,
    pub arguments: String,
    pub elevate: bool,
}

/// Builds the elevated self-relaunch request, forwarding the original
/// arguments verbatim with a single leading space each.
pub fn relaunch_request(exe: &Path, args: &[String]) -> RelaunchRequest {
    let mut arguments = String::new();
    for arg in args {
        arguments.push(' ');
        arguments.push_str(arg);
    }
    RelaunchRequest {
        exe: exe.to_path_buf(),
        arguments,
        elevate: true,
    }
}

/// Whether the current process token is elevated.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    use windows_sys::Win32::Foundation::CloseHandle;
    use windows_sys::Win32::Security::{GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY};
    use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    unsafe {
        let mut token = 0;
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
            return false;
        }
        let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
        let mut returned = 0u32;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            &mut elevation as *mut TOKEN_ELEVATION as *mut _,
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        );
        CloseHandle(token);
        ok != 0 && elevation.TokenIsElevated != 0
    }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}

#[cfg(windows)]
fn wide(value: &std::ffi::OsStr) -> Vec<u16> {
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    value.encode_wide().chain(once(0)).collect()
}

/// Executes the relaunch. Fire and forget: the caller exits right after
/// without waiting on the child or propagating its exit code.
#[cfg(windows)]
pub fn relaunch(request: &RelaunchRequest) -> Result<()> {
    use anyhow::bail;
    use std::ffi::OsStr;
    use windows_sys::Win32::UI::Shell::ShellExecuteW;
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    let verb = wide(OsStr::new(if request.elevate { "runas" } else { "open" }));
    let file = wide(request.exe.as_os_str());
    let params = wide(OsStr::new(&request.arguments));

    let instance = unsafe {
        ShellExecuteW(
            0,
            verb.as_ptr(),
            file.as_ptr(),
            params.as_ptr(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    };
    // Per ShellExecute's contract, values at or below 32 are error codes.
    if instance <= 32 {
        bail!("relaunch of {} failed (code {instance})", request.exe.display());
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn relaunch(request: &RelaunchRequest) -> Result<()> {
    anyhow::bail!(
        "elevated relaunch of {} is only supported on Windows",
        request.exe.display()
    )
}

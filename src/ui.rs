//! Blocking dialogs. Every user-visible outcome of a run goes through one
//! of these two calls; nothing is retried behind them.

#[cfg(windows)]
fn wide(value: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(value).encode_wide().chain(once(0)).collect()
}

#[cfg(windows)]
pub fn alert(title: &str, text: &str) {
    use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONINFORMATION, MB_OK};
    let text = wide(text);
    let title = wide(title);
    unsafe { MessageBoxW(0, text.as_ptr(), title.as_ptr(), MB_OK | MB_ICONINFORMATION) };
}

#[cfg(windows)]
pub fn confirm(title: &str, text: &str) -> bool {
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        MessageBoxW, IDYES, MB_ICONQUESTION, MB_YESNO,
    };
    let text = wide(text);
    let title = wide(title);
    let choice = unsafe { MessageBoxW(0, text.as_ptr(), title.as_ptr(), MB_YESNO | MB_ICONQUESTION) };
    choice == IDYES
}

#[cfg(not(windows))]
pub fn alert(title: &str, text: &str) {
    eprintln!("[{title}] {text}");
}

#[cfg(not(windows))]
pub fn confirm(title: &str, text: &str) -> bool {
    eprintln!("[{title}] {text} (no dialog support here, answering no)");
    false
}

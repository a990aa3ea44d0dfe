use anyhow::Result;
use std::path::Path;

use crate::config;
use crate::registry::{Hive, KeyStore};

/// Command line the association must carry: the current executable's own
/// path, quoted, plus the quoted file placeholder. Recomputed on every run
/// so the association follows the executable if it is moved.
pub fn expected_command(exe: &Path) -> String {
    format!("\"{}\" \"{}\"", exe.display(), config::ARG_PLACEHOLDER)
}

fn command_key(verb: &str) -> String {
    format!("{}\\Shell\\{verb}\\command", config::PROG_ID)
}

/// Command currently stored for the managed extension. Any missing level of
/// the lookup path reads as "no association".
pub fn current_command(store: &impl KeyStore) -> Result<Option<String>> {
    store.get(Hive::ClassesRoot, &command_key("edit"), "")
}

pub fn is_current(store: &impl KeyStore, exe: &Path) -> Result<bool> {
    Ok(current_command(store)?.as_deref() == Some(expected_command(exe).as_str()))
}

/// Writes the full association tree. Requires elevation on a real system;
/// errors propagate to the caller and no partial write is rolled back.
pub fn repair(store: &mut impl KeyStore, exe: &Path) -> Result<()> {
    let expected = expected_command(exe);

    store.set(Hive::ClassesRoot, config::EXTENSION, "", config::PROG_ID)?;
    store.set(
        Hive::ClassesRoot,
        config::PROG_ID,
        "",
        config::FILE_DESCRIPTION,
    )?;
    store.set(
        Hive::ClassesRoot,
        &format!("{}\\DefaultIcon", config::PROG_ID),
        "",
        &format!("\"{}\",1", exe.display()),
    )?;
    store.set(Hive::ClassesRoot, &command_key("open"), "", &expected)?;
    store.set(Hive::ClassesRoot, &command_key("edit"), "", &expected)?;

    apply_user_override(store)?;
    Ok(())
}

/// Per-user overrides can shadow the system association. If the user has a
/// FileExts entry for the extension, point its Progid at ours and drop any
/// stale UserChoice; if the entry does not exist, skip silently.
fn apply_user_override(store: &mut impl KeyStore) -> Result<()> {
    let entry = format!("{}\\{}", config::FILE_EXTS_PATH, config::EXTENSION);
    if !store.exists(Hive::CurrentUser, &entry)? {
        return Ok(());
    }
    store.set(Hive::CurrentUser, &entry, "Progid", config::PROG_ID)?;
    store.delete_tree(Hive::CurrentUser, &format!("{entry}\\UserChoice"))?;
    Ok(())
}

/// Tell the desktop environment the association changed so it takes effect
/// without a restart.
#[cfg(windows)]
pub fn notify_changed() {
    use windows_sys::Win32::UI::Shell::{SHChangeNotify, SHCNE_ASSOCCHANGED, SHCNF_IDLIST};
    unsafe { SHChangeNotify(SHCNE_ASSOCCHANGED, SHCNF_IDLIST, std::ptr::null(), std::ptr::null()) };
}

#[cfg(not(windows))]
pub fn notify_changed() {}

use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn self_path() -> Result<PathBuf> {
    Ok(std::env::current_exe().context("current_exe")?)
}

/// Directory the frontend (and the archive it starts) lives in. The env
/// override exists for development runs from a build directory.
pub fn root_dir() -> Result<PathBuf> {
    if let Ok(dev_root) = std::env::var("POLYGLOT_FRONTEND_ROOT") {
        return Ok(PathBuf::from(dev_root));
    }
    let exe = self_path()?;
    Ok(exe.parent().context("exe has no parent")?.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn root_dir_prefers_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var("POLYGLOT_FRONTEND_ROOT").ok();

        std::env::set_var("POLYGLOT_FRONTEND_ROOT", r"C:\Temp\FrontendRoot");
        let root = root_dir().unwrap();
        assert_eq!(root, PathBuf::from(r"C:\Temp\FrontendRoot"));

        if let Some(v) = prior {
            std::env::set_var("POLYGLOT_FRONTEND_ROOT", v);
        } else {
            std::env::remove_var("POLYGLOT_FRONTEND_ROOT");
        }
    }

    #[test]
    fn root_dir_is_exe_parent_without_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var("POLYGLOT_FRONTEND_ROOT").ok();
        std::env::remove_var("POLYGLOT_FRONTEND_ROOT");

        let root = root_dir().unwrap();
        assert_eq!(root, self_path().unwrap().parent().unwrap());

        if let Some(v) = prior {
            std::env::set_var("POLYGLOT_FRONTEND_ROOT", v);
        }
    }
}

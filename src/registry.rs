use anyhow::Result;

/// Root of a hierarchical key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hive {
    ClassesRoot,
    CurrentUser,
    LocalMachine,
}

/// Injectable view of the system's hierarchical configuration store.
///
/// Paths are backslash-separated relative to a [`Hive`]; the empty value
/// name addresses a key's default value. `set` creates missing intermediate
/// keys, `delete_tree` tolerates an absent path, and `get` returns `None`
/// for any missing level of the lookup rather than failing.
pub trait KeyStore {
    fn get(&self, hive: Hive, path: &str, name: &str) -> Result<Option<String>>;
    fn set(&mut self, hive: Hive, path: &str, name: &str, value: &str) -> Result<()>;
    fn delete_tree(&mut self, hive: Hive, path: &str) -> Result<()>;
    fn exists(&self, hive: Hive, path: &str) -> Result<bool>;
}

/// In-memory [`KeyStore`] with the same create/lookup semantics as the
/// registry. Records every mutation so tests can assert on write traffic.
#[cfg(test)]
pub struct MemoryKeyStore {
    keys: std::collections::BTreeMap<(Hive, String), std::collections::BTreeMap<String, String>>,
    pub writes: Vec<(Hive, String, String, String)>,
    pub deletes: Vec<(Hive, String)>,
}

#[cfg(test)]
impl MemoryKeyStore {
    pub fn new() -> Self {
        Self {
            keys: std::collections::BTreeMap::new(),
            writes: Vec::new(),
            deletes: Vec::new(),
        }
    }

    /// Pre-create a key without recording a write (test fixture setup).
    pub fn seed_key(&mut self, hive: Hive, path: &str) {
        self.ensure_key(hive, path);
    }

    /// Pre-populate a value without recording a write (test fixture setup).
    pub fn seed_value(&mut self, hive: Hive, path: &str, name: &str, value: &str) {
        self.ensure_key(hive, path);
        self.keys
            .get_mut(&(hive, path.to_string()))
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn write_count(&self) -> usize {
        self.writes.len() + self.deletes.len()
    }

    fn ensure_key(&mut self, hive: Hive, path: &str) {
        let mut ancestor = String::new();
        for part in path.split('\\') {
            if !ancestor.is_empty() {
                ancestor.push('\\');
            }
            ancestor.push_str(part);
            self.keys
                .entry((hive, ancestor.clone()))
                .or_insert_with(std::collections::BTreeMap::new);
        }
    }
}

#[cfg(test)]
impl KeyStore for MemoryKeyStore {
    fn get(&self, hive: Hive, path: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .keys
            .get(&(hive, path.to_string()))
            .and_then(|values| values.get(name))
            .cloned())
    }

    fn set(&mut self, hive: Hive, path: &str, name: &str, value: &str) -> Result<()> {
        self.ensure_key(hive, path);
        self.keys
            .get_mut(&(hive, path.to_string()))
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self.writes
            .push((hive, path.to_string(), name.to_string(), value.to_string()));
        Ok(())
    }

    fn delete_tree(&mut self, hive: Hive, path: &str) -> Result<()> {
        let prefix = format!("{path}\\");
        let doomed: Vec<(Hive, String)> = self
            .keys
            .keys()
            .filter(|(h, p)| *h == hive && (p == path || p.starts_with(&prefix)))
            .cloned()
            .collect();
        if doomed.is_empty() {
            return Ok(());
        }
        for key in doomed {
            self.keys.remove(&key);
        }
        self.deletes.push((hive, path.to_string()));
        Ok(())
    }

    fn exists(&self, hive: Hive, path: &str) -> Result<bool> {
        Ok(self.keys.contains_key(&(hive, path.to_string())))
    }
}

/// [`KeyStore`] backed by the Windows registry. String values only; that is
/// all a file association needs.
#[cfg(windows)]
pub struct WindowsKeyStore;

#[cfg(windows)]
impl WindowsKeyStore {
    fn root(hive: Hive) -> windows_sys::Win32::System::Registry::HKEY {
        use windows_sys::Win32::System::Registry::{
            HKEY_CLASSES_ROOT, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
        };
        match hive {
            Hive::ClassesRoot => HKEY_CLASSES_ROOT,
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        }
    }
}

#[cfg(windows)]
fn wide(value: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(value).encode_wide().chain(once(0)).collect()
}

#[cfg(windows)]
impl KeyStore for WindowsKeyStore {
    fn get(&self, hive: Hive, path: &str, name: &str) -> Result<Option<String>> {
        use anyhow::bail;
        use windows_sys::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND};
        use windows_sys::Win32::System::Registry::{
            RegCloseKey, RegOpenKeyExW, RegQueryValueExW, KEY_READ,
        };

        let sub = wide(path);
        let mut key = 0;
        let rc = unsafe { RegOpenKeyExW(Self::root(hive), sub.as_ptr(), 0, KEY_READ, &mut key) };
        if rc == ERROR_FILE_NOT_FOUND || rc == ERROR_PATH_NOT_FOUND {
            return Ok(None);
        }
        if rc != 0 {
            bail!("open key {path} failed (code {rc})");
        }

        let value_name = wide(name);
        let mut size: u32 = 0;
        let rc = unsafe {
            RegQueryValueExW(
                key,
                value_name.as_ptr(),
                std::ptr::null(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                &mut size,
            )
        };
        if rc == ERROR_FILE_NOT_FOUND {
            unsafe { RegCloseKey(key) };
            return Ok(None);
        }
        if rc != 0 {
            unsafe { RegCloseKey(key) };
            bail!("query value {name:?} under {path} failed (code {rc})");
        }

        let mut buf: Vec<u16> = vec![0; (size as usize + 1) / 2];
        let rc = unsafe {
            RegQueryValueExW(
                key,
                value_name.as_ptr(),
                std::ptr::null(),
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut u8,
                &mut size,
            )
        };
        unsafe { RegCloseKey(key) };
        if rc != 0 {
            bail!("read value {name:?} under {path} failed (code {rc})");
        }
        while buf.last() == Some(&0) {
            buf.pop();
        }
        Ok(Some(String::from_utf16_lossy(&buf)))
    }

    fn set(&mut self, hive: Hive, path: &str, name: &str, value: &str) -> Result<()> {
        use anyhow::bail;
        use windows_sys::Win32::System::Registry::{
            RegCloseKey, RegCreateKeyExW, RegSetValueExW, KEY_WRITE, REG_OPTION_NON_VOLATILE,
            REG_SZ,
        };

        let sub = wide(path);
        let mut key = 0;
        let rc = unsafe {
            RegCreateKeyExW(
                Self::root(hive),
                sub.as_ptr(),
                0,
                std::ptr::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_WRITE,
                std::ptr::null(),
                &mut key,
                std::ptr::null_mut(),
            )
        };
        if rc != 0 {
            bail!("create key {path} failed (code {rc})");
        }

        let value_name = wide(name);
        let data = wide(value);
        let rc = unsafe {
            RegSetValueExW(
                key,
                value_name.as_ptr(),
                0,
                REG_SZ,
                data.as_ptr() as *const u8,
                (data.len() * 2) as u32,
            )
        };
        unsafe { RegCloseKey(key) };
        if rc != 0 {
            bail!("set value {name:?} under {path} failed (code {rc})");
        }
        Ok(())
    }

    fn delete_tree(&mut self, hive: Hive, path: &str) -> Result<()> {
        use anyhow::bail;
        use windows_sys::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND};
        use windows_sys::Win32::System::Registry::RegDeleteTreeW;

        let sub = wide(path);
        let rc = unsafe { RegDeleteTreeW(Self::root(hive), sub.as_ptr()) };
        if rc == ERROR_FILE_NOT_FOUND || rc == ERROR_PATH_NOT_FOUND || rc == 0 {
            return Ok(());
        }
        bail!("delete key {path} failed (code {rc})");
    }

    fn exists(&self, hive: Hive, path: &str) -> Result<bool> {
        use anyhow::bail;
        use windows_sys::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND};
        use windows_sys::Win32::System::Registry::{RegCloseKey, RegOpenKeyExW, KEY_READ};

        let sub = wide(path);
        let mut key = 0;
        let rc = unsafe { RegOpenKeyExW(Self::root(hive), sub.as_ptr(), 0, KEY_READ, &mut key) };
        if rc == ERROR_FILE_NOT_FOUND || rc == ERROR_PATH_NOT_FOUND {
            return Ok(false);
        }
        if rc != 0 {
            bail!("open key {path} failed (code {rc})");
        }
        unsafe { RegCloseKey(key) };
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_tolerates_missing_key_and_value() {
        let store = MemoryKeyStore::new();
        assert_eq!(store.get(Hive::ClassesRoot, "Nope", "").unwrap(), None);
    }

    #[test]
    fn set_creates_intermediate_keys() {
        let mut store = MemoryKeyStore::new();
        store
            .set(Hive::ClassesRoot, "A\\B\\C", "", "value")
            .unwrap();
        assert!(store.exists(Hive::ClassesRoot, "A").unwrap());
        assert!(store.exists(Hive::ClassesRoot, "A\\B").unwrap());
        assert_eq!(
            store.get(Hive::ClassesRoot, "A\\B\\C", "").unwrap(),
            Some("value".to_string())
        );
    }

    #[test]
    fn delete_tree_removes_descendants_and_tolerates_absence() {
        let mut store = MemoryKeyStore::new();
        store.set(Hive::CurrentUser, "A\\B", "", "v").unwrap();
        store.set(Hive::CurrentUser, "A\\B\\C", "", "v").unwrap();
        store.delete_tree(Hive::CurrentUser, "A\\B").unwrap();
        assert!(!store.exists(Hive::CurrentUser, "A\\B").unwrap());
        assert!(!store.exists(Hive::CurrentUser, "A\\B\\C").unwrap());
        assert!(store.exists(Hive::CurrentUser, "A").unwrap());
        store.delete_tree(Hive::CurrentUser, "A\\B").unwrap();
    }

    #[test]
    fn hives_are_isolated() {
        let mut store = MemoryKeyStore::new();
        store.set(Hive::ClassesRoot, "Same", "", "v").unwrap();
        assert!(!store.exists(Hive::CurrentUser, "Same").unwrap());
    }
}

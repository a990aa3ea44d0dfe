use anyhow::Result;
use std::path::Path;

use crate::elevate::{self, RelaunchRequest};
use crate::registry::KeyStore;
use crate::{association, config, java};

pub const JAVA_TITLE: &str = "Java Required";
pub const ASSOCIATION_TITLE: &str = "File Association";

pub fn java_missing_message() -> String {
    format!(
        "Java is not installed. Please download/install the JVM (https://java.com/download) to use {}.",
        config::app_name()
    )
}

pub fn association_prompt() -> String {
    format!(
        "{} files are not currently configured to open with {}. Would you like to do so? (permission escalation will appear)",
        config::EXTENSION,
        config::app_name()
    )
}

pub fn launch_failure_message(cause: &dyn std::fmt::Display) -> String {
    format!(
        "Unable to start {} via front end due to:\n{}\n Please start via jar file.",
        config::app_name(),
        cause
    )
}

/// What this run should do next. Returned as a value so the decision logic
/// is testable apart from the OS calls that carry it out.
#[derive(Debug, PartialEq, Eq)]
pub enum Plan {
    /// No Java runtime; show the dialog and do nothing else.
    AbortMissingRuntime,
    /// Re-execute ourselves elevated; this run never launches the archive.
    Relaunch(RelaunchRequest),
    /// Start the archive, having repaired the association or not.
    Launch { repaired: bool },
}

/// The frontend's decision sequence: check the runtime, check the
/// association, then repair / offer elevation / do nothing, in that order.
///
/// `prompt` asks the yes/no elevation question; `assoc_changed` broadcasts
/// the shell notification and runs only after a successful repair.
pub fn plan(
    store: &mut impl KeyStore,
    elevated: bool,
    exe: &Path,
    args: &[String],
    mut prompt: impl FnMut(&str, &str) -> bool,
    assoc_changed: impl FnOnce(),
) -> Result<Plan> {
    if !java::runtime_present(store)? {
        return Ok(Plan::AbortMissingRuntime);
    }

    if association::is_current(store, exe)? {
        return Ok(Plan::Launch { repaired: false });
    }

    if !elevated {
        // Only escalate if the user chooses to; declining is not an error
        // and the association stays untouched this run.
        if prompt(ASSOCIATION_TITLE, &association_prompt()) {
            return Ok(Plan::Relaunch(elevate::relaunch_request(exe, args)));
        }
        return Ok(Plan::Launch { repaired: false });
    }

    association::repair(store, exe)?;
    assoc_changed();
    Ok(Plan::Launch { repaired: true })
}

#[cfg(windows)]
pub fn run(args: &[String]) -> Result<()> {
    use crate::{launcher, logging, paths, registry, ui};

    let exe = paths::self_path()?;
    let root = paths::root_dir()?;
    let _ = logging::init(&root);

    let mut store = registry::WindowsKeyStore;
    let decision = plan(
        &mut store,
        elevate::is_elevated(),
        &exe,
        args,
        ui::confirm,
        association::notify_changed,
    )?;

    match decision {
        Plan::AbortMissingRuntime => {
            logging::append(&root, "no java runtime registered, aborting");
            ui::alert(JAVA_TITLE, &java_missing_message());
            Ok(())
        }
        Plan::Relaunch(request) => {
            logging::append(&root, "relaunching elevated to repair the file association");
            elevate::relaunch(&request)
        }
        Plan::Launch { repaired } => {
            if repaired {
                logging::append(&root, "file association repaired");
            }
            let forwarded = args.first().map(String::as_str);
            if let Err(err) = launcher::launch(&root, forwarded) {
                logging::append(&root, &format!("launch failed: {err:#}"));
                ui::alert(config::PRODUCT_NAME, &launch_failure_message(&err));
            }
            Ok(())
        }
    }
}

#[cfg(not(windows))]
pub fn run(_args: &[String]) -> Result<()> {
    anyhow::bail!("{} only runs on Windows", config::PRODUCT_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Hive, MemoryKeyStore};
    use std::path::PathBuf;

    fn exe() -> PathBuf {
        PathBuf::from(r"C:\Apps\PolyGlot\polyglot-frontend.exe")
    }

    fn store_with_java() -> MemoryKeyStore {
        let mut store = MemoryKeyStore::new();
        store.seed_value(Hive::LocalMachine, config::JAVA_RUNTIME_KEY, "CurrentVersion", "1.8");
        store
    }

    fn seed_current_association(store: &mut MemoryKeyStore) {
        store.seed_value(
            Hive::ClassesRoot,
            &format!("{}\\Shell\\edit\\command", config::PROG_ID),
            "",
            &association::expected_command(&exe()),
        );
    }

    #[test]
    fn missing_runtime_aborts_without_writes() {
        let mut store = MemoryKeyStore::new();
        let decision = plan(&mut store, true, &exe(), &[], |_, _| panic!("no prompt"), || {
            panic!("no notification")
        })
        .unwrap();
        assert_eq!(decision, Plan::AbortMissingRuntime);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn current_association_launches_without_prompt_or_write() {
        let mut store = store_with_java();
        seed_current_association(&mut store);
        let decision = plan(&mut store, false, &exe(), &[], |_, _| panic!("no prompt"), || {
            panic!("no notification")
        })
        .unwrap();
        assert_eq!(decision, Plan::Launch { repaired: false });
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn stale_unprivileged_accepted_prompt_relaunches() {
        let mut store = store_with_java();
        let args = vec!["words.pgd".to_string(), "extra".to_string()];
        let mut prompts = 0;
        let decision = plan(
            &mut store,
            false,
            &exe(),
            &args,
            |title, text| {
                prompts += 1;
                assert_eq!(title, ASSOCIATION_TITLE);
                assert!(text.contains(".pgd"));
                true
            },
            || panic!("no notification"),
        )
        .unwrap();

        assert_eq!(prompts, 1);
        assert_eq!(store.write_count(), 0);
        match decision {
            Plan::Relaunch(request) => {
                assert!(request.elevate);
                assert_eq!(request.exe, exe());
                assert_eq!(request.arguments, " words.pgd extra");
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn stale_unprivileged_declined_prompt_launches_unrepaired() {
        let mut store = store_with_java();
        let decision = plan(&mut store, false, &exe(), &[], |_, _| false, || {
            panic!("no notification")
        })
        .unwrap();
        assert_eq!(decision, Plan::Launch { repaired: false });
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn stale_elevated_repairs_and_notifies() {
        let mut store = store_with_java();
        let mut notified = 0;
        let decision = plan(
            &mut store,
            true,
            &exe(),
            &[],
            |_, _| panic!("no prompt when elevated"),
            || notified += 1,
        )
        .unwrap();
        assert_eq!(decision, Plan::Launch { repaired: true });
        assert_eq!(notified, 1);
        assert!(association::is_current(&store, &exe()).unwrap());
    }

    #[test]
    fn launch_failure_message_carries_cause_and_hint() {
        let msg = launch_failure_message(&"boom");
        assert!(msg.contains("boom"));
        assert!(msg.contains("Please start via jar file."));
    }
}

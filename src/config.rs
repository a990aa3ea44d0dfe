// Branding and association constants generated from config.toml.
include!(concat!(env!("OUT_DIR"), "/frontend_config.rs"));

/// Presence of this HKLM key is how the frontend decides Java is installed.
pub const JAVA_RUNTIME_KEY: &str = "SOFTWARE\\JavaSoft\\Java Runtime Environment";

/// Per-user association overrides live under this HKCU path.
pub const FILE_EXTS_PATH: &str =
    "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\FileExts";

/// Prefix of the one line fed to the command interpreter.
pub const JAVA_INVOCATION: &str = "java -jar ";

/// Placeholder the shell substitutes with the opened file's path.
pub const ARG_PLACEHOLDER: &str = "%1";

/// The downstream application's name as shown in dialogs ("PolyGlot", from
/// "PolyGlot.jar").
pub fn app_name() -> &'static str {
    ARCHIVE_NAME.strip_suffix(".jar").unwrap_or(ARCHIVE_NAME)
}

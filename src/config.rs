//! Build configuration.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Environment variable naming the rule-set compiler executable.
pub const COMPILER_ENV: &str = "SINGBOX_BIN";

/// Compiler executable used when [`COMPILER_ENV`] is unset.
pub const DEFAULT_COMPILER: &str = "sing-box";

/// Default directory holding the `.list` inputs.
pub const DEFAULT_UPSTREAM_DIR: &str = "upstream";

/// Default directory receiving the intermediate JSON sources.
pub const DEFAULT_INTERMEDIATE_DIR: &str = "temp_json";

/// Default directory receiving the compiled `.srs` artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Suffix of input list files, without the dot.
pub const LIST_EXTENSION: &str = "list";

/// Extension of intermediate source documents.
pub const SOURCE_EXTENSION: &str = "json";

/// Extension of compiled rule-set artifacts.
pub const ARTIFACT_EXTENSION: &str = "srs";

/// Configuration for a [`Pipeline`](crate::Pipeline) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory scanned (non-recursively) for list files
    pub upstream_dir: PathBuf,
    /// Directory receiving `<base>.json`
    pub intermediate_dir: PathBuf,
    /// Directory receiving `<base>.srs`
    pub output_dir: PathBuf,
    /// Rule-set compiler executable (path or name on `PATH`)
    pub compiler: PathBuf,
    /// Suffix of list files, without the dot
    pub list_extension: String,
}

impl BuildConfig {
    /// Create a config with the given directories and the default compiler.
    pub fn new(
        upstream_dir: impl Into<PathBuf>,
        intermediate_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            upstream_dir: upstream_dir.into(),
            intermediate_dir: intermediate_dir.into(),
            output_dir: output_dir.into(),
            compiler: PathBuf::from(DEFAULT_COMPILER),
            list_extension: LIST_EXTENSION.to_string(),
        }
    }

    /// Default directories, compiler taken from `SINGBOX_BIN` if set.
    pub fn from_env() -> Self {
        Self::default().with_compiler(compiler_from(env::var_os(COMPILER_ENV)))
    }

    /// Set the compiler executable.
    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Set the list file suffix (without the dot).
    pub fn with_list_extension(mut self, extension: impl Into<String>) -> Self {
        self.list_extension = extension.into();
        self
    }

    /// Whether a file name carries the list suffix.
    ///
    /// Compared on raw bytes, so non-UTF-8 names are matched too.
    pub fn is_list_file_name(&self, name: impl AsRef<OsStr>) -> bool {
        let suffix = format!(".{}", self.list_extension);
        name.as_ref().as_encoded_bytes().ends_with(suffix.as_bytes())
    }

    /// Path of the intermediate source for a base name.
    pub fn source_path(&self, base: impl AsRef<OsStr>) -> PathBuf {
        join_with_extension(&self.intermediate_dir, base.as_ref(), SOURCE_EXTENSION)
    }

    /// Path of the compiled artifact for a base name.
    pub fn artifact_path(&self, base: impl AsRef<OsStr>) -> PathBuf {
        join_with_extension(&self.output_dir, base.as_ref(), ARTIFACT_EXTENSION)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_UPSTREAM_DIR,
            DEFAULT_INTERMEDIATE_DIR,
            DEFAULT_OUTPUT_DIR,
        )
    }
}

/// Resolve the compiler from an optional environment value.
fn compiler_from(value: Option<OsString>) -> PathBuf {
    value
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILER))
}

// `Path::with_extension` would clobber dots inside the base name.
fn join_with_extension(dir: &Path, base: &OsStr, extension: &str) -> PathBuf {
    let mut name = base.to_os_string();
    name.push(".");
    name.push(extension);
    dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.upstream_dir, PathBuf::from("upstream"));
        assert_eq!(config.intermediate_dir, PathBuf::from("temp_json"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.compiler, PathBuf::from("sing-box"));
        assert_eq!(config.list_extension, "list");
    }

    #[test]
    fn test_compiler_from_env_value() {
        assert_eq!(compiler_from(None), PathBuf::from("sing-box"));
        assert_eq!(
            compiler_from(Some(OsString::from("/opt/sing-box/bin/sing-box"))),
            PathBuf::from("/opt/sing-box/bin/sing-box")
        );
    }

    #[test]
    fn test_list_file_name() {
        let config = BuildConfig::default();
        assert!(config.is_list_file_name("private.list"));
        assert!(config.is_list_file_name("cn.v4.list"));
        assert!(config.is_list_file_name(".list"));
        assert!(!config.is_list_file_name("list"));
        assert!(!config.is_list_file_name("private.lists"));
        assert!(!config.is_list_file_name("private.txt"));
        assert!(!config.is_list_file_name("privatelist"));
    }

    #[test]
    fn test_derived_paths() {
        let config = BuildConfig::default();
        assert_eq!(
            config.source_path("blocklist"),
            PathBuf::from("temp_json/blocklist.json")
        );
        assert_eq!(
            config.artifact_path("blocklist"),
            PathBuf::from("output/blocklist.srs")
        );
        assert_eq!(
            config.artifact_path("cn.v4"),
            PathBuf::from("output/cn.v4.srs")
        );
    }

    #[test]
    fn test_builders() {
        let config = BuildConfig::new("in", "tmp", "out")
            .with_compiler("/usr/local/bin/sing-box")
            .with_list_extension("txt");
        assert_eq!(config.compiler, PathBuf::from("/usr/local/bin/sing-box"));
        assert!(config.is_list_file_name("a.txt"));
        assert!(!config.is_list_file_name("a.list"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let config = BuildConfig::default();
        assert!(config.is_list_file_name(OsStr::from_bytes(b"cn\xff.list")));
        assert!(!config.is_list_file_name(OsStr::from_bytes(b"cn\xff.lis\xff")));

        let path = config.artifact_path(OsStr::from_bytes(b"cn\xff"));
        assert_eq!(path.file_name().unwrap().as_bytes(), b"cn\xff.srs");
        assert_ne!(path, config.artifact_path(OsStr::from_bytes(b"cn\xfe")));
    }
}

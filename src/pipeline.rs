//! Directory-level build driver.
//!
//! Each list file in the upstream directory goes through read → build →
//! compile on its own. Files are processed one at a time in directory
//! listing order and the first failure stops the run; artifacts already
//! built are left in place.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler::{compile_source, RuleSetCompiler};
use crate::config::BuildConfig;
use crate::converter::{ListReader, SourceDocument};
use crate::{Error, Result};

/// Paths involved in building one list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Base name shared by all three files
    pub base: OsString,
    /// Input `.list` file
    pub list_path: PathBuf,
    /// Intermediate `.json` source
    pub source_path: PathBuf,
    /// Compiled `.srs` artifact
    pub output_path: PathBuf,
}

impl BuildTarget {
    /// Target for a single list file with an explicit output path.
    ///
    /// The intermediate source defaults to `output` with a `.json`
    /// extension. A source path equal to the output path is rejected, since
    /// the compiler would read and write the same file.
    pub fn for_output(
        list_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        source_path: Option<PathBuf>,
    ) -> Result<Self> {
        let list_path = list_path.into();
        let output_path = output_path.into();
        let source_path = source_path.unwrap_or_else(|| output_path.with_extension("json"));

        if source_path == output_path {
            return Err(Error::Config(format!(
                "intermediate source and output are the same file: {:?}",
                output_path
            )));
        }

        Ok(Self {
            base: base_name(&list_path),
            list_path,
            source_path,
            output_path,
        })
    }
}

/// File name without its last extension, kept byte for byte.
fn base_name(list_path: &Path) -> OsString {
    list_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default()
}

/// Result of a [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    /// The upstream directory held no list files; nothing was written.
    NoInputs,
    /// Every discovered list file was built, in this order.
    Built(Vec<BuildTarget>),
}

/// Sequential list → source → artifact driver.
pub struct Pipeline<C> {
    config: BuildConfig,
    compiler: C,
}

impl<C: RuleSetCompiler> Pipeline<C> {
    /// Create a pipeline with the given configuration and compiler.
    pub fn new(config: BuildConfig, compiler: C) -> Self {
        Self { config, compiler }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// List files in the upstream directory, in listing order.
    ///
    /// Only regular files directly inside the directory are returned.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.upstream_dir;
        let read_dir_err = |source| Error::ReadDir {
            path: dir.clone(),
            source,
        };

        let mut lists = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            if !self.config.is_list_file_name(entry.file_name()) {
                continue;
            }

            let path = entry.path();
            // Follows symlinks
            if !path.is_file() {
                log::debug!("Skipping non-file entry {:?}", path);
                continue;
            }
            lists.push(path);
        }

        Ok(lists)
    }

    /// Derive the intermediate and output paths for a list file.
    pub fn target_for(&self, list_path: &Path) -> BuildTarget {
        let base = base_name(list_path);

        BuildTarget {
            source_path: self.config.source_path(&base),
            output_path: self.config.artifact_path(&base),
            list_path: list_path.to_path_buf(),
            base,
        }
    }

    /// Build a single list file into its artifact.
    pub fn build_one(&self, list_path: &Path) -> Result<BuildTarget> {
        let target = self.target_for(list_path);
        self.build_target(&target)?;
        Ok(target)
    }

    /// Build a single target whose paths are already decided.
    pub fn build_target(&self, target: &BuildTarget) -> Result<()> {
        let addresses = ListReader::read_file(&target.list_path)?;
        let doc = SourceDocument::from_addresses(addresses);
        compile_source(&doc, &target.source_path, &target.output_path, &self.compiler)?;

        log::info!(
            "Compiled {} rules from {:?} into {:?}",
            doc.len(),
            target.list_path,
            target.output_path
        );
        Ok(())
    }

    /// Create the intermediate and output directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.config.output_dir)?;
        fs::create_dir_all(&self.config.intermediate_dir)?;
        Ok(())
    }

    /// Build every list file, stopping at the first failure.
    ///
    /// `on_built` is called after each artifact is produced, before the next
    /// file is started.
    pub fn run<F>(&self, mut on_built: F) -> Result<RunSummary>
    where
        F: FnMut(&BuildTarget),
    {
        self.ensure_dirs()?;

        let lists = self.discover()?;
        if lists.is_empty() {
            log::debug!("No list files in {:?}", self.config.upstream_dir);
            return Ok(RunSummary::NoInputs);
        }

        let mut built = Vec::with_capacity(lists.len());
        for list_path in &lists {
            let target = self.build_one(list_path)?;
            on_built(&target);
            built.push(target);
        }

        Ok(RunSummary::Built(built))
    }
}

//! Rule-set compiler invocation.
//!
//! The binary `.srs` encoding is produced by an external `sing-box`
//! executable. This module writes the intermediate source document and runs
//! the compiler behind the [`RuleSetCompiler`] trait, so pipelines can be
//! driven by a fake in tests.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::converter::SourceDocument;
use crate::{Error, Result};

/// Something that turns a JSON source file into a binary rule-set.
pub trait RuleSetCompiler {
    /// Compile `source` into `output`, blocking until done.
    fn compile(&self, source: &Path, output: &Path) -> Result<()>;
}

impl<F> RuleSetCompiler for F
where
    F: Fn(&Path, &Path) -> Result<()>,
{
    fn compile(&self, source: &Path, output: &Path) -> Result<()> {
        self(source, output)
    }
}

/// Runs `<program> rule-set compile -i <source> -o <output>`.
///
/// The child inherits stdin/stdout/stderr, so its own diagnostics reach the
/// operator. There is no timeout.
#[derive(Debug, Clone)]
pub struct SingBoxCompiler {
    program: PathBuf,
}

impl SingBoxCompiler {
    /// Create a compiler that runs the given executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this compiler runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, source: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["rule-set", "compile", "-i"])
            .arg(source)
            .arg("-o")
            .arg(output);
        cmd
    }
}

impl RuleSetCompiler for SingBoxCompiler {
    fn compile(&self, source: &Path, output: &Path) -> Result<()> {
        log::debug!(
            "Running {:?} rule-set compile -i {:?} -o {:?}",
            self.program,
            source,
            output
        );

        let status = self
            .command(source, output)
            .status()
            .map_err(|source| Error::CompilerLaunch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::CompilerFailed {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

/// Write a source document to `path`, replacing any existing file.
pub fn write_source(doc: &SourceDocument, path: &Path) -> Result<()> {
    let write_err = |source| Error::WriteSource {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    doc.write_to(&mut writer).map_err(|e| match e {
        Error::Json(json) if json.is_io() => write_err(json.into()),
        other => other,
    })?;
    writer.flush().map_err(write_err)?;

    log::debug!("Wrote {} rules to {:?}", doc.len(), path);
    Ok(())
}

/// Write `doc` to `source_path`, then compile it into `output_path`.
pub fn compile_source<C: RuleSetCompiler + ?Sized>(
    doc: &SourceDocument,
    source_path: &Path,
    output_path: &Path,
    compiler: &C,
) -> Result<()> {
    write_source(doc, source_path)?;
    compiler.compile(source_path, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_command_arguments() {
        let compiler = SingBoxCompiler::new("/usr/bin/sing-box");
        let cmd = compiler.command(Path::new("temp_json/a.json"), Path::new("output/a.srs"));

        assert_eq!(cmd.get_program(), "/usr/bin/sing-box");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(
            args,
            ["rule-set", "compile", "-i", "temp_json/a.json", "-o", "output/a.srs"]
        );
    }

    #[test]
    fn test_missing_executable() {
        let dir = tempdir().unwrap();
        let compiler = SingBoxCompiler::new(dir.path().join("no-such-sing-box"));

        let err = compiler
            .compile(&dir.path().join("a.json"), &dir.path().join("a.srs"))
            .unwrap_err();
        assert!(matches!(err, Error::CompilerLaunch { .. }));
        assert!(!dir.path().join("a.srs").exists());
    }

    #[test]
    fn test_write_source_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("private.json");
        fs::write(&path, "stale content that is longer than the new document").unwrap();

        let doc = SourceDocument::from_addresses(["10.0.0.0/8"]);
        write_source(&doc, &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"rules": [{"ip_cidr": "10.0.0.0/8"}]}"#
        );
    }

    #[test]
    fn test_write_source_missing_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent").join("a.json");

        let err = write_source(&SourceDocument::default(), &path).unwrap_err();
        assert!(matches!(err, Error::WriteSource { .. }));
    }

    #[test]
    fn test_compile_source_with_fake() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.json");
        let output = dir.path().join("a.srs");
        let calls = RefCell::new(Vec::new());

        let fake = |src: &Path, out: &Path| -> Result<()> {
            // Source must be on disk before the compiler runs
            let json = fs::read_to_string(src)?;
            calls.borrow_mut().push((src.to_path_buf(), out.to_path_buf()));
            fs::write(out, json.len().to_string())?;
            Ok(())
        };

        let doc = SourceDocument::from_addresses(["10.0.0.0/8", "fc00::/7"]);
        compile_source(&doc, &source, &output, &fake).unwrap();

        assert_eq!(calls.borrow().as_slice(), [(source.clone(), output.clone())]);
        assert!(output.exists());
    }
}

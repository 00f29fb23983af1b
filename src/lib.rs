//! srs-build - compile plaintext CIDR lists into sing-box binary rule-sets.
//!
//! Each `*.list` file in an upstream directory is turned into a sing-box
//! rule-set source document (`{"rules": [{"ip_cidr": ...}, ...]}`), written
//! to an intermediate directory, and handed to an external
//! `sing-box rule-set compile` to produce `<base>.srs`.
//!
//! # Stages
//!
//! - **List reading** ([`ListReader`]): one address per line, blank lines and
//!   `#` / `//` comments dropped, order kept, no dedup
//! - **Source building** ([`SourceDocument`]): wraps each entry as an
//!   `ip_cidr` rule
//! - **Compiling** ([`RuleSetCompiler`]): writes the JSON and runs the
//!   external compiler
//! - **Orchestration** ([`Pipeline`]): drives the above per file, in
//!   directory order, stopping at the first failure
//!
//! # Quick Start
//!
//! ```ignore
//! use srs_build::{BuildConfig, Pipeline, RunSummary, SingBoxCompiler};
//!
//! let config = BuildConfig::from_env();
//! let compiler = SingBoxCompiler::new(&config.compiler);
//! let pipeline = Pipeline::new(config, compiler);
//!
//! match pipeline.run(|t| println!("Built: {}", t.output_path.display()))? {
//!     RunSummary::NoInputs => eprintln!("No .list files found"),
//!     RunSummary::Built(targets) => assert!(!targets.is_empty()),
//! }
//! ```
//!
//! Tests can swap the compiler for any `Fn(&Path, &Path) -> Result<()>`.

mod error;

pub mod compiler;
pub mod config;
pub mod converter;
pub mod pipeline;

// Re-export core types
pub use error::{Error, ErrorKind, Result};

pub use compiler::{RuleSetCompiler, SingBoxCompiler};
pub use config::BuildConfig;
pub use converter::{AddressList, IpCidrRule, ListReader, SourceDocument};
pub use pipeline::{BuildTarget, Pipeline, RunSummary};

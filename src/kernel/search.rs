//! luet search invocation
//!
//! Builds the argument vector for `luet search`, runs it synchronously and
//! decodes the JSON stones it prints on stdout.

use log::{Level, Log, Metadata, Record};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::Config;
use crate::specs::StonesPack;
use crate::utils::resolve_binary_abs_path;

/// Package name of the full kernel
pub const KERNEL_PACKAGE: &str = "macaroni-full";

/// Error raised while running a search
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Failed to start {executable}: {source}")]
    ProcessStart {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed waiting for {executable}: {reason}")]
    ProcessWait { executable: String, reason: String },

    #[error("luet search exiting with {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Error on unmarshal json data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Selectors of one `luet search` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Annotation filter (`-a`)
    pub annotation: String,
    /// Package name (`-n`)
    pub name: Option<String>,
    /// Package category (`--category`)
    pub category: Option<String>,
    /// Only installed packages (`--installed`)
    pub installed: bool,
}

impl SearchQuery {
    pub fn annotation(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }

    /// Full argument vector, executable first
    pub fn args(&self, executable: &str) -> Vec<String> {
        let mut args = vec![
            executable.to_string(),
            "search".to_string(),
            "-a".to_string(),
            self.annotation.clone(),
        ];

        if let Some(ref name) = self.name {
            args.push("-n".to_string());
            args.push(name.clone());
        }

        if let Some(ref category) = self.category {
            args.push("--category".to_string());
            args.push(category.clone());
        }

        args.push("-o".to_string());
        args.push("json".to_string());

        if self.installed {
            args.push("--installed".to_string());
        }

        args
    }
}

/// Runs `luet search` queries
pub struct StoneSearcher<'a> {
    executable: PathBuf,
    logger: &'a dyn Log,
}

impl StoneSearcher<'static> {
    /// Searcher for the configured binary, logging through the process logger
    pub fn new(config: &Config) -> Self {
        Self {
            executable: resolve_binary_abs_path(&config.luet_binary),
            logger: log::logger(),
        }
    }
}

impl<'a> StoneSearcher<'a> {
    pub fn with_executable(executable: impl Into<PathBuf>, logger: &'a dyn Log) -> Self {
        Self {
            executable: executable.into(),
            logger,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Kernel modules, optionally restricted to one kernel branch
    pub fn available_extra_modules(&self, kernel_branch: &str, installed: bool) -> SearchResult<StonesPack> {
        self.search(&extra_modules_query(kernel_branch, installed))
    }

    pub fn available_kernels(&self) -> SearchResult<StonesPack> {
        self.search(&kernels_query(false))
    }

    pub fn installed_kernels(&self) -> SearchResult<StonesPack> {
        self.search(&kernels_query(true))
    }

    /// Run one search and decode its output
    pub fn search(&self, query: &SearchQuery) -> SearchResult<StonesPack> {
        let executable = self.executable.to_string_lossy().to_string();
        let args = query.args(&executable);

        self.debug(&format!("Running search command: {}", args.join(" ")));

        let child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SearchError::ProcessStart {
                executable: executable.clone(),
                source,
            })?;

        let output = child.wait_with_output().map_err(|e| SearchError::ProcessWait {
            executable: executable.clone(),
            reason: e.to_string(),
        })?;

        let code = output.status.code().ok_or_else(|| SearchError::ProcessWait {
            executable: executable.clone(),
            reason: format!("process terminated abnormally ({})", output.status),
        })?;

        if code != 0 {
            return Err(SearchError::NonZeroExit {
                code,
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let pack: StonesPack = serde_json::from_slice(&output.stdout)?;
        self.debug(&format!("Search returned {} stones", pack.len()));

        Ok(pack)
    }

    fn debug(&self, message: &str) {
        let metadata = Metadata::builder()
            .level(Level::Debug)
            .target(module_path!())
            .build();

        if !self.logger.enabled(&metadata) {
            return;
        }

        self.logger.log(
            &Record::builder()
                .metadata(metadata)
                .args(format_args!("{}", message))
                .module_path_static(Some(module_path!()))
                .file_static(Some(file!()))
                .line(Some(line!()))
                .build(),
        );
    }
}

fn extra_modules_query(kernel_branch: &str, installed: bool) -> SearchQuery {
    let mut query = SearchQuery::annotation("kernel_module").installed(installed);
    if !kernel_branch.is_empty() {
        query = query.category(format!("kernel-{}", kernel_branch));
    }
    query
}

fn kernels_query(installed: bool) -> SearchQuery {
    SearchQuery::annotation("kernel")
        .name(KERNEL_PACKAGE)
        .installed(installed)
}

//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use tasknote_config::{Config, default_config_path};
use tasknote_index::{QueryEngine, Reindexer, SearchIndices, SearchLimits, SearchService};
use tasknote_model::{EntitySource, OwnerId};
use tasknote_store::SqliteStore;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::args::GlobalArgs;

/// Open storage and search handles for one invocation.
pub struct Services {
    /// Primary store.
    pub store: Arc<SqliteStore>,
    /// Task and note indices.
    pub indices: SearchIndices,
    /// Background index maintenance.
    pub reindexer: Reindexer,
    /// Owner-scoped search over both indices.
    pub search: SearchService,
}

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Configuration file path, whether or not it exists.
    pub config_path: PathBuf,
    /// Loaded configuration (defaults if the file does not exist).
    pub config: Config,
    /// User every command acts for.
    pub owner: OwnerId,
    /// Runtime the reindexer spawns its workers on.
    runtime: Runtime,
    /// Storage and indices, opened on first use.
    services: Option<Services>,
}

impl CommandContext {
    /// Resolves the configuration path and loads the configuration.
    pub fn load(global: &GlobalArgs) -> Result<Self, ExitCode> {
        let config_path = config_path_or_failure(global)?;
        let config = Config::load_or_default(&config_path).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;
        Self::build(global, config_path, config)
    }

    /// Resolves the configuration path without reading the file.
    ///
    /// Used by `init`, which must work even when an existing file is invalid.
    pub fn load_path_only(global: &GlobalArgs) -> Result<Self, ExitCode> {
        let config_path = config_path_or_failure(global)?;
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let config = Config::defaults_in(base);
        Self::build(global, config_path, config)
    }

    /// Assembles a context around an already-loaded configuration.
    fn build(global: &GlobalArgs, config_path: PathBuf, config: Config) -> Result<Self, ExitCode> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tasknote-reindex")
            .build()
            .map_err(|e| {
                eprintln!("error: failed to start runtime: {e}");
                ExitCode::FAILURE
            })?;
        Ok(Self {
            config_path,
            config,
            owner: global.user,
            runtime,
            services: None,
        })
    }

    /// Returns the store and indices, opening them if needed.
    pub fn services(&mut self) -> Result<&Services, ExitCode> {
        if self.services.is_none() {
            self.services = Some(self.open_services()?);
        }
        self.services.as_ref().ok_or(ExitCode::FAILURE)
    }

    /// Waits for pending index work and closes the indices.
    ///
    /// Must run before the process exits, or queued updates are lost.
    pub fn finish(self) -> ExitCode {
        let Some(services) = self.services else {
            return ExitCode::SUCCESS;
        };
        self.runtime.block_on(services.reindexer.wait_idle());
        match services.indices.close() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: failed to close index: {e}");
                ExitCode::FAILURE
            }
        }
    }

    /// Opens the primary store and both indices.
    fn open_services(&self) -> Result<Services, ExitCode> {
        let storage = &self.config.storage;
        debug!(database = %storage.database.display(), "opening storage");

        let store = SqliteStore::open(&storage.database).map_err(|e| {
            eprintln!("error: failed to open database: {e}");
            ExitCode::FAILURE
        })?;
        let store = Arc::new(store);

        let indices = SearchIndices::open_with_config(&self.config).map_err(|e| {
            eprintln!("error: failed to open index: {e}");
            ExitCode::FAILURE
        })?;

        let source: Arc<dyn EntitySource> = store.clone();
        let reindexer = Reindexer::with_handle(
            &indices,
            Arc::clone(&source),
            self.runtime.handle().clone(),
        );
        let engine = QueryEngine::new(
            indices.clone(),
            SearchLimits::from_settings(&self.config.search),
        );
        let search = SearchService::new(engine, source);

        Ok(Services {
            store,
            indices,
            reindexer,
            search,
        })
    }
}

/// Returns `--config` or `tasknote.toml` in the current directory.
fn config_path_or_failure(global: &GlobalArgs) -> Result<PathBuf, ExitCode> {
    if let Some(path) = &global.config {
        return Ok(path.clone());
    }
    env::current_dir().map(|cwd| default_config_path(&cwd)).map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

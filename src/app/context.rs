use std::cell::RefCell;
use std::io::{self, BufRead, BufReader};

use crate::adapters::ConfigStore;
use crate::app::confirm::confirm;
use crate::app::output::OutputFormat;
use crate::app::watch::WatchOptions;
use crate::domain::{AppError, BytesUnit, ConnectionRecord};
use crate::ports::{Fetcher, FetcherFactory, NameServiceLookup};

/// Global flag values resolved once per invocation.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub output: OutputFormat,
    pub watch: WatchOptions,
    pub connection: Option<String>,
    pub bytes_unit: Option<BytesUnit>,
}

/// Application context holding dependencies for command execution.
///
/// Handlers receive the context explicitly; nothing is read from process-wide state.
pub struct AppContext {
    store: ConfigStore,
    options: GlobalOptions,
    fetchers: Box<dyn FetcherFactory>,
    name_service: Box<dyn NameServiceLookup>,
    input: RefCell<Box<dyn BufRead>>,
}

impl AppContext {
    pub fn new(
        store: ConfigStore,
        options: GlobalOptions,
        fetchers: Box<dyn FetcherFactory>,
        name_service: Box<dyn NameServiceLookup>,
    ) -> Self {
        Self {
            store,
            options,
            fetchers,
            name_service,
            input: RefCell::new(Box::new(BufReader::new(io::stdin()))),
        }
    }

    /// Replace the reader used for confirmation prompts.
    pub fn with_input(self, input: Box<dyn BufRead>) -> Self {
        Self { input: RefCell::new(input), ..self }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    pub fn output(&self) -> &OutputFormat {
        &self.options.output
    }

    /// Unit for byte values: the flag wins over the stored preference, then raw bytes.
    pub fn bytes_unit(&self) -> BytesUnit {
        self.options
            .bytes_unit
            .or_else(|| self.store.config().bytes_unit())
            .unwrap_or(BytesUnit::Bytes)
    }

    /// The connection selected by `-c` or the current context.
    pub fn connection(&self) -> Result<&ConnectionRecord, AppError> {
        self.store.resolve_connection(self.options.connection.as_deref())
    }

    pub fn fetcher(&self) -> Result<Box<dyn Fetcher>, AppError> {
        let connection = self.connection()?;
        tracing::debug!(connection = %connection.name, "using connection");
        self.fetchers.create(connection)
    }

    pub fn fetcher_for(&self, connection: &ConnectionRecord) -> Result<Box<dyn Fetcher>, AppError> {
        self.fetchers.create(connection)
    }

    pub fn name_service(&self) -> &dyn NameServiceLookup {
        self.name_service.as_ref()
    }

    /// Ask before a side effect unless `yes` was given; a declined prompt is `Cancelled`.
    pub fn confirm(&self, yes: bool, prompt: &str) -> Result<(), AppError> {
        if yes {
            return Ok(());
        }
        let mut input = self.input.borrow_mut();
        if confirm(prompt, &mut *input, &mut io::stdout()) {
            Ok(())
        } else {
            Err(AppError::Cancelled)
        }
    }
}

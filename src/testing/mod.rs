mod fake_fetcher;
mod fake_name_service;

use std::io::Cursor;

use tempfile::TempDir;

use crate::adapters::ConfigStore;
use crate::app::{AppContext, GlobalOptions};
use crate::domain::ConnectionRecord;

pub use fake_fetcher::{FakeFetcher, FakeFetcherFactory};
pub use fake_name_service::FakeNameService;

/// Name of the connection every test context starts with.
pub const TEST_CONNECTION: &str = "test";

/// Context with a temporary config holding one current connection.
pub fn test_context(fetcher: &FakeFetcher) -> (TempDir, AppContext) {
    test_context_with(fetcher, FakeNameService::new(), GlobalOptions::default())
}

pub fn test_context_with(
    fetcher: &FakeFetcher,
    name_service: FakeNameService,
    options: GlobalOptions,
) -> (TempDir, AppContext) {
    let dir = TempDir::new().unwrap();
    let mut store = ConfigStore::load(dir.path(), None).unwrap();
    let url = "http://localhost:30000/management/coherence/cluster";
    store.add_cluster(ConnectionRecord::http(TEST_CONNECTION, url)).unwrap();
    store.set_current_context(TEST_CONNECTION).unwrap();
    let ctx = AppContext::new(
        store,
        options,
        Box::new(FakeFetcherFactory::new(fetcher.clone())),
        Box::new(name_service),
    )
    .with_input(Box::new(Cursor::new(Vec::new())));
    (dir, ctx)
}

mod fetcher;
mod name_service;

pub use fetcher::{
    CacheOperation, FederationOperation, Fetcher, FetcherFactory, JfrCommand, JournalType,
    Mutation, Query, ResetTarget, ServiceOperation, SnapshotOperation,
};
pub use name_service::NameServiceLookup;

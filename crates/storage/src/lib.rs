#![forbid(unsafe_code)]

pub mod kv;
pub mod repository;
pub mod sqlite;

pub use kv::KvRepository;
pub use repository::{
    CredentialRepository, InMemoryStore, KeyValueStore, Storage, StorageError,
    UserStateRepository,
};

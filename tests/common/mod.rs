use bucketfs::backends::MemoryObjectStore;
use bucketfs::{FileSystemOptions, ObjectFileSystem};
use std::sync::Once;

/// Filesystem type used throughout the integration tests
#[allow(dead_code)]
pub type MemoryFs = ObjectFileSystem<MemoryObjectStore, MemoryObjectStore>;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (respects `RUST_LOG`)
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Filesystem over a fresh store, plus the store for inspection
#[allow(dead_code)]
pub fn memory_fs(options: FileSystemOptions) -> (MemoryFs, MemoryObjectStore) {
    init_tracing();
    let store = MemoryObjectStore::new("test-bucket");
    let fs = ObjectFileSystem::new("repo", store.clone(), store.clone(), options)
        .expect("valid filesystem options");
    (fs, store)
}

/// Filesystem with default options
#[allow(dead_code)]
pub fn default_fs() -> (MemoryFs, MemoryObjectStore) {
    memory_fs(FileSystemOptions::default())
}

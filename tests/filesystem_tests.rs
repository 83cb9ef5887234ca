//! Integration tests for file and directory operations over the in-memory store

mod common;

use bucketfs::backends::{FetchFault, Operation};
use bucketfs::error::Cause;
use bucketfs::{
    Attributes, BackendError, DirectoryHandle, EntryKind, ErrorKind, FileHandle, FileSystem,
    FileSystemOptions, HeadOptions, TransferMode, UrlMethod, WriteOptions,
};
use bytes::Bytes;
use common::{default_fs, memory_fs};
use std::collections::BTreeSet;

fn set(paths: Vec<String>) -> BTreeSet<String> {
    paths.into_iter().collect()
}

#[compio::test]
async fn test_write_then_read_returns_same_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    let content = Bytes::from_static(b"Hello, World! This is a test file.");

    fs.write_all("/docs/hello.txt", content.clone()).await?;
    assert_eq!(fs.read_to_end("/docs/hello.txt").await?, content);
    assert_eq!(store.data("repo/docs/hello.txt"), Some(content.clone()));

    let stats = fs.stat("/docs/hello.txt").await?;
    assert!(stats.is_file());
    assert_eq!(stats.size, Some(content.len() as u64));
    assert!(stats.etag.is_some());
    assert!(stats.created.is_some());
    Ok(())
}

#[compio::test]
async fn test_overwrite_replaces_content() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"first version")).await?;
    fs.write_all("/a.txt", Bytes::from_static(b"second")).await?;
    assert_eq!(fs.read_to_end("/a.txt").await?, Bytes::from_static(b"second"));
    assert_eq!(fs.stat("/a.txt").await?.size, Some(6));
    Ok(())
}

#[compio::test]
async fn test_append_concatenates_buffered() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    let file = fs.file("/log.txt");
    file.write(Bytes::from_static(b"A"), WriteOptions::default()).await?;
    file.write(Bytes::from_static(b"B"), WriteOptions::append()).await?;
    assert_eq!(file.read_to_end().await?, Bytes::from_static(b"AB"));
    Ok(())
}

#[compio::test]
async fn test_append_concatenates_segmented() -> Result<(), Box<dyn std::error::Error>> {
    let options = FileSystemOptions::default().with_transfer_mode(TransferMode::Segmented);
    let (fs, store) = memory_fs(options);
    fs.write_all("/log.txt", Bytes::from_static(b"first line\n")).await?;
    fs.append("/log.txt", Bytes::from_static(b"second line\n")).await?;
    assert_eq!(
        store.data("repo/log.txt"),
        Some(Bytes::from_static(b"first line\nsecond line\n"))
    );
    Ok(())
}

#[compio::test]
async fn test_append_to_missing_file_creates_it() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.append("/new.txt", Bytes::from_static(b"data")).await?;
    assert_eq!(fs.read_to_end("/new.txt").await?, Bytes::from_static(b"data"));
    Ok(())
}

#[compio::test]
async fn test_append_fails_fast_when_disabled() {
    let (fs, store) = memory_fs(FileSystemOptions::default().without_append());
    assert!(!fs.supports_append());

    fs.write_all("/a.txt", Bytes::from_static(b"A")).await.unwrap();
    let uploads = store.calls(Operation::Upload);

    let err = fs
        .file("/a.txt")
        .write(Bytes::from_static(b"B"), WriteOptions::append())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NoModificationAllowed));
    assert_eq!(store.calls(Operation::Upload), uploads);
    assert_eq!(store.calls(Operation::Fetch), 0);
    assert_eq!(store.data("repo/a.txt"), Some(Bytes::from_static(b"A")));
}

#[compio::test]
async fn test_generic_append_emulation_when_disabled() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = memory_fs(FileSystemOptions::default().without_append());
    fs.write_all("/a.txt", Bytes::from_static(b"A")).await?;
    fs.append("/a.txt", Bytes::from_static(b"B")).await?;
    fs.append("/b.txt", Bytes::from_static(b"C")).await?;
    assert_eq!(fs.read_to_end("/a.txt").await?, Bytes::from_static(b"AB"));
    assert_eq!(fs.read_to_end("/b.txt").await?, Bytes::from_static(b"C"));
    Ok(())
}

#[compio::test]
async fn test_append_keeps_content_when_read_is_denied() {
    let (fs, store) = default_fs();
    fs.write_all("/log.txt", Bytes::from_static(b"EXISTING"))
        .await
        .unwrap();
    let uploads = store.calls(Operation::Upload);

    store.fail(Operation::DownloadUrl, BackendError::unauthorized("repo/log.txt"));
    let err = fs
        .file("/log.txt")
        .write(Bytes::from_static(b"+NEW"), WriteOptions::append())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert!(!err.is_absent());
    assert_eq!(store.calls(Operation::Upload), uploads);
    assert_eq!(store.data("repo/log.txt"), Some(Bytes::from_static(b"EXISTING")));
    store.clear_faults();

    store.fail_fetch(FetchFault::Status(403, "Forbidden".into()));
    assert!(fs
        .append("/log.txt", Bytes::from_static(b"+NEW"))
        .await
        .is_err());
    assert_eq!(store.data("repo/log.txt"), Some(Bytes::from_static(b"EXISTING")));
}

#[compio::test]
async fn test_generic_append_keeps_content_when_read_is_denied() {
    let (fs, store) = memory_fs(FileSystemOptions::default().without_append());
    fs.write_all("/log.txt", Bytes::from_static(b"EXISTING"))
        .await
        .unwrap();

    store.fail(Operation::DownloadUrl, BackendError::unauthorized("repo/log.txt"));
    assert!(fs
        .append("/log.txt", Bytes::from_static(b"+NEW"))
        .await
        .is_err());
    assert_eq!(store.data("repo/log.txt"), Some(Bytes::from_static(b"EXISTING")));
}

#[compio::test]
async fn test_mkdir_rmdir_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    let dir = fs.directory("/projects");

    dir.mkdir().await?;
    // Idempotent
    dir.mkdir().await?;
    assert!(store.contains("repo/projects/"));

    let stats = fs.stat("/projects").await?;
    assert!(stats.is_directory());
    assert_eq!(stats.size, None);

    dir.rmdir().await?;
    let err = fs.stat("/projects").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    Ok(())
}

#[compio::test]
async fn test_rmdir_without_placeholder_is_not_found() {
    let (fs, _store) = default_fs();
    let err = fs.directory("/missing").rmdir().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert_eq!(err.path(), Some("/missing"));
}

#[compio::test]
async fn test_rmdir_root_is_refused() {
    let (fs, store) = default_fs();
    let err = fs.directory("/").rmdir().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NoModificationAllowed));
    assert_eq!(store.calls(Operation::Delete), 0);
}

#[compio::test]
async fn test_list_excludes_directory_itself() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    fs.directory("/P").mkdir().await?;
    fs.write_all("/P/f", Bytes::from_static(b"file")).await?;
    fs.directory("/P/d").mkdir().await?;
    fs.write_all("/P/d/nested.txt", Bytes::from_static(b"deep")).await?;

    // The raw listing contains the placeholder of /P itself
    let raw = bucketfs::ObjectStore::list_all(&store, "repo/P/").await?;
    assert!(raw.items.contains(&"repo/P/".to_string()));

    let children = fs.directory("/P").list().await?;
    assert_eq!(
        set(children),
        set(vec!["/P/f".to_string(), "/P/d".to_string()])
    );
    Ok(())
}

#[compio::test]
async fn test_list_root() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.write_all("/top.txt", Bytes::from_static(b"x")).await?;
    fs.directory("/sub").mkdir().await?;
    let children = fs.directory("/").list().await?;
    assert_eq!(
        set(children),
        set(vec!["/top.txt".to_string(), "/sub".to_string()])
    );
    Ok(())
}

#[compio::test]
async fn test_list_follows_pages() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    let store = bucketfs::MemoryObjectStore::with_limits("paged", 3, 1024);
    let fs = bucketfs::ObjectFileSystem::new(
        "repo",
        store.clone(),
        store.clone(),
        FileSystemOptions::default(),
    )?;
    for i in 0..10 {
        fs.write_all(&format!("/many/f{i:02}"), Bytes::from_static(b"x"))
            .await?;
    }
    let children = fs.directory("/many").list().await?;
    assert_eq!(children.len(), 10);
    assert!(store.calls(Operation::List) >= 4);
    Ok(())
}

#[compio::test]
async fn test_implicit_directory_resolves_with_empty_stats(
) -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    fs.write_all("/x/y/z.txt", Bytes::from_static(b"z")).await?;
    assert!(!store.contains("repo/x/"));

    let stats = fs.stat("/x").await?;
    assert_eq!(stats, bucketfs::Stats::implicit_directory());
    assert!(fs.head("/x", HeadOptions::directory()).await.is_ok());
    assert_eq!(fs.directory("/x").list().await?, vec!["/x/y".to_string()]);
    Ok(())
}

#[compio::test]
async fn test_head_kind_filter() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.directory("/d").mkdir().await?;
    fs.write_all("/f", Bytes::from_static(b"f")).await?;

    let err = fs.head("/d", HeadOptions::file()).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    let err = fs.head("/f", HeadOptions::directory()).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));

    assert!(fs.head("/d", HeadOptions::directory()).await?.is_directory());
    assert!(fs.head("/f", HeadOptions::file()).await?.is_file());
    Ok(())
}

#[compio::test]
async fn test_file_wins_over_placeholder() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.write_all("/both", Bytes::from_static(b"1234")).await?;
    fs.directory("/both").mkdir().await?;
    assert_eq!(fs.stat("/both").await?.size, Some(4));
    Ok(())
}

#[compio::test]
async fn test_without_directories() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = memory_fs(FileSystemOptions::default().without_directories());
    assert!(!fs.supports_directories());

    let err = fs.directory("/d").mkdir().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NoModificationAllowed));
    let err = fs.directory("/d").rmdir().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NoModificationAllowed));

    fs.write_all("/x/y.txt", Bytes::from_static(b"y")).await?;
    assert!(fs.stat("/x/y.txt").await?.is_file());
    let err = fs.stat("/x").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    let err = fs.head("/x", HeadOptions::directory()).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));

    // Only file keys are looked up
    assert_eq!(store.calls(Operation::List), 0);
    Ok(())
}

#[compio::test]
async fn test_list_fails_without_directories() {
    let (fs, store) = memory_fs(FileSystemOptions::default().without_directories());
    fs.write_all("/x/y.txt", Bytes::from_static(b"y")).await.unwrap();

    let err = fs.directory("/x").list().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotReadable));
    assert_eq!(store.calls(Operation::List), 0);
}

#[compio::test]
async fn test_patch_replaces_custom_attributes() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"a")).await?;

    let attrs = Attributes::new().with("owner", "alice").with("size", 999);
    fs.patch("/a.txt", &attrs, EntryKind::File).await?;

    let stats = fs.stat("/a.txt").await?;
    assert_eq!(stats.attributes.get("owner"), Some("alice"));
    assert_eq!(stats.attributes.get("size"), None);
    assert_eq!(stats.size, Some(1));

    fs.patch("/a.txt", &Attributes::new().with("tag", "v2"), EntryKind::File)
        .await?;
    let stats = fs.stat("/a.txt").await?;
    assert_eq!(stats.attributes.get("owner"), None);
    assert_eq!(stats.attributes.get("tag"), Some("v2"));
    Ok(())
}

#[compio::test]
async fn test_patch_directory_placeholder() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.directory("/d").mkdir().await?;
    let attrs = Attributes::new().with("color", "blue");
    fs.patch("/d", &attrs, EntryKind::Directory).await?;
    let stats = fs.stat("/d").await?;
    assert!(stats.is_directory());
    assert_eq!(stats.attributes.get("color"), Some("blue"));
    Ok(())
}

#[compio::test]
async fn test_patch_missing_entry_is_not_found() {
    let (fs, store) = default_fs();
    let err = fs
        .patch("/ghost", &Attributes::new().with("k", "v"), EntryKind::File)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert_eq!(store.calls(Operation::UpdateMetadata), 0);
}

#[compio::test]
async fn test_write_with_attributes() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    let attrs = Attributes::new().with("mime", "text/plain");
    let options = WriteOptions::default().with_attributes(attrs);
    fs.file("/a.txt")
        .write(Bytes::from_static(b"hi"), options)
        .await?;
    let stats = fs.stat("/a.txt").await?;
    assert_eq!(stats.attributes.get("mime"), Some("text/plain"));
    Ok(())
}

#[compio::test]
async fn test_write_attribute_failure_is_reported() {
    let (fs, store) = default_fs();
    store.fail(Operation::UpdateMetadata, BackendError::unknown("metadata service down"));

    let options = WriteOptions::default().with_attributes(Attributes::new().with("k", "v"));
    let err = fs
        .file("/a.txt")
        .write(Bytes::from_static(b"hi"), options)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NoModificationAllowed));
    // The content itself was uploaded before the attribute update
    assert_eq!(store.data("repo/a.txt"), Some(Bytes::from_static(b"hi")));
}

#[compio::test]
async fn test_url_generation() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"a")).await?;
    fs.directory("/d").mkdir().await?;

    let url = fs.to_url("/a.txt", EntryKind::File, UrlMethod::Get).await?;
    assert_eq!(url, "memory://test-bucket/repo/a.txt");

    let err = fs
        .to_url("/d", EntryKind::Directory, UrlMethod::Get)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeMismatch));

    let err = fs
        .to_url("/a.txt", EntryKind::File, UrlMethod::Put)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotReadable));
    assert!(err.to_string().contains("\"PUT\" is not supported"));

    let err = fs
        .to_url("/missing.txt", EntryKind::File, UrlMethod::Get)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    Ok(())
}

#[compio::test]
async fn test_read_missing_file_is_not_found() {
    let (fs, store) = default_fs();
    let err = fs.read_to_end("/nope.txt").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert_eq!(store.calls(Operation::Fetch), 0);
}

#[compio::test]
async fn test_read_status_failures() {
    let (fs, store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"a")).await.unwrap();

    store.fail_fetch(FetchFault::Status(404, "Not Found".into()));
    let err = fs.read_to_end("/a.txt").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));

    store.fail_fetch(FetchFault::Status(403, "Forbidden".into()));
    let err = fs.read_to_end("/a.txt").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));

    store.fail_fetch(FetchFault::Status(500, "Internal Server Error".into()));
    let err = fs.read_to_end("/a.txt").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotReadable));
    assert!(err.to_string().contains("Internal Server Error (500)"));

    store.fail_fetch(FetchFault::Status(200, "OK".into()));
    let err = fs.read_to_end("/a.txt").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotReadable));
}

#[compio::test]
async fn test_read_transport_failures() {
    let (fs, store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"payload")).await.unwrap();

    store.fail_fetch(FetchFault::Transport("connection reset".into()));
    let err = fs.read_to_end("/a.txt").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotReadable));
    assert!(matches!(err.cause(), Some(Cause::Transport(_))));

    store.fail_fetch(FetchFault::Interrupted("stream closed".into()));
    let stream = fs.file("/a.txt").read().await.unwrap();
    let err = bucketfs::payload::collect(stream).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotReadable));
}

#[compio::test]
async fn test_remove_file() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, _store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"a")).await?;
    fs.file("/a.txt").remove().await?;
    assert!(!fs.exists("/a.txt").await?);

    let err = fs.file("/a.txt").remove().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    Ok(())
}

#[compio::test]
async fn test_exists_reports_backend_failures() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"a")).await?;
    assert!(fs.exists("/a.txt").await?);
    assert!(!fs.exists("/missing.txt").await?);

    store.fail(Operation::GetMetadata, BackendError::unknown("server down"));
    store.fail(Operation::List, BackendError::unknown("server down"));
    let err = fs.exists("/a.txt").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotReadable));
    Ok(())
}

#[compio::test]
async fn test_remove_failure_is_no_modification_allowed() {
    let (fs, store) = default_fs();
    fs.write_all("/a.txt", Bytes::from_static(b"a")).await.unwrap();
    store.fail_key(Operation::Delete, "repo/a.txt", BackendError::unknown("locked"));
    let err = fs.file("/a.txt").remove().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NoModificationAllowed));
}

#[compio::test]
async fn test_create_directory_all_and_remove_all() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    fs.create_directory_all("/a/b/c").await?;
    for key in ["repo/a/", "repo/a/b/", "repo/a/b/c/"] {
        assert!(store.contains(key), "missing placeholder {key}");
    }

    fs.write_all("/a/x.txt", Bytes::from_static(b"x")).await?;
    fs.write_all("/a/b/y.txt", Bytes::from_static(b"y")).await?;
    fs.write_all("/a/b/c/z.txt", Bytes::from_static(b"z")).await?;

    fs.remove_all("/a").await?;
    assert!(!fs.exists("/a").await?);
    assert_eq!(store.keys(), vec!["repo/".to_string()]);
    Ok(())
}

#[compio::test]
async fn test_remove_all_implicit_directory() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    fs.write_all("/i/f.txt", Bytes::from_static(b"f")).await?;
    fs.write_all("/i/j/g.txt", Bytes::from_static(b"g")).await?;
    fs.remove_all("/i").await?;
    assert_eq!(store.keys(), vec!["repo/".to_string()]);
    Ok(())
}

#[compio::test]
async fn test_remove_all_missing_is_not_found() {
    let (fs, _store) = default_fs();
    let err = fs.remove_all("/ghost").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
}

#[compio::test]
async fn test_capability_flags() {
    let (fs, _store) = default_fs();
    assert!(fs.supports_directories());
    assert!(fs.supports_append());
    assert!(!fs.supports_range_read());
    assert!(!fs.supports_range_write());
    assert_eq!(fs.repository(), "repo");
    assert_eq!(fs.name(), "object-store");
}

#[compio::test]
async fn test_paths_are_normalized() -> Result<(), Box<dyn std::error::Error>> {
    let (fs, store) = default_fs();
    fs.write_all("a//b/./c.txt", Bytes::from_static(b"c")).await?;
    assert!(store.contains("repo/a/b/c.txt"));
    assert_eq!(fs.file("a//b/./c.txt").path(), "/a/b/c.txt");
    assert!(fs.stat("/a/b/c.txt/").await?.is_file());
    Ok(())
}

use tempfile::TempDir;

/// Creates a unique temporary directory to act as the storage root for a test.
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
///
/// Keep the returned `TempDir` in scope for as long as you need the files.
pub fn setup_test_storage_root() -> TempDir {
    TempDir::new().expect("failed to create tempdir")
}

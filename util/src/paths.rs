use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

// ─── Directory helpers for assessments ──────────────────────────────

/// {root}/assessment_{assessment_id}
pub fn assessment_dir(root: &Path, assessment_id: i64) -> PathBuf {
    root.join(format!("assessment_{assessment_id}"))
}

/// {root}/assessment_{assessment_id}/config
pub fn config_dir(root: &Path, assessment_id: i64) -> PathBuf {
    assessment_dir(root, assessment_id).join("config")
}

/// {root}/assessment_{assessment_id}/config/config.json
pub fn config_path(root: &Path, assessment_id: i64) -> PathBuf {
    config_dir(root, assessment_id).join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_test_storage_root;

    #[test]
    fn assessment_paths_nest_under_root() {
        let root = Path::new("/srv/data");
        assert_eq!(
            config_path(root, 7),
            PathBuf::from("/srv/data/assessment_7/config/config.json")
        );
    }

    #[test]
    fn ensure_parent_dir_creates_missing_directories() {
        let tmp = setup_test_storage_root();
        let file = config_path(tmp.path(), 3);
        ensure_parent_dir(&file).unwrap();
        assert!(config_dir(tmp.path(), 3).is_dir());
    }
}

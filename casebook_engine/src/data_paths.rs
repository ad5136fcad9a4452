use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Cached path to the directory containing the engine's case data files.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve the most likely location of the case data directory.
///
/// `CASEBOOK_DATA` overrides detection entirely; otherwise the usual layouts
/// are probed relative to the working directory and the executable.
fn detect_data_root() -> PathBuf {
    if let Ok(root) = env::var("CASEBOOK_DATA") {
        return PathBuf::from(root);
    }

    let mut candidates = vec![PathBuf::from("casebook_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent() {
            candidates.push(dir.join("casebook_engine/data"));
            candidates.push(dir.join("data"));

            if let Some(parent) = dir.parent() {
                candidates.push(parent.join("casebook_engine/data"));
                candidates.push(parent.join("data"));
            }
        }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("casebook_engine/data"))
}

use std::path::{Path, PathBuf};

/// Walk up from `start` to the nearest directory containing `.waypoint`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".waypoint").is_dir())
        .map(Path::to_path_buf)
}

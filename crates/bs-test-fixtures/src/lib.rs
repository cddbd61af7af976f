use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

pub const SAMPLE_PROJECT: &str = "SpaceHop";

static COPY_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn fixtures_root() -> PathBuf {
    workspace_root().join("fixtures").join("projects")
}

pub fn fixture_dir(name: &str) -> PathBuf {
    fixtures_root().join(name)
}

/// Copies a fixture project into a fresh temp directory and returns the
/// copied project directory. The directory keeps the fixture's name so it
/// matches the project name in its manifest.
pub fn copy_fixture_to_temp(name: &str, label: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0);
    let unique = format!(
        "brickscope-{}-{}-{}-{}",
        label,
        std::process::id(),
        stamp,
        COPY_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let target = std::env::temp_dir().join(unique).join(name);
    copy_dir(&fixture_dir(name), &target);
    target
}

fn copy_dir(source: &Path, target: &Path) {
    for entry in WalkDir::new(source).into_iter().filter_map(Result::ok) {
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir entries live under the source");
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).expect("create fixture directory");
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &destination).expect("copy fixture file");
        }
    }
}

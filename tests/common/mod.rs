#![allow(dead_code)]

use async_zip::base::read::mem::ZipFileReader;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const CONFIG: &str = r#"
name = "app"
version = "1.0.0"

[[platforms]]
name = "linux"
variables = { exe = "" }

[[platforms]]
name = "windows"
variables = { exe = ".exe" }

[dependencies.openssl]
platforms = { linux = "deps/openssl-linux" }

[artifact]
files = [
  "README.md",
  { pattern = "src/**/*.js", path = "lib/**/*.js" },
  { pattern = "bin/{platform}/app{exe}", path = "bin/" },
  { package = "openssl", pattern = "lib/*.so", path = "lib/", platform = "linux" },
]
"#;

/// Write `content` to `root/relative`, creating parent directories.
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project tree with sources for linux and windows.
#[must_use]
pub fn setup_project() -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();

    write(root, "README.md", "readme");
    write(root, "src/a/b/c.js", "c");
    write(root, "src/d.js", "d");
    write(root, "src/notes.txt", "not packaged");
    write(root, "bin/linux/app", "linux binary");
    write(root, "bin/windows/app.exe", "windows binary");
    write(root, "deps/openssl-linux/lib/libssl.so", "ssl");

    temp_dir
}

/// Same tree as [`setup_project`] plus `artifacts.toml`.
#[must_use]
pub fn setup_project_with_config() -> TempDir {
    let temp_dir = setup_project();
    write(temp_dir.path(), "artifacts.toml", CONFIG);
    temp_dir
}

/// Entry names and contents of a zip archive, in archive order.
pub async fn zip_entries(path: &Path) -> Vec<(String, String)> {
    let data = tokio::fs::read(path).await.unwrap();
    let reader = ZipFileReader::new(data).await.unwrap();

    let mut entries = Vec::new();
    for index in 0..reader.file().entries().len() {
        let name = reader.file().entries()[index]
            .filename()
            .as_str()
            .unwrap()
            .to_string();
        let mut content = String::new();
        let mut entry = reader.reader_with_entry(index).await.unwrap();
        entry.read_to_string_checked(&mut content).await.unwrap();
        entries.push((name, content));
    }
    entries
}

/// Entry names of a zip archive, in archive order.
pub async fn zip_names(path: &Path) -> Vec<String> {
    zip_entries(path)
        .await
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

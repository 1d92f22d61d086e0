//! Loading and saving whole JSON documents.

use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::fs::File;
use std::io::BufReader;

const LOG_TARGET: &str = "  json_doc";

/// Load a document from a file
pub fn load<T>(path: impl AsRef<Utf8Path>) -> Result<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();

    let file = File::open(path).into_app_err_with(|| format!("unable to open file '{path}'"))?;
    let reader = BufReader::new(file);
    let data = serde_json::from_reader(reader).into_app_err_with(|| format!("unable to parse file '{path}'"))?;

    log::debug!(target: LOG_TARGET, "Loaded '{path}'");

    Ok(data)
}

/// Save several documents so that either all of them are updated or none is.
///
/// Every document is serialized before anything touches the disk. Each one is
/// then written to a temporary file next to its destination, and only once all
/// temporary files exist are they renamed into place. A destination that already
/// exists is moved aside first, so that a failed rename can put back every output
/// replaced before it.
pub fn save_all<T>(outputs: &[(&Utf8Path, &T)]) -> Result<()>
where
    T: Serialize,
{
    let mut rendered = Vec::with_capacity(outputs.len());
    for (path, data) in outputs {
        let text = serde_json::to_string_pretty(data).into_app_err_with(|| format!("unable to serialize '{path}'"))?;
        rendered.push((*path, text));
    }

    let mut staged: Vec<(Utf8PathBuf, &Utf8Path)> = Vec::with_capacity(rendered.len());
    for (path, text) in &rendered {
        let temp_path = temp_path_for(path);
        if let Err(e) = write_file(&temp_path, text) {
            discard(staged.iter().map(|(temp, _)| temp.as_path()).chain([temp_path.as_path()]));
            return Err(e);
        }

        staged.push((temp_path, *path));
    }

    let mut committed: Vec<(&Utf8Path, Option<Utf8PathBuf>)> = Vec::with_capacity(staged.len());
    for (temp_path, path) in &staged {
        match commit(temp_path, path) {
            Ok(backup) => committed.push((*path, backup)),
            Err(e) => {
                roll_back(&committed);
                discard(staged[committed.len()..].iter().map(|(temp, _)| temp.as_path()));
                return Err(e);
            }
        }
    }

    for (path, backup) in &committed {
        if let Some(backup) = backup {
            discard([backup.as_path()]);
        }

        log::info!(target: LOG_TARGET, "Wrote '{path}'");
    }

    Ok(())
}

/// Move `temp_path` over `path`, returning where the previous file at `path` was kept.
fn commit(temp_path: &Utf8Path, path: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
    let backup = if path.is_file() {
        let backup = backup_path_for(path);
        fs::rename(path, &backup).into_app_err_with(|| format!("unable to move '{path}' to '{backup}'"))?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(temp_path, path) {
        if let Some(backup) = &backup {
            restore(backup, path);
        }

        return Err(e).into_app_err_with(|| format!("unable to move '{temp_path}' to '{path}'"));
    }

    Ok(backup)
}

/// Undo committed outputs, newest first.
fn roll_back(committed: &[(&Utf8Path, Option<Utf8PathBuf>)]) {
    for (path, backup) in committed.iter().rev() {
        match backup {
            Some(backup) => restore(backup, path),
            None => discard([*path]),
        }
    }
}

fn restore(backup: &Utf8Path, path: &Utf8Path) {
    if let Err(e) = fs::rename(backup, path) {
        log::warn!(target: LOG_TARGET, "Could not restore '{path}' from '{backup}': {e:#}");
    }
}

fn write_file(path: &Utf8Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).into_app_err_with(|| format!("unable to create directory '{parent}'"))?;
    }

    fs::write(path, text).into_app_err_with(|| format!("unable to write file '{path}'"))
}

fn temp_path_for(path: &Utf8Path) -> Utf8PathBuf {
    let file_name = path.file_name().unwrap_or("output");
    path.with_file_name(format!(".{file_name}.tmp"))
}

fn backup_path_for(path: &Utf8Path) -> Utf8PathBuf {
    let file_name = path.file_name().unwrap_or("output");
    path.with_file_name(format!(".{file_name}.bak"))
}

fn discard<'a>(paths: impl IntoIterator<Item = &'a Utf8Path>) {
    for path in paths {
        fs::remove_file(path).unwrap_or_else(|e| log::debug!(target: LOG_TARGET, "Could not remove '{path}': {e:#}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: u64,
    }

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_and_load_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = utf8(temp_dir.path().join("data.json"));

        let original = TestData {
            name: "test".to_string(),
            value: 42,
        };

        save_all(&[(file_path.as_path(), &original)]).unwrap();
        assert!(file_path.exists());

        let loaded: TestData = load(&file_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_is_pretty_and_keeps_key_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = utf8(temp_dir.path().join("ordered.json"));

        save_all(&[(file_path.as_path(), &json!({"url": "u", "name": "Hoth", "diameter": 7200}))]).unwrap();

        let text = fs::read_to_string(&file_path).unwrap();
        assert!(text.contains('\n'));
        let url = text.find("\"url\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        let diameter = text.find("\"diameter\"").unwrap();
        assert!(url < name && name < diameter);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result: Result<Value> = load("/nonexistent/path/file.json");
        assert!(result.unwrap_err().to_string().contains("unable to open"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = utf8(temp_dir.path().join("invalid.json"));
        fs::write(&file_path, "not valid json").unwrap();

        let result: Result<Value> = load(&file_path);
        assert!(result.unwrap_err().to_string().contains("unable to parse"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = utf8(temp_dir.path().join("nested").join("subdir").join("data.json"));

        save_all(&[(nested_path.as_path(), &json!([1, 2, 3]))]).unwrap();

        let loaded: Value = load(&nested_path).unwrap();
        assert_eq!(loaded, json!([1, 2, 3]));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_overwrites_existing_file_and_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = utf8(temp_dir.path().join("overwrite.json"));

        save_all(&[(file_path.as_path(), &json!({"round": 1}))]).unwrap();
        save_all(&[(file_path.as_path(), &json!({"round": 2}))]).unwrap();

        let loaded: Value = load(&file_path).unwrap();
        assert_eq!(loaded, json!({"round": 2}));

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_failed_write_leaves_earlier_outputs_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let good = utf8(temp_dir.path().join("good.json"));
        fs::write(&good, "\"original\"").unwrap();

        // a regular file where a directory is needed makes the second write fail
        let blocker = utf8(temp_dir.path().join("blocker"));
        fs::write(&blocker, "").unwrap();
        let bad = blocker.join("bad.json");

        let result = save_all(&[(good.as_path(), &json!("updated")), (bad.as_path(), &json!("never"))]);
        assert!(result.is_err());

        assert_eq!(fs::read_to_string(&good).unwrap(), "\"original\"");
        assert!(!temp_path_for(&good).exists());
        assert!(!temp_path_for(&bad).exists());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_failed_rename_restores_replaced_outputs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let planets = utf8(temp_dir.path().join("planets.json"));
        fs::write(&planets, "\"original\"").unwrap();

        // a non-empty directory cannot be replaced by a file
        let echo_base = utf8(temp_dir.path().join("echo.json"));
        fs::create_dir(&echo_base).unwrap();
        fs::write(echo_base.join("keep"), "").unwrap();

        let result = save_all(&[(planets.as_path(), &json!("updated")), (echo_base.as_path(), &json!("never"))]);
        assert!(result.is_err());

        assert_eq!(fs::read_to_string(&planets).unwrap(), "\"original\"");
        assert!(echo_base.join("keep").exists());

        let mut names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["echo.json", "planets.json"]);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_failed_rename_removes_newly_created_outputs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let planets = utf8(temp_dir.path().join("planets.json"));

        let echo_base = utf8(temp_dir.path().join("echo.json"));
        fs::create_dir(&echo_base).unwrap();
        fs::write(echo_base.join("keep"), "").unwrap();

        let result = save_all(&[(planets.as_path(), &json!("new")), (echo_base.as_path(), &json!("never"))]);
        assert!(result.is_err());

        assert!(!planets.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_temp_and_backup_paths() {
        assert_eq!(temp_path_for(Utf8Path::new("out/data.json")), Utf8PathBuf::from("out/.data.json.tmp"));
        assert_eq!(backup_path_for(Utf8Path::new("out/data.json")), Utf8PathBuf::from("out/.data.json.bak"));
    }
}

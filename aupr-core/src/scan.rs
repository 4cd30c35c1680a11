use crate::error::Result;
use crate::format::{BLOCK_EXT, DATA_DIR_SUFFIX, INNER_DIR_PREFIX, OUTER_DIR_PREFIX};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use time::OffsetDateTime;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A candidate block file as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFile {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
}

impl BlockFile {
    pub fn file_name(&self) -> String {
        base_name(&self.path)
    }

    pub fn modified_utc(&self) -> OffsetDateTime {
        OffsetDateTime::from(self.modified)
    }
}

/// Basename as stored in the project document.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Secondary ordering for blocks with identical modification times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep the order the directory walk produced them in.
    #[default]
    Enumeration,
    FileName,
}

pub fn data_dir(base: &Path, project: &str) -> PathBuf {
    base.join(format!("{project}{DATA_DIR_SUFFIX}"))
}

fn has_prefix(name: &OsStr, prefix: &str) -> bool {
    name.to_str().is_some_and(|n| n.starts_with(prefix))
}

// Prune the walk to `e*/d*` before descending.
fn wanted(e: &DirEntry) -> bool {
    match e.depth() {
        0 => true,
        1 => e.file_type().is_dir() && has_prefix(e.file_name(), OUTER_DIR_PREFIX),
        2 => e.file_type().is_dir() && has_prefix(e.file_name(), INNER_DIR_PREFIX),
        _ => true,
    }
}

fn is_block(e: &DirEntry) -> bool {
    let p = e.path();
    e.depth() == 3
        && e.file_type().is_file()
        && p.extension() == Some(OsStr::new(BLOCK_EXT))
        && !has_prefix(e.file_name(), ".")
}

/// Collect `<project>_data/e*/d*/*.au` under `base`, ordered by modification time.
///
/// A missing data directory is not an error; it recovers zero blocks.
pub fn discover(base: &Path, project: &str, tie_break: TieBreak) -> Result<Vec<BlockFile>> {
    let root = data_dir(base, project);
    if !root.is_dir() {
        warn!(dir = %root.display(), "data directory not found");
        return Ok(Vec::new());
    }

    let mut blocks = Vec::new();
    let walk = WalkDir::new(&root)
        .follow_links(true)
        .max_depth(3)
        .into_iter()
        .filter_entry(wanted);
    for e in walk {
        let e = match e {
            Ok(e) => e,
            // symlink cycles and dangling links are not blocks
            Err(err)
                if err.loop_ancestor().is_some()
                    || err.io_error().map(|io| io.kind())
                        == Some(std::io::ErrorKind::NotFound) =>
            {
                warn!(path = ?err.path(), "skipping unresolvable entry: {err}");
                continue;
            }
            Err(err) => return Err(std::io::Error::new(std::io::ErrorKind::Other, err).into()),
        };
        if !is_block(&e) {
            continue;
        }
        let md = e.metadata().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        blocks.push(BlockFile {
            path: e.path().to_path_buf(),
            modified: md.modified()?,
            size: md.len(),
        });
    }

    match tie_break {
        // stable: equal timestamps keep walk order
        TieBreak::Enumeration => blocks.sort_by_key(|b| b.modified),
        TieBreak::FileName => blocks.sort_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
        }),
    }
    debug!(count = blocks.len(), dir = %root.display(), "discovered block files");
    Ok(blocks)
}

/// Names of projects with a `<name>_data` directory directly under `base`.
pub fn list_projects(base: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(stem) = name.strip_suffix(DATA_DIR_SUFFIX) {
            if !stem.is_empty() {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(path: &Path, secs: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let f = File::create(path).unwrap();
        f.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn only_matches_nested_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("song_data");
        touch(&data.join("e00/d00/b1.au"), 100);
        touch(&data.join("e00/d01/b2.au"), 200);
        touch(&data.join("e00/b3.au"), 300);
        touch(&data.join("x00/d00/b4.au"), 400);
        touch(&data.join("e00/x00/b5.au"), 500);
        touch(&data.join("e00/d00/b6.wav"), 600);
        touch(&data.join("e00/d00/sub/b7.au"), 700);

        let found = discover(tmp.path(), "song", TieBreak::Enumeration).unwrap();
        let names: Vec<_> = found.iter().map(|b| b.file_name()).collect();
        assert_eq!(names, vec!["b1.au", "b2.au"]);
    }

    #[test]
    fn prunes_directories_outside_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("p_data");
        touch(&data.join("e00/d00/a.au"), 10);
        touch(&data.join("backup/d00/stray.au"), 11);
        touch(&data.join("e00/old/stray2.au"), 12);
        touch(&data.join("a.au"), 13);

        let found = discover(tmp.path(), "p", TieBreak::Enumeration).unwrap();
        let names: Vec<_> = found.iter().map(|b| b.file_name()).collect();
        assert_eq!(names, vec!["a.au"]);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_directories_and_blocks() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        let elsewhere = tmp.path().join("elsewhere");
        touch(&elsewhere.join("d00/linked_dir.au"), 20);
        touch(&elsewhere.join("target.au"), 30);
        let data = tmp.path().join("p_data");
        touch(&data.join("e00/d00/plain.au"), 10);
        symlink(&elsewhere, data.join("e01")).unwrap();
        symlink(elsewhere.join("target.au"), data.join("e00/d00/link.au")).unwrap();
        symlink(tmp.path().join("missing.au"), data.join("e00/d00/dangling.au")).unwrap();
        // cycle back to the data root
        symlink(&data, data.join("e00/d01")).unwrap();

        let found = discover(tmp.path(), "p", TieBreak::Enumeration).unwrap();
        let names: Vec<_> = found.iter().map(|b| b.file_name()).collect();
        assert_eq!(names, vec!["plain.au", "linked_dir.au", "link.au"]);
    }

    #[test]
    fn orders_by_modification_time() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("p_data");
        touch(&data.join("e01/d07/zz.au"), 10);
        touch(&data.join("e00/d00/aa.au"), 30);
        touch(&data.join("e02/d03/mm.au"), 20);

        let found = discover(tmp.path(), "p", TieBreak::Enumeration).unwrap();
        let names: Vec<_> = found.iter().map(|b| b.file_name()).collect();
        assert_eq!(names, vec!["zz.au", "mm.au", "aa.au"]);
        assert!(found.windows(2).all(|w| w[0].modified <= w[1].modified));
    }

    #[test]
    fn filename_tie_break_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("p_data");
        touch(&data.join("e00/d00/c.au"), 50);
        touch(&data.join("e00/d01/a.au"), 50);
        touch(&data.join("e01/d00/b.au"), 50);
        touch(&data.join("e00/d00/first.au"), 5);

        let found = discover(tmp.path(), "p", TieBreak::FileName).unwrap();
        let names: Vec<_> = found.iter().map(|b| b.file_name()).collect();
        assert_eq!(names, vec!["first.au", "a.au", "b.au", "c.au"]);
    }

    #[test]
    fn missing_data_dir_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let found = discover(tmp.path(), "absent", TieBreak::Enumeration).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn lists_data_directories_as_projects() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("beta_data")).unwrap();
        fs::create_dir(tmp.path().join("alpha_data")).unwrap();
        fs::create_dir(tmp.path().join("_data")).unwrap();
        fs::create_dir(tmp.path().join("other")).unwrap();
        File::create(tmp.path().join("file_data")).unwrap();

        assert_eq!(list_projects(tmp.path()).unwrap(), vec!["alpha", "beta"]);
    }
}

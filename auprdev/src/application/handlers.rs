use std::io::Write;
use std::path::PathBuf;

use aupr_core::error::{AuprError, Result};
use aupr_core::format::{CHANNEL_COUNT, DATA_DIR_SUFFIX};
use aupr_core::scan::data_dir;
use aupr_core::{
    Alternating, PairingStrategy, RecoverOptions, TieBreak, discover, inspect_block,
    list_projects, recover,
};

pub fn handle_recover(
    basepath: PathBuf,
    project: String,
    out: Option<PathBuf>,
    tie_break: TieBreak,
    dry_run: bool,
    no_annotate: bool,
    json: bool,
) -> Result<()> {
    let opts = RecoverOptions {
        out,
        tie_break,
        dry_run,
        annotate_corruption: !no_annotate,
    };
    let report = match recover(&basepath, &project, Some(&opts)) {
        Err(AuprError::AlreadyExists(p)) => {
            eprintln!("File already exists: {}", p.display());
            eprintln!("Refusing to overwrite it; rename (back up) the existing .aup file first.");
            return Err(AuprError::AlreadyExists(p));
        }
        r => r?,
    };
    if json {
        let s = serde_json::to_string_pretty(&report)
            .map_err(|e| AuprError::Format(format!("report encode: {e}")))?;
        println!("{s}");
    } else {
        eprintln!("{report}");
    }
    Ok(())
}

pub fn handle_projects(basepath: PathBuf) -> Result<()> {
    let names = list_projects(&basepath)?;
    if names.is_empty() {
        eprintln!("No projects found in {}", basepath.display());
        return Ok(());
    }
    for (i, name) in names.iter().enumerate() {
        println!("{:>3} = {}{}", i + 1, name, DATA_DIR_SUFFIX);
    }
    Ok(())
}

pub fn handle_scan(basepath: PathBuf, project: String, tie_break: TieBreak) -> Result<()> {
    let blocks = discover(&basepath, &project, tie_break)?;
    eprintln!(
        "scan: {} block files under {}",
        blocks.len(),
        data_dir(&basepath, &project).display()
    );
    // Same assignment recover uses: index order within a channel is the slot.
    let pair = Alternating.pair(blocks);
    let slots = pair.left.len().max(pair.right.len());
    for slot in 0..slots {
        for ch in 0..CHANNEL_COUNT {
            if let Some(b) = pair.channel(ch).get(slot) {
                println!(
                    "#{:<5} ch={} {:>10}  {}  {}",
                    slot * CHANNEL_COUNT + ch,
                    ch,
                    b.size,
                    b.modified_utc(),
                    b.path.display()
                );
            }
        }
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct InspectTally {
    ok: usize,
    corrupt: usize,
    unreadable: usize,
}

// One line per file; an unreadable file is reported and the rest still run.
fn inspect_files(files: &[PathBuf], mut out: impl Write) -> Result<InspectTally> {
    let mut tally = InspectTally::default();
    for f in files {
        match inspect_block(f) {
            Ok((hdr, g)) => {
                tally.ok += 1;
                writeln!(
                    out,
                    "{}  magic=0x{:08x} off={} size={} samples={}",
                    f.display(),
                    hdr.magic,
                    g.data_off,
                    g.size,
                    g.samples
                )?;
            }
            Err(AuprError::Io(e)) => {
                tally.unreadable += 1;
                writeln!(out, "{}  unreadable: {e}", f.display())?;
            }
            Err(e) => {
                tally.corrupt += 1;
                writeln!(out, "{}  corrupt: {e}", f.display())?;
            }
        }
    }
    Ok(tally)
}

pub fn handle_inspect(files: Vec<PathBuf>) -> Result<()> {
    let t = inspect_files(&files, std::io::stdout().lock())?;
    eprintln!(
        "inspect: {} ok, {} corrupt, {} unreadable",
        t.ok, t.corrupt, t.unreadable
    );
    if t.unreadable > 0 {
        return Err(AuprError::Format(format!(
            "{} of {} files could not be read",
            t.unreadable,
            files.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aupr_core::BlockHeader;
    use std::fs;

    fn block(dir: &std::path::Path, rel: &str, samples: usize) -> PathBuf {
        let p = dir.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        let mut buf = Vec::new();
        BlockHeader::new(8).write_to(&mut buf).unwrap();
        buf.resize(8 + samples * 4, 0);
        fs::write(&p, buf).unwrap();
        p
    }

    #[test]
    fn recover_then_refuse_rerun() {
        let tmp = tempfile::tempdir().unwrap();
        block(tmp.path(), "take_data/e00/d00/a.au", 3);
        let base = tmp.path().to_path_buf();

        handle_recover(
            base.clone(),
            "take".into(),
            None,
            TieBreak::Enumeration,
            false,
            false,
            false,
        )
        .unwrap();
        let first = fs::read(base.join("take.aup")).unwrap();

        let err = handle_recover(
            base.clone(),
            "take".into(),
            None,
            TieBreak::Enumeration,
            false,
            false,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, AuprError::AlreadyExists(_)));
        assert_eq!(fs::read(base.join("take.aup")).unwrap(), first);
    }

    #[test]
    fn inspect_reports_corrupt_without_failing() {
        let tmp = tempfile::tempdir().unwrap();
        let good = block(tmp.path(), "good.au", 2);
        let bad = tmp.path().join("bad.au");
        fs::write(&bad, [1u8, 2, 3]).unwrap();
        handle_inspect(vec![good, bad]).unwrap();
    }

    #[test]
    fn inspect_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = handle_inspect(vec![tmp.path().join("nope.au")]).unwrap_err();
        assert!(matches!(err, AuprError::Format(_)));
    }

    #[test]
    fn inspect_continues_past_unreadable_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.au");
        let good = block(tmp.path(), "good.au", 9);
        let bad = tmp.path().join("bad.au");
        fs::write(&bad, [0u8; 12]).unwrap();

        let mut out = Vec::new();
        let t = inspect_files(&[missing, good, bad], &mut out).unwrap();
        assert_eq!(
            t,
            InspectTally {
                ok: 1,
                corrupt: 1,
                unreadable: 1
            }
        );
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("nope.au  unreadable:"));
        assert!(lines[1].contains("good.au  magic=0x2e736e64 off=8 size=44 samples=9"));
        assert!(lines[2].contains("bad.au  corrupt:"));
    }

    #[test]
    fn projects_and_scan_run_on_a_tree() {
        let tmp = tempfile::tempdir().unwrap();
        block(tmp.path(), "one_data/e00/d00/a.au", 1);
        block(tmp.path(), "one_data/e00/d00/b.au", 1);
        handle_projects(tmp.path().to_path_buf()).unwrap();
        handle_scan(tmp.path().to_path_buf(), "one".into(), TieBreak::FileName).unwrap();
    }
}

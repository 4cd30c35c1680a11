use crate::error::{AuprError, Result};
use crate::format::*;
use crate::report::marker;
use crate::sequence::{ChannelSequence, SequenceEntry};
use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `<base>/<project>.aup`
pub fn project_file(base: &Path, project: &str) -> PathBuf {
    base.join(format!("{project}.{PROJECT_EXT}"))
}

fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

// "--" may not appear inside an XML comment.
fn comment_safe(s: &str) -> String {
    let mut out = s.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}

/// Streams a project document. Each call appends; nothing already written
/// is revisited.
pub struct ProjectWriter<W: Write> {
    inner: W,
    annotate: bool,
}

impl<W: Write> ProjectWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            annotate: true,
        }
    }

    /// Whether corruption events are written as comments in the block list.
    pub fn annotate(mut self, on: bool) -> Self {
        self.annotate = on;
        self
    }

    pub fn write_header(&mut self, project: &str) -> std::io::Result<()> {
        let w = &mut self.inner;
        writeln!(w, r#"<?xml version="1.0" standalone="no" ?>"#)?;
        writeln!(w, r#"<!DOCTYPE project PUBLIC "{DOCTYPE_ID}" "{DOCTYPE_URL}" >"#)?;
        writeln!(
            w,
            r#"<project xmlns="{XMLNS}" projname="{}{DATA_DIR_SUFFIX}" version="{SCHEMA_VERSION}" audacityversion="{EDITOR_VERSION}" sel0="{SEL0}" sel1="{SEL1}" vpos="{VPOS}" h="{H_SCROLL}" zoom="{ZOOM}" rate="{PROJECT_RATE}">"#,
            escape_attr(project)
        )?;
        writeln!(w, "\t<tags/>")?;
        Ok(())
    }

    /// One `<wavetrack>` wrapping the channel's sequence. `linked` marks the
    /// leader of a stereo pair.
    pub fn write_track(&mut self, seq: &ChannelSequence, linked: bool) -> std::io::Result<()> {
        let w = &mut self.inner;
        writeln!(
            w,
            "\t<wavetrack name=\"{TRACK_NAME}\" channel=\"{}\" linked=\"{}\" mute=\"0\" solo=\"0\" height=\"{TRACK_HEIGHT}\" minimized=\"0\" isSelected=\"0\" rate=\"{TRACK_RATE}\" gain=\"{TRACK_GAIN}\" pan=\"{TRACK_PAN}\">",
            seq.channel,
            u8::from(linked)
        )?;
        writeln!(w, "\t\t<waveclip offset=\"{CLIP_OFFSET}\">")?;
        writeln!(
            w,
            "\t\t\t<sequence maxsamples=\"{}\" sampleformat=\"{SAMPLE_FORMAT}\" numsamples=\"{}\">",
            seq.max_block_samples, seq.total_samples
        )?;
        for entry in &seq.entries {
            match entry {
                SequenceEntry::Block(b) => {
                    writeln!(w, "\t\t\t\t<waveblock start=\"{}\">", b.start)?;
                    writeln!(
                        w,
                        "\t\t\t\t\t<simpleblockfile filename=\"{}\" len=\"{}\" min=\"{BLOCK_MIN}\" max=\"{BLOCK_MAX}\" rms=\"{BLOCK_RMS}\"/>",
                        escape_attr(&b.file_name),
                        b.samples
                    )?;
                    writeln!(w, "\t\t\t\t</waveblock>")?;
                }
                SequenceEntry::Corrupt(ev) if self.annotate => {
                    writeln!(w, "\t\t\t\t<!-- {} -->", comment_safe(&marker(ev)))?;
                }
                SequenceEntry::Corrupt(_) => {}
            }
        }
        writeln!(w, "\t\t\t</sequence>")?;
        writeln!(w, "\t\t\t<envelope numpoints=\"0\"/>")?;
        writeln!(w, "\t\t</waveclip>")?;
        writeln!(w, "\t</wavetrack>")?;
        Ok(())
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        writeln!(self.inner, "</project>")?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Full document for a stereo pair: channel 0 leads, channel 1 follows.
pub fn write_document<W: Write>(
    w: W,
    project: &str,
    channels: &[ChannelSequence; CHANNEL_COUNT],
    annotate: bool,
) -> std::io::Result<W> {
    let mut pw = ProjectWriter::new(w).annotate(annotate);
    pw.write_header(project)?;
    for (i, seq) in channels.iter().enumerate() {
        pw.write_track(seq, i == 0)?;
    }
    pw.finish()
}

/// Create `path` and write the document into it. An existing file is left
/// untouched and reported as [`AuprError::AlreadyExists`].
pub fn create_project(
    path: &Path,
    project: &str,
    channels: &[ChannelSequence; CHANNEL_COUNT],
    annotate: bool,
) -> Result<()> {
    let f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => AuprError::AlreadyExists(path.to_path_buf()),
            _ => AuprError::Io(e),
        })?;
    write_document(BufWriter::new(f), project, channels, annotate)?;
    Ok(())
}

//! Binary and schema constants for Audacity `.au` block files and the
//! `.aup` project document they are recovered into.

/// `.snd` read as a little-endian u32.
pub const AU_MAGIC: u32 = 0x2e73_6e64;
/// magic (u32 LE) + data offset (i32 LE)
pub const AU_HEADER_LEN: u64 = 8;
/// Bytes per sample of the 32-bit float block format.
pub const SAMPLE_WIDTH: u64 = 4;

pub const BLOCK_EXT: &str = "au";
pub const DATA_DIR_SUFFIX: &str = "_data";
pub const PROJECT_EXT: &str = "aup";
/// First- and second-level directory name prefixes under `<project>_data`.
pub const OUTER_DIR_PREFIX: &str = "e";
pub const INNER_DIR_PREFIX: &str = "d";

pub const CHANNEL_COUNT: usize = 2;

// Project document schema
pub const DOCTYPE_ID: &str = "-//audacityproject-1.3.0//DTD//EN";
pub const DOCTYPE_URL: &str = "http://audacity.sourceforge.net/xml/audacityproject-1.3.0.dtd";
pub const XMLNS: &str = "http://audacity.sourceforge.net/xml/";
pub const SCHEMA_VERSION: &str = "1.3.0";
pub const EDITOR_VERSION: &str = "2.0.3";
pub const SEL0: &str = "0.0000000000";
pub const SEL1: &str = "0.0000000000";
pub const VPOS: &str = "0";
pub const H_SCROLL: &str = "5153.6805442177";
pub const ZOOM: &str = "86.1328125000";
pub const PROJECT_RATE: &str = "44100.0";

pub const TRACK_NAME: &str = "Audio Track";
pub const TRACK_HEIGHT: u32 = 150;
pub const TRACK_RATE: u32 = 44100;
pub const TRACK_GAIN: &str = "1.0";
pub const TRACK_PAN: &str = "0.0";
pub const CLIP_OFFSET: &str = "0.00000000";
/// int-encoded `floatSample`
pub const SAMPLE_FORMAT: u32 = 262_159;

// Placeholder summary values; extrema are not recomputed from samples.
pub const BLOCK_MIN: &str = "-1.0";
pub const BLOCK_MAX: &str = "1.0";
pub const BLOCK_RMS: &str = "0.1";

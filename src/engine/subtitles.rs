//! SubRip caption parsing

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::domain::model::{CaptionInterval, SkippedBlock, TranscriptReport};
use crate::utils::time::TimecodeParser;

static TIMECODE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+:\d+:\d+,\d+)\s*-->\s*(\d+:\d+:\d+,\d+)(?:\s.*)?$")
        .expect("timecode pattern is valid")
});

/// Anything shaped like a timing line, valid or not; only used for block boundaries
static TIMING_LIKE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-->|^\d+:\d+").expect("timing pattern is valid"));

/// Raw lines of one caption block before interpretation
struct RawBlock<'a> {
    line: usize,
    lines: Vec<&'a str>,
}

/// Parser for time-coded caption payloads
pub struct SubtitleParser {
    timecodes: TimecodeParser,
}

impl SubtitleParser {
    pub fn new() -> Self {
        Self {
            timecodes: TimecodeParser::new(),
        }
    }

    /// Read and parse a caption file; a missing or unreadable file yields an empty report
    pub fn parse_file(&self, path: &Path) -> TranscriptReport {
        if !path.exists() {
            warn!("Caption file not found: {}", path.display());
            return TranscriptReport::default();
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not read caption file {}: {}", path.display(), e);
                return TranscriptReport::default();
            }
        };

        info!("Parsing captions from {}", path.display());
        let report = self.parse(&String::from_utf8_lossy(&bytes));
        if report.is_empty() {
            warn!("No usable caption blocks in {}", path.display());
        }
        report
    }

    /// Parse a caption payload; malformed blocks are skipped and reported
    pub fn parse(&self, content: &str) -> TranscriptReport {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut report = TranscriptReport::default();

        for (position, block) in Self::split_blocks(content).into_iter().enumerate() {
            match self.parse_block(&block) {
                Ok(interval) => report.intervals.push(interval),
                Err(reason) => {
                    warn!(
                        "Skipping caption block {} at line {}: {}",
                        position + 1,
                        block.line,
                        reason
                    );
                    report.skipped.push(SkippedBlock {
                        block: position + 1,
                        line: block.line,
                        reason,
                    });
                }
            }
        }

        info!(
            "Parsed {} caption intervals ({} blocks skipped)",
            report.intervals.len(),
            report.skipped.len()
        );
        report
    }

    /// Group lines into blocks separated by blank lines or by an index line
    /// directly followed by something shaped like a timing line
    fn split_blocks(content: &str) -> Vec<RawBlock<'_>> {
        let lines: Vec<&str> = content.lines().map(str::trim).collect();
        let mut blocks = Vec::new();
        let mut current: Option<RawBlock> = None;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                blocks.extend(current.take());
                continue;
            }

            let opens_block = Self::is_index_line(line)
                && lines
                    .get(i + 1)
                    .is_some_and(|next| TIMING_LIKE_LINE.is_match(next));

            if opens_block {
                blocks.extend(current.take());
            }

            current
                .get_or_insert_with(|| RawBlock {
                    line: i + 1,
                    lines: Vec::new(),
                })
                .lines
                .push(line);
        }

        blocks.extend(current);
        blocks
    }

    fn is_index_line(line: &str) -> bool {
        !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
    }

    fn parse_block(&self, block: &RawBlock) -> Result<CaptionInterval, String> {
        let index = block.lines.first().copied().unwrap_or_default();
        if !Self::is_index_line(index) {
            return Err(format!("expected index line, found '{}'", index));
        }

        let timing = block
            .lines
            .get(1)
            .ok_or_else(|| "missing timecode line".to_string())?;
        let captures = TIMECODE_LINE
            .captures(timing)
            .ok_or_else(|| format!("malformed timecode line '{}'", timing))?;

        let start_sec = self
            .timecodes
            .parse_timecode(&captures[1])
            .map_err(|e| e.to_string())?;
        let end_sec = self
            .timecodes
            .parse_timecode(&captures[2])
            .map_err(|e| e.to_string())?;

        let text = block.lines[2..].join(" ").trim().to_string();
        if text.is_empty() {
            return Err("block has no text".to_string());
        }

        Ok(CaptionInterval::new(start_sec, end_sec, text))
    }
}

impl Default for SubtitleParser {
    fn default() -> Self {
        Self::new()
    }
}

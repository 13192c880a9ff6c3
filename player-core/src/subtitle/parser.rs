//! Timed-text cue parser
//!
//! Turns WebVTT-style text into an ordered list of cues:
//! - Blocks are separated by blank lines
//! - The first line of a block is the timing line `<start> --> <end>`
//! - Every following line is cue text, kept verbatim
//!
//! Parsing is total. A block that does not fit the shape (format header,
//! NOTE block, broken timing line) is dropped and parsing carries on.

use super::cue::{parse_timestamp, Cue};

/// Timing separator between start and end timestamps
const TIMING_ARROW: &str = "-->";

/// Parse raw subtitle text into cues, in block order.
pub fn parse(raw: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in raw.lines() {
        // stray '\r' from mixed line endings
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            flush_block(&mut block, &mut cues);
        } else {
            block.push(line);
        }
    }
    flush_block(&mut block, &mut cues);

    cues
}

fn flush_block(block: &mut Vec<&str>, cues: &mut Vec<Cue>) {
    if !block.is_empty() {
        if let Some(cue) = parse_block(block) {
            cues.push(cue);
        }
        block.clear();
    }
}

/// Parse one block. `None` means the block is skipped.
fn parse_block(lines: &[&str]) -> Option<Cue> {
    if lines.len() < 2 {
        tracing::debug!("Skipping subtitle block without text: {:?}", lines.first());
        return None;
    }

    let Some((start, end)) = parse_timing_line(lines[0]) else {
        tracing::debug!("Skipping subtitle block with bad timing line: {:?}", lines[0]);
        return None;
    };

    if end < start {
        tracing::debug!(start, end, "Skipping subtitle block that ends before it starts");
        return None;
    }

    Some(Cue::new(start, end, lines[1..].join("\n")))
}

/// Split `<start> --> <end> [settings...]` into start and end seconds.
fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let (start, rest) = line.split_once(TIMING_ARROW)?;
    // Anything after the end timestamp is a cue setting (align:, line:, ...)
    let end = rest.split_whitespace().next()?;
    Some((parse_timestamp(start)?, parse_timestamp(end)?))
}

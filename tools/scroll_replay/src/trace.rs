use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{anyhow, bail, Context, Result};
use scrollwatch::{ScrollEvent, SurfaceId, Verdict};

pub const TRACE_HEADER_TAG: &str = "scroll_trace";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceLine {
    Start { ms: u64, surface: SurfaceId },
    Update(ScrollEvent),
    End { ms: u64, surface: SurfaceId },
}

impl TraceLine {
    pub fn ms(&self) -> u64 {
        match self {
            TraceLine::Start { ms, .. } | TraceLine::End { ms, .. } => *ms,
            TraceLine::Update(event) => event.t_ms,
        }
    }
}

pub fn parse_trace(path: &Path) -> Result<Vec<TraceLine>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        let parsed = parse_trace_line(&line)
            .with_context(|| format!("{}:{} invalid trace line", path.display(), line_no))?;
        out.extend(parsed);
    }
    Ok(out)
}

/// `Ok(None)` for blank lines, comments and the header.
pub fn parse_trace_line(line: &str) -> Result<Option<TraceLine>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [TRACE_HEADER_TAG, ..] => Ok(None),
        ["start", ms, surface] => Ok(Some(TraceLine::Start {
            ms: parse_field(ms, "ms")?,
            surface: SurfaceId(parse_field(surface, "surface")?),
        })),
        ["end", ms, surface] => Ok(Some(TraceLine::End {
            ms: parse_field(ms, "ms")?,
            surface: SurfaceId(parse_field(surface, "surface")?),
        })),
        ["update", ms, surface, dy, rest @ ..] => {
            let (to_index, item_count) = match rest {
                [] => (-1, 0),
                [to_index, item_count] => (
                    parse_field(to_index, "to_index")?,
                    parse_field(item_count, "item_count")?,
                ),
                _ => bail!("update expects 4 or 6 columns, got {}", parts.len()),
            };
            Ok(Some(TraceLine::Update(ScrollEvent {
                surface: SurfaceId(parse_field(surface, "surface")?),
                t_ms: parse_field(ms, "ms")?,
                dy: parse_field(dy, "dy")?,
                to_index,
                item_count,
            })))
        }
        [kind, ..] => bail!("unknown line kind '{kind}' or wrong column count"),
        [] => Ok(None),
    }
}

fn parse_field<T>(raw: &str, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| anyhow!("invalid {field} '{raw}': {e}"))
}

pub fn parse_expected_verdicts(path: &Path) -> Result<Vec<Verdict>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut verdicts = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let verdict = normalize_verdict(token).ok_or_else(|| {
            anyhow!(
                "{}:{} invalid expected verdict: {}",
                path.display(),
                line_no,
                token
            )
        })?;
        verdicts.push(verdict);
    }
    Ok(verdicts)
}

fn normalize_verdict(label: &str) -> Option<Verdict> {
    match label.to_ascii_lowercase().as_str() {
        "up" => Some(Verdict::Up),
        "down" => Some(Verdict::Down),
        "unknown" => Some(Verdict::Unknown),
        _ => None,
    }
}

/// Strand file parser.
///
/// One point per line as three whitespace-separated floats. A blank line ends
/// the current strand, a line starting with `#` is a comment and leaves the
/// current strand open.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nom::{
    character::complete::{space0, space1},
    combinator::all_consuming,
    number::complete::float,
    sequence::{delimited, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Point, Segment, SegmentStore};

/// Counts gathered while reading a strand file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrandStats {
    pub strands: usize,
    pub points: usize,
    pub segments: usize,
}

/// Parse strands from a line-oriented reader
pub fn parse_strands<R: BufRead>(reader: R, radius: f32) -> Result<SegmentStore> {
    parse_strands_with_stats(reader, radius).map(|(store, _)| store)
}

/// Parse strands from an in-memory string
pub fn parse_strands_str(input: &str, radius: f32) -> Result<SegmentStore> {
    parse_strands(input.as_bytes(), radius)
}

/// Parse strands, also reporting how many strands and points were read
pub fn parse_strands_with_stats<R: BufRead>(
    reader: R,
    radius: f32,
) -> Result<(SegmentStore, StrandStats)> {
    let mut builder = StrandBuilder::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }
        if line.trim().is_empty() {
            builder.end_strand();
            continue;
        }
        let point = parse_point_line(&line).ok_or_else(|| Error::MalformedLine {
            line: number + 1,
            content: line.clone(),
        })?;
        builder.push(point);
    }

    Ok(builder.finish(radius))
}

/// Open and parse a strand file
pub fn load_strand_file(path: impl AsRef<Path>, radius: f32) -> Result<(SegmentStore, StrandStats)> {
    let path = path.as_ref();
    log::info!("Loading hair geometry from \"{}\" ..", path.display());

    let with_path = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(with_path)?;
    let (store, stats) =
        parse_strands_with_stats(BufReader::new(file), radius).map_err(|err| match err {
            Error::Stream(source) => with_path(source),
            other => other,
        })?;

    log::debug!(
        "Read {} hair segments from {} strands ({} points)",
        stats.segments,
        stats.strands,
        stats.points
    );
    Ok((store, stats))
}

/// Accumulates segments, pairing each point with the previous point of its strand
#[derive(Default)]
struct StrandBuilder {
    segments: Vec<Segment>,
    previous: Option<Point>,
    stats: StrandStats,
}

impl StrandBuilder {
    fn push(&mut self, point: Point) {
        match self.previous {
            Some(previous) => self.segments.push(Segment::new(previous, point)),
            None => self.stats.strands += 1,
        }
        self.previous = Some(point);
        self.stats.points += 1;
    }

    fn end_strand(&mut self) {
        self.previous = None;
    }

    fn finish(self, radius: f32) -> (SegmentStore, StrandStats) {
        let stats = StrandStats {
            segments: self.segments.len(),
            ..self.stats
        };
        (SegmentStore::from_segments(self.segments, radius), stats)
    }
}

fn parse_point_line(line: &str) -> Option<Point> {
    all_consuming(delimited(space0, parse_point, space0))(line)
        .ok()
        .map(|(_, point)| point)
}

fn parse_point(input: &str) -> IResult<&str, Point> {
    let (input, (x, _, y, _, z)) = tuple((float, space1, float, space1, float))(input)?;
    Ok((input, Point::new(x, y, z)))
}

/// Binary persistence of a segment store.
///
/// Layout, little-endian, no header or checksum:
/// `radius: f32`, `count: u32`, then `count` records of
/// `start: 3 x f32`, `end: 3 x f32`.
use std::io::{self, Read, Write};

use nom::{
    multi::count,
    number::complete::{le_f32, le_u32},
    sequence::tuple,
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Point, Segment, SegmentStore};

/// Size of the radius and count fields
pub const HEADER_LEN: usize = 8;

/// Size of one encoded segment
pub const SEGMENT_RECORD_LEN: usize = 24;

/// Number of bytes `encode` writes for `store`
pub fn encoded_len(store: &SegmentStore) -> usize {
    HEADER_LEN + store.len() * SEGMENT_RECORD_LEN
}

/// Write `store` to `writer`
pub fn encode<W: Write + ?Sized>(store: &SegmentStore, writer: &mut W) -> io::Result<()> {
    let segment_count = u32::try_from(store.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} segments do not fit a 32-bit count", store.len()),
        )
    })?;

    writer.write_all(&store.radius().to_le_bytes())?;
    writer.write_all(&segment_count.to_le_bytes())?;
    for segment in store.segments() {
        write_point(writer, &segment.start)?;
        write_point(writer, &segment.end)?;
    }
    Ok(())
}

fn write_point<W: Write + ?Sized>(writer: &mut W, point: &Point) -> io::Result<()> {
    writer.write_all(&point.x.to_le_bytes())?;
    writer.write_all(&point.y.to_le_bytes())?;
    writer.write_all(&point.z.to_le_bytes())
}

/// Encode `store` into a fresh buffer
pub fn to_bytes(store: &SegmentStore) -> io::Result<Vec<u8>> {
    let mut data = Vec::with_capacity(encoded_len(store));
    encode(store, &mut data)?;
    Ok(data)
}

/// Decode a store from the front of `data`, returning the bytes that follow it
pub fn decode(data: &[u8]) -> Result<(&[u8], SegmentStore)> {
    let (rest, (radius, segment_count)) = header(data).map_err(|_| Error::Truncated)?;

    let segment_count = segment_count as usize;
    let needed = segment_count
        .checked_mul(SEGMENT_RECORD_LEN)
        .ok_or(Error::Truncated)?;
    if rest.len() < needed {
        return Err(Error::Truncated);
    }

    let (rest, segments) = count(segment, segment_count)(rest)
        .map_err(|_| Error::Truncated)?;

    Ok((rest, SegmentStore::from_segments(segments, radius)))
}

/// Decode a store that must occupy all of `data`
pub fn from_bytes(data: &[u8]) -> Result<SegmentStore> {
    let (rest, store) = decode(data)?;
    if !rest.is_empty() {
        return Err(Error::Corrupt(format!(
            "{} trailing bytes after {} segments",
            rest.len(),
            store.len()
        )));
    }
    Ok(store)
}

/// Read exactly one encoded store from `reader`, leaving anything after it unread
pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<SegmentStore> {
    let mut data = vec![0u8; HEADER_LEN];
    reader.read_exact(&mut data).map_err(truncated)?;

    let segment_count = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as u64;
    let body_len = segment_count * SEGMENT_RECORD_LEN as u64;

    // grows with the data actually present, so a corrupt count cannot force a huge allocation
    let read = reader.take(body_len).read_to_end(&mut data)?;
    if (read as u64) < body_len {
        return Err(Error::Truncated);
    }

    from_bytes(&data)
}

fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::Truncated
    } else {
        Error::Stream(err)
    }
}

fn header(input: &[u8]) -> IResult<&[u8], (f32, u32)> {
    tuple((le_f32, le_u32))(input)
}

fn segment(input: &[u8]) -> IResult<&[u8], Segment> {
    let (input, start) = point(input)?;
    let (input, end) = point(input)?;
    Ok((input, Segment::new(start, end)))
}

fn point(input: &[u8]) -> IResult<&[u8], Point> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point::new(x, y, z)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SegmentStore {
        SegmentStore::from_segments(
            vec![
                Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)),
                Segment::new(Point::new(1.0, 0.0, 0.0), Point::new(1.5, -2.25, 1e-7)),
                Segment::new(Point::new(-3.0, f32::MAX, 0.1), Point::new(0.3, 0.2, 0.1)),
            ],
            0.0125,
        )
    }

    #[test]
    fn test_layout() {
        let data = to_bytes(&store()).unwrap();
        assert_eq!(data.len(), HEADER_LEN + 3 * SEGMENT_RECORD_LEN);
        assert_eq!(data.len(), encoded_len(&store()));
        assert_eq!(&data[0..4], &0.0125f32.to_le_bytes());
        assert_eq!(&data[4..8], &3u32.to_le_bytes());
        // second segment's end x
        assert_eq!(&data[8 + 24 + 12..8 + 24 + 16], &1.5f32.to_le_bytes());
    }

    #[test]
    fn test_round_trip_is_exact() {
        let original = store();
        let decoded = from_bytes(&to_bytes(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.radius().to_bits(), original.radius().to_bits());
    }

    #[test]
    fn test_empty_store() {
        let data = to_bytes(&SegmentStore::new(0.05)).unwrap();
        assert_eq!(data.len(), HEADER_LEN);
        let decoded = from_bytes(&data).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.radius(), 0.05);
    }

    #[test]
    fn test_decode_leaves_following_bytes() {
        let mut data = to_bytes(&store()).unwrap();
        data.extend_from_slice(b"next object");
        let (rest, decoded) = decode(&data).unwrap();
        assert_eq!(rest, b"next object");
        assert_eq!(decoded.len(), 3);

        assert!(matches!(from_bytes(&data), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_truncated_stream_fails() {
        let data = to_bytes(&store()).unwrap();
        for len in [0, 3, 7, HEADER_LEN, data.len() - 1] {
            assert!(
                matches!(from_bytes(&data[..len]), Err(Error::Truncated)),
                "length {len} should be truncated"
            );
            let mut reader = &data[..len];
            assert!(matches!(read_from(&mut reader), Err(Error::Truncated)));
        }
    }

    #[test]
    fn test_huge_count_is_truncated_not_allocated() {
        let mut data = Vec::new();
        data.extend_from_slice(&0.05f32.to_le_bytes());
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(from_bytes(&data), Err(Error::Truncated)));
        assert!(matches!(read_from(&mut data.as_slice()), Err(Error::Truncated)));
    }

    #[test]
    fn test_read_from_stops_after_record() {
        let mut data = to_bytes(&store()).unwrap();
        data.extend_from_slice(&[0xAB, 0xCD]);
        let mut reader = data.as_slice();
        let decoded = read_from(&mut reader).unwrap();
        assert_eq!(decoded, store());
        assert_eq!(reader, &[0xAB, 0xCD]);
    }
}

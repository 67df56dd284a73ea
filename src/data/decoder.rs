//! Binary decoder for CHI760e `.bin` CV exports.
//!
//! Record layout, version 1 (all multi-byte values little-endian):
//!
//! ```text
//! offset  size  field
//! 0x00       7  magic "CHI760E"
//! 0x07       1  layout version (0x01)
//! 0x08      16  instrument id, NUL-padded text
//! 0x18      16  technique id, NUL-padded text
//! 0x28      64  comment, NUL-padded text
//! 0x68     4×8  init_e, final_e, high_e, low_e, scan_rate,
//!               sample_interval, quiet_time, sensitivity  (f32 each)
//! 0x88       4  segment count (i32)
//! 0x8C       …  segment blocks, back-to-back
//! ```
//!
//! Segment block: `sample_count` (i32), direction marker (u8, 0 = reverse,
//! 1 = forward), then `sample_count` × (`potential` f32, `current` f32).
//!
//! Decoding is total and deterministic for well-formed input and never drops
//! a segment or sample; any structural problem aborts the whole decode with
//! no partial result.

use log::{debug, warn};

use super::model::{CvExperiment, RawHeader, Segment, SweepDirection};
use super::reader::ByteReader;
use crate::error::CvError;

/// File magic preceding the layout version byte.
pub const MAGIC: [u8; 7] = *b"CHI760E";

/// Record-layout revision this decoder understands.
pub const LAYOUT_VERSION: u8 = 1;

/// Sanity bound on the declared segment count. Guards a garbled count field
/// against cascading into a huge allocation.
pub const MAX_SEGMENTS: i32 = 4096;

/// Sanity bound on a declared per-segment sample count.
pub const MAX_SAMPLES_PER_SEGMENT: i32 = 16_777_216;

const INSTRUMENT_LEN: usize = 16;
const TECHNIQUE_LEN: usize = 16;
const COMMENT_LEN: usize = 64;

/// Decode a `.bin` byte buffer into a [`CvExperiment`].
pub fn decode(bytes: &[u8]) -> Result<CvExperiment, CvError> {
    let mut r = ByteReader::new(bytes);

    check_magic(&mut r)?;

    let header = read_header(&mut r)?;
    debug!(
        "decoded header: {} {} — {} segment(s), {:.3} V/s",
        header.instrument, header.technique, header.num_segments, header.scan_rate
    );

    let mut segments = Vec::with_capacity(header.num_segments);
    for index in 1..=header.num_segments {
        segments.push(read_segment(&mut r, index)?);
    }

    if r.remaining() > 0 {
        debug!("{} trailing byte(s) after the final segment", r.remaining());
    }

    Ok(CvExperiment { header, segments })
}

fn check_magic(r: &mut ByteReader) -> Result<(), CvError> {
    let magic = r
        .read_bytes(MAGIC.len())
        .map_err(|_| CvError::UnrecognizedFormat {
            reason: "buffer shorter than the format marker".to_string(),
        })?;
    if magic != &MAGIC[..] {
        return Err(CvError::UnrecognizedFormat {
            reason: format!("bad magic {magic:02x?}"),
        });
    }

    let version = r.read_u8().map_err(|_| CvError::UnrecognizedFormat {
        reason: "buffer ends before the layout version byte".to_string(),
    })?;
    if version != LAYOUT_VERSION {
        return Err(CvError::UnrecognizedFormat {
            reason: format!("unsupported layout version {version} (expected {LAYOUT_VERSION})"),
        });
    }
    Ok(())
}

fn read_header(r: &mut ByteReader) -> Result<RawHeader, CvError> {
    let instrument = r.read_text(INSTRUMENT_LEN)?;
    let technique = r.read_text(TECHNIQUE_LEN)?;
    let comment = r.read_text(COMMENT_LEN)?;

    let init_e = r.read_f32()? as f64;
    let final_e = r.read_f32()? as f64;
    let high_e = r.read_f32()? as f64;
    let low_e = r.read_f32()? as f64;
    let scan_rate = r.read_f32()? as f64;
    let sample_interval = r.read_f32()? as f64;
    let quiet_time = r.read_f32()? as f64;
    let sensitivity = r.read_f32()? as f64;

    let num_segments = read_count(r, "segment count", MAX_SEGMENTS)?;

    Ok(RawHeader {
        instrument,
        technique,
        comment,
        init_e,
        final_e,
        high_e,
        low_e,
        scan_rate,
        sample_interval,
        quiet_time,
        sensitivity,
        num_segments,
    })
}

/// Read an i32 count field, rejecting negatives and values past `max`.
fn read_count(r: &mut ByteReader, what: &str, max: i32) -> Result<usize, CvError> {
    let offset = r.position();
    let value = r.read_i32()?;
    if value < 0 || value > max {
        return Err(CvError::CorruptRecord {
            offset,
            reason: format!("{what} {value} outside 0..={max}"),
        });
    }
    Ok(value as usize)
}

fn read_segment(r: &mut ByteReader, index: usize) -> Result<Segment, CvError> {
    let sample_count = read_count(r, "sample count", MAX_SAMPLES_PER_SEGMENT)?;

    let marker_offset = r.position();
    let marker_direction = match r.read_u8()? {
        0 => SweepDirection::Reverse,
        1 => SweepDirection::Forward,
        other => {
            return Err(CvError::CorruptRecord {
                offset: marker_offset,
                reason: format!("direction marker {other:#04x} is neither 0 nor 1"),
            })
        }
    };

    // Reject an oversized declaration before allocating for it.
    let needed = sample_count * 8;
    if r.remaining() < needed {
        return Err(CvError::TruncatedFile {
            offset: r.position(),
            needed,
            remaining: r.remaining(),
        });
    }

    let mut potential = Vec::with_capacity(sample_count);
    let mut current = Vec::with_capacity(sample_count);
    for _ in 0..sample_count {
        potential.push(r.read_f32()? as f64);
        current.push(r.read_f32()? as f64);
    }

    // Direction is fixed here, once, from the data itself; the marker only
    // decides for segments too short to infer from.
    let direction = SweepDirection::infer(&potential).unwrap_or(marker_direction);
    if direction != marker_direction {
        warn!("segment {index}: direction marker disagrees with sample data, using {direction}");
    }

    Ok(Segment {
        index,
        direction,
        potential,
        current,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a well-formed buffer from header fields and segments given as
    /// `(marker, samples)` pairs.
    fn build_buffer(fields: [f32; 8], segments: &[(u8, Vec<(f32, f32)>)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.push(LAYOUT_VERSION);

        let text = |s: &str, len: usize| {
            let mut field = s.as_bytes().to_vec();
            field.resize(len, 0);
            field
        };
        buf.extend_from_slice(&text("CHI760e", INSTRUMENT_LEN));
        buf.extend_from_slice(&text("CV", TECHNIQUE_LEN));
        buf.extend_from_slice(&text("ferrocene in MeCN", COMMENT_LEN));

        for value in fields {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf.extend_from_slice(&(segments.len() as i32).to_le_bytes());

        for (marker, samples) in segments {
            buf.extend_from_slice(&(samples.len() as i32).to_le_bytes());
            buf.push(*marker);
            for (potential, current) in samples {
                buf.extend_from_slice(&potential.to_le_bytes());
                buf.extend_from_slice(&current.to_le_bytes());
            }
        }
        buf
    }

    const FIELDS: [f32; 8] = [0.0, 0.0, 0.5, -0.1, 0.1, 0.002, 2.0, 1e-5];

    #[test]
    fn round_trip_preserves_every_sample() {
        let buf = build_buffer(
            FIELDS,
            &[
                (1, vec![(0.0, 1.0e-6), (0.1, 2.0e-6), (0.2, 1.5e-6)]),
                (0, vec![(0.2, -1.0e-6), (0.1, -2.0e-6)]),
            ],
        );

        let exp = decode(&buf).unwrap();
        assert_eq!(exp.header.instrument, "CHI760e");
        assert_eq!(exp.header.technique, "CV");
        assert_eq!(exp.header.comment, "ferrocene in MeCN");
        assert_eq!(exp.header.high_e, 0.5f32 as f64);
        assert_eq!(exp.header.sample_interval, 0.002f32 as f64);
        assert_eq!(exp.header.num_segments, 2);

        assert_eq!(exp.len(), 2);
        assert_eq!(exp.segments[0].index, 1);
        assert_eq!(exp.segments[0].direction, SweepDirection::Forward);
        assert_eq!(
            exp.segments[0].potential,
            vec![0.0, 0.1f32 as f64, 0.2f32 as f64]
        );
        assert_eq!(
            exp.segments[0].current,
            vec![1.0e-6f32 as f64, 2.0e-6f32 as f64, 1.5e-6f32 as f64]
        );
        assert_eq!(exp.segments[1].index, 2);
        assert_eq!(exp.segments[1].direction, SweepDirection::Reverse);
        assert_eq!(exp.segments[1].len(), 2);
    }

    #[test]
    fn bad_magic_is_unrecognized() {
        let mut buf = build_buffer(FIELDS, &[]);
        buf[0] = b'X';
        assert!(matches!(
            decode(&buf),
            Err(CvError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn unknown_version_is_unrecognized() {
        let mut buf = build_buffer(FIELDS, &[]);
        buf[7] = 9;
        assert!(matches!(
            decode(&buf),
            Err(CvError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn tiny_buffer_is_unrecognized_not_truncated() {
        assert!(matches!(
            decode(b"CHI"),
            Err(CvError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn declared_samples_past_the_end_truncate() {
        let mut buf = build_buffer(FIELDS, &[(1, vec![(0.0, 1.0e-6), (0.1, 2.0e-6)])]);
        buf.truncate(buf.len() - 4);
        assert!(matches!(decode(&buf), Err(CvError::TruncatedFile { .. })));
    }

    #[test]
    fn negative_sample_count_is_corrupt() {
        let mut buf = build_buffer(FIELDS, &[]);
        // Rewrite the segment count to 1, then append a negative sample count.
        let count_at = buf.len() - 4;
        buf[count_at..].copy_from_slice(&1i32.to_le_bytes());
        buf.extend_from_slice(&(-3i32).to_le_bytes());
        buf.push(1);
        assert!(matches!(decode(&buf), Err(CvError::CorruptRecord { .. })));
    }

    #[test]
    fn absurd_segment_count_is_corrupt() {
        let mut buf = build_buffer(FIELDS, &[]);
        let count_at = buf.len() - 4;
        buf[count_at..].copy_from_slice(&(MAX_SEGMENTS + 1).to_le_bytes());
        assert!(matches!(decode(&buf), Err(CvError::CorruptRecord { .. })));
    }

    #[test]
    fn garbage_direction_marker_is_corrupt() {
        let buf = build_buffer(FIELDS, &[(7, vec![(0.0, 0.0)])]);
        assert!(matches!(decode(&buf), Err(CvError::CorruptRecord { .. })));
    }

    #[test]
    fn empty_segment_block_decodes_with_marker_direction() {
        let exp = decode(&build_buffer(FIELDS, &[(0, vec![])])).unwrap();
        assert_eq!(exp.segments[0].len(), 0);
        assert_eq!(exp.segments[0].direction, SweepDirection::Reverse);
    }

    #[test]
    fn trailing_bytes_are_tolerated() {
        let mut buf = build_buffer(FIELDS, &[(1, vec![(0.0, 1.0e-6)])]);
        buf.extend_from_slice(&[0xde, 0xad]);
        assert!(decode(&buf).is_ok());
    }
}

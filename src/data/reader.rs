use byteorder::{ByteOrder, LittleEndian};

use crate::error::CvError;

// ---------------------------------------------------------------------------
// ByteReader – positional cursor with typed little-endian reads
// ---------------------------------------------------------------------------

/// Positional cursor over a raw byte buffer.
///
/// The CHI760e layout is little-endian throughout, so every multi-byte read
/// here is little-endian — there is no per-call byte-order choice to get
/// wrong. Reads advance the cursor and fail with [`CvError::TruncatedFile`]
/// when fewer bytes remain than requested; the buffer itself is never
/// mutated.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, offset: usize) -> Result<(), CvError> {
        if offset > self.buf.len() {
            return Err(CvError::TruncatedFile {
                offset: self.pos,
                needed: offset - self.buf.len(),
                remaining: 0,
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Take `len` raw bytes, advancing the cursor.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CvError> {
        if self.remaining() < len {
            return Err(CvError::TruncatedFile {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, CvError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32, CvError> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, CvError> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    /// Read a fixed-length NUL-padded text field, trimming the padding.
    pub fn read_text(&mut self, len: usize) -> Result<String, CvError> {
        let raw = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(raw)
            .trim_end_matches('\0')
            .trim()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_reads_advance_the_cursor() {
        let mut buf = vec![0x2a];
        buf.extend_from_slice(&7i32.to_le_bytes());
        buf.extend_from_slice(&1.5f32.to_le_bytes());

        let mut r = ByteReader::new(&buf);
        assert_eq!(r.read_u8().unwrap(), 0x2a);
        assert_eq!(r.read_i32().unwrap(), 7);
        assert_eq!(r.read_f32().unwrap(), 1.5);
        assert_eq!(r.position(), 9);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_read_reports_truncation() {
        let mut r = ByteReader::new(&[0x01, 0x02]);
        let err = r.read_i32().unwrap_err();
        match err {
            CvError::TruncatedFile {
                offset,
                needed,
                remaining,
            } => {
                assert_eq!(offset, 0);
                assert_eq!(needed, 4);
                assert_eq!(remaining, 2);
            }
            other => panic!("expected TruncatedFile, got {other:?}"),
        }
        // A failed read leaves the cursor where it was.
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn seek_is_absolute_and_bounded() {
        let mut r = ByteReader::new(&[0u8; 8]);
        r.seek(6).unwrap();
        assert_eq!(r.remaining(), 2);
        r.seek(0).unwrap();
        assert_eq!(r.remaining(), 8);
        assert!(r.seek(9).is_err());
    }

    #[test]
    fn text_reads_trim_nul_padding() {
        let mut field = b"CHI760e".to_vec();
        field.resize(16, 0);
        let mut r = ByteReader::new(&field);
        assert_eq!(r.read_text(16).unwrap(), "CHI760e");
        assert_eq!(r.remaining(), 0);
    }
}

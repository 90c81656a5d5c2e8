//! Scanline packing and TIFF PackBits compression.

use crate::error::Error;

/// Longest run a single PackBits control byte can describe.
const MAX_RUN: usize = 128;

/// Result of packing one scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedRow {
    /// Bytes written to the output buffer.
    pub len: usize,
    /// Indices of the first and last nonzero source bytes, `None` for a blank row.
    pub bounds: Option<(usize, usize)>,
}

impl PackedRow {
    pub fn is_blank(&self) -> bool {
        self.bounds.is_none()
    }
}

fn nonzero_bounds(line: &[u8]) -> Option<(usize, usize)> {
    let first = line.iter().position(|&b| b != 0)?;
    let last = line.iter().rposition(|&b| b != 0)?;
    Some((first, last))
}

/// Output size `pack_tiff` requires for a line of `len` bytes.
pub fn max_tiff_len(len: usize) -> usize {
    2 * len
}

/// Copy a scanline verbatim.
pub fn pack_uncompressed(line: &[u8], out: &mut [u8]) -> Result<PackedRow, Error> {
    if out.len() < line.len() {
        return Err(Error::BufferTooSmall {
            needed: line.len(),
            actual: out.len(),
        });
    }
    out[..line.len()].copy_from_slice(line);
    Ok(PackedRow {
        len: line.len(),
        bounds: nonzero_bounds(line),
    })
}

/// Compress a scanline with TIFF PackBits.
///
/// A literal run is written as a count byte `0..=127` followed by that many
/// plus one bytes, a repeat run as `1 - n` followed by the repeated byte.
/// Repeats start at three equal bytes; shorter repeats stay in literals.
pub fn pack_tiff(line: &[u8], out: &mut [u8]) -> Result<PackedRow, Error> {
    let needed = max_tiff_len(line.len());
    if out.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: out.len(),
        });
    }

    let n = line.len();
    let mut written = 0;
    let mut i = 0;
    while i < n {
        let value = line[i];
        let mut run = 1;
        while i + run < n && line[i + run] == value {
            run += 1;
        }

        if run >= 3 {
            let mut left = run;
            while left > 0 {
                let chunk = left.min(MAX_RUN);
                out[written] = (1 - chunk as i16) as i8 as u8;
                out[written + 1] = value;
                written += 2;
                left -= chunk;
            }
            i += run;
        } else {
            let start = i;
            let mut j = i;
            while j < n && !(j + 2 < n && line[j] == line[j + 1] && line[j] == line[j + 2]) {
                j += 1;
            }
            for chunk in line[start..j].chunks(MAX_RUN) {
                out[written] = (chunk.len() - 1) as u8;
                out[written + 1..written + 1 + chunk.len()].copy_from_slice(chunk);
                written += chunk.len() + 1;
            }
            i = j;
        }
    }

    Ok(PackedRow {
        len: written,
        bounds: nonzero_bounds(line),
    })
}

/// Compress a scanline into a fresh buffer.
pub fn pack_bits(line: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; max_tiff_len(line.len())];
    // The buffer is always large enough.
    let len = pack_tiff(line, &mut out).map(|row| row.len).unwrap_or(0);
    out.truncate(len);
    out
}

/// Decode PackBits data, appending to `out`.
///
/// A control byte of `-128` is a no-op.
pub fn unpack_tiff(data: &[u8], out: &mut Vec<u8>) -> Result<(), Error> {
    let mut i = 0;
    while i < data.len() {
        let control = data[i] as i8;
        match control {
            0..=127 => {
                let count = control as usize + 1;
                let literal = data
                    .get(i + 1..i + 1 + count)
                    .ok_or(Error::MalformedPackBits(i))?;
                out.extend_from_slice(literal);
                i += 1 + count;
            }
            -128 => i += 1,
            _ => {
                let value = *data.get(i + 1).ok_or(Error::MalformedPackBits(i))?;
                let count = 1 - control as isize;
                out.extend(std::iter::repeat(value).take(count as usize));
                i += 2;
            }
        }
    }
    Ok(())
}

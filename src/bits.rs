//! Bit-plane reshaping.
//!
//! Dithered rows come out as separate single-bit planes (see
//! [`DitherChannel::row`](crate::DitherChannel::row)). Devices want them in
//! other shapes: several planes interleaved into multi-bit pixels
//! ([`fold`]), dots dealt across several nozzle rows ([`split`]), or one
//! multiplexed stream spread across several heads ([`unpack`]).
//!
//! All functions are stateless and work on caller-owned buffers. Bits are
//! always most-significant first: pixel `x` of a plane lives in byte `x / 8`
//! under the mask `0x80 >> (x % 8)`.

use crate::error::Error;

const MASKS_1: [u8; 8] = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];
const MASKS_2: [u8; 4] = [0xc0, 0x30, 0x0c, 0x03];

/// Interleaving produced by [`fold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldLayout {
    /// Two planes into 2-bit pixels, plane 1 in the high bit.
    Two,
    /// Three planes into 3-bit pixels running across byte boundaries.
    Three,
    /// Three planes packed three pixels per byte as 3, 2 and 3 bits. The
    /// middle pixel drops its plane 2 bit.
    Three323,
    /// Four planes into 4-bit pixels, plane 3 in the high bit.
    Four,
}

impl FoldLayout {
    pub fn for_planes(planes: usize) -> Option<Self> {
        match planes {
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    pub fn planes(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three | Self::Three323 => 3,
            Self::Four => 4,
        }
    }

    /// Output size for planes of `single_length` bytes.
    pub fn folded_len(self, single_length: usize) -> usize {
        match self {
            Self::Three323 => (8 * single_length + 2) / 3,
            _ => self.planes() * single_length,
        }
    }
}

fn check_input(actual: usize, expected: usize) -> Result<(), Error> {
    if actual < expected {
        return Err(Error::RowLength { expected, actual });
    }
    Ok(())
}

fn check_output(actual: usize, needed: usize) -> Result<(), Error> {
    if actual < needed {
        return Err(Error::BufferTooSmall { needed, actual });
    }
    Ok(())
}

#[inline]
fn read_bits(data: &[u8], offset: usize, width: usize) -> u8 {
    let mut value = 0;
    for bit in offset..offset + width {
        value = value << 1 | (data[bit / 8] >> (7 - bit % 8)) & 1;
    }
    value
}

#[inline]
fn write_bits(data: &mut [u8], offset: usize, width: usize, value: u8) {
    for k in 0..width {
        if (value >> (width - 1 - k)) & 1 != 0 {
            let bit = offset + k;
            data[bit / 8] |= 0x80 >> (bit % 8);
        }
    }
}

/// Value of pixel `x` across `planes` planes of `length` bytes, plane 0 in bit 0.
#[inline]
fn pixel(line: &[u8], length: usize, planes: usize, x: usize) -> u8 {
    let (byte, shift) = (x / 8, 7 - x % 8);
    (0..planes).fold(0, |value, plane| {
        value | ((line[plane * length + byte] >> shift) & 1) << plane
    })
}

/// Spread the four bits of a nibble onto the even bit positions of a byte.
#[inline]
fn spread_nibble(nibble: u8) -> u8 {
    (nibble & 0x08) << 3 | (nibble & 0x04) << 2 | (nibble & 0x02) << 1 | (nibble & 0x01)
}

/// Interleave `layout.planes()` bit planes into one stream.
///
/// `line` holds the planes back to back, `single_length` bytes each.
/// Returns the number of bytes written to `out`.
pub fn fold(
    line: &[u8],
    single_length: usize,
    layout: FoldLayout,
    out: &mut [u8],
) -> Result<usize, Error> {
    check_input(line.len(), layout.planes() * single_length)?;
    let needed = layout.folded_len(single_length);
    check_output(out.len(), needed)?;
    let out = &mut out[..needed];
    match layout {
        FoldLayout::Two => fold_2(line, single_length, out),
        FoldLayout::Three => fold_3(line, single_length, out),
        FoldLayout::Three323 => fold_3_323(line, single_length, out),
        FoldLayout::Four => fold_4(line, single_length, out),
    }
    Ok(needed)
}

fn fold_2(line: &[u8], length: usize, out: &mut [u8]) {
    let (low, high) = line.split_at(length);
    for (i, (&l0, &l1)) in low.iter().zip(&high[..length]).enumerate() {
        out[2 * i] = spread_nibble(l1 >> 4) << 1 | spread_nibble(l0 >> 4);
        out[2 * i + 1] = spread_nibble(l1 & 0x0f) << 1 | spread_nibble(l0 & 0x0f);
    }
}

fn fold_3(line: &[u8], length: usize, out: &mut [u8]) {
    for i in 0..length {
        let target = &mut out[3 * i..3 * i + 3];
        if line[i] | line[length + i] | line[2 * length + i] == 0 {
            target.fill(0);
            continue;
        }
        let mut word = 0u32;
        for x in 0..8 {
            let value = pixel(line, length, 3, i * 8 + x);
            word |= u32::from(value) << (21 - 3 * x);
        }
        target.copy_from_slice(&word.to_be_bytes()[1..]);
    }
}

fn fold_3_323(line: &[u8], length: usize, out: &mut [u8]) {
    let pixels = 8 * length;
    let at = |x: usize| {
        if x < pixels {
            pixel(line, length, 3, x)
        } else {
            0
        }
    };
    for (group, byte) in out.iter_mut().enumerate() {
        let x = 3 * group;
        *byte = at(x) << 5 | (at(x + 1) & 0x03) << 3 | at(x + 2);
    }
}

fn fold_4(line: &[u8], length: usize, out: &mut [u8]) {
    for i in 0..length {
        let target = &mut out[4 * i..4 * i + 4];
        for (pair, byte) in target.iter_mut().enumerate() {
            let x = i * 8 + pair * 2;
            *byte = pixel(line, length, 4, x) << 4 | pixel(line, length, 4, x + 1);
        }
    }
}

/// Undo [`fold`], writing the planes back to back into `out`.
///
/// [`FoldLayout::Three323`] loses information and cannot be undone.
pub fn unfold(
    folded: &[u8],
    single_length: usize,
    layout: FoldLayout,
    out: &mut [u8],
) -> Result<usize, Error> {
    if layout == FoldLayout::Three323 {
        return Err(Error::InvalidConfig(
            "3-2-3 folding drops bits and cannot be undone".to_string(),
        ));
    }
    let planes = layout.planes();
    let needed = planes * single_length;
    check_input(folded.len(), needed)?;
    check_output(out.len(), needed)?;
    let out = &mut out[..needed];
    out.fill(0);
    for x in 0..8 * single_length {
        let value = read_bits(folded, x * planes, planes);
        for plane in 0..planes {
            if (value >> plane) & 1 != 0 {
                out[plane * single_length + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    Ok(needed)
}

fn pixel_masks(bits: usize) -> &'static [u8] {
    if bits == 1 {
        &MASKS_1
    } else {
        &MASKS_2
    }
}

/// Deal the dots of a row across `n` outputs.
///
/// `input` holds `length * bits` bytes of `bits`-wide pixels. Every nonzero
/// pixel, in pixel order, goes to the next of `outputs[0]`,
/// `outputs[stride]`, ..., `outputs[(n - 1) * stride]`, keeping its position.
/// Each of those outputs must hold `length * bits` bytes; other entries of
/// `outputs` are left untouched.
pub fn split(
    length: usize,
    bits: usize,
    n: usize,
    input: &[u8],
    stride: usize,
    outputs: &mut [&mut [u8]],
) -> Result<(), Error> {
    if bits != 1 && bits != 2 {
        return Err(Error::UnsupportedShape { n, bits });
    }
    if n == 0 || stride == 0 {
        return Err(Error::InvalidConfig(format!(
            "cannot split into {} outputs with stride {}",
            n, stride
        )));
    }
    let bytes = length * bits;
    check_input(input.len(), bytes)?;
    let slots = (n - 1) * stride + 1;
    if outputs.len() < slots {
        return Err(Error::InvalidConfig(format!(
            "split needs {} output slots, {} supplied",
            slots,
            outputs.len()
        )));
    }
    for k in 0..n {
        check_output(outputs[k * stride].len(), bytes)?;
    }
    let input = &input[..bytes];

    match n {
        1 => outputs[0][..bytes].copy_from_slice(input),
        2 => {
            let (first, rest) = outputs.split_at_mut(stride);
            split_2(input, bits, &mut *first[0], &mut *rest[0]);
        }
        4 => {
            let (first, rest) = outputs.split_at_mut(stride);
            let (second, rest) = rest.split_at_mut(stride);
            let (third, rest) = rest.split_at_mut(stride);
            split_4(
                input,
                bits,
                [&mut *first[0], &mut *second[0], &mut *third[0], &mut *rest[0]],
            );
        }
        _ => split_generic(input, bits, n, stride, outputs),
    }
    Ok(())
}

fn split_2(input: &[u8], bits: usize, first: &mut [u8], second: &mut [u8]) {
    let masks = pixel_masks(bits);
    let mut toggle = false;
    for (i, &byte) in input.iter().enumerate() {
        first[i] = 0;
        second[i] = 0;
        if byte == 0 {
            continue;
        }
        for &mask in masks {
            let dot = byte & mask;
            if dot != 0 {
                if toggle {
                    second[i] |= dot;
                } else {
                    first[i] |= dot;
                }
                toggle = !toggle;
            }
        }
    }
}

fn split_4(input: &[u8], bits: usize, mut outputs: [&mut [u8]; 4]) {
    let masks = pixel_masks(bits);
    let mut row = 0;
    for (i, &byte) in input.iter().enumerate() {
        for output in outputs.iter_mut() {
            output[i] = 0;
        }
        if byte == 0 {
            continue;
        }
        for &mask in masks {
            let dot = byte & mask;
            if dot != 0 {
                outputs[row][i] |= dot;
                row = (row + 1) & 3;
            }
        }
    }
}

fn split_generic(input: &[u8], bits: usize, n: usize, stride: usize, outputs: &mut [&mut [u8]]) {
    for k in 0..n {
        outputs[k * stride][..input.len()].fill(0);
    }
    let field = (1u8 << bits) - 1;
    let mut row = 0;
    for (i, &byte) in input.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        let mut shift = 8;
        while shift > 0 {
            shift -= bits;
            let dot = byte & (field << shift);
            if dot != 0 {
                outputs[row * stride][i] |= dot;
                row += 1;
                if row == n {
                    row = 0;
                }
            }
        }
    }
}

/// The fixed shapes [`unpack`] has dedicated loops for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackShape {
    Two1,
    Two2,
    Four1,
    Four2,
    Eight1,
    Eight2,
    Sixteen1,
    Sixteen2,
}

impl UnpackShape {
    pub fn new(n: usize, bits: usize) -> Result<Self, Error> {
        match (n, bits) {
            (2, 1) => Ok(Self::Two1),
            (2, 2) => Ok(Self::Two2),
            (4, 1) => Ok(Self::Four1),
            (4, 2) => Ok(Self::Four2),
            (8, 1) => Ok(Self::Eight1),
            (8, 2) => Ok(Self::Eight2),
            (16, 1) => Ok(Self::Sixteen1),
            (16, 2) => Ok(Self::Sixteen2),
            _ => Err(Error::UnsupportedShape { n, bits }),
        }
    }

    pub fn planes(self) -> usize {
        match self {
            Self::Two1 | Self::Two2 => 2,
            Self::Four1 | Self::Four2 => 4,
            Self::Eight1 | Self::Eight2 => 8,
            Self::Sixteen1 | Self::Sixteen2 => 16,
        }
    }

    pub fn bits(self) -> usize {
        match self {
            Self::Two1 | Self::Four1 | Self::Eight1 | Self::Sixteen1 => 1,
            _ => 2,
        }
    }

    /// Bytes each output receives from a row of `length`.
    pub fn output_len(self, length: usize) -> usize {
        (length * self.bits() + self.planes() - 1) / self.planes()
    }

    fn run(self, input: &[u8], outputs: &mut [&mut [u8]]) {
        match self {
            Self::Two1 => unpack_2_1(input, outputs),
            Self::Two2 => unpack_2_2(input, outputs),
            Self::Four1 => unpack_fixed::<4, 1>(input, outputs),
            Self::Four2 => unpack_fixed::<4, 2>(input, outputs),
            Self::Eight1 => unpack_fixed::<8, 1>(input, outputs),
            Self::Eight2 => unpack_fixed::<8, 2>(input, outputs),
            Self::Sixteen1 => unpack_fixed::<16, 1>(input, outputs),
            Self::Sixteen2 => unpack_fixed::<16, 2>(input, outputs),
        }
    }
}

/// Spread a multiplexed stream across `n` outputs.
///
/// `input` holds `length * bits` bytes; consecutive `bits`-wide pixels go
/// round-robin to `outputs[0..n]`, each of which receives
/// `ceil(length * bits / n)` bytes at the same bit depth.
pub fn unpack(
    length: usize,
    bits: usize,
    n: usize,
    input: &[u8],
    outputs: &mut [&mut [u8]],
) -> Result<(), Error> {
    let shape = UnpackShape::new(n, bits)?;
    let bytes = length * bits;
    check_input(input.len(), bytes)?;
    if outputs.len() < n {
        return Err(Error::InvalidConfig(format!(
            "unpack needs {} outputs, {} supplied",
            n,
            outputs.len()
        )));
    }
    let out_len = shape.output_len(length);
    for output in outputs[..n].iter() {
        check_output(output.len(), out_len)?;
    }
    let mut planes: Vec<&mut [u8]> = outputs[..n]
        .iter_mut()
        .map(|output| &mut output[..out_len])
        .collect();
    shape.run(&input[..bytes], &mut planes);
    Ok(())
}

/// Gather bits 7, 5, 3 and 1 into a nibble.
#[inline]
fn gather_alternate(byte: u8) -> u8 {
    (byte & 0x80) >> 4 | (byte & 0x20) >> 3 | (byte & 0x08) >> 2 | (byte & 0x02) >> 1
}

fn unpack_2_1(input: &[u8], outputs: &mut [&mut [u8]]) {
    for (index, pair) in input.chunks(2).enumerate() {
        let a = pair[0];
        let b = pair.get(1).copied().unwrap_or(0);
        outputs[0][index] = gather_alternate(a) << 4 | gather_alternate(b);
        outputs[1][index] = gather_alternate(a << 1) << 4 | gather_alternate(b << 1);
    }
}

fn unpack_2_2(input: &[u8], outputs: &mut [&mut [u8]]) {
    for (index, pair) in input.chunks(2).enumerate() {
        let a = pair[0];
        let b = pair.get(1).copied().unwrap_or(0);
        outputs[0][index] = (a & 0xc0) | (a & 0x0c) << 2 | (b & 0xc0) >> 4 | (b & 0x0c) >> 2;
        outputs[1][index] = (a & 0x30) << 2 | (a & 0x03) << 4 | (b & 0x30) >> 2 | (b & 0x03);
    }
}

/// Every `N` input bytes fill exactly one byte of each of the `N` outputs.
fn unpack_fixed<const N: usize, const BITS: usize>(input: &[u8], outputs: &mut [&mut [u8]]) {
    let per_byte = 8 / BITS;
    let field = (1u8 << BITS) - 1;
    for (index, chunk) in input.chunks(N).enumerate() {
        let mut collected = [0u8; N];
        for (offset, &byte) in chunk.iter().enumerate() {
            if byte == 0 {
                continue;
            }
            for slot in 0..per_byte {
                let value = (byte >> (8 - BITS * (slot + 1))) & field;
                let pixel = offset * per_byte + slot;
                let position = pixel / N;
                collected[pixel % N] |= value << (8 - BITS * (position + 1));
            }
        }
        for (output, value) in outputs.iter_mut().zip(collected) {
            output[index] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_row(rng: &mut StdRng, len: usize) -> Vec<u8> {
        (0..len).map(|_| rng.gen()).collect()
    }

    /// Bit-by-bit unpack every specialized loop must agree with.
    fn unpack_reference(input: &[u8], bits: usize, n: usize, outputs: &mut [Vec<u8>]) {
        for output in outputs.iter_mut() {
            output.fill(0);
        }
        for pixel in 0..input.len() * 8 / bits {
            let value = read_bits(input, pixel * bits, bits);
            write_bits(&mut outputs[pixel % n], (pixel / n) * bits, bits, value);
        }
    }

    fn run_unpack(length: usize, bits: usize, n: usize, input: &[u8]) -> Vec<Vec<u8>> {
        let out_len = UnpackShape::new(n, bits).unwrap().output_len(length);
        let mut outputs = vec![vec![0xAAu8; out_len]; n];
        {
            let mut refs: Vec<&mut [u8]> = outputs.iter_mut().map(|o| o.as_mut_slice()).collect();
            unpack(length, bits, n, input, &mut refs).unwrap();
        }
        outputs
    }

    fn run_fold(planes: &[u8], length: usize, layout: FoldLayout) -> Vec<u8> {
        let mut out = vec![0u8; layout.folded_len(length)];
        fold(planes, length, layout, &mut out).unwrap();
        out
    }

    #[test]
    fn test_fold_two_planes() {
        assert_eq!(run_fold(&[0xFF, 0x00], 1, FoldLayout::Two), vec![0x55, 0x55]);
        assert_eq!(run_fold(&[0x00, 0xFF], 1, FoldLayout::Two), vec![0xAA, 0xAA]);
        assert_eq!(run_fold(&[0x80, 0x01], 1, FoldLayout::Two), vec![0x40, 0x02]);
    }

    #[test]
    fn test_fold_three_planes() {
        // Pixel 0 set on plane 2 only, pixel 7 on plane 0 only.
        assert_eq!(
            run_fold(&[0x01, 0x00, 0x80], 1, FoldLayout::Three),
            vec![0x80, 0x00, 0x01]
        );
    }

    #[test]
    fn test_fold_323_drops_middle_top_bit() {
        assert_eq!(
            run_fold(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], 3, FoldLayout::Three323),
            vec![0xFF; 8]
        );
        assert_eq!(
            run_fold(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF], 3, FoldLayout::Three323),
            vec![0x84; 8]
        );
        assert_eq!(
            run_fold(&[0xFF, 0xFF, 0xFF], 1, FoldLayout::Three323),
            vec![0xFF, 0xFF, 0xF8]
        );
    }

    #[test]
    fn test_fold_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        for layout in [FoldLayout::Two, FoldLayout::Three, FoldLayout::Four] {
            for length in [1, 7, 90] {
                let zeros = vec![0u8; layout.planes() * length];
                let random = random_row(&mut rng, layout.planes() * length);
                for planes in [zeros, random] {
                    let folded = run_fold(&planes, length, layout);
                    let mut back = vec![0xFFu8; planes.len()];
                    unfold(&folded, length, layout, &mut back).unwrap();
                    assert_eq!(back, planes, "{:?} length {}", layout, length);
                }
            }
        }
    }

    #[test]
    fn test_fold_then_unpack_one_bit() {
        let mut rng = StdRng::seed_from_u64(5);
        let length = 12;
        let planes = random_row(&mut rng, 4 * length);

        let two = run_fold(&planes[..2 * length], length, FoldLayout::Two);
        let unpacked = run_unpack(two.len(), 1, 2, &two);
        assert_eq!(unpacked[0], &planes[length..2 * length]);
        assert_eq!(unpacked[1], &planes[..length]);

        let four = run_fold(&planes, length, FoldLayout::Four);
        let unpacked = run_unpack(four.len(), 1, 4, &four);
        for (output, plane) in unpacked.iter().zip((0..4).rev()) {
            assert_eq!(output, &planes[plane * length..(plane + 1) * length]);
        }
    }

    #[test]
    fn test_fold_then_unpack_two_bits() {
        let mut rng = StdRng::seed_from_u64(6);
        let length = 9;
        let planes = random_row(&mut rng, 4 * length);
        let four = run_fold(&planes, length, FoldLayout::Four);
        let unpacked = run_unpack(four.len() / 2, 2, 2, &four);
        assert_eq!(
            unpacked[0],
            run_fold(&planes[2 * length..], length, FoldLayout::Two)
        );
        assert_eq!(
            unpacked[1],
            run_fold(&planes[..2 * length], length, FoldLayout::Two)
        );
    }

    #[test]
    fn test_unpack_shapes_match_reference() {
        let mut rng = StdRng::seed_from_u64(42);
        for &n in &[2, 4, 8, 16] {
            for &bits in &[1, 2] {
                for &length in &[0, 1, 5, 16, 33, 160] {
                    let input = random_row(&mut rng, length * bits);
                    let fast = run_unpack(length, bits, n, &input);
                    let mut slow = vec![vec![0u8; fast[0].len()]; n];
                    unpack_reference(&input, bits, n, &mut slow);
                    assert_eq!(fast, slow, "n {} bits {} length {}", n, bits, length);
                }
            }
        }
    }

    #[test]
    fn test_unpack_rejects_bad_shapes() {
        let mut out = [0u8; 4];
        let mut refs: Vec<&mut [u8]> = vec![&mut out[..]];
        assert_eq!(
            unpack(1, 1, 3, &[0], &mut refs),
            Err(Error::UnsupportedShape { n: 3, bits: 1 })
        );
        assert!(unpack(4, 1, 2, &[0; 4], &mut refs).is_err());
    }

    #[test]
    fn test_split_two_alternates_dots() {
        let mut a = [0u8; 2];
        let mut b = [0u8; 2];
        {
            let mut outputs: [&mut [u8]; 2] = [&mut a, &mut b];
            split(2, 1, 2, &[0xFF, 0x81], 1, &mut outputs).unwrap();
        }
        assert_eq!(a, [0xAA, 0x80]);
        assert_eq!(b, [0x55, 0x01]);
    }

    #[test]
    fn test_split_partitions_dots() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 1..=5 {
            for &bits in &[1, 2] {
                for &stride in &[1, 2] {
                    let length = 24;
                    let input = random_row(&mut rng, length * bits);
                    let slots = (n - 1) * stride + 1;
                    let mut buffers = vec![vec![0x5Au8; length * bits]; slots];
                    {
                        let mut refs: Vec<&mut [u8]> =
                            buffers.iter_mut().map(|b| b.as_mut_slice()).collect();
                        split(length, bits, n, &input, stride, &mut refs).unwrap();
                    }
                    let targets: Vec<&Vec<u8>> = buffers.iter().step_by(stride).collect();
                    for i in 0..input.len() {
                        let mut union = 0u8;
                        for target in &targets {
                            assert_eq!(union & target[i], 0, "outputs overlap");
                            union |= target[i];
                        }
                        assert_eq!(union, input[i]);
                    }
                    if stride == 2 && n > 1 {
                        assert!(buffers[1].iter().all(|&b| b == 0x5A));
                    }
                }
            }
        }
    }

    #[test]
    fn test_split_specializations_match_generic() {
        let mut rng = StdRng::seed_from_u64(9);
        for &n in &[2, 4] {
            for &bits in &[1, 2] {
                let input = random_row(&mut rng, 40);
                let mut fast = vec![vec![0u8; 40]; n];
                let mut slow = vec![vec![0u8; 40]; n];
                {
                    let mut refs: Vec<&mut [u8]> =
                        fast.iter_mut().map(|b| b.as_mut_slice()).collect();
                    split(40 / bits, bits, n, &input, 1, &mut refs).unwrap();
                    let mut refs: Vec<&mut [u8]> =
                        slow.iter_mut().map(|b| b.as_mut_slice()).collect();
                    split_generic(&input, bits, n, 1, &mut refs);
                }
                assert_eq!(fast, slow, "n {} bits {}", n, bits);
            }
        }
    }

    #[test]
    fn test_buffer_checks() {
        let mut out = [0u8; 1];
        assert_eq!(
            fold(&[0, 0], 1, FoldLayout::Two, &mut out),
            Err(Error::BufferTooSmall {
                needed: 2,
                actual: 1
            })
        );
        assert_eq!(
            fold(&[0], 1, FoldLayout::Two, &mut out),
            Err(Error::RowLength {
                expected: 2,
                actual: 1
            })
        );
        let mut refs: Vec<&mut [u8]> = vec![&mut out[..]];
        assert!(split(1, 3, 1, &[0], 1, &mut refs).is_err());
        assert!(unfold(&[0; 3], 1, FoldLayout::Three323, &mut [0; 3]).is_err());
    }
}

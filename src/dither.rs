//! Ordered dithering.
//!
//! Every physical channel gets a [`DitherChannel`]: the drop sizes the head
//! can fire for that ink, expressed as [`Level`]s, and the threshold matrix
//! that decides, pixel by pixel, which drop to emit.
//!
//! Output rows are bit planes. A channel whose largest pattern needs `n` bits
//! has `n` planes of `ceil(width / 8)` bytes each; plane `p` holds bit `p` of
//! the emitted pattern, pixel `x` lands in byte `x / 8` at bit `0x80 >> (x % 8)`.
//! This is the layout [`fold`](crate::bits::fold) consumes.

use std::{collections::HashMap, sync::Arc};

use log::debug;

use crate::{channel::ZeroMask, error::Error, matrix::DitherMatrix, INK_MAX};

const TABLE_ENTRIES: usize = INK_MAX as usize + 1;

/// One drop size: its ink amount relative to a full dot and the bit pattern
/// the print head needs to fire it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropSize {
    pub value: f64,
    pub bits: u8,
}

impl DropSize {
    pub fn new(value: f64, bits: u8) -> Self {
        DropSize { value, bits }
    }
}

/// An intensity range between two neighbouring drops.
///
/// Intensities inside `lower..upper` print a mix of the lower and the upper
/// pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Level {
    pub lower: u16,
    pub upper: u16,
    pub lower_bits: u8,
    pub upper_bits: u8,
}

impl Level {
    /// Position of `value` within the level, scaled to `0..=65535`.
    #[inline]
    fn rangepoint(&self, value: u16) -> u32 {
        let span = u32::from(self.upper - self.lower);
        let offset = u32::from(value - self.lower);
        (offset * u32::from(INK_MAX) / span).min(u32::from(INK_MAX))
    }

    /// Build the levels of a channel from its drops, smallest first.
    pub fn from_drops(drops: &[DropSize]) -> Result<Vec<Level>, Error> {
        if drops.is_empty() {
            return Err(Error::InvalidLevels("no drop sizes".to_string()));
        }
        let mut levels = Vec::with_capacity(drops.len());
        let mut lower = 0u16;
        let mut lower_bits = 0u8;
        for drop in drops {
            if !(drop.value > 0.0 && drop.value <= 1.0) {
                return Err(Error::InvalidLevels(format!(
                    "drop value {} outside (0, 1]",
                    drop.value
                )));
            }
            if drop.bits == 0 {
                return Err(Error::InvalidLevels("drop with empty pattern".to_string()));
            }
            let upper = (drop.value * f64::from(INK_MAX)).round() as u16;
            if upper <= lower {
                return Err(Error::InvalidLevels(format!(
                    "drop values must increase, {} follows {}",
                    upper, lower
                )));
            }
            levels.push(Level {
                lower,
                upper,
                lower_bits,
                upper_bits: drop.bits,
            });
            lower = upper;
            lower_bits = drop.bits;
        }
        Ok(levels)
    }
}

/// How levels are chosen per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Compare the position inside the matching level against the matrix.
    #[default]
    Classic,
    /// Precompute per-intensity thresholds for every drop size so small
    /// drops fade out while the next larger drop fades in.
    MultiDrop,
}

/// Halftone state of one physical channel.
#[derive(Debug, Clone)]
pub struct DitherChannel {
    levels: Vec<Level>,
    matrix: Arc<DitherMatrix>,
    table: Option<Arc<[u16]>>,
    planes: usize,
    row_bytes: usize,
    row: Vec<u8>,
}

impl DitherChannel {
    pub fn new(drops: &[DropSize], matrix: Arc<DitherMatrix>) -> Result<Self, Error> {
        let levels = Level::from_drops(drops)?;
        let widest = levels.iter().map(|l| l.upper_bits).max().unwrap_or(1);
        Ok(DitherChannel {
            levels,
            matrix,
            table: None,
            planes: (8 - widest.leading_zeros()) as usize,
            row_bytes: 0,
            row: Vec::new(),
        })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn matrix(&self) -> &DitherMatrix {
        &self.matrix
    }

    /// Number of bit planes in the output row.
    pub fn planes(&self) -> usize {
        self.planes
    }

    /// Bytes per plane.
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// All planes of the last dithered row, plane after plane.
    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn plane(&self, plane: usize) -> &[u8] {
        &self.row[plane * self.row_bytes..(plane + 1) * self.row_bytes]
    }

    fn is_binary(&self) -> bool {
        self.levels.len() == 1 && self.levels[0].upper_bits.count_ones() == 1
    }

    fn resize(&mut self, width: usize) {
        self.row_bytes = (width + 7) / 8;
        self.row.clear();
        self.row.resize(self.planes * self.row_bytes, 0);
    }

    #[inline]
    fn set_ink(&mut self, x: usize, bits: u8) {
        let byte = x / 8;
        let bit = 0x80u8 >> (x % 8);
        for plane in 0..self.planes {
            if bits & (1 << plane) != 0 {
                self.row[plane * self.row_bytes + byte] |= bit;
            }
        }
    }

    #[inline]
    fn binary(&self, value: u16, threshold: u16) -> u8 {
        let level = &self.levels[0];
        if level.rangepoint(value) >= u32::from(threshold) {
            level.upper_bits
        } else {
            0
        }
    }

    #[inline]
    fn classic(&self, value: u16, threshold: u16) -> u8 {
        for level in self.levels.iter().rev() {
            if value <= level.lower {
                continue;
            }
            return if level.rangepoint(value) >= u32::from(threshold) {
                level.upper_bits
            } else {
                level.lower_bits
            };
        }
        0
    }

    #[inline]
    fn multi_drop(&self, table: &[u16], value: u16, threshold: u16) -> u8 {
        let count = self.levels.len();
        let entries = &table[value as usize * count..(value as usize + 1) * count];
        for (level, &entry) in self.levels.iter().zip(entries).rev() {
            if entry >= threshold {
                return level.upper_bits;
            }
        }
        0
    }
}

/// Per-intensity coverage of every drop size.
///
/// Entry `k` for intensity `v` is the share of pixels (in 1/65535) that
/// should print drop `k` or larger. Inside level `k` the entry ramps from 0
/// to 65535 while the smaller drops stay saturated, so the expected ink of a
/// pixel equals `v` and never exceeds 65535.
fn build_multi_drop_table(levels: &[Level]) -> Arc<[u16]> {
    let count = levels.len();
    let mut table = vec![0u16; TABLE_ENTRIES * count];
    for value in 1..TABLE_ENTRIES {
        let entries = &mut table[value * count..(value + 1) * count];
        for (entry, level) in entries.iter_mut().zip(levels) {
            let (lower, upper) = (level.lower as usize, level.upper as usize);
            *entry = if value >= upper {
                INK_MAX
            } else if value <= lower {
                0
            } else {
                let span = upper - lower;
                (((value - lower) * INK_MAX as usize + span / 2) / span) as u16
            };
        }
    }
    table.into()
}

/// Ordered-dither engine for one job.
///
/// Owns the channels and the cache of multi-drop tables, keyed by level
/// structure so channels with identical drops share one table.
#[derive(Debug)]
pub struct Ditherer {
    width: usize,
    strategy: Strategy,
    channels: Vec<DitherChannel>,
    tables: HashMap<Vec<Level>, Arc<[u16]>>,
    binary: bool,
    initialized: bool,
}

impl Ditherer {
    pub fn new(width: usize, strategy: Strategy) -> Self {
        Ditherer {
            width,
            strategy,
            channels: Vec::new(),
            tables: HashMap::new(),
            binary: false,
            initialized: false,
        }
    }

    /// Append a channel and return its index.
    pub fn add_channel(&mut self, channel: DitherChannel) -> usize {
        self.channels.push(channel);
        self.initialized = false;
        self.channels.len() - 1
    }

    pub fn set_width(&mut self, width: usize) {
        if width != self.width {
            self.width = width;
            self.initialized = false;
        }
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        if strategy != self.strategy {
            self.strategy = strategy;
            self.initialized = false;
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn channels(&self) -> &[DitherChannel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&DitherChannel> {
        self.channels.get(index)
    }

    /// Number of distinct multi-drop tables built so far.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Prepare row buffers and lookup tables for a page.
    pub fn initialize(&mut self) -> Result<(), Error> {
        if self.width == 0 {
            return Err(Error::InvalidConfig("dither width is zero".to_string()));
        }
        if self.channels.is_empty() {
            return Err(Error::InvalidConfig("no dither channels".to_string()));
        }
        let Ditherer {
            width,
            strategy,
            channels,
            tables,
            ..
        } = self;
        for (index, channel) in channels.iter_mut().enumerate() {
            channel.resize(*width);
            channel.table = None;
            if *strategy != Strategy::MultiDrop || channel.levels.len() < 2 {
                continue;
            }
            let table = match tables.get(&channel.levels) {
                Some(table) => {
                    debug!("Channel {} reuses a multi-drop table", index);
                    table.clone()
                }
                None => {
                    debug!(
                        "Building multi-drop table for channel {} ({} levels)",
                        index,
                        channel.levels.len()
                    );
                    let table = build_multi_drop_table(&channel.levels);
                    tables.insert(channel.levels.clone(), table.clone());
                    table
                }
            };
            channel.table = Some(table);
        }
        self.binary = self.channels.iter().all(DitherChannel::is_binary);
        self.initialized = true;
        debug!(
            "Ditherer ready: width {}, {} channels, {:?}{}",
            self.width,
            self.channels.len(),
            self.strategy,
            if self.binary { ", binary" } else { "" }
        );
        Ok(())
    }

    /// Dither one scanline.
    ///
    /// `input` is pixel-major with one value per channel. Channels marked in
    /// `zero_mask` are left blank. When `row_mask` is given, columns whose bit
    /// (MSB first) is clear are skipped.
    pub fn dither_row(
        &mut self,
        input: &[u16],
        y: usize,
        zero_mask: ZeroMask,
        row_mask: Option<&[u8]>,
    ) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        let count = self.channels.len();
        let width = self.width;
        if input.len() != width * count {
            return Err(Error::RowLength {
                expected: width * count,
                actual: input.len(),
            });
        }
        if let Some(mask) = row_mask {
            let needed = (width + 7) / 8;
            if mask.len() < needed {
                return Err(Error::BufferTooSmall {
                    needed,
                    actual: mask.len(),
                });
            }
        }

        let binary = self.binary;
        for (index, channel) in self.channels.iter_mut().enumerate() {
            channel.row.fill(0);
            if zero_mask.is_zero(index) {
                continue;
            }
            let matrix = Arc::clone(&channel.matrix);
            let thresholds = matrix.row(y);
            let table = channel.table.clone();
            for x in 0..width {
                if let Some(mask) = row_mask {
                    if mask[x / 8] & (0x80 >> (x % 8)) == 0 {
                        continue;
                    }
                }
                let value = input[x * count + index];
                if value == 0 {
                    continue;
                }
                let threshold = thresholds.at(x);
                let bits = if binary {
                    channel.binary(value, threshold)
                } else if let Some(table) = &table {
                    channel.multi_drop(table, value, threshold)
                } else {
                    channel.classic(value, threshold)
                };
                if bits != 0 {
                    channel.set_ink(x, bits);
                }
            }
        }
        Ok(())
    }
}

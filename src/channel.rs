//! Ink channel separation.
//!
//! A [`ChannelGroup`] owns the logical channels of a job. Each logical
//! channel is realized by one or more physical [`Subchannel`]s (for example
//! light and dark cyan). Per scanline, [`ChannelGroup::separate`] turns one
//! 16-bit value per logical channel into one 16-bit value per physical
//! channel.

use log::debug;

use crate::{
    config::ColorCorrection, error::Error, hue::HueSectors, INK_MAX, MAX_PHYSICAL_CHANNELS,
};

/// Logical index of the black channel.
pub const ECOLOR_K: usize = 0;
/// Logical index of the cyan channel.
pub const ECOLOR_C: usize = 1;
/// Logical index of the magenta channel.
pub const ECOLOR_M: usize = 2;
/// Logical index of the yellow channel.
pub const ECOLOR_Y: usize = 3;

const DEFAULT_CUTOFF: f64 = 0.75;
const TABLE_ENTRIES: usize = INK_MAX as usize + 1;

/// One physical ink realizing part of a logical channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Subchannel {
    strength: f64,
    density: u16,
    cutoff: f64,
}

impl Subchannel {
    fn new(strength: f64) -> Self {
        Subchannel {
            strength,
            density: INK_MAX,
            cutoff: DEFAULT_CUTOFF,
        }
    }

    /// Nominal strength of the ink relative to the darkest ink, in (0, 1].
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Output scale, `65535` meaning full density.
    pub fn density(&self) -> u16 {
        self.density
    }

    /// Width of the blend zone around the nominal strength.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

/// One conceptual ink color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogicalChannel {
    subchannels: Vec<Subchannel>,
    hue_angle: Option<f64>,
}

impl LogicalChannel {
    pub fn subchannels(&self) -> &[Subchannel] {
        &self.subchannels
    }

    pub fn hue_angle(&self) -> Option<f64> {
        self.hue_angle
    }
}

/// Bitmask of physical channels that are zero across a whole scanline.
///
/// Bit `i` is set when physical channel `i` carries no ink at all, so later
/// stages can skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZeroMask(u64);

impl ZeroMask {
    pub fn new(bits: u64) -> Self {
        ZeroMask(bits)
    }

    /// Mask with no channel marked as zero.
    pub fn none() -> Self {
        ZeroMask(0)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self, channel: usize) -> bool {
        channel < 64 && self.0 & (1 << channel) != 0
    }

    fn from_row(row: &[u16], channels: usize) -> Self {
        let mut inked = 0u64;
        for pixel in row.chunks_exact(channels) {
            for (channel, &value) in pixel.iter().enumerate() {
                if value != 0 {
                    inked |= 1 << channel;
                }
            }
        }
        ZeroMask(!inked & full_mask(channels))
    }
}

fn full_mask(channels: usize) -> u64 {
    if channels >= 64 {
        u64::MAX
    } else {
        (1u64 << channels) - 1
    }
}

/// Result of separating one scanline.
#[derive(Debug, Clone, Copy)]
pub struct Separated<'a> {
    data: &'a [u16],
    channels: usize,
    mask: ZeroMask,
}

impl<'a> Separated<'a> {
    /// Physical values, pixel-major: `data[x * channels + channel]`.
    pub fn data(&self) -> &'a [u16] {
        self.data
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn mask(&self) -> ZeroMask {
        self.mask
    }

    pub fn pixel(&self, x: usize) -> &'a [u16] {
        &self.data[x * self.channels..(x + 1) * self.channels]
    }
}

/// Lookup table splitting one logical value across several subchannels.
///
/// Holds `65536 x subchannels` entries; the entries for input `v` start at
/// `v * subchannels` and follow subchannel order.
#[derive(Debug)]
struct SplitTable {
    subchannels: usize,
    entries: Vec<u16>,
}

impl SplitTable {
    fn build(subchannels: &[Subchannel]) -> Self {
        let count = subchannels.len();
        let mut entries = vec![0u16; TABLE_ENTRIES * count];
        let first = &subchannels[0];
        let last = &subchannels[count - 1];

        // Below the first breakpoint only the lightest ink prints.
        let mut value = 0;
        let mut next = breakpoint(first.strength, first.cutoff);
        while value <= next {
            entries[value * count] = clamp_ink(value as f64 / first.strength);
            value += 1;
        }

        // Each zone hands the ink over from one subchannel to the next.
        for k in 0..count - 1 {
            let lower = &subchannels[k];
            let upper = &subchannels[k + 1];
            let base = value;
            next = breakpoint(upper.strength, (lower.cutoff * upper.cutoff).sqrt());
            if next < base {
                continue;
            }
            let range = (next - base) as f64;
            while value <= next {
                let position = if range > 0.0 {
                    (value - base) as f64 / range
                } else {
                    1.0
                };
                let lower_ink = base as f64 * (1.0 - position);
                entries[value * count + k] = clamp_ink(lower_ink / lower.strength);
                entries[value * count + k + 1] =
                    clamp_ink((value as f64 - lower_ink) / upper.strength);
                value += 1;
            }
        }

        while value < TABLE_ENTRIES {
            entries[value * count + count - 1] = clamp_ink(value as f64 / last.strength);
            value += 1;
        }

        SplitTable {
            subchannels: count,
            entries,
        }
    }

    #[inline]
    fn lookup(&self, value: u16) -> &[u16] {
        let start = value as usize * self.subchannels;
        &self.entries[start..start + self.subchannels]
    }
}

fn breakpoint(strength: f64, cutoff: f64) -> usize {
    let point = strength * f64::from(INK_MAX) * cutoff;
    (point as usize).min(INK_MAX as usize)
}

fn clamp_ink(value: f64) -> u16 {
    value.min(f64::from(INK_MAX)) as u16
}

#[inline]
fn scale(value: u16, density: u16) -> u16 {
    if density == INK_MAX {
        value
    } else {
        (u32::from(value) * u32::from(density) / u32::from(INK_MAX)) as u16
    }
}

/// Tables compiled at page start. Dropped whenever the configuration changes.
#[derive(Debug)]
struct Tables {
    splits: Vec<Option<SplitTable>>,
    offsets: Vec<usize>,
    physical: usize,
    max_density: u32,
    hue: Option<HueSectors>,
    multi: bool,
}

/// Per-job channel state.
///
/// Configure the group, call [`initialize`](ChannelGroup::initialize) at the
/// start of every page, then feed scanlines to
/// [`separate`](ChannelGroup::separate). Any configuration call discards the
/// compiled lookup tables, which are rebuilt by the next `initialize`.
#[derive(Debug, Default)]
pub struct ChannelGroup {
    channels: Vec<LogicalChannel>,
    ink_limit: Option<u32>,
    black_channel: Option<usize>,
    color_correction: ColorCorrection,
    tables: Option<Tables>,
    width: usize,
    input: Vec<u16>,
    output: Vec<u16>,
}

impl ChannelGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update a subchannel.
    ///
    /// `channel` may be an existing logical channel or the next one to add;
    /// `subchannel` may be an existing subchannel (its strength is replaced)
    /// or the next one to append.
    pub fn add_subchannel(
        &mut self,
        channel: usize,
        subchannel: usize,
        strength: f64,
    ) -> Result<(), Error> {
        if !(strength > 0.0 && strength <= 1.0) {
            return Err(Error::InvalidValue {
                name: "strength",
                value: strength,
            });
        }
        if channel > self.channels.len() {
            return Err(Error::ChannelOutOfRange(channel));
        }
        if channel == self.channels.len() {
            self.channels.push(LogicalChannel::default());
        }
        let subchannels = &mut self.channels[channel].subchannels;
        if subchannel > subchannels.len() {
            return Err(Error::SubchannelOutOfRange {
                channel,
                subchannel,
            });
        }
        if subchannel == subchannels.len() {
            subchannels.push(Subchannel::new(strength));
        } else {
            subchannels[subchannel].strength = strength;
        }
        self.invalidate();
        Ok(())
    }

    /// Set the output scale of a subchannel.
    ///
    /// Ignored when the color correction mode says the input is already in
    /// device space.
    pub fn set_density(
        &mut self,
        channel: usize,
        subchannel: usize,
        density: f64,
    ) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::InvalidValue {
                name: "density",
                value: density,
            });
        }
        let correction = self.color_correction;
        let sub = self.subchannel_mut(channel, subchannel)?;
        if correction.ignores_density() {
            debug!(
                "Ignoring density {} for channel {} subchannel {} ({:?} color correction)",
                density, channel, subchannel, correction
            );
            return Ok(());
        }
        debug!(
            "Density for channel {} subchannel {}: {}",
            channel, subchannel, density
        );
        sub.density = (density * f64::from(INK_MAX)) as u16;
        self.invalidate();
        Ok(())
    }

    pub fn set_cutoff(
        &mut self,
        channel: usize,
        subchannel: usize,
        cutoff: f64,
    ) -> Result<(), Error> {
        if !(cutoff >= 0.0 && cutoff.is_finite()) {
            return Err(Error::InvalidValue {
                name: "cutoff",
                value: cutoff,
            });
        }
        self.subchannel_mut(channel, subchannel)?.cutoff = cutoff;
        self.invalidate();
        Ok(())
    }

    /// Cap the total ink per pixel, as a fraction of one fully inked channel.
    pub fn set_ink_limit(&mut self, limit: f64) -> Result<(), Error> {
        if !(limit > 0.0 && limit.is_finite()) {
            return Err(Error::InvalidValue {
                name: "ink limit",
                value: limit,
            });
        }
        let units = (limit * f64::from(INK_MAX)).min(u32::MAX as f64);
        self.ink_limit = Some(units as u32);
        self.invalidate();
        Ok(())
    }

    pub fn clear_ink_limit(&mut self) {
        self.ink_limit = None;
        self.invalidate();
    }

    /// Designate the channel whose value biases the split of other channels.
    pub fn set_black_channel(&mut self, channel: Option<usize>) -> Result<(), Error> {
        if let Some(index) = channel {
            if index >= self.channels.len() {
                return Err(Error::ChannelOutOfRange(index));
            }
        }
        self.black_channel = channel;
        self.invalidate();
        Ok(())
    }

    /// Place an extra channel on the hue wheel, or remove it with `None`.
    pub fn set_hue_angle(&mut self, channel: usize, angle: Option<f64>) -> Result<(), Error> {
        if let Some(value) = angle {
            if !(0.0..6.0).contains(&value) {
                return Err(Error::InvalidValue {
                    name: "hue angle",
                    value,
                });
            }
        }
        if channel <= ECOLOR_Y && angle.is_some() {
            return Err(Error::HueAngleOnProcessChannel(channel));
        }
        self.channels
            .get_mut(channel)
            .ok_or(Error::ChannelOutOfRange(channel))?
            .hue_angle = angle;
        self.invalidate();
        Ok(())
    }

    pub fn set_color_correction(&mut self, correction: ColorCorrection) {
        self.color_correction = correction;
    }

    pub fn color_correction(&self) -> ColorCorrection {
        self.color_correction
    }

    pub fn channels(&self) -> &[LogicalChannel] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn physical_channel_count(&self) -> usize {
        self.channels.iter().map(|c| c.subchannels.len()).sum()
    }

    /// Index of a subchannel in the physical output row.
    pub fn physical_index(&self, channel: usize, subchannel: usize) -> Result<usize, Error> {
        let logical = self
            .channels
            .get(channel)
            .ok_or(Error::ChannelOutOfRange(channel))?;
        if subchannel >= logical.subchannels.len() {
            return Err(Error::SubchannelOutOfRange {
                channel,
                subchannel,
            });
        }
        let offset: usize = self.channels[..channel]
            .iter()
            .map(|c| c.subchannels.len())
            .sum();
        Ok(offset + subchannel)
    }

    /// Ink limit in ink units (65535 per fully inked channel).
    pub fn ink_limit(&self) -> Option<u32> {
        self.ink_limit
    }

    pub fn black_channel(&self) -> Option<usize> {
        self.black_channel
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_initialized(&self) -> bool {
        self.tables.is_some()
    }

    /// Highest total ink a pixel can reach with the current densities.
    pub fn max_density(&self) -> u32 {
        self.channels
            .iter()
            .flat_map(|c| c.subchannels.iter())
            .map(|s| u32::from(s.density))
            .sum()
    }

    /// Prepare the group for a page `width` pixels wide.
    ///
    /// Validates the configuration and builds the lookup tables unless they
    /// are still valid from the previous page.
    pub fn initialize(&mut self, width: usize) -> Result<(), Error> {
        if width == 0 {
            return Err(Error::InvalidValue {
                name: "width",
                value: 0.0,
            });
        }
        if self.tables.is_none() {
            self.tables = Some(self.compile()?);
        }
        let physical = self.physical_channel_count();
        self.width = width;
        self.input.resize(width * self.channels.len(), 0);
        self.output.resize(width * physical, 0);
        debug!(
            "Channel group ready: width {}, {} logical channels, {} physical channels",
            width,
            self.channels.len(),
            physical
        );
        Ok(())
    }

    fn compile(&self) -> Result<Tables, Error> {
        if self.channels.is_empty() {
            return Err(Error::InvalidConfig("no channels registered".to_string()));
        }
        for (index, channel) in self.channels.iter().enumerate() {
            if channel.subchannels.is_empty() {
                return Err(Error::EmptyChannel(index));
            }
            if channel
                .subchannels
                .windows(2)
                .any(|pair| pair[1].strength < pair[0].strength)
            {
                return Err(Error::UnorderedSubchannels(index));
            }
        }
        let physical = self.physical_channel_count();
        if physical > MAX_PHYSICAL_CHANNELS {
            return Err(Error::TooManyChannels(physical));
        }
        if let Some(black) = self.black_channel {
            if black >= self.channels.len() {
                return Err(Error::ChannelOutOfRange(black));
            }
        }

        let hue = HueSectors::build(&self.channels)?;
        let mut offsets = Vec::with_capacity(self.channels.len());
        let mut splits = Vec::with_capacity(self.channels.len());
        let mut offset = 0;
        for (index, channel) in self.channels.iter().enumerate() {
            offsets.push(offset);
            offset += channel.subchannels.len();
            if channel.subchannels.len() > 1 {
                debug!(
                    "Building split table for channel {} ({} subchannels)",
                    index,
                    channel.subchannels.len()
                );
                splits.push(Some(SplitTable::build(&channel.subchannels)));
            } else {
                splits.push(None);
            }
        }
        let multi = splits.iter().any(Option::is_some);

        Ok(Tables {
            splits,
            offsets,
            physical,
            max_density: self.max_density(),
            hue,
            multi,
        })
    }

    /// Separate one scanline.
    ///
    /// `row` holds `width x logical channels` values, pixel-major. The result
    /// borrows the group's output row until the next call.
    pub fn separate(&mut self, row: &[u16]) -> Result<Separated<'_>, Error> {
        let ChannelGroup {
            channels,
            ink_limit,
            black_channel,
            tables,
            width,
            input,
            output,
            ..
        } = self;
        let tables = tables.as_ref().ok_or(Error::NotInitialized)?;
        let logical = channels.len();
        let expected = *width * logical;
        if row.len() != expected {
            return Err(Error::RowLength {
                expected,
                actual: row.len(),
            });
        }

        input.copy_from_slice(row);
        if let Some(hue) = &tables.hue {
            for pixel in input.chunks_exact_mut(logical) {
                hue.redistribute(pixel);
            }
        }
        if tables.multi {
            split_row(channels, tables, *black_channel, input, output);
        } else {
            scale_row(channels, input, output);
        }
        if let Some(limit) = *ink_limit {
            if limit < tables.max_density {
                limit_ink(output, tables.physical, limit);
            }
        }

        let mask = ZeroMask::from_row(output, tables.physical);
        Ok(Separated {
            data: output,
            channels: tables.physical,
            mask,
        })
    }

    fn subchannel_mut(
        &mut self,
        channel: usize,
        subchannel: usize,
    ) -> Result<&mut Subchannel, Error> {
        self.channels
            .get_mut(channel)
            .ok_or(Error::ChannelOutOfRange(channel))?
            .subchannels
            .get_mut(subchannel)
            .ok_or(Error::SubchannelOutOfRange {
                channel,
                subchannel,
            })
    }

    fn invalidate(&mut self) {
        self.tables = None;
    }
}

/// Black value plus a quarter of the weakest other channel.
fn black_bias(pixel: &[u16], black: usize) -> u32 {
    let others = pixel
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != black)
        .map(|(_, &value)| u32::from(value))
        .min()
        .unwrap_or(0);
    u32::from(pixel[black]) + others / 4
}

fn split_row(
    channels: &[LogicalChannel],
    tables: &Tables,
    black: Option<usize>,
    input: &[u16],
    output: &mut [u16],
) {
    let logical = channels.len();
    for (pixel_in, pixel_out) in input
        .chunks_exact(logical)
        .zip(output.chunks_exact_mut(tables.physical))
    {
        let bias = black.map_or(0, |k| black_bias(pixel_in, k));
        for (index, channel) in channels.iter().enumerate() {
            let value = pixel_in[index];
            let offset = tables.offsets[index];
            let subchannels = &channel.subchannels;
            let out = &mut pixel_out[offset..offset + subchannels.len()];
            let split = match &tables.splits[index] {
                Some(split) => split,
                None => {
                    out[0] = scale(value, subchannels[0].density);
                    continue;
                }
            };
            if value == 0 {
                out.fill(0);
                continue;
            }
            let biased = match black {
                Some(k) if k != index => (u32::from(value) + bias).min(u32::from(INK_MAX)),
                _ => u32::from(value),
            };
            let entries = split.lookup(biased as u16);
            for ((slot, &entry), sub) in out.iter_mut().zip(entries).zip(subchannels) {
                // The bias picks the ink mix; the amount still follows `value`.
                let amount = u32::from(entry) * u32::from(value) / biased;
                *slot = scale(amount as u16, sub.density);
            }
        }
    }
}

fn scale_row(channels: &[LogicalChannel], input: &[u16], output: &mut [u16]) {
    let logical = channels.len();
    for (pixel_in, pixel_out) in input
        .chunks_exact(logical)
        .zip(output.chunks_exact_mut(logical))
    {
        for ((slot, &value), channel) in pixel_out.iter_mut().zip(pixel_in).zip(channels) {
            *slot = scale(value, channel.subchannels[0].density);
        }
    }
}

fn limit_ink(output: &mut [u16], physical: usize, limit: u32) {
    for pixel in output.chunks_exact_mut(physical) {
        let total: u32 = pixel.iter().map(|&v| u32::from(v)).sum();
        if total > limit {
            let ratio = f64::from(limit) / f64::from(total);
            for value in pixel.iter_mut() {
                *value = (f64::from(*value) * ratio) as u16;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_dark_group() -> ChannelGroup {
        let mut group = ChannelGroup::new();
        group.add_subchannel(0, 0, 0.3).unwrap();
        group.add_subchannel(0, 1, 1.0).unwrap();
        group
    }

    fn separate_one(group: &mut ChannelGroup, pixel: &[u16]) -> Vec<u16> {
        group.separate(pixel).unwrap().data().to_vec()
    }

    #[test]
    fn test_light_dark_split() {
        let mut group = light_dark_group();
        group.initialize(1).unwrap();

        assert_eq!(separate_one(&mut group, &[0]), vec![0, 0]);
        assert_eq!(separate_one(&mut group, &[65535]), vec![0, 65535]);

        // First breakpoint is 0.3 * 65535 * 0.75 = 14745, the second 49151.
        let light_only = separate_one(&mut group, &[10000]);
        assert!(light_only[0] > 0);
        assert_eq!(light_only[1], 0);

        let both = separate_one(&mut group, &[20000]);
        assert!(both[0] > 0, "light ink expected at 20000: {:?}", both);
        assert!(both[1] > 0, "dark ink expected at 20000: {:?}", both);

        let dark_only = separate_one(&mut group, &[50000]);
        assert_eq!(dark_only[0], 0);
        assert_eq!(dark_only[1], 50000);
    }

    #[test]
    fn test_light_ink_peaks_at_cutoff() {
        let mut group = light_dark_group();
        group.initialize(1).unwrap();
        let peak = separate_one(&mut group, &[14745]);
        // 14745 / 0.3 ~ 75% of full light ink.
        assert!((49000..=49160).contains(&peak[0]), "{:?}", peak);
        assert_eq!(peak[1], 0);
    }

    #[test]
    fn test_split_total_ink_is_continuous() {
        let mut group = light_dark_group();
        group.initialize(1).unwrap();
        let mut previous: Option<f64> = None;
        for value in (0..=65535u32).step_by(97) {
            let out = separate_one(&mut group, &[value as u16]);
            let ink = f64::from(out[0]) * 0.3 + f64::from(out[1]);
            if let Some(prev) = previous {
                assert!((ink - prev).abs() < 200.0, "jump at {}", value);
            }
            previous = Some(ink);
        }
    }

    #[test]
    fn test_density_scaling() {
        let mut group = ChannelGroup::new();
        group.add_subchannel(0, 0, 1.0).unwrap();
        group.add_subchannel(1, 0, 1.0).unwrap();
        group.set_density(1, 0, 0.0).unwrap();
        group.initialize(3).unwrap();

        let row = [0, 0, 12345, 12345, 65535, 65535];
        let separated = group.separate(&row).unwrap();
        assert_eq!(separated.data(), &[0, 0, 12345, 0, 65535, 0]);
        assert!(separated.mask().is_zero(1));
        assert!(!separated.mask().is_zero(0));
    }

    #[test]
    fn test_density_ignored_for_raw_input() {
        let mut group = ChannelGroup::new();
        group.add_subchannel(0, 0, 1.0).unwrap();
        group.set_color_correction(ColorCorrection::Raw);
        group.set_density(0, 0, 0.5).unwrap();
        assert_eq!(group.channels()[0].subchannels()[0].density(), 65535);
    }

    #[test]
    fn test_ink_limit_truncates() {
        let mut group = ChannelGroup::new();
        for channel in 0..3 {
            group.add_subchannel(channel, 0, 1.0).unwrap();
        }
        group.set_ink_limit(1.5).unwrap();
        group.initialize(1).unwrap();

        let limit = group.ink_limit().unwrap();
        assert_eq!(limit, 98302);
        let out = separate_one(&mut group, &[65535, 65535, 65535]);
        // 65535 * (98302 / 196605) = 32767.33, truncated.
        assert_eq!(out, vec![32767, 32767, 32767]);

        let under = separate_one(&mut group, &[30000, 30000, 30000]);
        assert_eq!(under, vec![30000, 30000, 30000]);
    }

    #[test]
    fn test_black_bias_shifts_toward_dark_ink() {
        let mut plain = ChannelGroup::new();
        plain.add_subchannel(0, 0, 1.0).unwrap();
        plain.add_subchannel(1, 0, 0.3).unwrap();
        plain.add_subchannel(1, 1, 1.0).unwrap();
        plain.initialize(1).unwrap();
        let without = separate_one(&mut plain, &[30000, 10000]);

        plain.set_black_channel(Some(0)).unwrap();
        plain.initialize(1).unwrap();
        let with = separate_one(&mut plain, &[30000, 10000]);

        assert_eq!(without[2], 0);
        assert!(with[2] > without[2], "{:?} vs {:?}", with, without);
        assert_eq!(with[0], 30000);
    }

    #[test]
    fn test_configuration_errors() {
        let mut group = ChannelGroup::new();
        assert_eq!(
            group.add_subchannel(1, 0, 1.0),
            Err(Error::ChannelOutOfRange(1))
        );
        group.add_subchannel(0, 0, 1.0).unwrap();
        assert_eq!(
            group.add_subchannel(0, 2, 1.0),
            Err(Error::SubchannelOutOfRange {
                channel: 0,
                subchannel: 2
            })
        );
        assert!(group.add_subchannel(0, 1, 0.0).is_err());
        assert!(group.set_density(0, 0, 1.5).is_err());
        assert!(group.set_cutoff(0, 3, 0.5).is_err());
        assert!(group.set_black_channel(Some(4)).is_err());
        assert!(group.separate(&[0]).is_err());

        group.add_subchannel(0, 1, 0.5).unwrap();
        assert_eq!(group.initialize(4), Err(Error::UnorderedSubchannels(0)));
    }

    #[test]
    fn test_row_length_checked() {
        let mut group = light_dark_group();
        group.initialize(4).unwrap();
        assert_eq!(
            group.separate(&[0; 3]).unwrap_err(),
            Error::RowLength {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_configuration_invalidates_tables() {
        let mut group = light_dark_group();
        group.initialize(2).unwrap();
        assert!(group.is_initialized());
        group.set_cutoff(0, 1, 0.5).unwrap();
        assert!(!group.is_initialized());
        assert_eq!(group.separate(&[0, 0]).unwrap_err(), Error::NotInitialized);
    }

    #[test]
    fn test_physical_index() {
        let mut group = light_dark_group();
        group.add_subchannel(1, 0, 1.0).unwrap();
        assert_eq!(group.physical_index(1, 0), Ok(2));
        assert_eq!(group.physical_index(0, 1), Ok(1));
        assert_eq!(group.physical_channel_count(), 3);
    }
}

//! Hue-angle redistribution toward extra inks.
//!
//! Extra inks (red, orange, green, blue...) sit on a 0..6 hue wheel where
//! 0 is red, 2 is green and 4 is blue, the overprints of two process inks.
//! Each pixel's chromatic part is shared between the extra inks bracketing
//! its hue and the remaining cyan, magenta and yellow.

use std::cmp::Ordering;

use crate::{
    channel::{LogicalChannel, ECOLOR_C, ECOLOR_M, ECOLOR_Y},
    error::Error,
    INK_MAX,
};

const BOUNDARIES: [f64; 4] = [0.0, 2.0, 4.0, 6.0];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sector {
    angle: f64,
    channel: Option<usize>,
}

/// Sorted hue-wheel entries, with boundaries at 0, 2, 4 and 6.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HueSectors {
    entries: Vec<Sector>,
}

impl HueSectors {
    /// Build the sector table, or `None` when no channel has a hue angle.
    pub(crate) fn build(channels: &[LogicalChannel]) -> Result<Option<Self>, Error> {
        let mut declared: Vec<(f64, usize)> = channels
            .iter()
            .enumerate()
            .filter_map(|(index, c)| c.hue_angle().map(|angle| (angle, index)))
            .collect();
        if declared.is_empty() {
            return Ok(None);
        }
        if channels.len() <= ECOLOR_Y {
            return Err(Error::MissingProcessChannels);
        }
        declared.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        for pair in declared.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(Error::DuplicateHueAngle {
                    first: pair[0].1,
                    second: pair[1].1,
                    angle: pair[0].0,
                });
            }
        }

        let mut entries: Vec<Sector> = BOUNDARIES
            .iter()
            .map(|&angle| Sector {
                angle,
                channel: None,
            })
            .collect();
        for (angle, channel) in declared {
            let index = entries
                .iter()
                .position(|s| s.angle >= angle)
                .unwrap_or(entries.len() - 1);
            if entries[index].angle == angle {
                entries[index].channel = Some(channel);
                // Red wraps around: the same ink closes the wheel at 6.
                if angle == 0.0 {
                    if let Some(last) = entries.last_mut() {
                        last.channel = Some(channel);
                    }
                }
            } else {
                entries.insert(
                    index,
                    Sector {
                        angle,
                        channel: Some(channel),
                    },
                );
            }
        }
        Ok(Some(HueSectors { entries }))
    }

    /// Move chromatic ink of one logical pixel onto the extra channels.
    pub(crate) fn redistribute(&self, pixel: &mut [u16]) {
        let c = i32::from(pixel[ECOLOR_C]);
        let m = i32::from(pixel[ECOLOR_M]);
        let y = i32::from(pixel[ECOLOR_Y]);
        let gray = c.min(m).min(y);
        let chroma = c.max(m).max(y) - gray;
        if chroma == 0 {
            return;
        }
        let (c, m, y) = (c - gray, m - gray, y - gray);
        if [c, m, y].iter().filter(|&&v| v > 0).count() < 2 {
            return;
        }

        let hue = hue_angle(c, m, y, chroma);
        let (lo, hi) = self.bracket(hue);
        if lo.channel.is_none() && hi.channel.is_none() {
            return;
        }
        let position = (hue - lo.angle) / (hi.angle - lo.angle);
        let lo_weight = if lo.channel.is_some() { 1.0 - position } else { 0.0 };
        let hi_weight = if hi.channel.is_some() { position } else { 0.0 };
        let keep = 1.0 - lo_weight - hi_weight;
        let chroma = f64::from(chroma);

        if let Some(channel) = lo.channel {
            add_ink(pixel, channel, lo_weight * chroma);
        }
        if let Some(channel) = hi.channel {
            add_ink(pixel, channel, hi_weight * chroma);
        }
        let gray = f64::from(gray);
        pixel[ECOLOR_C] = to_ink(gray + f64::from(c) * keep);
        pixel[ECOLOR_M] = to_ink(gray + f64::from(m) * keep);
        pixel[ECOLOR_Y] = to_ink(gray + f64::from(y) * keep);
    }

    fn bracket(&self, hue: f64) -> (Sector, Sector) {
        let index = self.entries.partition_point(|s| s.angle <= hue);
        let index = index.clamp(1, self.entries.len() - 1);
        (self.entries[index - 1], self.entries[index])
    }
}

/// Hue on the 0..6 wheel of a gray-free CMY triple.
///
/// Ink amounts are complements of light: red is magenta plus yellow, so the
/// usual RGB hexcone formula applies to `chroma - ink`.
fn hue_angle(c: i32, m: i32, y: i32, chroma: i32) -> f64 {
    let (r, g, b) = (chroma - c, chroma - m, chroma - y);
    let delta = f64::from(chroma);
    let hue = if r == chroma {
        (f64::from(g - b) / delta).rem_euclid(6.0)
    } else if g == chroma {
        2.0 + f64::from(b - r) / delta
    } else {
        4.0 + f64::from(r - g) / delta
    };
    if hue >= 6.0 {
        0.0
    } else {
        hue
    }
}

fn add_ink(pixel: &mut [u16], channel: usize, amount: f64) {
    pixel[channel] = to_ink(f64::from(pixel[channel]) + amount);
}

fn to_ink(value: f64) -> u16 {
    value.round().clamp(0.0, f64::from(INK_MAX)) as u16
}

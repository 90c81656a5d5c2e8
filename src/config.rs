//! Named channel settings.
//!
//! Option parsing lives outside this crate; it hands over settings either as
//! typed [`Setting`] values or as strings of the form
//! `name[.channel[.subchannel]]=value`:
//!
//! ```text
//! density.1.0=0.8      cutoff.1.1=0.6     inkLimit=2.5
//! blackChannel=0       blackChannel=none  hueAngle.4=0.5
//! ```

use std::{fmt, str::FromStr};

use crate::{channel::ChannelGroup, error::Error};

/// How the color pipeline upstream has already corrected the input.
///
/// Density adjustments are skipped for `Raw` and `Predithered` input, which
/// are already expressed in device ink amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorCorrection {
    #[default]
    Accurate,
    Uncorrected,
    Raw,
    Predithered,
}

impl ColorCorrection {
    pub fn ignores_density(self) -> bool {
        matches!(self, Self::Raw | Self::Predithered)
    }
}

impl FromStr for ColorCorrection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accurate" => Ok(Self::Accurate),
            "uncorrected" | "none" => Ok(Self::Uncorrected),
            "raw" => Ok(Self::Raw),
            "predithered" => Ok(Self::Predithered),
            _ => Err(Error::InvalidConfig(format!("unknown color correction {}", s))),
        }
    }
}

/// One channel configuration option.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Density {
        channel: usize,
        subchannel: usize,
        value: f64,
    },
    Cutoff {
        channel: usize,
        subchannel: usize,
        value: f64,
    },
    InkLimit(f64),
    BlackChannel(Option<usize>),
    HueAngle {
        channel: usize,
        angle: Option<f64>,
    },
}

impl FromStr for Setting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidConfig(s.to_string());
        let (key, value) = s.split_once('=').ok_or_else(invalid)?;
        let mut parts = key.trim().split('.');
        let name = parts.next().ok_or_else(invalid)?;
        let indices = parts
            .map(|p| p.parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        let value = value.trim();
        let number = || value.parse::<f64>().map_err(|_| invalid());
        let optional = |v: &str| v.eq_ignore_ascii_case("none");

        match (name, indices.as_slice()) {
            ("density", &[channel, subchannel]) => Ok(Setting::Density {
                channel,
                subchannel,
                value: number()?,
            }),
            ("cutoff", &[channel, subchannel]) => Ok(Setting::Cutoff {
                channel,
                subchannel,
                value: number()?,
            }),
            ("inkLimit", &[]) => Ok(Setting::InkLimit(number()?)),
            ("blackChannel", &[]) if optional(value) => Ok(Setting::BlackChannel(None)),
            ("blackChannel", &[]) => value
                .parse::<usize>()
                .map(|c| Setting::BlackChannel(Some(c)))
                .map_err(|_| invalid()),
            ("hueAngle", &[channel]) if optional(value) => Ok(Setting::HueAngle {
                channel,
                angle: None,
            }),
            ("hueAngle", &[channel]) => Ok(Setting::HueAngle {
                channel,
                angle: Some(number()?),
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Density {
                channel,
                subchannel,
                value,
            } => write!(f, "density.{}.{}={}", channel, subchannel, value),
            Setting::Cutoff {
                channel,
                subchannel,
                value,
            } => write!(f, "cutoff.{}.{}={}", channel, subchannel, value),
            Setting::InkLimit(limit) => write!(f, "inkLimit={}", limit),
            Setting::BlackChannel(Some(channel)) => write!(f, "blackChannel={}", channel),
            Setting::BlackChannel(None) => write!(f, "blackChannel=none"),
            Setting::HueAngle {
                channel,
                angle: Some(angle),
            } => write!(f, "hueAngle.{}={}", channel, angle),
            Setting::HueAngle {
                channel,
                angle: None,
            } => write!(f, "hueAngle.{}=none", channel),
        }
    }
}

impl ChannelGroup {
    /// Apply one named setting.
    pub fn apply(&mut self, setting: &Setting) -> Result<(), Error> {
        match *setting {
            Setting::Density {
                channel,
                subchannel,
                value,
            } => self.set_density(channel, subchannel, value),
            Setting::Cutoff {
                channel,
                subchannel,
                value,
            } => self.set_cutoff(channel, subchannel, value),
            Setting::InkLimit(limit) => self.set_ink_limit(limit),
            Setting::BlackChannel(channel) => self.set_black_channel(channel),
            Setting::HueAngle { channel, angle } => self.set_hue_angle(channel, angle),
        }
    }

    /// Parse and apply a list of `name=value` settings, stopping at the first error.
    pub fn apply_all<'a, I>(&mut self, settings: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in settings {
            let setting = text.parse::<Setting>()?;
            self.apply(&setting)?;
        }
        Ok(())
    }
}

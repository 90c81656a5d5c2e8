//! Ink Raster Core
//!
//! This crate provides the shared raster pipeline of a printer driver suite:
//! it turns continuous-tone 16-bit ink amounts into halftoned, bit-packed and
//! optionally PackBits-compressed rows that a device back end can send as-is.
//!
//! The pipeline has three stages:
//!
//! 1. [`ChannelGroup`] separates logical colors into physical inks
//!    (light/dark subchannels, extra inks placed on the hue wheel, density
//!    scaling and total ink limiting).
//! 2. [`Ditherer`] halftones every physical channel with an ordered
//!    [`DitherMatrix`], either with the classic per-level comparison or with
//!    precomputed multi-drop tables.
//! 3. The [`bits`] and [`pack`] functions reshape dithered bit planes into
//!    the layouts devices expect and compress them.
//!
//! [`Pipeline`] ties the stages together for one job.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ink_raster::{ChannelGroup, Config, DitherChannel, DitherMatrix, Ditherer, DropSize, Pipeline, Strategy};
//!
//! let mut group = ChannelGroup::new();
//! group.add_subchannel(0, 0, 0.3).unwrap();
//! group.add_subchannel(0, 1, 1.0).unwrap();
//!
//! let matrix = Arc::new(DitherMatrix::bayer(3).unwrap());
//! let mut ditherer = Ditherer::new(16, Strategy::Classic);
//! for _ in 0..2 {
//!     ditherer.add_channel(DitherChannel::new(&[DropSize::new(1.0, 1)], matrix.clone()).unwrap());
//! }
//!
//! let config = Config::new(16).compress(true);
//! let mut pipeline = Pipeline::new(config, group, ditherer);
//! pipeline.start_page().unwrap();
//! let rows = pipeline.render_row(&[32768; 16], 0).unwrap();
//! assert_eq!(rows.len(), 2);
//! ```

pub mod bits;
mod channel;
mod config;
mod dither;
mod error;
mod hue;
mod matrix;
pub mod pack;
mod pipeline;

pub use crate::{
    channel::{
        ChannelGroup, LogicalChannel, Separated, Subchannel, ZeroMask, ECOLOR_C, ECOLOR_K,
        ECOLOR_M, ECOLOR_Y,
    },
    config::{ColorCorrection, Setting},
    dither::{DitherChannel, Ditherer, DropSize, Level, Strategy},
    error::Error,
    matrix::DitherMatrix,
    pack::PackedRow,
    pipeline::{CancelToken, Config, Pipeline, PlaneRow},
};

/// Full-scale ink amount.
///
/// Every intensity in the pipeline is a 16-bit value where `0` means no ink
/// and `INK_MAX` means a fully inked pixel.
pub const INK_MAX: u16 = 65535;

/// Maximum number of physical channels a [`ChannelGroup`] can drive.
///
/// Bounded by the width of [`ZeroMask`].
pub const MAX_PHYSICAL_CHANNELS: usize = 64;

//! Per-job raster pipeline: separation, dithering, folding and packing.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{debug, info};

use crate::{
    bits::{self, FoldLayout},
    channel::ChannelGroup,
    dither::{Ditherer, Strategy},
    error::Error,
    pack::{self, PackedRow},
};

/// Job options for a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    width: usize,
    strategy: Strategy,
    compress: bool,
    fold_planes: bool,
}

impl Config {
    /// Options for a page `width` pixels wide: classic dithering, no
    /// compression and no plane folding.
    ///
    /// # Example
    ///
    /// ```
    /// use ink_raster::{Config, Strategy};
    ///
    /// let config = Config::new(720)
    ///     .strategy(Strategy::MultiDrop)
    ///     .fold_planes(true)
    ///     .compress(true);
    /// assert_eq!(config.width(), 720);
    /// ```
    pub fn new(width: usize) -> Config {
        Config {
            width,
            strategy: Strategy::Classic,
            compress: false,
            fold_planes: false,
        }
    }

    pub fn strategy(self, strategy: Strategy) -> Self {
        Config { strategy, ..self }
    }

    /// Compress rows with TIFF PackBits.
    pub fn compress(self, flag: bool) -> Self {
        Config {
            compress: flag,
            ..self
        }
    }

    /// Interleave the bit planes of multi-bit channels into one row.
    pub fn fold_planes(self, flag: bool) -> Self {
        Config {
            fold_planes: flag,
            ..self
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Shared flag to stop a running [`Pipeline::render_page`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Output bytes of one dither channel (or one of its planes) for a scanline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneRow {
    pub channel: usize,
    /// Plane index, or `None` when the planes were folded together.
    pub plane: Option<usize>,
    pub data: Vec<u8>,
    pub packed: PackedRow,
}

/// Drives scanlines of one job through separation, dithering and packing.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    group: ChannelGroup,
    ditherer: Ditherer,
    cancel: CancelToken,
    scratch: Vec<u8>,
}

impl Pipeline {
    pub fn new(config: Config, group: ChannelGroup, ditherer: Ditherer) -> Self {
        Pipeline {
            config,
            group,
            ditherer,
            cancel: CancelToken::new(),
            scratch: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn group(&self) -> &ChannelGroup {
        &self.group
    }

    /// Mutable access for settings changes between pages.
    pub fn group_mut(&mut self) -> &mut ChannelGroup {
        &mut self.group
    }

    pub fn ditherer(&self) -> &Ditherer {
        &self.ditherer
    }

    pub fn ditherer_mut(&mut self) -> &mut Ditherer {
        &mut self.ditherer
    }

    /// A handle that can stop [`render_page`](Self::render_page) from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Prepare both stages for a new page.
    pub fn start_page(&mut self) -> Result<(), Error> {
        let width = self.config.width;
        self.group.initialize(width)?;
        self.ditherer.set_width(width);
        self.ditherer.set_strategy(self.config.strategy);
        self.ditherer.initialize()?;

        let physical = self.group.physical_channel_count();
        let dithered = self.ditherer.channels().len();
        if physical != dithered {
            return Err(Error::InvalidConfig(format!(
                "{} physical channels but {} dither channels",
                physical, dithered
            )));
        }
        info!(
            "Page started: width {}, {} physical channels",
            width, physical
        );
        Ok(())
    }

    /// Render scanline `y`.
    ///
    /// `row` holds `width x logical channels` ink amounts, pixel-major.
    pub fn render_row(&mut self, row: &[u16], y: usize) -> Result<Vec<PlaneRow>, Error> {
        let Pipeline {
            config,
            group,
            ditherer,
            scratch,
            ..
        } = self;

        let separated = group.separate(row)?;
        ditherer.dither_row(separated.data(), y, separated.mask(), None)?;

        let mut rows = Vec::new();
        for (index, channel) in ditherer.channels().iter().enumerate() {
            let layout = if config.fold_planes {
                FoldLayout::for_planes(channel.planes())
            } else {
                None
            };
            match layout {
                Some(layout) => {
                    let mut folded = vec![0u8; layout.folded_len(channel.row_bytes())];
                    bits::fold(channel.row(), channel.row_bytes(), layout, &mut folded)?;
                    rows.push(pack_row(config.compress, index, None, &folded, scratch)?);
                }
                None => {
                    for plane in 0..channel.planes() {
                        rows.push(pack_row(
                            config.compress,
                            index,
                            Some(plane),
                            channel.plane(plane),
                            scratch,
                        )?);
                    }
                }
            }
        }
        Ok(rows)
    }

    /// Render a whole page, checking for cancellation before every scanline.
    pub fn render_page<'a, I>(&mut self, rows: I) -> Result<Vec<Vec<PlaneRow>>, Error>
    where
        I: IntoIterator<Item = &'a [u16]>,
    {
        self.start_page()?;
        let mut page = Vec::new();
        for (y, row) in rows.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Page cancelled at row {}", y);
                self.cancel.reset();
                return Err(Error::Cancelled);
            }
            page.push(self.render_row(row, y)?);
        }
        debug!("Page finished: {} rows", page.len());
        Ok(page)
    }
}

fn pack_row(
    compress: bool,
    channel: usize,
    plane: Option<usize>,
    line: &[u8],
    scratch: &mut Vec<u8>,
) -> Result<PlaneRow, Error> {
    let needed = if compress {
        pack::max_tiff_len(line.len())
    } else {
        line.len()
    };
    scratch.resize(needed, 0);
    let packed = if compress {
        pack::pack_tiff(line, scratch)?
    } else {
        pack::pack_uncompressed(line, scratch)?
    };
    Ok(PlaneRow {
        channel,
        plane,
        data: scratch[..packed.len].to_vec(),
        packed,
    })
}

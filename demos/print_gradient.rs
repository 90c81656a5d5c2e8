use std::{env, sync::Arc};

use ink_raster::{
    ChannelGroup, Config, DitherChannel, DitherMatrix, Ditherer, DropSize, Pipeline, Strategy,
    ECOLOR_C, ECOLOR_K, ECOLOR_M, ECOLOR_Y, INK_MAX,
};

const WIDTH: u32 = 720;
const HEIGHT: u32 = 300;

fn print_usage() {
    println!("Usage: cargo run --example print_gradient [IMAGE]");
    println!("Renders IMAGE (as black ink) over a cyan/magenta gradient.");
    println!("Without IMAGE, a synthetic {}x{} ramp is used.", WIDTH, HEIGHT);
}

/// Black ink amounts, one per pixel, row-major.
fn load_black(path: Option<&str>) -> Result<(u32, u32, Vec<u16>), image::ImageError> {
    match path {
        Some(path) => {
            let gray = image::open(path)?.to_luma8();
            let (width, height) = gray.dimensions();
            let ink = gray
                .into_raw()
                .into_iter()
                .map(|luma| u16::from(255 - luma) * 257)
                .collect();
            Ok((width, height, ink))
        }
        None => {
            let ink = (0..HEIGHT)
                .flat_map(|_| (0..WIDTH).map(|x| (x * u32::from(INK_MAX) / WIDTH) as u16))
                .collect();
            Ok((WIDTH, HEIGHT, ink))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let (width, height, black) = load_black(args.get(1).map(String::as_str))?;
    let (width, height) = (width as usize, height as usize);

    let mut group = ChannelGroup::new();
    group.add_subchannel(ECOLOR_K, 0, 1.0)?;
    group.add_subchannel(ECOLOR_C, 0, 0.35)?;
    group.add_subchannel(ECOLOR_C, 1, 1.0)?;
    group.add_subchannel(ECOLOR_M, 0, 0.35)?;
    group.add_subchannel(ECOLOR_M, 1, 1.0)?;
    group.add_subchannel(ECOLOR_Y, 0, 1.0)?;
    group.apply_all(["inkLimit=2.0", "blackChannel=0", "density.3.0=0.9"])?;

    let base = DitherMatrix::bayer(4)?;
    let variable = [
        DropSize::new(0.3, 1),
        DropSize::new(0.6, 2),
        DropSize::new(1.0, 3),
    ];
    let single = [DropSize::new(1.0, 1)];
    let mut ditherer = Ditherer::new(width, Strategy::MultiDrop);
    for index in 0..group.physical_channel_count() {
        let matrix = Arc::new(base.shifted(index * 5, index * 3));
        let drops: &[DropSize] = if index == 0 { &variable } else { &single };
        ditherer.add_channel(DitherChannel::new(drops, matrix)?);
    }

    let config = Config::new(width)
        .strategy(Strategy::MultiDrop)
        .fold_planes(true)
        .compress(true);
    let mut pipeline = Pipeline::new(config, group, ditherer);

    let logical = pipeline.group().channel_count();
    let rows: Vec<Vec<u16>> = (0..height)
        .map(|y| {
            let mut row = vec![0u16; width * logical];
            for (x, pixel) in row.chunks_exact_mut(logical).enumerate() {
                pixel[ECOLOR_K] = black[y * width + x];
                pixel[ECOLOR_C] = (x * usize::from(INK_MAX) / width) as u16;
                pixel[ECOLOR_M] = (y * usize::from(INK_MAX) / height) as u16;
                pixel[ECOLOR_Y] = INK_MAX / 4;
            }
            row
        })
        .collect();

    let page = pipeline.render_page(rows.iter().map(Vec::as_slice))?;

    let mut raw = 0;
    let mut packed = 0;
    let mut blank = 0;
    for row in page.iter().flatten() {
        raw += pipeline
            .ditherer()
            .channel(row.channel)
            .map_or(0, |c| c.row_bytes() * if row.plane.is_some() { 1 } else { c.planes() });
        packed += row.data.len();
        if row.packed.is_blank() {
            blank += 1;
        }
    }
    println!(
        "{} rows, {} plane rows ({} blank), {} bytes packed from {}",
        page.len(),
        page.iter().map(Vec::len).sum::<usize>(),
        blank,
        packed,
        raw
    );
    Ok(())
}

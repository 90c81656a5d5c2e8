use std::{sync::Arc, thread};

use ink_raster::{
    pack, ChannelGroup, Config, DitherChannel, DitherMatrix, Ditherer, DropSize, Error, Pipeline,
    PlaneRow, Strategy, ECOLOR_C, ECOLOR_K, ECOLOR_M, ECOLOR_Y,
};

const WIDTH: usize = 32;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn binary_ditherer(channels: usize) -> Ditherer {
    let matrix = DitherMatrix::bayer(3).unwrap();
    let mut ditherer = Ditherer::new(WIDTH, Strategy::Classic);
    for index in 0..channels {
        let shifted = Arc::new(matrix.shifted(index, 0));
        ditherer.add_channel(DitherChannel::new(&[DropSize::new(1.0, 1)], shifted).unwrap());
    }
    ditherer
}

fn cmyk_group(settings: &[&str]) -> ChannelGroup {
    let mut group = ChannelGroup::new();
    group.add_subchannel(ECOLOR_K, 0, 1.0).unwrap();
    group.add_subchannel(ECOLOR_C, 0, 0.3).unwrap();
    group.add_subchannel(ECOLOR_C, 1, 1.0).unwrap();
    group.add_subchannel(ECOLOR_M, 0, 1.0).unwrap();
    group.add_subchannel(ECOLOR_Y, 0, 1.0).unwrap();
    group.apply_all(settings.iter().copied()).unwrap();
    group
}

fn row_of(pixel: &[u16]) -> Vec<u16> {
    pixel.iter().copied().cycle().take(WIDTH * pixel.len()).collect()
}

fn dots(rows: &[PlaneRow], channel: usize) -> u32 {
    rows.iter()
        .filter(|r| r.channel == channel)
        .map(|r| r.data.iter().map(|b| b.count_ones()).sum::<u32>())
        .sum()
}

#[test]
fn light_ink_prints_before_dark() {
    init();
    let mut pipeline = Pipeline::new(Config::new(WIDTH), cmyk_group(&[]), binary_ditherer(5));
    pipeline.start_page().unwrap();

    let rows = pipeline.render_row(&row_of(&[0, 8000, 0, 0]), 0).unwrap();
    assert_eq!(rows.len(), 5);
    assert!(dots(&rows, 1) > 0, "light cyan should print");
    assert_eq!(dots(&rows, 2), 0, "dark cyan should stay off");
    assert!(rows[0].packed.is_blank());
    assert!(rows[3].packed.is_blank());
    assert!(rows[4].packed.is_blank());

    let rows = pipeline.render_row(&row_of(&[0, 65535, 0, 0]), 1).unwrap();
    assert_eq!(dots(&rows, 1), 0);
    assert_eq!(dots(&rows, 2), WIDTH as u32);
}

#[test]
fn ink_limit_reduces_coverage() {
    init();
    let full = row_of(&[65535, 65535, 65535, 65535]);
    let mut unlimited = Pipeline::new(Config::new(WIDTH), cmyk_group(&[]), binary_ditherer(5));
    unlimited.start_page().unwrap();
    let mut limited = Pipeline::new(
        Config::new(WIDTH),
        cmyk_group(&["inkLimit=2.0"]),
        binary_ditherer(5),
    );
    limited.start_page().unwrap();

    let total = |rows: &[PlaneRow]| (0..5).map(|c| dots(rows, c)).sum::<u32>();
    let before = total(&unlimited.render_row(&full, 0).unwrap());
    let after = total(&limited.render_row(&full, 0).unwrap());
    assert_eq!(before, 4 * WIDTH as u32);
    assert!(after < before, "{} dots with limit, {} without", after, before);
    assert!(after <= 2 * WIDTH as u32 + 5);
}

#[test]
fn compressed_rows_decode_to_raw_rows() {
    init();
    let row: Vec<u16> = (0..WIDTH)
        .flat_map(|x| {
            let ramp = (x * 65535 / WIDTH) as u16;
            [ramp, 65535 - ramp, ramp / 2, 30000]
        })
        .collect();

    let mut raw = Pipeline::new(Config::new(WIDTH), cmyk_group(&[]), binary_ditherer(5));
    let mut packed = Pipeline::new(
        Config::new(WIDTH).compress(true),
        cmyk_group(&[]),
        binary_ditherer(5),
    );
    raw.start_page().unwrap();
    packed.start_page().unwrap();

    for y in 0..8 {
        let expected = raw.render_row(&row, y).unwrap();
        let compressed = packed.render_row(&row, y).unwrap();
        assert_eq!(expected.len(), compressed.len());
        for (plain, small) in expected.iter().zip(&compressed) {
            let mut decoded = Vec::new();
            pack::unpack_tiff(&small.data, &mut decoded).unwrap();
            assert_eq!(decoded, plain.data);
            assert_eq!(plain.packed.bounds, small.packed.bounds);
        }
    }
}

#[test]
fn extra_red_ink_takes_over_red() {
    init();
    let mut group = cmyk_group(&[]);
    group.add_subchannel(4, 0, 1.0).unwrap();
    group.apply_all(["hueAngle.4=0"]).unwrap();
    let mut pipeline = Pipeline::new(Config::new(WIDTH), group, binary_ditherer(6));
    pipeline.start_page().unwrap();

    let rows = pipeline
        .render_row(&row_of(&[0, 0, 40000, 40000, 0]), 0)
        .unwrap();
    assert!(dots(&rows, 5) > 0);
    assert_eq!(dots(&rows, 3), 0);
    assert_eq!(dots(&rows, 4), 0);
}

#[test]
fn multi_drop_folds_planes() {
    init();
    let mut group = ChannelGroup::new();
    group.add_subchannel(0, 0, 1.0).unwrap();
    let mut ditherer = Ditherer::new(WIDTH, Strategy::Classic);
    ditherer.add_channel(
        DitherChannel::new(
            &[DropSize::new(0.25, 1), DropSize::new(0.5, 2), DropSize::new(1.0, 3)],
            Arc::new(DitherMatrix::bayer(2).unwrap()),
        )
        .unwrap(),
    );
    let config = Config::new(WIDTH)
        .strategy(Strategy::MultiDrop)
        .fold_planes(true);
    let mut pipeline = Pipeline::new(config, group, ditherer);
    pipeline.start_page().unwrap();
    assert_eq!(pipeline.ditherer().table_count(), 1);

    let rows = pipeline.render_row(&[65535; WIDTH], 0).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].plane, None);
    // Every pixel fires pattern 3, two bits each.
    assert_eq!(rows[0].data, vec![0xFF; WIDTH / 4]);
}

#[test]
fn cancellation_from_another_thread() {
    init();
    let mut pipeline = Pipeline::new(Config::new(WIDTH), cmyk_group(&[]), binary_ditherer(5));
    let token = pipeline.cancel_token();
    thread::spawn(move || token.cancel()).join().unwrap();

    let row = row_of(&[1000, 2000, 3000, 4000]);
    let result = pipeline.render_page(std::iter::repeat(row.as_slice()).take(3));
    assert_eq!(result, Err(Error::Cancelled));
}

#[test]
fn pipeline_moves_between_threads() {
    init();
    let mut pipeline = Pipeline::new(Config::new(WIDTH), cmyk_group(&[]), binary_ditherer(5));
    let page = thread::spawn(move || {
        let row = row_of(&[0, 0, 0, 0]);
        pipeline.render_page(std::iter::repeat(row.as_slice()).take(2))
    })
    .join()
    .unwrap()
    .unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.iter().flatten().all(|r| r.packed.is_blank()));
}

#[test]
fn settings_changes_apply_on_next_page() {
    init();
    let mut pipeline = Pipeline::new(Config::new(WIDTH), cmyk_group(&[]), binary_ditherer(5));
    pipeline.start_page().unwrap();
    let row = row_of(&[65535, 0, 0, 0]);
    assert_eq!(dots(&pipeline.render_row(&row, 0).unwrap(), 0), WIDTH as u32);

    pipeline.group_mut().apply_all(["density.0.0=0.5"]).unwrap();
    assert_eq!(
        pipeline.render_row(&row, 1),
        Err(Error::NotInitialized)
    );
    pipeline.start_page().unwrap();
    let half = dots(&pipeline.render_row(&row, 0).unwrap(), 0);
    assert!(half > 0 && half < WIDTH as u32);
}

mod support;

use support::{decode_grid, document};
use tercet::{
    avec::{FromSamples, SentinelPolicy},
    grid::{FREQUENCIES, GridBuilder, GridError, MeasurementGrid, Query, QueryError, ROWS, Total},
    sans::buffer::BufferMeta,
};

const SAMPLES: usize = 4;

fn grid() -> MeasurementGrid {
    decode_grid(&document(100, SAMPLES), SentinelPolicy::Strict).1
}

#[test]
fn slice_shapes() {
    let grid = grid();

    for channel in 0..3 {
        let main = grid.query("main", channel, false).unwrap();
        assert_eq!(main.shape(), [SAMPLES]);
        assert_eq!(main.len(), SAMPLES);

        let tercets = grid.query("tercets", channel, false).unwrap();
        assert_eq!(tercets.shape(), [45, SAMPLES]);

        let totals = grid.query("totals", channel, false).unwrap();
        assert_eq!(totals.shape(), [3, SAMPLES]);

        assert_eq!(grid.query(Query::Main, channel, true).unwrap().shape(), [SAMPLES]);
        assert_eq!(grid.query(Query::Tercets, channel, true).unwrap().shape(), [SAMPLES, 45]);
        assert_eq!(grid.query(Query::Totals, channel, true).unwrap().shape(), [SAMPLES, 3]);
    }
}

#[test]
fn slice_values() {
    let grid = grid();

    for channel in 0..3 {
        let main = grid.query("main", channel, false).unwrap();
        let expected: Vec<f64> = (0..SAMPLES).map(|s| grid.get(channel, 0, s).unwrap()).collect();
        assert_eq!(main.to_vec(), expected);

        let tercets = grid.query("tercets", channel, false).unwrap();
        let transposed = grid.query("tercets", channel, true).unwrap();

        for band in 0..45 {
            for sample in 0..SAMPLES {
                let value = grid.get(channel, 1 + band, sample);
                assert_eq!(tercets.get(&[band, sample]), value);
                assert_eq!(transposed.get(&[sample, band]), value);
            }
        }

        let totals = grid.query("totals", channel, false).unwrap();

        for total in Total::ALL {
            for sample in 0..SAMPLES {
                assert_eq!(
                    totals.get(&[total as usize, sample]),
                    grid.get(channel, total.row(), sample)
                );
            }
        }
    }
}

#[test]
fn unrecognized_kind_returns_entire_grid() {
    let grid = grid();

    for kind in ["all", "", "Main", "octaves"] {
        for channel in [0, 1, 2, 3, 17, usize::MAX] {
            for transpose in [false, true] {
                let view = grid.query(kind, channel, transpose).unwrap();

                assert_eq!(view.shape(), [3, ROWS, SAMPLES]);
                assert_eq!(view.to_vec(), grid.as_slice());
            }
        }
    }
}

#[test]
fn recognized_kind_rejects_unknown_channel() {
    let grid = grid();

    for kind in ["main", "tercets", "totals"] {
        assert!(matches!(
            grid.query(kind, 3, false),
            Err(QueryError::ChannelOutOfRange(3))
        ));
    }
}

#[test]
fn view_rows() {
    let grid = grid();

    let tercets = grid.query("tercets", 1, false).unwrap();
    let rows: Vec<Vec<f64>> = tercets.rows().collect();

    assert_eq!(rows.len(), 45);
    assert!(rows.iter().all(|r| r.len() == SAMPLES));
    assert_eq!(rows[10][2], grid.get(1, 11, 2).unwrap());

    let main: Vec<Vec<f64>> = grid.query("main", 0, false).unwrap().rows().collect();
    assert_eq!(main.len(), 1);
    assert_eq!(main[0].len(), SAMPLES);

    let transposed: Vec<Vec<f64>> = grid.query("totals", 2, true).unwrap().rows().collect();
    assert_eq!(transposed.len(), SAMPLES);
    assert_eq!(transposed[3][1], grid.get(2, Total::C.row(), 3).unwrap());
}

#[test]
fn view_rejects_bad_index() {
    let grid = grid();
    let tercets = grid.query("tercets", 0, false).unwrap();

    assert_eq!(tercets.get(&[0]), None);
    assert_eq!(tercets.get(&[45, 0]), None);
    assert_eq!(tercets.get(&[0, SAMPLES]), None);
    assert_eq!(grid.get(3, 0, 0), None);
    assert_eq!(grid.get(0, ROWS, 0), None);
}

#[test]
fn empty_grid_views() {
    let (_, grid) = decode_grid(&document(100, 0), SentinelPolicy::Strict);

    assert_eq!(grid.shape(), [3, 49, 0]);
    assert!(grid.query("main", 0, false).unwrap().is_empty());
    assert_eq!(grid.query("tercets", 0, false).unwrap().rows().count(), 45);
    assert_eq!(grid.query("tercets", 0, true).unwrap().rows().count(), 0);
    assert_eq!(grid.query("all", 0, false).unwrap().iter().count(), 0);
}

#[test]
fn frequencies() {
    assert_eq!(FREQUENCIES.len(), 45);
    assert_eq!(FREQUENCIES[0], 0.8);
    assert_eq!(FREQUENCIES[44], 20000.0);
    assert!(FREQUENCIES.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(MeasurementGrid::frequency(0), None);
    assert_eq!(MeasurementGrid::frequency(1), Some(0.8));
    assert_eq!(MeasurementGrid::frequency(32), Some(1000.0));
    assert_eq!(MeasurementGrid::frequency(45), Some(20000.0));
    assert_eq!(MeasurementGrid::frequency(Total::A.row()), None);
}

#[test]
fn total_rows() {
    assert_eq!(Total::A.row(), 46);
    assert_eq!(Total::C.row(), 47);
    assert_eq!(Total::Lin.row(), 48);
}

#[test]
fn builder_without_samples_fails() {
    assert!(matches!(
        GridBuilder::default().finish(),
        Err(GridError::NotStarted)
    ));
}

#[test]
fn builder_requires_every_declared_sample() {
    let mut builder = GridBuilder::default();
    builder.begin(BufferMeta {
        step_millis: 100,
        sample_count: 2,
    });

    builder.add_main_levels(0, [20, 40, 60]);
    for channel in 0..3 {
        builder.add_bands(0, channel, [10; 48]);
    }

    // Values for samples never begun are dropped.
    builder.add_bands(1, 0, [10; 48]);

    assert!(matches!(
        builder.finish(),
        Err(GridError::Incomplete {
            samples: 2,
            decoded: 1
        })
    ));
}

#[test]
fn builder_lays_out_channels_rows_and_samples() {
    let mut builder = GridBuilder::default();
    builder.begin(BufferMeta {
        step_millis: 100,
        sample_count: 2,
    });

    for sample in 0..2u32 {
        let base = 100 * sample as i16;
        builder.add_main_levels(sample, [base, base + 20, base + 40]);

        for channel in 0..3u8 {
            let values = core::array::from_fn(|k| base + 10 * channel as i16 + k as i16);
            builder.add_bands(sample, channel, values);
        }
    }

    let grid = builder.finish().unwrap();

    assert_eq!(grid.shape(), [3, ROWS, 2]);
    assert_eq!(grid.get(1, 0, 1), Some(6.0));
    assert_eq!(grid.get(2, 1, 0), Some(2.0));
    assert_eq!(grid.get(0, Total::Lin.row(), 1), Some(14.7));
}

//! Randomized property checks

use approx::assert_relative_eq;
use growthcurves::layout::{BackgroundLayout, ReplicateLayout, SampleId};
use growthcurves::metrics::{auc, lag_len};
use growthcurves::preprocess::{average_replicates, background_curves, subtract_background};
use growthcurves::PlateTable;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::id;

const TRIALS: usize = 50;

fn random_times(rng: &mut StdRng, n: usize) -> Array1<f64> {
    let mut t = 0.0;
    (0..n)
        .map(|_| {
            let current = t;
            t += rng.random_range(0.1..2.0);
            current
        })
        .collect()
}

fn random_curve(rng: &mut StdRng, n: usize) -> Array1<f64> {
    (0..n).map(|_| rng.random_range(-1.0..50.0)).collect()
}

fn random_plate(rng: &mut StdRng, wells: &[&str], n: usize) -> PlateTable {
    let times = random_times(rng, n);
    let curves = wells
        .iter()
        .map(|w| (id(w), random_curve(rng, n).to_vec()))
        .collect();
    PlateTable::new(times.to_vec(), curves).unwrap()
}

#[test]
fn test_auc_scales_linearly() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..TRIALS {
        let n = rng.random_range(2..40);
        let times = random_times(&mut rng, n);
        let values = random_curve(&mut rng, n);
        let k = rng.random_range(0.1..10.0);

        let scaled = &values * k;
        assert_relative_eq!(
            auc(times.view(), scaled.view()),
            k * auc(times.view(), values.view()),
            max_relative = 1e-9,
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_lag_lies_between_bracketing_samples() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..TRIALS {
        let n = rng.random_range(3..30);
        let times = random_times(&mut rng, n);
        let mut level = 0.0;
        let values: Array1<f64> = (0..n)
            .map(|_| {
                level += rng.random_range(0.5..5.0);
                level
            })
            .collect();
        // growth must exceed the no-growth limit
        let values = &values * (20.0 / values[n - 1]).max(1.0);
        let y_crit = rng.random_range(values[0]..values[n - 1]);

        let after = values.iter().position(|&v| v > y_crit).unwrap();
        let lag = lag_len(times.view(), values.view(), y_crit);
        assert!(lag >= times[after - 1] - 0.005, "lag {} before bracket", lag);
        assert!(lag <= times[after] + 0.005, "lag {} after bracket", lag);
    }
}

#[test]
fn test_averaging_is_arithmetic_mean() {
    let mut rng = StdRng::seed_from_u64(13);
    let wells = ["A01", "A02", "B01", "B02", "C01", "C02"];
    let layout = ReplicateLayout::parse("A:B:C").unwrap();

    for _ in 0..TRIALS {
        let plate = random_plate(&mut rng, &wells, 12);
        let averaged = average_replicates(&plate, &layout, 2).unwrap();
        for column in ["01", "02"] {
            let members: Vec<_> = ["A", "B", "C"]
                .iter()
                .map(|r| plate.curve(&id(&format!("{}{}", r, column))).unwrap())
                .collect();
            let mean = averaged.curve(&id(&format!("ABC{}", column))).unwrap();
            for t in 0..plate.n_times() {
                let expected = members.iter().map(|m| m[t]).sum::<f64>() / 3.0;
                assert_relative_eq!(mean[t], expected, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_background_subtraction_is_exact() {
    let mut rng = StdRng::seed_from_u64(17);
    let wells = ["A01", "A02", "H01", "H02"];
    let layout = BackgroundLayout::parse("A:H").unwrap();

    for _ in 0..TRIALS {
        let plate = random_plate(&mut rng, &wells, 10);
        let backgrounds = background_curves(&plate, &layout, 2).unwrap();
        let subtracted = subtract_background(&plate, &backgrounds, &layout).unwrap();

        assert_eq!(subtracted.len(), 2);
        for column in ["01", "02"] {
            let sample = plate.curve(&id(&format!("A{}", column))).unwrap();
            let background = plate.curve(&id(&format!("H{}", column))).unwrap();
            let result = subtracted.curve(&id(&format!("A{}", column))).unwrap();
            assert_eq!(result.to_owned(), &sample - &background);
        }
        let bg: SampleId = "H01_bg".parse().unwrap();
        assert!(backgrounds.contains(&bg));
    }
}

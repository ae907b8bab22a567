use image::{DynamicImage, GrayImage};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use threadline::{
    config, geometry::Segment, ring, verboser::Silent, Error, Raster, RunConfig, StepResult,
    Termination, Tracer,
};

fn black_tracer(config: RunConfig, start: usize) -> Tracer<f32> {
    let raster = Raster::from_vec(vec![0; config.size * config.size], config.size).unwrap();
    Tracer::from_raster(raster, config, start, &mut Silent).unwrap()
}

fn random_tracer(config: RunConfig, start: usize, seed: u64) -> Tracer<f32> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let values = (0..config.size * config.size)
        .map(|_| rng.gen())
        .collect();
    let raster = Raster::from_vec(values, config.size).unwrap();
    Tracer::from_raster(raster, config, start, &mut Silent).unwrap()
}

fn run_to_end(tracer: &mut Tracer<f32>) -> (Termination, usize) {
    let mut steps = 0;
    loop {
        match tracer.step() {
            StepResult::Advanced(_) => steps += 1,
            StepResult::Terminated(reason) => return (reason, steps),
        }
    }
}

#[test]
fn full_consumption_in_a_single_step() {
    // Four nails on a ring inside an all-black 10x10 raster. Every candidate
    // segment is fully in bounds and scores exactly 255, so the tie-break
    // must pick the lowest candidate index.
    let config = RunConfig {
        nails: 4,
        max_lines: 10,
        size: 10,
        margin: 1.0,
        samples: 4,
        brighten: 255,
    };
    let mut tracer = black_tracer(config, 0);
    assert_eq!(tracer.step(), StepResult::Advanced(2));
    assert_eq!(tracer.path()[..], [0, 1]);

    let segment = Segment::new(tracer.ring().nails()[0], tracer.ring().nails()[1]);
    let sampled: Vec<usize> = tracer
        .raster()
        .grid()
        .sample_indexes(segment, config.samples)
        .collect();
    assert!(!sampled.is_empty());
    for (index, &value) in tracer.raster().values().iter().enumerate() {
        if sampled.contains(&index) {
            // A 255 increment saturates a black cell in one pass.
            assert_eq!(value, 255, "sampled cell {index} not consumed");
        } else {
            assert_eq!(value, 0, "cell {index} off the segment was written");
        }
    }
}

#[test]
fn exact_ties_resolve_to_the_lowest_index() {
    // All-black raster: every in-bounds candidate scores the same.
    let config = RunConfig {
        nails: 16,
        max_lines: 4,
        size: 64,
        margin: 4.0,
        ..Default::default()
    };
    let mut tracer = black_tracer(config, 3);
    assert_eq!(tracer.step(), StepResult::Advanced(2));
    assert_eq!(tracer.path()[1], 0);
}

#[test]
fn single_nail_is_immediately_terminal() {
    let config = RunConfig {
        nails: 1,
        max_lines: 10,
        size: 10,
        margin: 1.0,
        ..Default::default()
    };
    let mut tracer = black_tracer(config, 0);
    assert_eq!(
        tracer.step(),
        StepResult::Terminated(Termination::NoValidNext)
    );
    assert_eq!(tracer.path().len(), 1);
    assert!(tracer.raster().values().iter().all(|&value| value == 0));
}

#[test]
fn a_max_length_of_one_never_advances() {
    // The start entry already counts towards the maximum.
    let config = RunConfig {
        nails: 8,
        max_lines: 1,
        size: 10,
        margin: 1.0,
        ..Default::default()
    };
    let mut tracer = black_tracer(config, 0);
    assert_eq!(tracer.step(), StepResult::Terminated(Termination::MaxLines));
    assert_eq!(tracer.path().len(), 1);
    assert!(tracer.raster().values().iter().all(|&value| value == 0));
}

#[test]
fn the_terminating_step_still_appends() {
    let config = RunConfig {
        nails: 8,
        max_lines: 3,
        size: 10,
        margin: 1.0,
        ..Default::default()
    };
    let mut tracer = black_tracer(config, 0);
    assert_eq!(tracer.step(), StepResult::Advanced(2));
    assert_eq!(tracer.step(), StepResult::Terminated(Termination::MaxLines));
    assert_eq!(tracer.path().len(), 3);
    // Further steps are terminal and leave the path alone.
    assert_eq!(tracer.step(), StepResult::Terminated(Termination::MaxLines));
    assert_eq!(tracer.path().len(), 3);
}

#[test]
fn runs_terminate_within_max_lines_without_self_loops() {
    let config = RunConfig {
        nails: 24,
        max_lines: 60,
        size: 48,
        margin: 3.0,
        samples: 32,
        brighten: 40,
    };
    let mut tracer = random_tracer(config, 5, 11);
    let (reason, steps) = run_to_end(&mut tracer);
    assert_eq!(reason, Termination::MaxLines);
    assert!(steps < config.max_lines);
    assert_eq!(tracer.path().len(), config.max_lines);
    assert!(tracer.path().windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn identical_inputs_produce_identical_paths() {
    let config = RunConfig {
        nails: 32,
        max_lines: 80,
        size: 64,
        margin: 4.0,
        ..Default::default()
    };
    let mut first = random_tracer(config, 9, 42);
    let mut second = random_tracer(config, 9, 42);
    run_to_end(&mut first);
    run_to_end(&mut second);
    assert_eq!(first.path()[..], second.path()[..]);
    assert_eq!(first.raster().values(), second.raster().values());
}

#[test]
fn scoring_is_idempotent_between_steps() {
    let tracer = random_tracer(
        RunConfig {
            nails: 16,
            size: 32,
            margin: 2.0,
            ..Default::default()
        },
        0,
        7,
    );
    for candidate in 1..tracer.ring().len() {
        assert_eq!(tracer.score(0, candidate), tracer.score(0, candidate));
    }
}

#[test]
fn brightening_never_wraps_for_adversarial_increments() {
    for brighten in [250u8, 253, 254, 255] {
        let config = RunConfig {
            nails: 12,
            max_lines: 40,
            size: 24,
            margin: 2.0,
            samples: 16,
            brighten,
        };
        let mut tracer = random_tracer(config, 2, u64::from(brighten));
        let mut previous = tracer.raster().values().to_vec();
        while let StepResult::Advanced(_) = tracer.step() {
            let current = tracer.raster().values();
            for (index, (&before, &after)) in previous.iter().zip(current).enumerate() {
                assert!(
                    after >= before,
                    "cell {index} wrapped with increment {brighten}: {before} -> {after}"
                );
            }
            previous = current.to_vec();
        }
    }
}

#[test]
fn degenerate_parameters_are_precondition_errors() {
    let config = RunConfig {
        nails: 8,
        size: 10,
        margin: 1.0,
        ..Default::default()
    };
    let raster = Raster::from_vec(vec![0; 100], 10).unwrap();
    assert!(matches!(
        Tracer::<f32>::from_raster(raster.clone(), config, 8, &mut Silent),
        Err(Error::StartOutOfRange { start: 8, count: 8 })
    ));
    assert!(matches!(
        Tracer::<f32>::from_raster(
            raster.clone(),
            RunConfig {
                nails: 0,
                ..config
            },
            0,
            &mut Silent
        ),
        Err(Error::Ring(ring::Error::MinNailCount))
    ));
    assert!(matches!(
        Tracer::<f32>::from_raster(
            raster.clone(),
            RunConfig { samples: 0, ..config },
            0,
            &mut Silent
        ),
        Err(Error::Config(config::Error::MinSampleCount))
    ));
    assert!(matches!(
        Tracer::<f32>::from_raster(
            raster,
            RunConfig { size: 20, ..config },
            0,
            &mut Silent
        ),
        Err(Error::RasterMismatch {
            expected: 20,
            actual: 10
        })
    ));
}

#[test]
fn image_sources_are_resampled_to_the_working_size() {
    let source = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 60, image::Luma([0])));
    let config = RunConfig {
        nails: 12,
        max_lines: 20,
        size: 32,
        margin: 2.0,
        ..Default::default()
    };
    let mut tracer = Tracer::<f32>::new(&source, config, 0, &mut Silent).unwrap();
    assert_eq!(tracer.raster().values().len(), 32 * 32);
    let (reason, _) = run_to_end(&mut tracer);
    assert_eq!(reason, Termination::MaxLines);
    let instructions = tracer.build_instructions();
    assert_eq!(instructions.lines().count(), config.max_lines - 1);
    assert!(instructions.starts_with("Line 1: 0 -> "));
}

use std::{fs::File, io::Write, path::Path};

use clap::{Parser, ValueEnum};
use num_traits::AsPrimitive;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use threadline::{verboser::Silent, Float, RunConfig, StepResult, Tracer};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file path.
    #[arg()]
    input: String,

    /// Number of nails surrounding the image.
    #[arg(short, long, default_value_t = 200)]
    nails: usize,

    /// Maximum number of path entries, the start nail included.
    #[arg(short, long, default_value_t = 5000)]
    lines: usize,

    /// Side in pixels of the square working raster.
    #[arg(short, long, default_value_t = 360)]
    resolution: usize,

    /// Gap in pixels between the nail ring and the raster border.
    #[arg(long, default_value_t = 12.0)]
    margin: f32,

    /// Sample points per candidate segment.
    #[arg(long, default_value_t = 80)]
    samples: usize,

    /// Brightening applied to each consumed sample cell.
    #[arg(long, default_value_t = 10)]
    brighten: u8,

    /// Seed for the random start nail. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Precision of calculations (Single/Double).
    #[arg(short, long, default_value_t = Precision::Single)]
    precision: Precision,

    /// Stroke width of the SVG preview.
    #[arg(long, default_value_t = 1.0)]
    thickness: f32,
}

#[derive(Clone, Copy, Debug)]
enum Precision {
    Single,
    Double,
}

impl ValueEnum for Precision {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Single, Self::Double]
    }

    fn to_possible_value<'a>(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Single => clap::builder::PossibleValue::new("Single")
                .alias("single")
                .alias("f32"),
            Self::Double => clap::builder::PossibleValue::new("Double")
                .alias("double")
                .alias("f64"),
        })
    }
}

impl ToString for Precision {
    fn to_string(&self) -> String {
        match self {
            Self::Single => String::from("Single"),
            Self::Double => String::from("Double"),
        }
    }
}

fn main() {
    let args = Args::parse();
    match args.precision {
        Precision::Single => run::<f32>(&args),
        Precision::Double => run::<f64>(&args),
    }
}

fn run<S: Float>(args: &Args)
where
    u8: AsPrimitive<S>,
    usize: AsPrimitive<S>,
    f32: AsPrimitive<S>,
{
    let config = RunConfig {
        nails: args.nails,
        max_lines: args.lines,
        size: args.resolution,
        margin: args.margin,
        samples: args.samples,
        brighten: args.brighten,
    };
    let source = image::open(&args.input).expect("Failed to open the input image");
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let start = rng.gen_range(0..args.nails);

    let mut tracer =
        Tracer::<S>::new(&source, config, start, &mut Silent).expect("Invalid run parameters");
    let reason = loop {
        match tracer.step() {
            StepResult::Advanced(count) => {
                if count % 500 == 0 {
                    println!("{} entries traced", count);
                }
            }
            StepResult::Terminated(reason) => break reason,
        }
    };
    println!(
        "Finished from nail {}: {} ({} entries)",
        start,
        reason,
        tracer.path().len()
    );

    let path = Path::new(&args.input);
    let file_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .expect("Invalid file name");
    let out_folder = path.parent().unwrap_or(Path::new(".")).join("output");
    std::fs::create_dir_all(out_folder.as_path()).expect("Output directory can not be created");

    File::create(out_folder.join(format!("{}_map.txt", file_name)))
        .and_then(|mut file| file.write_all(tracer.build_instructions().as_bytes()))
        .expect("Failed writing the thread map");
    svg::save(
        out_folder.join(format!("{}.svg", file_name)),
        &tracer.build_svg(args.thickness),
    )
    .expect("Failed creating svg image");
    tracer
        .raster()
        .to_rgb()
        .save(out_folder.join(format!("{}_residual.png", file_name)))
        .expect("Failed saving the residual raster");
}

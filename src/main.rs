/*

logarithmic triangle tilings: one triangle, repeatedly rotated,
shrunk and slid along itself to make an arm, then the arm copied
around a center point.

 */

// bunch of standard library stuff
use std::path::Path;
use std::fs::File;
use std::io::BufReader;

//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

#[macro_use]
extern crate error_chain;

mod errors {

    error_chain!{

        foreign_links {
            Fmt(::std::fmt::Error);
            Io(::std::io::Error);
            Cairo(::cairo::Error);
        }

        errors {

            DegenerateParameter(n: usize) {
                description("degenerate recursion depth")
                display("recursion depth {:} is degenerate for the general solver (use the regular variant for n = 1)", n)
            }

            InvalidAngle(name: &'static str, radians: f64) {
                description("invalid triangle angle")
                display("angle {:} = {:} deg is outside (0, 180)", name, radians * 180.0 / ::std::f64::consts::PI)
            }

            NoValidScalingFactor(count: usize) {
                description("no unique scaling factor")
                display("expected exactly one scaling factor in (0, 1) but found {:}", count)
            }

            InsufficientSequenceLength(length: usize, depth: usize) {
                description("arm too short")
                display("arm length {:} is less than recursion depth {:}", length, depth)
            }

            InvalidArmCount(m: usize) {
                description("too few arms")
                display("need at least 3 arms but got {:}", m)
            }

        }

    }

}

use errors::*;

//////////////////////////////////////////////////////////////////////

const PI: f64 = std::f64::consts::PI;
const DEG: f64 = PI / 180.0;

//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra

type Vec2d = nalgebra::Vector2<f64>;
type Point2d = nalgebra::geometry::Point2<f64>;
type Similarity2d = nalgebra::Similarity2<f64>;
type Translation2d = nalgebra::Translation2<f64>;
type Rotation2d = nalgebra::Rotation2<f64>;
type Transform2d = nalgebra::Transform2<f64>;
type Matrix2d = nalgebra::Matrix2<f64>;
type Matrix3d = nalgebra::Matrix3<f64>;

mod roots;
mod geometry;
mod arm;
mod tiling;
mod render;
mod pattern;

use pattern::TilingSpec;
use tiling::Tiling;

//////////////////////////////////////////////////////////////////////

fn init_logging() {

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("logtile=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

}

fn run() -> Result<()> {

    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: {:?} PATTERNFILE", args[0]);
        std::process::exit(1);
    }

    let filename = Path::new(&args[1]);

    let basename = match filename.file_stem() {
        None => "output",
        Some(os_str) => os_str.to_str().unwrap_or("output")
    };

    let f = File::open(filename).chain_err(|| format!("opening {:}", args[1]))?;
    let mut reader = BufReader::new(f);

    let ts = TilingSpec::parse(&args[1], &mut reader)?;

    let settings = ts.render_settings();
    let jobs = ts.jobs(basename);

    if ts.sweep.is_some() {
        std::fs::create_dir_all(basename)
            .chain_err(|| format!("creating directory {:}", basename))?;
    }

    let mut written = 0;

    for job in &jobs {

        let tiling = match Tiling::generate(&job.params, ts.length) {

            Ok(tiling) => tiling,

            // a sweep may cross angles with no valid tiling
            Err(e) if ts.sweep.is_some() => {
                tracing::warn!(file = job.filename.as_str(),
                               angle_deg = job.params.free_angle() / DEG,
                               error = %e, "skipping frame");
                continue;
            }

            Err(e) => {
                return Err(e).chain_err(|| format!("generating {:}", job.filename));
            }

        };

        tracing::debug!(center = ?tiling.center(), "tiling center");

        render::render(&tiling, &settings, &job.filename)?;

        written += 1;

    }

    tracing::info!(written = written, total = jobs.len(), "done");

    Ok(())

}

quick_main!(run);

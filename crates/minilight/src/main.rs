//! MiniLight command-line driver.
//!
//! Parses a model file, refines the image progressively, and writes the
//! tone-mapped PPM next to the model at a doubling cadence so partial
//! results are available early.

use std::env;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use minilight_core::ModelDescription;
use minilight_renderer::{Camera, Image, Lfsr113, Scene, Triangle};

const ABOUT: &str = "MiniLight - minimal unbiased global illumination renderer";

fn cli() -> Command {
    Command::new("minilight")
        .about(ABOUT)
        .arg(
            Arg::new("model")
                .required(true)
                .value_name("modelPath")
                .help("Scene model file; the image is written to <modelPath>.ppm"),
        )
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    // One line on stderr whatever the failure, however deep its cause
    if let Err(error) = try_main() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    // clap cannot register '?' as a short flag, so honor it by hand
    if env::args().skip(1).any(|arg| arg == "-?") {
        cli().print_help()?;
        println!();
        return Ok(());
    }

    let matches = cli().get_matches();
    let model_path = matches
        .get_one::<String>("model")
        .cloned()
        .context("model path argument missing")?;

    run(&model_path)
}

fn run(model_path: &str) -> Result<()> {
    let start = Instant::now();

    let content = fs::read_to_string(model_path)
        .with_context(|| format!("cannot open model file '{model_path}'"))?;
    let model = ModelDescription::parse(&content)
        .with_context(|| format!("malformed model file '{model_path}'"))?;
    log::info!(
        "model '{}': {} triangles, {} iterations",
        model_path,
        model.triangles.len(),
        model.iterations
    );

    let triangles: Vec<Triangle> = model
        .triangles
        .iter()
        .map(|t| {
            Triangle::new(
                t.vertices[0],
                t.vertices[1],
                t.vertices[2],
                t.reflectivity,
                t.emissivity,
            )
        })
        .collect();
    let camera = Camera::new(
        model.camera.position,
        model.camera.direction,
        model.camera.angle_degrees,
    );
    let scene = Scene::new(
        camera.position(),
        model.sky_emission,
        model.ground_reflection,
        triangles,
    );
    let mut image = Image::new(model.width, model.height);
    let mut rng = Lfsr113::new();
    let image_path = format!("{model_path}.ppm");

    for frame in 1..=model.iterations {
        print!("\riteration: {frame}");
        io::stdout().flush()?;

        camera.frame(&scene, &mut rng, &mut image);

        if is_save_frame(frame, model.iterations) {
            save_image(&image_path, &image, frame)?;
        }
    }

    println!("\nfinished");
    log::info!("rendered in {:.1}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Saves happen at powers of two and at the final frame, so the image
/// on disk is never more than half a render old.
fn is_save_frame(frame: u32, iterations: u32) -> bool {
    frame.is_power_of_two() || frame == iterations
}

fn save_image(path: &str, image: &Image, iteration: u32) -> Result<()> {
    let file =
        fs::File::create(path).with_context(|| format!("cannot write image file '{path}'"))?;
    let mut out = BufWriter::new(file);
    image.write(&mut out, iteration)?;
    out.flush()?;
    log::debug!("saved '{}' at iteration {}", path, iteration);
    Ok(())
}

use std::env;
use std::fs;

use anyhow::{anyhow, Context, Result};
use glam::Vec4;

use trigon::{
    draw_triangle, local_position, shader, vertex_stage, CameraConfig, CameraUniform, Framebuffer,
};

const CLEAR_COLOR: Vec4 = Vec4::new(0.03, 0.03, 0.05, 1.0);

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;

    let config = match options.camera_path.as_deref() {
        Some(path) => {
            let xml = fs::read_to_string(path)
                .with_context(|| format!("failed to read camera file {path}"))?;
            CameraConfig::from_xml(&xml)
                .with_context(|| format!("failed to parse camera file {path}"))?
        }
        None => CameraConfig::default(),
    };

    let aspect = options.width as f32 / options.height as f32;
    let mut camera = config.to_camera(aspect);
    camera.update();
    let uniform = camera.uniform();

    println!(
        "Camera at ({:.2}, {:.2}, {:.2}), fov {:.0} deg",
        config.position.x,
        config.position.y,
        config.position.z,
        config.fov_degrees
    );
    print_vertex_summary(&uniform);

    if options.summary_only {
        return Ok(());
    }

    let mut framebuffer = Framebuffer::new(options.width, options.height, CLEAR_COLOR);
    draw_triangle(&mut framebuffer, &uniform);
    framebuffer
        .save_png(&options.output)
        .with_context(|| format!("failed to write {}", options.output))?;
    println!(
        "Wrote {}x{} snapshot to {}",
        framebuffer.width(),
        framebuffer.height(),
        options.output
    );
    print_centroid_sample(&framebuffer, &uniform);

    Ok(())
}

fn print_vertex_summary(uniform: &CameraUniform) {
    println!("Projected {} vertices:", shader::VERTEX_COUNT);
    for index in 0..shader::VERTEX_COUNT {
        let local = local_position(index);
        let out = vertex_stage(index, uniform);
        println!(
            " - vertex {index}: local=({:.2}, {:.2}) clip=({:.2}, {:.2}, {:.2}, {:.2}) color=({:.0}, {:.0}, {:.0}, {:.0})",
            local.x,
            local.y,
            out.position.x,
            out.position.y,
            out.position.z,
            out.position.w,
            out.color.x,
            out.color.y,
            out.color.z,
            out.color.w
        );
    }
}

fn print_centroid_sample(framebuffer: &Framebuffer, uniform: &CameraUniform) {
    let outputs = [0, 1, 2].map(|index| vertex_stage(index, uniform));
    if outputs.iter().any(|out| out.position.w <= 0.0) {
        println!("Triangle is behind the camera; nothing to sample");
        return;
    }

    let mut ndc_sum = Vec4::ZERO;
    for out in &outputs {
        ndc_sum += out.position / out.position.w;
    }
    let centroid = ndc_sum / 3.0;
    let x = ((centroid.x * 0.5 + 0.5) * framebuffer.width() as f32) as u32;
    let y = ((1.0 - (centroid.y * 0.5 + 0.5)) * framebuffer.height() as f32) as u32;
    let x = x.min(framebuffer.width() - 1);
    let y = y.min(framebuffer.height() - 1);

    if let Some(sample) = framebuffer.pixel(x, y) {
        println!(
            "Centroid sample at ({x}, {y}): ({:.2}, {:.2}, {:.2}, {:.2})",
            sample.x, sample.y, sample.z, sample.w
        );
    }
}

struct CliOptions {
    camera_path: Option<String>,
    width: u32,
    height: u32,
    output: String,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut options = Self {
            camera_path: None,
            width: 512,
            height: 512,
            output: "trigon.png".to_string(),
            summary_only: false,
        };

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--summary-only" => options.summary_only = true,
                "--size" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--size expects WIDTHxHEIGHT"))?;
                    let (width, height) = parse_size(&value)?;
                    options.width = width;
                    options.height = height;
                }
                "--output" => {
                    options.output = args
                        .next()
                        .ok_or_else(|| anyhow!("--output expects a file path"))?;
                }
                other if other.starts_with("--") => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: trigon [camera.xml] [--size WxH] [--output PATH] [--summary-only]"
                    ));
                }
                other => {
                    if options.camera_path.is_some() {
                        return Err(anyhow!("unexpected extra argument: {other}"));
                    }
                    options.camera_path = Some(other.to_string());
                }
            }
        }
        Ok(options)
    }
}

fn parse_size(value: &str) -> Result<(u32, u32)> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| anyhow!("--size expects WIDTHxHEIGHT, got {value}"))?;
    let width = width
        .parse::<u32>()
        .with_context(|| format!("invalid width in --size {value}"))?;
    let height = height
        .parse::<u32>()
        .with_context(|| format!("invalid height in --size {value}"))?;
    if width == 0 || height == 0 {
        return Err(anyhow!("--size dimensions must be non-zero"));
    }
    Ok((width, height))
}

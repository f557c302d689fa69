//! Inspect a VIMS cube from the command line.
//!
//! Prints the cube dimensions, timing and target metadata, and can
//! export a band plane as a PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rusty_vims::color::Colormap;
use rusty_vims::cube::{IsisCube, Qub};
use rusty_vims::img;

#[derive(Parser)]
#[command(name = "vims-info", about = "Inspect a Cassini VIMS cube")]
struct Cli {
    /// Cube file (v*.qub or C*.cub).
    file: PathBuf,

    /// Export this band (1-indexed) as a PNG.
    #[arg(long)]
    band: Option<usize>,

    /// Output PNG path (default: <band>.png next to the cube).
    #[arg(long, requires = "band")]
    png: Option<PathBuf>,

    /// Colormapped output instead of grayscale.
    #[arg(long)]
    color: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let ext = cli
        .file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "qub" => qub_info(&cli),
        "cub" => isis_info(&cli),
        other => anyhow::bail!("unsupported cube extension `.{other}`"),
    }
}

fn qub_info(cli: &Cli) -> Result<()> {
    let qub = Qub::open(&cli.file).context("reading QUB")?;

    println!("QUB: {qub}");
    println!("  Size: {} x {} ({} bands)", qub.ns(), qub.nl(), qub.nb());
    if let (Ok(start), Ok(stop)) = (qub.start(), qub.stop()) {
        println!("  Start time: {start}");
        println!("  Stop time:  {stop}");
    }
    if let Ok((ir, vis)) = qub.expo() {
        println!("  Exposure: {ir} s (IR) / {vis} s (VIS)");
    }
    if let Ok(mode) = qub.sampling_mode_ir() {
        println!("  IR sampling mode: {mode}");
    }
    if let Ok(target) = qub.target() {
        println!("  Target: {target}");
    }
    if let Some(side) = qub.side_plane() {
        println!("  Side plane: {}", side.name);
    }
    for plane in qub.back_planes() {
        println!("  Back plane: {}", plane.name);
    }

    if let Some(band) = cli.band {
        let plane = qub.band_image(band).context("extracting band")?;
        export(cli, &plane, qub.ns(), qub.nl(), band)?;
    }
    Ok(())
}

fn isis_info(cli: &Cli) -> Result<()> {
    let cube = IsisCube::open(&cli.file).context("reading ISIS cube")?;

    println!("ISIS cube: {}", cli.file.display());
    println!(
        "  Size: {} x {} ({} bands, {:?})",
        cube.ns(),
        cube.nl(),
        cube.nb(),
        cube.pixel_type()
    );
    if let (Ok(start), Ok(stop)) = (cube.start(), cube.stop()) {
        println!("  Start time: {start}");
        println!("  Stop time:  {stop}");
    }
    if let Ok(target) = cube.target_name() {
        println!("  Target: {target}");
    }
    if let Ok(radius) = cube.target_radius() {
        println!("  Target mean radius: {radius:.2} km");
    }
    if let Ok(wvlns) = cube.wavelengths() {
        if let (Some(first), Some(last)) = (wvlns.first(), wvlns.last()) {
            println!("  Wavelengths: {first:.4} - {last:.4} um");
        }
    }

    if let Some(band) = cli.band {
        let plane = cube.band_image(band).context("extracting band")?.to_vec();
        export(cli, &plane, cube.ns(), cube.nl(), band)?;
    }
    Ok(())
}

fn export(cli: &Cli, plane: &[f64], ns: usize, nl: usize, band: usize) -> Result<()> {
    let out = cli
        .png
        .clone()
        .unwrap_or_else(|| cli.file.with_extension(format!("band{band}.png")));
    if cli.color {
        img::save_rgba(plane, ns, nl, &Colormap::default(), &out)?;
    } else {
        img::save_gray(plane, ns, nl, &out)?;
    }
    println!("  Band {band} saved to {}", out.display());
    Ok(())
}

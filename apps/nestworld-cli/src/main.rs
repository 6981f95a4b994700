use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::{Mat4, Quat, Vec3};
use nestworld_common::{ClipPlanes, Pose};
use nestworld_recursion::{
    DepthRange, FrameOutcome, RecursiveViewpointManager, ReferenceSlot, ReferenceViewpointState,
};
use tracing_subscriber::EnvFilter;

mod scene;
mod sim;

use scene::SceneConfig;

#[derive(Parser)]
#[command(name = "nestworld-cli", about = "CLI tool for nested recursive viewpoints")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print the clone layout for a static reference camera
    Clones {
        /// Scene file (JSON); flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Base scale factor in (0, 1)
        #[arg(short, long)]
        base: Option<f32>,
        /// Number of nested clones
        #[arg(short = 'k', long)]
        count: Option<usize>,
        /// Recursion center as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        center: Option<Vec3>,
        /// Reference camera position as x,y,z
        #[arg(short, long, value_parser = parse_vec3, default_value = "0,0,10")]
        position: Vec3,
    },
    /// Load and validate a scene file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run a scripted headless walk and report the clones
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let parse = |v: &str| v.parse::<f32>().map_err(|e| format!("'{v}': {e}"));
    Ok(Vec3::new(parse(x)?, parse(y)?, parse(z)?))
}

fn load_scene(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(p) => Ok(SceneConfig::load(p)?),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("nestworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", nestworld_common::crate_info());
            println!("recursion: {}", nestworld_recursion::crate_info());
            println!("locomotion: {}", nestworld_locomotion::crate_info());
        }
        Commands::Clones {
            config,
            base,
            count,
            center,
            position,
        } => {
            let mut scene = load_scene(config.as_ref())?;
            if let Some(b) = base {
                scene.clones.base_scale = b;
            }
            if let Some(k) = count {
                scene.clones.count = k;
            }
            if let Some(c) = center {
                scene.center = c;
            }
            scene.validate()?;

            let slot = ReferenceSlot::new();
            let mut manager =
                RecursiveViewpointManager::new(&scene.clones, scene.center, slot.clone())?;
            let lens = scene.camera;
            slot.publish(ReferenceViewpointState::from_pose(
                0,
                Pose::new(position, Quat::IDENTITY),
                lens.clip(),
                lens.projection(),
                DepthRange::ZeroToOne,
            ));
            if let FrameOutcome::Skipped(reason) = manager.late_update(0) {
                anyhow::bail!("clone update skipped: {reason:?}");
            }

            println!(
                "Reference: pos=({:.2}, {:.2}, {:.2}) near={} far={}",
                position.x, position.y, position.z, lens.near, lens.far
            );
            for clone in manager.clones() {
                print_clone(clone.level(), clone.scale(), clone.view().position(), clone.clip());
            }
        }
        Commands::Validate { config } => {
            let scene = SceneConfig::load(&config)?;
            println!(
                "OK: {} clone(s), base scale {}, center=({:.2}, {:.2}, {:.2})",
                scene.clones.count,
                scene.clones.base_scale,
                scene.center.x,
                scene.center.y,
                scene.center.z
            );
        }
        Commands::Simulate { config, frames, dt } => {
            if !(dt.is_finite() && dt > 0.0) {
                anyhow::bail!("frame time must be positive, got {dt}");
            }
            let scene = load_scene(config.as_ref())?;
            let report = sim::run(&scene, frames, dt)?;

            println!(
                "Simulated {} frames: updated={}, skipped={}",
                report.frames, report.updated_frames, report.skipped_frames
            );
            let e = report.final_eye;
            println!("Reference eye: ({:.2}, {:.2}, {:.2})", e.x, e.y, e.z);
            for (d, v) in report.diagnostics.iter().zip(&report.views) {
                let clip = d.near.zip(d.far).map(|(n, f)| ClipPlanes::new(n, f));
                print_clone(d.level, d.scale, v.position(), clip);
                print_matrix(&v.projection);
            }
        }
    }

    Ok(())
}

fn print_clone(level: u32, scale: f32, p: Vec3, clip: Option<ClipPlanes>) {
    match clip {
        Some(c) => println!(
            "  L{level} S {scale:.6} pos=({:.2}, {:.2}, {:.2}) N {:.3} F {:.3}",
            p.x, p.y, p.z, c.near, c.far
        ),
        None => println!("  L{level} S {scale:.6} (not updated)"),
    }
}

fn print_matrix(m: &Mat4) {
    for row in 0..4 {
        let r = m.row(row);
        println!("      [{:9.4} {:9.4} {:9.4} {:9.4}]", r.x, r.y, r.z, r.w);
    }
}

use clap::{Parser, Subcommand};
use springweb_core::{analyze_scene, load_scene, run_scene};
use std::fs;
use std::path::{Path, PathBuf};

mod utils;
mod vel_app;

#[derive(Parser)]
#[command(name = "springweb")]
#[command(about = "Springweb - mass-spring web simulator", long_about = None)]
struct Cli {
    /// Log file name under ./logs
    #[arg(long, global = true, default_value = "springweb.log")]
    log_name: String,

    /// Also log per-frame statistics
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a scene headless and print the final particle states
    Run {
        /// Path to the scene file
        file: PathBuf,
        /// Number of frames to advance
        #[arg(long, default_value_t = 60)]
        frames: u64,
        /// Seconds of simulated time per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        frame_dt: f64,
    },
    /// Load a scene and report problems without running it
    Check {
        /// Path to the scene file
        file: PathBuf,
    },
    /// Open an interactive viewer that reloads the scene when it changes
    View {
        /// Path to the scene file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let _guard = match utils::configure_logger(&cli.log_name, cli.verbose) {
        Ok((guard, path)) => {
            ftlog::info!("logging to {}", path.display());
            Some(guard)
        }
        Err(e) => {
            eprintln!("Warning: could not set up logging: {}", e);
            None
        }
    };

    let outcome = match cli.command {
        Commands::Run {
            file,
            frames,
            frame_dt,
        } => run_file(&file, frames, frame_dt),
        Commands::Check { file } => check_file(&file),
        Commands::View { file } => view_file(file),
    };

    if let Err(e) = outcome {
        ftlog::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_file(file: &Path, frames: u64, frame_dt: f64) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let result = run_scene(&source, frames, frame_dt).map_err(|e| e.render(&source))?;

    println!(
        "{} frames, {} sub-steps, {} springs stuck, {} springs broken, {} springs left",
        result.frames,
        result.sub_steps,
        result.springs_stuck,
        result.springs_broken,
        result.spring_count
    );
    for particle in result.particles {
        let (p, v) = (particle.pos, particle.vel);
        println!(
            "{}: pos ({:.6}, {:.6}, {:.6}) vel ({:.6}, {:.6}, {:.6})",
            particle.id, p.x, p.y, p.z, v.x, v.y, v.z
        );
    }

    Ok(())
}

fn check_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let scene = load_scene(&source).map_err(|e| e.render(&source))?;
    let diagnostics = analyze_scene(&scene);

    for diagnostic in diagnostics.iter() {
        println!("{}", diagnostic);
    }

    if diagnostics.has_errors() {
        return Err(format!("{} has {} error(s)", file.display(), diagnostics.errors().count()).into());
    }
    println!(
        "{}: {} particles, {} springs, ok",
        file.display(),
        scene.sim.particle_count(),
        scene.sim.spring_count()
    );
    Ok(())
}

fn view_file(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let title = format!("springweb - {}", file.display());
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(vel_app::VelApp::new(file, cc)))),
    )?;
    Ok(())
}

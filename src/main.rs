//! Ampflow - headless current-flow animation
//!
//! Loads a built-in or JSON circuit, runs the frame loop and prints the
//! indicator state for every frame.
//!
//! # Usage
//!
//! ```bash
//! ampflow --list
//! ampflow --circuit ac-circuit --frequency 60 --frames 30
//! ampflow --file my-circuit.json --json | jq .current
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use ampflow_core::animation::{FrameClock, ManualClock, SystemClock, TickLoop};
use ampflow_core::catalog::{self, CircuitTemplate};
use ampflow_core::error::{AmpflowError, Result};
use ampflow_core::{ComponentId, EngineConfig, FlowEngine, FrameOutput, SourceKind};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Current-flow animation for simple series circuits
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in circuit to load
    #[arg(short, long, default_value = "dc-circuit", conflicts_with = "file")]
    circuit: String,

    /// Circuit description file (.json)
    #[arg(short, long, value_name = "CIRCUIT_FILE")]
    file: Option<PathBuf>,

    /// Override the source kind (dc or ac)
    #[arg(long)]
    source: Option<SourceKind>,

    /// Override the source voltage in volts
    #[arg(long)]
    voltage: Option<f64>,

    /// Override the AC frequency in Hz
    #[arg(long)]
    frequency: Option<f64>,

    /// Speed multiplier (clamped to 0.1..=2.0)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Switch to flip before running (repeatable)
    #[arg(long, value_name = "COMPONENT_ID")]
    toggle: Vec<String>,

    /// Number of frames to run
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Pace frames with the wall clock instead of simulated time
    #[arg(long)]
    realtime: bool,

    /// Print one JSON object per frame
    #[arg(long)]
    json: bool,

    /// List the built-in circuits and exit
    #[arg(long)]
    list: bool,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct FrameRecord {
    frame: u64,
    time_ms: f64,
    #[serde(flatten)]
    output: FrameOutput,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut stdout = io::stdout().lock();

    if args.list {
        for template in catalog::prebuilt_circuits() {
            writeln!(stdout, "{:<12} {:<16} {}", template.id, template.name, template.description)
                .map_err(output_error)?;
        }
        return Ok(());
    }

    let template = load_template(&args)?;
    let mut engine = FlowEngine::from_template(&template, EngineConfig::default())?;
    let source = source_overrides(&args, &engine);
    engine.set_source(source)?;
    engine.set_speed_scale(args.speed);

    for id in &args.toggle {
        let on = engine.toggle_switch(&ComponentId::new(id.as_str()))?;
        tracing::info!(switch = %id, closed = on, "switch toggled");
    }

    if !args.json {
        write_summary(&mut stdout, &template, &engine).map_err(output_error)?;
    }

    let interval = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let ran = if args.realtime {
        let ticks = TickLoop::start(SystemClock::new(), &mut engine);
        run_frames(ticks, &mut engine, &args, interval, interval, || {}, &mut stdout)?
    } else {
        let clock = ManualClock::new();
        let ticks = TickLoop::start(&clock, &mut engine);
        clock.advance(interval);
        run_frames(
            ticks,
            &mut engine,
            &args,
            Duration::ZERO,
            interval,
            || clock.advance(interval),
            &mut stdout,
        )?
    };

    tracing::info!(frames = ran, "done");
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn load_template(args: &Args) -> Result<CircuitTemplate> {
    match &args.file {
        Some(path) => catalog::load_file(path),
        None => catalog::find_prebuilt(&args.circuit),
    }
}

fn source_overrides(args: &Args, engine: &FlowEngine) -> ampflow_core::SourceParams {
    let mut source = *engine.source();
    if let Some(kind) = args.source {
        source.kind = kind;
    }
    if let Some(voltage) = args.voltage {
        source.voltage = voltage;
    }
    if let Some(frequency) = args.frequency {
        source.frequency = frequency;
    }
    source
}

fn write_summary(out: &mut impl Write, template: &CircuitTemplate, engine: &FlowEngine) -> io::Result<()> {
    let source = engine.source();
    let analysis = engine.analysis();

    writeln!(out, "{} ({})", template.name, template.id)?;
    match source.kind {
        SourceKind::Dc => writeln!(out, "source:    DC {} V", source.voltage)?,
        SourceKind::Ac => writeln!(out, "source:    AC {} V @ {} Hz", source.voltage, source.effective_frequency())?,
    }
    writeln!(
        out,
        "totals:    R = {:.3} Ω, C = {:e} F, L = {:e} H",
        analysis.totals.resistance, analysis.totals.capacitance, analysis.totals.inductance
    )?;
    if analysis.open_circuit {
        writeln!(out, "current:   0 A (open switch)")?;
    } else if analysis.dc_blocked {
        writeln!(out, "current:   0 A (capacitor blocks DC)")?;
    } else if let Some(impedance) = analysis.impedance {
        writeln!(out, "current:   {:.4} A (|Z| = {:.3} Ω)", analysis.current, impedance)?;
    } else {
        writeln!(out, "current:   {:.4} A", analysis.current)?;
    }
    writeln!(out, "speed:     {:.1} px/s", engine.animation_speed())?;
    writeln!(out)?;
    writeln!(out, "{:>6} {:>10} {:>9} {:>8} {:>9} {:>9}", "frame", "time_ms", "progress", "flowing", "x", "y")
}

fn write_frame(out: &mut impl Write, record: &FrameRecord, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, record)?;
        return writeln!(out);
    }

    let (x, y) = match record.output.position {
        Some(p) => (format!("{:.2}", p.x), format!("{:.2}", p.y)),
        None => ("-".to_string(), "-".to_string()),
    };
    writeln!(
        out,
        "{:>6} {:>10.1} {:>9.4} {:>8} {:>9} {:>9}",
        record.frame, record.time_ms, record.output.progress, record.output.flowing, x, y
    )
}

fn run_frames<C: FrameClock>(
    mut ticks: TickLoop<C>,
    engine: &mut FlowEngine,
    args: &Args,
    sleep: Duration,
    frame_time: Duration,
    mut advance: impl FnMut(),
    out: &mut impl Write,
) -> Result<u64> {
    let mut failed: Option<io::Error> = None;
    let mut frame = 0u64;

    let ran = ticks.run(engine, sleep, Some(args.frames), |output| {
        frame += 1;
        let record = FrameRecord {
            frame,
            time_ms: frame_time.as_secs_f64() * frame as f64 * 1000.0,
            output: *output,
        };
        advance();
        match write_frame(out, &record, args.json) {
            Ok(()) => std::ops::ControlFlow::Continue(()),
            Err(e) => {
                failed = Some(e);
                std::ops::ControlFlow::Break(())
            }
        }
    });

    match failed {
        Some(e) => Err(output_error(e)),
        None => Ok(ran),
    }
}

fn output_error(e: io::Error) -> AmpflowError {
    AmpflowError::OutputError {
        message: e.to_string(),
    }
}

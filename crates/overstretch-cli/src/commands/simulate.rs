use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::info;

use overstretch_core::{
    CallerContext, CallerKind, Clock, EdgeEffect, EffectBehavior, GestureState, HostConfig,
    ManualClock, MonotonicClock, RecordingSurface, Transform2D,
};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Fling velocity (px/s) hitting the edge after any pulls
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    absorb: Option<f32>,
    /// Pull delta per sample, as a fraction of the effect size
    #[arg(long, default_value_t = 0.05, allow_hyphen_values = true)]
    pull: f32,
    /// Number of pull samples before the finger lifts
    #[arg(long, default_value_t = 0)]
    pulls: u32,
    /// Package the effect belongs to, for per-package overrides
    #[arg(short = 'p', long, default_value = "com.example.app")]
    package: String,
    /// Treat the caller as a Compose list
    #[arg(long)]
    compose: bool,
    /// Use the glow fallback instead of stretch
    #[arg(long)]
    glow: bool,
    /// Rotate the surface by this many quarter turns
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    quarter_turns: i32,
    /// Stop after this many frames even if still moving
    #[arg(short = 'n', long, default_value_t = 600)]
    frames: usize,
    /// Frame interval in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Emit one JSON object per frame
    #[arg(long)]
    json: bool,
    /// Pace frames on the wall clock instead of simulated time
    #[arg(long)]
    realtime: bool,
}

#[derive(Debug, Serialize)]
struct FrameRow {
    frame: usize,
    t_ms: f64,
    phase: &'static str,
    state: GestureState,
    value: f32,
    velocity: f32,
    offset: f32,
    distance: f32,
    translation: (f32, f32),
    scale: (f32, f32),
    pivot: (f32, f32),
    #[serde(skip_serializing_if = "Option::is_none")]
    glow_alpha: Option<f32>,
    more: bool,
}

/// Source of frame timestamps
enum FrameDriver {
    Simulated {
        clock: Arc<ManualClock>,
        step: Duration,
    },
    Realtime {
        clock: Arc<MonotonicClock>,
        ticker: Interval,
    },
}

impl FrameDriver {
    fn new(realtime: bool, step: Duration) -> Self {
        if realtime {
            let mut ticker = interval(step);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            FrameDriver::Realtime {
                clock: Arc::new(MonotonicClock::new()),
                ticker,
            }
        } else {
            FrameDriver::Simulated {
                clock: Arc::new(ManualClock::new(0)),
                step,
            }
        }
    }

    fn clock(&self) -> Arc<dyn Clock> {
        match self {
            FrameDriver::Simulated { clock, .. } => Arc::clone(clock) as Arc<dyn Clock>,
            FrameDriver::Realtime { clock, .. } => Arc::clone(clock) as Arc<dyn Clock>,
        }
    }

    /// Wait for the next frame and return its timestamp
    async fn next_frame(&mut self) -> i64 {
        match self {
            FrameDriver::Simulated { clock, step } => clock.advance(*step),
            FrameDriver::Realtime { clock, ticker } => {
                ticker.tick().await;
                clock.now_nanos()
            }
        }
    }
}

pub async fn run(config: &HostConfig, args: SimulateArgs) -> Result<()> {
    if args.absorb.is_none() && args.pulls == 0 {
        bail!("Nothing to simulate: pass --absorb and/or --pulls");
    }
    if args.frame_ms == 0 {
        bail!("--frame-ms must be at least 1");
    }

    let mut driver = FrameDriver::new(args.realtime, Duration::from_millis(args.frame_ms));
    let clock = driver.clock();
    let start = clock.now_nanos();
    let settings = super::open_settings(config, clock);

    let kind = if args.compose {
        CallerKind::Compose
    } else {
        CallerKind::View
    };
    let behavior = if args.glow {
        EffectBehavior::Glow
    } else {
        EffectBehavior::Stretch
    };

    let width = config.display.screen_width;
    let height = config.display.screen_height;
    let mut effect = EdgeEffect::new(CallerContext::new(&args.package, kind), settings)
        .with_behavior(behavior)
        .with_screen_size(width, height);
    effect.set_size(width, height);
    let mut surface = RecordingSurface::new(width, height)
        .with_transform(Transform2D::quarter_turns(args.quarter_turns));

    if !effect.is_enabled() {
        println!("Edge effect is disabled for {}", args.package);
        return Ok(());
    }

    info!(
        package = %args.package,
        ?behavior,
        pulls = args.pulls,
        absorb = ?args.absorb,
        "Starting simulation"
    );
    if !args.json {
        println!(
            "{:>5} {:>8} {:<8} {:<10} {:>10} {:>10} {:>10} {:>16} {:>14}",
            "frame", "t_ms", "phase", "state", "value", "velocity", "offset", "translation", "scale"
        );
    }

    let mut frame = 0;
    let mut settled_at = None;
    while frame < args.frames {
        let pulling = (frame as u32) < args.pulls;
        let phase = if pulling {
            effect.on_pull(args.pull, 0.5);
            "pull"
        } else if frame as u32 == args.pulls {
            match args.absorb {
                Some(velocity) => effect.on_absorb(velocity),
                None => effect.on_release(),
            }
            if args.absorb.is_some() {
                "absorb"
            } else {
                "release"
            }
        } else {
            "settle"
        };

        let now = driver.next_frame().await;
        let more = effect.tick(now, &mut surface);

        let row = FrameRow {
            frame,
            t_ms: (now - start) as f64 / 1_000_000.0,
            phase,
            state: effect.state(),
            value: effect.spring().value(),
            velocity: effect.spring().velocity(),
            offset: effect.offset(),
            distance: effect.distance(),
            translation: surface.translation,
            scale: surface.scale,
            pivot: surface.pivot,
            glow_alpha: surface.glow_frames.last().map(|g| g.alpha),
            more,
        };
        print_row(&row, args.json)?;
        frame += 1;

        if !more && !pulling && phase == "settle" {
            settled_at = Some(row.t_ms);
            break;
        }
    }

    match settled_at {
        Some(t_ms) => {
            info!(frames = frame, t_ms, "Effect settled");
            if !args.json {
                println!("\nSettled after {} frames ({:.0} ms)", frame, t_ms);
            }
        }
        None => {
            if !args.json {
                println!("\nStill moving after {} frames", frame);
            }
        }
    }

    Ok(())
}

fn print_row(row: &FrameRow, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(row)?);
        return Ok(());
    }
    println!(
        "{:>5} {:>8.1} {:<8} {:<10} {:>10.2} {:>10.2} {:>10.2} {:>16} {:>14}",
        row.frame,
        row.t_ms,
        row.phase,
        format!("{:?}", row.state),
        row.value,
        row.velocity,
        row.offset,
        format!("({:.1}, {:.1})", row.translation.0, row.translation.1),
        format!("({:.3}, {:.3})", row.scale.0, row.scale.1),
    );
    Ok(())
}

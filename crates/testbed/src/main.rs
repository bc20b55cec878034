//! Console testbed for the sightline detection system
//!
//! Runs a scene for a number of ticks, drifting and jittering the
//! objects, and reports every state-machine transition plus a per-tick
//! summary. Useful for eyeballing edge-vs-level event behavior without a
//! host engine.

mod scene;

use clap::Parser;
use detect::{
    run_tick, DetectionContext, DetectionTracker, ObjectRegistry, TrackingHandler,
};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use scene::Scene;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sightline-testbed", about = "Run a sightline detection scene")]
struct Args {
    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 20)]
    ticks: u64,

    /// Seed for the object jitter
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Random jitter amplitude added to object positions each tick
    #[arg(long, default_value_t = 0.05)]
    jitter: f32,

    /// Scene file (JSON); the built-in demo scene when omitted
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Print each zone's debug outline segment count before running
    #[arg(long)]
    outline: bool,
}

/// Prints every state-machine hook as it fires
#[derive(Default)]
struct ConsoleHooks;

impl TrackingHandler for ConsoleHooks {
    fn any_detection_started(&mut self, ctx: DetectionContext) {
        info!(detector = ctx.detector.0, object = ctx.object.0, "detection started");
    }
    fn any_detection_ended(&mut self, ctx: DetectionContext) {
        info!(detector = ctx.detector.0, object = ctx.object.0, "detection ended");
    }
    fn detected_started(&mut self, ctx: DetectionContext) {
        info!(detector = ctx.detector.0, object = ctx.object.0, "now detected");
    }
    fn detected_ended(&mut self, ctx: DetectionContext) {
        info!(detector = ctx.detector.0, object = ctx.object.0, "no longer detected");
    }
    fn ghost_started(&mut self, ctx: DetectionContext) {
        info!(detector = ctx.detector.0, object = ctx.object.0, "ghost sighted");
    }
    fn ghost_ended(&mut self, ctx: DetectionContext) {
        info!(detector = ctx.detector.0, object = ctx.object.0, "ghost lost");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::demo(),
    };

    let (mut registry, motions) = scene.build_registry();
    let mut detectors = scene.build_detectors()?;
    let occluders = scene.build_occluders();
    let mut tracker = DetectionTracker::new(ConsoleHooks);
    let mut rng = StdRng::seed_from_u64(args.seed);

    if args.outline {
        for detector in &detectors {
            let mut segments: Vec<(Vec3, Vec3)> = Vec::new();
            detector.zone().outline(&mut segments);
            info!(
                detector = detector.id().0,
                segments = segments.len(),
                "zone outline"
            );
        }
    }

    info!(
        detectors = detectors.len(),
        objects = registry.len(),
        occluders = scene.occluders.len(),
        ticks = args.ticks,
        "scene loaded"
    );

    for tick in 0..args.ticks {
        advance_objects(&mut registry, &motions, &mut rng, args.jitter);
        let summary = run_tick(&mut registry, &mut detectors, &occluders, &mut tracker);
        info!(
            tick,
            evaluated = summary.evaluated,
            seen = summary.seen,
            started = summary.started,
            ended = summary.ended,
            "tick complete"
        );
    }

    Ok(())
}

/// Apply each object's drift velocity plus a small random jitter.
fn advance_objects(
    registry: &mut ObjectRegistry,
    motions: &[(detect::ObjectId, Vec3)],
    rng: &mut StdRng,
    jitter: f32,
) {
    for &(id, velocity) in motions {
        if let Some(object) = registry.get_mut(id) {
            let noise = Vec3::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
                0.0,
            ) * jitter;
            object.position += velocity + noise;
        }
    }
}

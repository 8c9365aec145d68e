use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use parking_lot::Mutex;
use roverphys_comms::{Broker, Client};
use roverphys_core::vec2;
use roverphys_geom::Aabb2;
use roverphys_io::{load_scene, Registry};
use roverphys_vehicles::{Named, Renderable};
use roverphys_viz::{pose_columns, TelemetryLedger};

#[derive(Parser, Debug)]
#[command(name = "roverphys-sim", version, about = "Step a vehicle scene headless and print telemetry")]
struct Opts {
    /// Scene JSON (`{"dt": .., "vehicles": [..]}`)
    scene: PathBuf,

    /// Number of ticks to run
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Print one pose row per vehicle every N ticks (0 = only at the end)
    #[arg(long, default_value_t = 100)]
    every: u64,

    /// Emit telemetry frames as JSON lines instead of columns
    #[arg(long)]
    json: bool,

    /// Publish each vehicle's frames on `/<name>/telemetry` through an in-process broker
    #[arg(long)]
    publish: bool,

    /// Only report vehicles whose outline overlaps this box: `min_x,min_y,max_x,max_y`
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    view: Option<Vec<f64>>,

    /// List registered vehicle classes, friction models and controllers, then exit
    #[arg(long)]
    list: bool,
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opts::parse();
    let registry = Registry::with_builtins();

    if opt.list {
        let (classes, friction, controllers) = registry.names();
        println!("classes:     {}", classes.join(", "));
        println!("friction:    {}", friction.join(", "));
        println!("controllers: {}", controllers.join(", "));
        return Ok(());
    }

    let view = match opt.view.as_deref() {
        None => None,
        Some(&[x0, y0, x1, y1]) => Some(Aabb2::new(vec2(x0.min(x1), y0.min(y1)), vec2(x0.max(x1), y0.max(y1)))),
        Some(v) => bail!("--view takes 4 numbers, got {}", v.len()),
    };

    let text = fs::read_to_string(&opt.scene)
        .with_context(|| format!("reading {}", opt.scene.display()))?;
    let mut sim = load_scene(&text, &registry)
        .with_context(|| format!("loading {}", opt.scene.display()))?;
    if sim.vehicles().is_empty() { bail!("scene has no vehicles"); }
    let dt = sim.ctx().dt;

    let ledger = Arc::new(Mutex::new(TelemetryLedger::new(4096)));
    let names: Vec<String> = sim.vehicles().iter().map(|v| v.name().to_string()).collect();
    for n in &names {
        if let Some(v) = sim.vehicle_mut(n) { v.attach_telemetry(Box::new(ledger.clone())); }
    }

    let broker = Broker::new();
    let mut publisher = Client::new("roverphys-sim");
    let mut monitor = Client::new("monitor");
    let mut inbox = Vec::new();
    if opt.publish {
        publisher.connect(&broker)?;
        monitor.connect(&broker)?;
        for n in &names {
            let topic = format!("/{n}/telemetry");
            publisher.advertise(&topic)?;
            inbox.push(monitor.subscribe(&topic)?);
        }
        let nodes = monitor.request_list_of_nodes()?;
        info!("nodes: {}", nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>().join(", "));
    }

    if !opt.json { println!("vehicle\t{}", pose_columns().join("\t")); }
    for t in 0..opt.ticks {
        sim.step(dt).with_context(|| format!("tick {t}"))?;
        let last = t + 1 == opt.ticks;
        if !(last || (opt.every > 0 && t % opt.every == 0)) { continue; }
        for v in sim.vehicles() {
            if view.as_ref().is_some_and(|b| !v.visible_in(b)) { continue; }
            let frame = v.telemetry();
            if opt.json {
                println!("{}", serde_json::to_string(&serde_json::json!({ "vehicle": v.name(), "frame": frame }))?);
            } else {
                let row: Vec<String> = frame.pose_row().iter().map(|x| format!("{x:.4}")).collect();
                println!("{}\t{}", v.name(), row.join("\t"));
            }
            if opt.publish {
                publisher.publish(&format!("/{}/telemetry", v.name()), serde_json::to_vec(frame)?)?;
            }
        }
    }

    for v in sim.vehicles() {
        let segs = v.render_snapshot().read_snapshot().segments.len();
        info!("{}: odometry {:?}, {segs} force segments, digest {}", v.name(), v.odometry_estimate(), hex(&v.state_digest()));
    }
    info!("recorded {} telemetry frames", ledger.lock().len());
    if opt.publish {
        let received: usize = inbox.iter().map(|rx| rx.try_iter().count()).sum();
        info!("monitor received {received} messages");
        monitor.shutdown();
        publisher.shutdown();
    }
    Ok(())
}

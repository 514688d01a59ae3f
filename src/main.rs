use anyhow::Result;
use arcade_vehicle::Config;
use arcade_vehicle::state::SimState;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use tokio::time::{Duration, MissedTickBehavior, interval};

#[derive(Parser, Debug)]
#[command(name = "arcade-vehicle", version, about = "Run the arcade car on a flat ground plane with a scripted driver")]
struct Opts {
    /// TOML config (defaults are used for anything left out)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many physics ticks (0 = until Ctrl-C)
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Log a snapshot every N ticks
    #[arg(long, default_value_t = 30)]
    report_every: u64,

    /// Log the debug overlay (wheel circles, lateral force lines) with each snapshot
    #[arg(long)]
    gizmos: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opts::parse();
    let cfg = Config::load(opt.config.as_deref())?;

    info!("🚀 Starting arcade vehicle sim...");

    let mut sim = SimState::new(&cfg);
    info!(
        "🏁 {} Hz physics, {} Hz frame, v_max = {:.1} km/h, script {:.1} s",
        cfg.world.physics_hz,
        cfg.world.frame_hz,
        sim.vehicle.drivetrain.v_max() * 3.6,
        sim.script().duration(),
    );

    // Fixed timestep
    let mut ticker = interval(Duration::from_secs_f32(sim.step_dt()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut ctrl_c => {
                info!("🛑 Ctrl-C, stopping at tick {}", sim.tick);
                break;
            }
        }

        sim.advance();

        let report_every = opt.report_every.max(1);
        if sim.tick % report_every == 0 {
            info!("{}", serde_json::to_string(&sim.snapshot())?);
            if opt.gizmos {
                info!("gizmos {}", serde_json::to_string(&sim.overlay(true))?);
            }
        }

        if opt.ticks > 0 && sim.tick >= opt.ticks {
            info!("✅ Finished {} ticks", sim.tick);
            break;
        }
    }

    Ok(())
}

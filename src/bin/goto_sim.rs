use anyhow::{ensure, Context, Result};
use goto_core::actuation::{ChannelSink, MotionCommand};
use goto_core::common::types::{Attitude, Vec3};
use goto_core::config::Parameters;
use goto_core::telemetry::SharedVehicleState;
use goto_core::{logging, GotoBehavior, GotoGoal, LifecycleNode, PositionGotoPlugin, SpeedGotoPlugin};
use log::{info, warn, LevelFilter};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use structopt::StructOpt;
use tokio::sync::mpsc;

/// Simulation step (50 Hz)
const SIM_STEP: Duration = Duration::from_millis(20);

/// Speed used by the simulated position controller when the command has no bound
const SIM_POSITION_SPEED: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
enum PluginKind {
    Speed,
    Position,
}

impl FromStr for PluginKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "speed" => Ok(PluginKind::Speed),
            "position" => Ok(PluginKind::Position),
            other => Err(format!("unknown plugin `{}`, expected speed or position", other)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "goto_sim", about = "Fly a simulated vehicle to a target with the go-to behavior")]
struct Opt {
    /// Parameter file (TOML)
    #[structopt(long, parse(from_os_str))]
    params: PathBuf,

    /// Target position: x y z
    #[structopt(long, number_of_values = 3, allow_hyphen_values = true)]
    target: Vec<f64>,

    /// Speed limit for this goal, 0 uses goto_speed
    #[structopt(long, default_value = "0")]
    max_speed: f64,

    /// Keep the current heading instead of facing the direction of travel
    #[structopt(long)]
    ignore_yaw: bool,

    /// Plugin to run: speed or position
    #[structopt(long, default_value = "speed")]
    plugin: PluginKind,

    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Kinematic vehicle following the last received command
async fn simulate(state: Arc<SharedVehicleState>, mut commands: mpsc::UnboundedReceiver<MotionCommand>) {
    let mut position = Vec3::zeros();
    let mut yaw = 0.0;
    let mut command = MotionCommand::Hover;
    let mut ticker = tokio::time::interval(SIM_STEP);
    let dt = SIM_STEP.as_secs_f64();

    loop {
        ticker.tick().await;
        while let Ok(c) = commands.try_recv() {
            command = c;
        }

        let velocity = match command {
            MotionCommand::Speed { velocity, yaw: y } => {
                yaw = y;
                velocity
            }
            MotionCommand::Position {
                position: target,
                yaw: y,
                max_speed,
            } => {
                yaw = y;
                let error = target - position;
                let speed = if max_speed > 0.0 { max_speed } else { SIM_POSITION_SPEED };
                let step = speed * dt;
                if error.norm() <= step {
                    error / dt
                } else {
                    error.normalize() * speed
                }
            }
            MotionCommand::Hover => Vec3::zeros(),
        };

        position += velocity * dt;
        state.update(position, &Attitude::from_euler_angles(0.0, 0.0, yaw), &velocity);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::from_args();
    logging::init(opt.log_level)?;

    ensure!(opt.target.len() == 3, "--target needs exactly three values");
    let params = Parameters::load(&opt.params)
        .with_context(|| format!("loading parameters from {:?}", opt.params))?;

    let telemetry = Arc::new(SharedVehicleState::new());
    let (sink, commands) = ChannelSink::new();
    let sim = tokio::spawn(simulate(Arc::clone(&telemetry), commands));

    let mut behavior = match opt.plugin {
        PluginKind::Speed => GotoBehavior::new(SpeedGotoPlugin::new(), params, telemetry, Arc::new(sink)),
        PluginKind::Position => {
            GotoBehavior::new(PositionGotoPlugin::new(), params, telemetry, Arc::new(sink))
        }
    };
    behavior.on_configure()?;
    behavior.on_activate()?;
    info!("Running {}", behavior.plugin_name());

    let mut goal = GotoGoal::new(Vec3::new(opt.target[0], opt.target[1], opt.target[2]))
        .with_max_speed(opt.max_speed);
    if opt.ignore_yaw {
        goal = goal.ignoring_yaw();
    }

    let mut handle = behavior.accept_goal(goal).await?;
    loop {
        let interrupted = tokio::select! {
            feedback = handle.next_feedback() => match feedback {
                Some(fb) => {
                    info!(
                        "distance to goal {:.2} m, speed {:.2} m/s",
                        fb.actual_distance_to_goal, fb.actual_speed
                    );
                    false
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => true,
        };

        if interrupted {
            warn!("Interrupted, cancelling goal");
            handle.cancel();
        }
    }

    let result = handle.result().await?;
    info!("Goal finished, goto_success = {}", result.goto_success);

    behavior.on_deactivate()?;
    behavior.on_cleanup()?;
    sim.abort();
    Ok(())
}

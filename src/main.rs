use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::Sender;
use handctl::actuator::{Actuator, ActuatorWorker, LoggingActuator};
use handctl::integration::{AppConfig, ControllerCommand, GestureController};
use handctl::remote::{MotionClient, RemoteServer, ReplaySensor};
use handctl::source::replay::parse_record;
use handctl::source::{ChannelSource, LandmarkSource, Observation, ReplaySource};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "handctl", about = "Hand gesture volume/scroll control with a phone remote")]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the gesture loop (landmarks from a recording or JSON lines on stdin)
    Run {
        /// JSON-lines landmark recording; stdin when omitted
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Replay frame rate
        #[arg(long, default_value_t = 30.0)]
        fps: f32,

        /// Do not start the remote listener
        #[arg(long)]
        no_remote: bool,

        /// Remote listener address
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run only the remote listener
    Listen {
        #[arg(long)]
        bind: Option<String>,
    },

    /// Phone-side shake uplink driven by recorded accelerometer samples
    Motion {
        /// JSON-lines `{"x":..,"y":..,"z":..}` samples
        samples: PathBuf,

        /// Desktop listener address
        #[arg(long)]
        server: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handctl=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading configuration from {:?}", path))?,
        None => AppConfig::default(),
    };

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    let command = args.command.unwrap_or(Command::Run {
        replay: None,
        fps: 30.0,
        no_remote: false,
        bind: None,
    });

    match command {
        Command::Run {
            replay,
            fps,
            no_remote,
            bind,
        } => {
            let mut config = config;
            if let Some(bind) = bind {
                config = config.with_remote_bind(bind);
            }
            if no_remote {
                config = config.without_remote();
            }
            config.validate()?;
            run_gesture_loop(&runtime, config, replay, fps)?;
        }
        Command::Listen { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config = config.with_remote_bind(bind);
            }
            config.validate()?;
            let actuator: Arc<dyn Actuator> = Arc::new(LoggingActuator::new());
            runtime.block_on(async move {
                let server = RemoteServer::bind(config.remote, actuator).await?;
                tokio::select! {
                    _ = server.serve() => {}
                    _ = tokio::signal::ctrl_c() => info!("Interrupted"),
                }
                anyhow::Ok(())
            })?;
        }
        Command::Motion { samples, server } => {
            let mut motion = config.motion;
            if let Some(server) = server {
                motion.server = server;
            }
            let sensor = ReplaySensor::open(&samples)?;
            let stats = runtime.block_on(MotionClient::new(motion, sensor).run());
            info!("{:?}", stats);
        }
    }

    runtime.shutdown_background();
    Ok(())
}

fn run_gesture_loop(
    runtime: &tokio::runtime::Runtime,
    config: AppConfig,
    replay: Option<PathBuf>,
    fps: f32,
) -> Result<()> {
    info!("Starting hand gesture control");

    let (worker, queue) = ActuatorWorker::new(Arc::new(LoggingActuator::new()), 256);
    let worker_thread = worker.start()?;
    let actuator: Arc<dyn Actuator> = Arc::new(queue.clone());

    if config.remote.enabled {
        let server = runtime.block_on(RemoteServer::bind(
            config.remote.clone(),
            Arc::clone(&actuator),
        ))?;
        runtime.spawn(server.serve());
    }

    let frame_interval = Duration::from_secs_f32(1.0 / fps.max(1.0));
    let source: Box<dyn LandmarkSource> = match replay {
        Some(path) => Box::new(ReplaySource::open(path, frame_interval)?),
        None => {
            let (source, tx) = ChannelSource::new(8, Duration::from_millis(50));
            spawn_stdin_reader(tx)?;
            Box::new(source)
        }
    };

    let (controller, handle) = GestureController::new(&config, source, Arc::clone(&actuator));
    let loop_thread = controller.start()?;

    let quit = handle.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            let _ = quit.send_command(ControllerCommand::Shutdown);
        }
    });

    let outcome = loop_thread
        .join()
        .map_err(|_| anyhow::anyhow!("gesture loop panicked"))?;

    queue.shutdown();
    let _ = worker_thread.join();

    outcome?;
    Ok(())
}

/// Feed JSON-lines observations from stdin into the loop
fn spawn_stdin_reader(tx: Sender<Observation>) -> Result<()> {
    thread::Builder::new()
        .name("stdin-landmarks".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for (n, line) in stdin.lock().lines().enumerate() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_record(&line) {
                    Ok(observation) => {
                        if tx.send(observation).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("stdin line {}: {}", n + 1, e),
                }
            }
        })?;
    Ok(())
}

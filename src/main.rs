//! `klavis-run`: start the event server on a keyboard or the simulated input
//! and print every event.
//!
//! Usage:
//!     klavis-run [--mock] [--port NAME] [--quiet] [--json]

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use klavis::{DispatchPolicy, InputBackend, InputConfig, MidiServer, ServerHandle};

#[derive(Parser, Debug)]
#[command(name = "klavis-run", version, about = "Klavis MIDI event server")]
struct Args {
    #[arg(long, help = "Force use of the simulated MIDI input")]
    mock: bool,

    #[arg(
        long,
        value_name = "NAME",
        help = "Name of the MIDI port to use (partial match)"
    )]
    port: Option<String>,

    #[arg(long, help = "Suppress event printout")]
    quiet: bool,

    #[arg(long, help = "List available MIDI input ports and exit")]
    list_ports: bool,

    #[arg(
        long,
        value_name = "MS",
        default_value_t = 500,
        help = "Delay between simulated events"
    )]
    interval_ms: u64,

    #[arg(long, help = "Print events as JSON lines")]
    json: bool,

    #[arg(long, help = "Log failing callbacks and keep dispatching")]
    isolate_callbacks: bool,

    #[arg(
        short,
        long,
        help = "Debug logging, including an `Event: ...` line for every dispatched event"
    )]
    verbose: bool,
}

impl Args {
    fn input_config(&self) -> InputConfig {
        let backend = if self.mock {
            InputBackend::Simulated
        } else {
            InputBackend::Auto {
                port: self.port.clone(),
            }
        };
        InputConfig {
            backend,
            interval: Duration::from_millis(self.interval_ms),
            ..Default::default()
        }
    }

    fn dispatch_policy(&self) -> DispatchPolicy {
        if self.isolate_callbacks {
            DispatchPolicy::Isolate
        } else {
            DispatchPolicy::Propagate
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_config_error() {
                eprintln!("[Klavis] Configuration error: {e}");
            } else {
                eprintln!("[Klavis] {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> klavis::Result<()> {
    if args.list_ports {
        print_ports();
        return Ok(());
    }
    if args.mock && args.port.is_some() {
        tracing::warn!("--port is ignored with --mock");
    }

    let server = MidiServer::builder()
        .open_input(&args.input_config())?
        .dispatch_policy(args.dispatch_policy())
        .build()?;

    if !args.quiet {
        if args.json {
            server.register_fallible_callback(|event| {
                println!("{}", serde_json::to_string(event)?);
                Ok(())
            });
        } else {
            server.register_callback(|event| println!("[MIDI] {event}"));
        }
    }

    install_signal_handlers(&server.handle())?;
    server.start()?;
    Ok(())
}

#[cfg(feature = "midi-io")]
fn print_ports() {
    let ports = klavis::list_input_ports();
    if ports.is_empty() {
        println!("No MIDI input ports found");
        return;
    }
    println!("Available MIDI input ports:");
    for port in ports {
        println!("  [{}] {}", port.index, port.name);
    }
}

#[cfg(not(feature = "midi-io"))]
fn print_ports() {
    println!("Built without hardware MIDI support (feature `midi-io`)");
}

/// SIGINT and SIGTERM set the server's interrupt flag; the loop stops after
/// its current read and `start()` returns `Ok`.
#[cfg(unix)]
fn install_signal_handlers(handle: &ServerHandle) -> std::io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    let flag = handle.interrupt_flag();
    signal_hook::flag::register(SIGINT, std::sync::Arc::clone(&flag))?;
    signal_hook::flag::register(SIGTERM, flag)?;
    Ok(())
}

#[cfg(not(unix))]
fn install_signal_handlers(_handle: &ServerHandle) -> std::io::Result<()> {
    Ok(())
}

use clap::{Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::time::Duration;
use wheel::protocol::{Command, SOCKET_PATH};
use wheel::{Item, Wheel, WheelConfig};

const FRAME: Duration = Duration::from_millis(16);
/// Give up on a spring that has not settled after this many frames.
const MAX_FRAMES: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "wheel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control socket of the wheel daemon
    #[arg(short = 's', long, default_value = SOCKET_PATH, global = true)]
    socket: String,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Start a drag, stopping a wheel that is still settling
    Begin,
    /// Move the finger; DX is the distance from where the drag began
    Drag {
        #[arg(allow_negative_numbers = true)]
        dx: f64,
    },
    /// Release the finger at DX
    End {
        #[arg(allow_negative_numbers = true)]
        dx: f64,
    },
    /// Run one drag on a local wheel and print the selected index
    Simulate {
        /// Number of items on the wheel
        #[arg(short = 'n', long, default_value_t = 6)]
        count: usize,

        #[arg(short = 'd', long, default_value_t = 1.0)]
        drag_speed: f64,

        /// Drag positions; the last one is where the finger lifts
        #[arg(required = true, allow_negative_numbers = true)]
        deltas: Vec<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Begin => send_command(&cli.socket, Command::Begin),
        Commands::Drag { dx } => send_command(&cli.socket, Command::Drag(dx)),
        Commands::End { dx } => send_command(&cli.socket, Command::End(dx)),
        Commands::Simulate {
            count,
            drag_speed,
            deltas,
        } => simulate(count, drag_speed, &deltas),
    }
}

fn send_command(socket: &str, command: Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to wheel daemon at {}: {}. Is wheeld running?",
            socket,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}

fn simulate(count: usize, drag_speed: f64, deltas: &[f64]) -> anyhow::Result<()> {
    let config = WheelConfig {
        items: (0..count)
            .map(|i| Item::new(format!("item-{}", i), None))
            .collect(),
        drag_speed,
        ..Default::default()
    };
    let mut wheel = Wheel::mount(config, |_| {})?;

    let Some((release, path)) = deltas.split_last() else {
        anyhow::bail!("Simulate needs at least one delta");
    };
    for &dx in path {
        wheel.on_drag(dx);
    }
    let target = wheel.on_drag_end(*release);
    log::debug!("Released toward {:.2}", target.angle);

    let selected = (0..MAX_FRAMES).find_map(|_| wheel.tick(FRAME));
    match selected {
        Some(index) => {
            println!("{}", index);
            Ok(())
        }
        None => anyhow::bail!("Wheel did not settle after {} frames", MAX_FRAMES),
    }
}

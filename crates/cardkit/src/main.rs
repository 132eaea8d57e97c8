use cardkit::control::{self, ControlCommand};
use cardkit::metrics::compute_metrics;
use cardkit::prize::PrizePool;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cardkit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the card layout for a viewport width
    Metrics {
        /// Viewport width in pixels ("nan" and "inf" are accepted)
        #[arg(allow_hyphen_values = true)]
        width: f64,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Draw one batch of cards from the given prizes
    Draw {
        prizes: Vec<String>,

        /// Seed for a reproducible draw
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Show the lucky draw window
    Show,
    /// Hide the lucky draw window
    Hide,
    /// Spread the stacked cards
    Spread,
    /// Flip the revealed card back and deal a new batch
    Reset,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Metrics { width, json } => print_metrics(width, json),
        Commands::Draw { prizes, seed } => {
            let mut pool = match seed {
                Some(seed) => PrizePool::seeded(&prizes, seed),
                None => PrizePool::new(&prizes),
            };
            for (id, prize) in pool.draw().iter().enumerate() {
                println!("{id}\t{prize}");
            }
            Ok(())
        }
        Commands::Show => send(ControlCommand::Show),
        Commands::Hide => send(ControlCommand::Hide),
        Commands::Spread => send(ControlCommand::Spread),
        Commands::Reset => send(ControlCommand::Reset),
    }
}

fn print_metrics(width: f64, json: bool) -> anyhow::Result<()> {
    let metrics = compute_metrics(width);

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("breakpoint          {:?}", metrics.breakpoint);
    println!("card                {} x {}", metrics.card_width, metrics.card_height);
    println!("gap                 {}", metrics.gap);
    println!("container max width {}", metrics.container_max_width);
    println!("container height    {}", metrics.container_height);
    println!("wrapper max width   {}", metrics.wrapper_max_width);
    for (i, pose) in metrics.stacked_poses.iter().enumerate() {
        println!(
            "stack[{i}]            translate({:.2}, {:.2}) rotate({}deg) scale({})",
            pose.translate_x, pose.translate_y, pose.rotate_deg, pose.scale
        );
    }
    Ok(())
}

fn send(command: ControlCommand) -> anyhow::Result<()> {
    log::debug!("Sending '{}' to {}", command, control::SOCKET_PATH);
    control::send(command)?;
    Ok(())
}

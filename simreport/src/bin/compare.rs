use simreport::*;
use simcore::*;

/// Runs FCFS, SJF and RR over the same batch and
/// prints their metrics side by side.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    input:      InputArgs,

    /// Round-robin time quantum
    #[arg(short, long, default_value_t = DEFAULT_QUANTUM)]
    quantum:    Ticks,

    /// Round-robin flavor
    #[arg(long, value_enum, default_value_t = RoundRobinFlavor::Gated)]
    flavor:     RoundRobinFlavor,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Args::parse();
    let processes = cli.input.load()?;

    print!("{}", render_comparison(&compare(&processes, cli.quantum, cli.flavor)));

    Ok(())
}

use simreport::*;
use simcore::*;
use log::info;

/// Simulates CPU scheduling and contiguous memory
/// allocation for a fixed batch of processes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scheduling policy
    #[arg(value_enum)]
    policy:     Policy,

    /// Memory fitting
    #[arg(value_enum)]
    fit:        Fit,

    #[command(flatten)]
    input:      InputArgs,

    /// Round-robin time quantum
    #[arg(short, long, value_parser = clap::value_parser!(Ticks))]
    quantum:    Option<Ticks>,

    /// Round-robin flavor
    #[arg(long, value_enum)]
    flavor:     Option<RoundRobinFlavor>,

    /// Free memory blocks, comma-separated
    #[arg(short, long)]
    blocks:     Option<String>,

    /// JSON configuration file
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    config:     Option<PathBuf>,

    /// Write a JSON summary to this path
    #[arg(long, value_parser = clap::value_parser!(PathBuf))]
    json:       Option<PathBuf>,

    /// Draw a Gantt chart to this PNG
    #[arg(long, value_parser = clap::value_parser!(PathBuf))]
    gantt:      Option<PathBuf>,

    /// Draw the metrics bar chart to this PNG
    #[arg(long, value_parser = clap::value_parser!(PathBuf))]
    chart:      Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Args::parse();
    let config = match &cli.config {
        Some(path)  => { SimConfig::from_path(path)? },
        None        => { SimConfig::default() }
    };

    let spec = RunSpec {
        policy:     cli.policy,
        quantum:    cli.quantum.unwrap_or(config.quantum()),
        flavor:     match cli.flavor {
            Some(f) => { f },
            None    => { config.flavor()? }
        },
        fit:        cli.fit,
        blocks:     match &cli.blocks {
            Some(b) => { parse_list(b)? },
            None    => { config.blocks() }
        },
    };
    let processes = cli.input.load()?;
    info!("{} processes, {} free blocks", processes.len(), spec.blocks.len());

    println!("Running simulation...");
    let outcome = run(processes, &spec)?;

    println!("\nSimulation Results:");
    println!("-------------------");
    print!("{}", render_metrics(&outcome.metrics));
    print!("{}", render_memory(&outcome));

    println!("\nProcess Information:");
    print!("{}", render_table(&outcome.processes));

    if let Some(path) = &cli.json {
        std::fs::write(path, outcome.to_json()?)?;
        info!("summary written to {}", path.display());
    }
    if let Some(path) = &cli.gantt {
        plot::gantt(&outcome, path)
            .map_err(|e| anyhow::anyhow!("drawing {}: {e}", path.display()))?;
    }
    if let Some(path) = &cli.chart {
        plot::metrics(&outcome.metrics, path)
            .map_err(|e| anyhow::anyhow!("drawing {}: {e}", path.display()))?;
    }

    Ok(())
}

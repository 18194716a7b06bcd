pub use std::path::Path;
use simcore::*;
use simcore::workload::{self, BernoulliParams};
use serde::{Deserialize, Serialize};
use rayon::prelude::*;
use itertools::Itertools;
use log::info;

/// Everything one run needs besides the processes themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSpec {
    pub policy:     Policy,
    pub quantum:    Ticks,
    pub flavor:     RoundRobinFlavor,
    pub fit:        Fit,
    pub blocks:     Vec<Units>,
}

impl RunSpec {
    pub fn new(policy: Policy, fit: Fit) -> Self {
        Self {
            policy,
            quantum:    DEFAULT_QUANTUM,
            flavor:     RoundRobinFlavor::default(),
            fit,
            blocks:     default_blocks(),
        }
    }
}

/// A finished run: the scheduled descriptors (in the scheduler's final
/// order), the CPU timeline, the memory outcome and the metrics.
pub struct Outcome {
    pub spec:               RunSpec,
    pub processes:          Vec<Process>,
    pub timeline:           Vec<Slice>,
    pub dispatches:         IndexMap<Pid, usize>,
    pub metrics:            Metrics,
    pub allocations:        Vec<Allocation>,
    // Free block sizes once every request has been served.
    pub blocks:             Vec<Units>,
    pub memory_utilization: f64,
}

/// Schedules the batch, then serves its memory requests one process at
/// a time, in the order the scheduler left the descriptors in.
pub fn run(processes: Vec<Process>, spec: &RunSpec) -> Result<Outcome, SimError> {
    let mut scheduler = Scheduler::new(processes)
        .with_flavor(spec.flavor);
    scheduler.simulate(spec.policy, spec.quantum)?;
    let metrics = scheduler.calculate_metrics()?;

    let mut memory = MemoryAllocator::new(spec.blocks.clone());
    let allocations = memory.allocate_all(spec.fit, scheduler.processes());
    let memory_utilization = memory.utilization();
    info!(
        "{} served {}/{} requests, {:.2}% of memory in use",
        spec.fit,
        allocations.iter().filter(|a| a.block.is_some()).count(),
        allocations.len(),
        memory_utilization
    );

    Ok(Outcome {
        spec:           spec.clone(),
        timeline:       scheduler.timeline().to_vec(),
        dispatches:     scheduler.dispatches(),
        processes:      scheduler.into_processes(),
        metrics,
        allocations,
        blocks:         memory.into_blocks(),
        memory_utilization,
    })
}

/// Runs all three policies on fresh copies of the batch, side by side.
pub fn compare(
    processes:  &[Process],
    quantum:    Ticks,
    flavor:     RoundRobinFlavor,
) -> Vec<(Policy, Result<Metrics, SimError>)> {
    Policy::ALL
        .as_slice()
        .par_iter()
        .map(|&policy| {
            let mut scheduler = Scheduler::new(processes.to_vec())
                .with_flavor(flavor);
            let res = scheduler.simulate(policy, quantum)
                .and_then(|_| scheduler.calculate_metrics());
            (policy, res)
        })
        .collect()
}

//---START TEXT OUTPUT
const HEADERS: [&str; 7] = [
    "Process ID",
    "Arrival Time",
    "Burst Time",
    "Start Time",
    "Completion Time",
    "Waiting Time",
    "Turnaround Time",
];

/// One line per process, columns right-aligned under their headers.
pub fn render_table(processes: &[Process]) -> String {
    let mut res = HEADERS.iter()
        .map(|h| format!("{:>w$}", h, w = h.len() + 2))
        .join("");
    res.push('\n');
    for p in processes {
        let cells: [TickDelta; 7] = [
            p.pid as TickDelta,
            p.arrival_time as TickDelta,
            p.burst_time as TickDelta,
            p.start_time as TickDelta,
            p.completion_time as TickDelta,
            p.waiting_time(),
            p.turnaround_time(),
        ];
        res.push_str(&cells.iter()
            .zip(HEADERS)
            .map(|(v, h)| format!("{:>w$}", v, w = h.len() + 2))
            .join(""));
        res.push('\n');
    }

    res
}

pub fn render_metrics(m: &Metrics) -> String {
    format!(
        "Average Waiting Time: {:.2}\nAverage Turnaround Time: {:.2}\nCPU Utilization: {:.2}\n",
        m.avg_waiting_time, m.avg_turnaround_time, m.cpu_utilization
    )
}

/// Failed allocations, then the overall memory figures.
pub fn render_memory(o: &Outcome) -> String {
    let mut res = String::new();
    for a in o.allocations.iter().filter(|a| a.block.is_none()) {
        res.push_str(&format!(
            "Memory allocation failed for Process {} using {}.\n",
            a.pid, o.spec.fit
        ));
    }
    res.push_str(&format!(
        "Memory Utilization: {:.2}%\nFree blocks: [{}]\n",
        o.memory_utilization,
        o.blocks.iter().join(", ")
    ));

    res
}

pub fn render_comparison(results: &[(Policy, Result<Metrics, SimError>)]) -> String {
    let mut res = format!("{:<6}{:>14}{:>18}{:>18}\n", "Policy", "Avg Waiting", "Avg Turnaround", "CPU Utilization");
    for (policy, r) in results {
        match r {
            Ok(m)   => {
                res.push_str(&format!(
                    "{:<6}{:>14.2}{:>18.2}{:>18.2}\n",
                    policy.to_string(), m.avg_waiting_time, m.avg_turnaround_time, m.cpu_utilization
                ));
            },
            Err(e)  => {
                res.push_str(&format!("{:<6}  {}\n", policy.to_string(), e));
            }
        }
    }

    res
}
//---END TEXT OUTPUT

//---START JSON
#[derive(Serialize, Debug)]
pub struct Row {
    pub pid:                Pid,
    pub arrival_time:       Ticks,
    pub burst_time:         Ticks,
    pub memory_req:         Units,
    pub start_time:         Ticks,
    pub completion_time:    Ticks,
    pub waiting_time:       TickDelta,
    pub turnaround_time:    TickDelta,
}

impl From<&Process> for Row {
    fn from(p: &Process) -> Self {
        Self {
            pid:                p.pid,
            arrival_time:       p.arrival_time,
            burst_time:         p.burst_time,
            memory_req:         p.memory_req,
            start_time:         p.start_time,
            completion_time:    p.completion_time,
            waiting_time:       p.waiting_time(),
            turnaround_time:    p.turnaround_time(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct AllocationRow {
    pub pid:    Pid,
    pub req:    Units,
    pub block:  Option<usize>,
}

#[derive(Serialize, Debug)]
pub struct MetricsRow {
    pub avg_waiting_time:       f64,
    pub avg_turnaround_time:    f64,
    pub cpu_utilization:        f64,
}

/// Serializable view of an [Outcome].
#[derive(Serialize, Debug)]
pub struct Summary<'o> {
    pub policy:             String,
    pub fit:                String,
    // Only meaningful to round robin.
    pub quantum:            Option<Ticks>,
    pub processes:          Vec<Row>,
    pub metrics:            MetricsRow,
    pub dispatches:         &'o IndexMap<Pid, usize>,
    pub allocations:        Vec<AllocationRow>,
    pub blocks:             &'o [Units],
    pub memory_utilization: f64,
}

impl Outcome {
    pub fn summary(&self) -> Summary<'_> {
        Summary {
            policy:     self.spec.policy.to_string(),
            fit:        self.spec.fit.to_string(),
            quantum:    match self.spec.policy {
                Policy::Rr  => { Some(self.spec.quantum) },
                _           => { None }
            },
            processes:  self.processes.iter().map(Row::from).collect(),
            metrics:    MetricsRow {
                avg_waiting_time:       self.metrics.avg_waiting_time,
                avg_turnaround_time:    self.metrics.avg_turnaround_time,
                cpu_utilization:        self.metrics.cpu_utilization,
            },
            dispatches: &self.dispatches,
            allocations: self.allocations
                .iter()
                .map(|a| AllocationRow { pid: a.pid, req: a.req, block: a.block })
                .collect(),
            blocks:     &self.blocks,
            memory_utilization: self.memory_utilization,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}
//---END JSON

//---START CONFIGURATION
/// Optional JSON configuration. Every field may be left out; command
/// line flags take precedence over whatever is set here.
#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub memory_blocks:  Option<Vec<Units>>,
    pub quantum:        Option<Ticks>,
    pub flavor:         Option<String>,
}

impl SimConfig {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn blocks(&self) -> Vec<Units> {
        self.memory_blocks
            .clone()
            .unwrap_or_else(default_blocks)
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum.unwrap_or(DEFAULT_QUANTUM)
    }

    pub fn flavor(&self) -> Result<RoundRobinFlavor, SimError> {
        match &self.flavor {
            Some(name)  => { name.parse() },
            None        => { Ok(RoundRobinFlavor::default()) }
        }
    }
}

/// Where the batch of processes comes from. Shared by the binaries.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// CSV file: a header line, then `arrival,burst,memory` rows
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    #[arg(conflicts_with_all = ["arrivals", "random"])]
    pub input:      Option<PathBuf>,

    /// Comma-separated arrival times
    #[arg(long, requires_all = ["bursts", "memory"], conflicts_with = "random")]
    pub arrivals:   Option<String>,

    /// Comma-separated burst times
    #[arg(long, requires = "arrivals")]
    pub bursts:     Option<String>,

    /// Comma-separated memory requirements
    #[arg(long, requires = "arrivals")]
    pub memory:     Option<String>,

    /// Number of processes the lists must hold
    #[arg(short = 'n', long, requires = "arrivals")]
    pub count:      Option<usize>,

    /// Generate a random batch from this seed
    #[arg(long)]
    pub random:     Option<u64>,
}

impl InputArgs {
    /// Reads the batch and runs it past the workload gatekeeper.
    pub fn load(&self) -> anyhow::Result<Vec<Process>> {
        let processes = if let Some(path) = &self.input {
            CsvParser::new(path.clone()).read_processes()?
        } else if let Some(arrivals) = &self.arrivals {
            let mut parser = ListParser::new(
                arrivals,
                self.bursts.as_deref().unwrap_or_default(),
                self.memory.as_deref().unwrap_or_default(),
            );
            if let Some(n) = self.count {
                parser = parser.with_count(n);
            }
            parser.read_processes()?
        } else if let Some(seed) = self.random {
            workload::bernoulli(&BernoulliParams::default(), seed)
        } else {
            anyhow::bail!("no processes given: use --input, --arrivals/--bursts/--memory or --random");
        };

        Ok(workload::init(processes)?)
    }
}
//---END CONFIGURATION

pub mod plot {
    use plotters::prelude::*;
    use plotters::coord::ranged1d::SegmentValue;
    use itertools::Itertools;
    use simcore::*;
    use super::{Outcome, Path};

    /// One row per process, one bar per CPU slice.
    pub fn gantt(o: &Outcome, f: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let rows: Vec<Pid> = o.processes
            .iter()
            .map(|p| p.pid)
            .sorted()
            .collect();
        let makespan = o.timeline
            .iter()
            .map(|s| s.end)
            .max()
            .unwrap_or(0);

        let backend = BitMapBackend::new(f, (1280, 160 + 40 * rows.len() as u32)).into_drawing_area();
        backend.fill(&WHITE)?;
        let backend = backend.margin(10u32, 10u32, 10u32, 10u32);

        let mut chart = ChartBuilder::on(&backend)
                            .caption("Gantt Chart of Process Scheduling", ("sans-serif", 24))
                            .x_label_area_size(40u32)
                            .y_label_area_size(60u32)
                            .build_cartesian_2d(0..makespan + 1, 0..rows.len())?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("Process ID")
            .y_labels(rows.len() + 1)
            .y_label_formatter(&|y| rows.get(*y).map(|pid| format!("P{pid}")).unwrap_or_default())
            .draw()?;

        chart.draw_series(create_series(&rows, &o.timeline))?;
        backend.present()?;

        Ok(())
    }

    fn create_series(rows: &[Pid], timeline: &[Slice]) -> Vec<Rectangle<(Ticks, usize)>> {
        let mut slices_result: Vec<Rectangle<(Ticks, usize)>> = Vec::new();

        for s in timeline {
            let row = rows.iter()
                .position(|&p| p == s.pid)
                .unwrap_or_default();
            slices_result.push(Rectangle::new([
                (s.start, row),
                (s.end, row + 1)],
                ShapeStyle {
                    color: BLUE.into(),
                    filled: true,
                    stroke_width: 1,
                }
            ));
        }

        slices_result
    }

    /// Bar chart of the three run-wide figures.
    pub fn metrics(m: &Metrics, f: &Path) -> Result<(), Box<dyn std::error::Error>> {
        const LABELS: [&str; 3] = ["Average Waiting Time", "Average Turnaround Time", "CPU Utilization"];
        let values = [m.avg_waiting_time, m.avg_turnaround_time, m.cpu_utilization];
        let (low, high) = y_range(&values);

        let backend = BitMapBackend::new(f, (1280, 720)).into_drawing_area();
        backend.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&backend)
                            .caption("Performance Metrics", ("sans-serif", 24))
                            .margin(10)
                            .x_label_area_size(40u32)
                            .y_label_area_size(60u32)
                            .build_cartesian_2d((0u32..3u32).into_segmented(), low..high)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|v| match v {
                SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                    LABELS.get(*i as usize).map(|l| l.to_string()).unwrap_or_default()
                },
                SegmentValue::Last  => { String::new() }
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.filled())
                .margin(40)
                .data(values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
        )?;
        backend.present()?;

        Ok(())
    }

    /// Vertical extent of the metrics chart. It always contains 0, and
    /// reaches below it when legacy round robin left a negative average.
    pub fn y_range(values: &[f64]) -> (f64, f64) {
        let low = values.iter().cloned().fold(0.0, f64::min);
        let high = values.iter().cloned().fold(1.0, f64::max);

        (low * 1.1, high * 1.1)
    }
}

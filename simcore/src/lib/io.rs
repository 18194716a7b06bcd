use crate::utils::*;
use itertools::izip;

/// Defines the interface for reading a batch of processes.
///
/// For example: [CsvParser] reads one process per line of a file, while
/// [ListParser] zips together three comma-separated lists the way a user
/// would type them at a prompt.
///
/// The user can implement their own types as needed.
pub trait ProcessGen<T> {
    /// Either the whole batch is returned, with pids assigned
    /// from 1 in input order, or the first problem met.
    fn read_processes(&self) -> Result<Vec<Process>, SimError>;
    /// Uses some available data to spawn one [Process]. We do not put
    /// any limitations on what that data may look like.
    fn gen_single(&self, d: T, pid: Pid) -> Process;
}

/// Splits a comma-separated list of non-negative integers,
/// e.g. `"0, 2,4"`.
pub fn parse_list(s: &str) -> Result<Vec<u64>, SimError> {
    s.split(',')
        .map(parse_number)
        .collect()
}

fn parse_number(s: &str) -> Result<u64, SimError> {
    let s = s.trim();
    s.parse::<u64>()
        .map_err(|_| SimError::BadNumber(s.to_string()))
}

//---START EXTERNAL INTERFACES

/// A CSV file with a header line followed by `arrival,burst,memory` rows.
/// Blank lines are skipped.
pub struct CsvParser {
    pub path: PathBuf,
}

impl CsvParser {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
        }
    }
}

impl<'a> ProcessGen<&'a [u64; 3]> for CsvParser {
    fn read_processes(&self) -> Result<Vec<Process>, SimError> {
        let mut res = vec![];
        let mut data_buf: [u64; 3] = [0; 3];
        let mut next_pid: Pid = 1;

        let fd = std::fs::File::open(&self.path)?;
        let reader = BufReader::new(fd);
        for line in reader.lines()
            // First line is the header!
            .skip(1) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = line.split(',').collect_vec();
            if fields.len() != data_buf.len() {
                return Err(SimError::LengthMismatch {
                    field:      "CSV row",
                    expected:   data_buf.len(),
                    found:      fields.len(),
                });
            }
            for (idx, data) in fields.into_iter().enumerate() {
                data_buf[idx] = parse_number(data)?;
            }
            res.push(self.gen_single(&data_buf, next_pid));
            next_pid += 1;
        }

        Ok(res)
    }

    fn gen_single(&self, d: &'a [u64; 3], pid: Pid) -> Process {
        Process::new(pid, d[0], d[1], d[2])
    }
}

/// Three comma-separated lists: arrival times, burst times and memory
/// requirements. If [`count`](ListParser::count) is given, every list must
/// hold exactly that many values; otherwise they must merely agree.
pub struct ListParser {
    pub arrivals:   String,
    pub bursts:     String,
    pub memory:     String,
    pub count:      Option<usize>,
}

impl ListParser {
    pub fn new(arrivals: &str, bursts: &str, memory: &str) -> Self {
        Self {
            arrivals:   arrivals.to_string(),
            bursts:     bursts.to_string(),
            memory:     memory.to_string(),
            count:      None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ProcessGen<(Ticks, Ticks, Units)> for ListParser {
    fn read_processes(&self) -> Result<Vec<Process>, SimError> {
        let arrivals = parse_list(&self.arrivals)?;
        let bursts = parse_list(&self.bursts)?;
        let memory = parse_list(&self.memory)?;

        let expected = self.count.unwrap_or(arrivals.len());
        for (field, found) in [
            ("arrival times", arrivals.len()),
            ("burst times", bursts.len()),
            ("memory requirements", memory.len()),
        ] {
            if found != expected {
                return Err(SimError::LengthMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }

        Ok(izip!(arrivals, bursts, memory)
            .enumerate()
            .map(|(idx, d)| self.gen_single(d, idx as Pid + 1))
            .collect())
    }

    fn gen_single(&self, d: (Ticks, Ticks, Units), pid: Pid) -> Process {
        Process::new(pid, d.0, d.1, d.2)
    }
}

//---END EXTERNAL INTERFACES

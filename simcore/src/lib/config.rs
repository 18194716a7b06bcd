use crate::{Ticks, TickDelta, Units};

/// Free blocks every run starts from, unless told otherwise.
/// Each run works on its own copy.
pub const DEFAULT_MEMORY_BLOCKS: [Units; 5] = [100, 500, 200, 300, 600];

/// Round-robin time quantum used when none is given.
pub const DEFAULT_QUANTUM: Ticks = 5;

/// Latest instant the simulated clock may reach. Waiting and turnaround
/// times are signed, so the clock must fit a [`TickDelta`].
pub const MAX_CLOCK: Ticks = TickDelta::MAX as Ticks;

pub fn default_blocks() -> Vec<Units> {
    DEFAULT_MEMORY_BLOCKS.to_vec()
}

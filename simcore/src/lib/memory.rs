use crate::utils::*;
use log::{debug, warn};

/// Outcome of one process' memory request. `block` is `None` if
/// the request could not be satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub pid:    Pid,
    pub req:    Units,
    pub block:  Option<usize>,
}

/// A fixed list of free blocks, carved into by successive requests.
///
/// A satisfied request shrinks exactly one block by the requested amount.
/// Blocks are never split into new entries, merged, freed or compacted:
/// whatever is handed out stays gone for the rest of the run.
pub struct MemoryAllocator {
    blocks:     Vec<Units>,
    // Sum of the sizes we started from.
    capacity:   Units,
}

impl MemoryAllocator {
    pub fn new(blocks: Vec<Units>) -> Self {
        let capacity: Units = blocks.iter().sum();
        Self {
            blocks,
            capacity,
        }
    }

    pub fn first_fit(&mut self, memory_req: Units) -> bool {
        self.allocate(Fit::First, memory_req).is_ok()
    }

    pub fn best_fit(&mut self, memory_req: Units) -> bool {
        self.allocate(Fit::Best, memory_req).is_ok()
    }

    /// Carves `memory_req` units out of the block chosen by `fit` and
    /// returns its index. On failure the block list is left untouched.
    pub fn allocate(&mut self, fit: Fit, memory_req: Units) -> Result<usize, AllocError> {
        if memory_req == 0 {
            return Err(AllocError::ZeroRequest);
        }
        let chosen = match fit {
            Fit::First  => { self.find_first(memory_req) },
            Fit::Best   => { self.find_best(memory_req) },
        };
        match chosen {
            Some(idx)   => {
                self.blocks[idx] -= memory_req;
                debug!("{}: {} units from block {}, {} left", fit, memory_req, idx, self.blocks[idx]);
                Ok(idx)
            },
            None        => { Err(AllocError::NoFit(memory_req)) }
        }
    }

    /// Serves every process' request in the given order, one call each.
    /// Failures are reported back (and logged), never fatal.
    pub fn allocate_all(&mut self, fit: Fit, processes: &[Process]) -> Vec<Allocation> {
        processes.iter()
            .map(|p| {
                let block = match self.allocate(fit, p.memory_req) {
                    Ok(idx) => { Some(idx) },
                    Err(e)  => {
                        warn!("Memory allocation failed for Process {} using {}: {}", p.pid, fit, e);
                        None
                    }
                };
                Allocation {
                    pid:    p.pid,
                    req:    p.memory_req,
                    block,
                }
            })
            .collect()
    }

    fn find_first(&self, memory_req: Units) -> Option<usize> {
        self.blocks
            .iter()
            .position(|&b| b >= memory_req)
    }

    fn find_best(&self, memory_req: Units) -> Option<usize> {
        let mut smallest_gap = Units::MAX;
        let mut best_block: Option<usize> = None;
        for (idx, &b) in self.blocks.iter().enumerate() {
            // Strict comparison: on equal leftovers the lowest index stays.
            if b >= memory_req && b - memory_req < smallest_gap {
                smallest_gap = b - memory_req;
                best_block = Some(idx);
            }
        }

        best_block
    }

    pub fn blocks(&self) -> &[Units] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Units> {
        self.blocks
    }

    pub fn capacity(&self) -> Units {
        self.capacity
    }

    pub fn free(&self) -> Units {
        self.blocks.iter().sum()
    }

    pub fn allocated(&self) -> Units {
        self.capacity - self.free()
    }

    /// Share of the initial capacity handed out so far, in percent.
    /// An allocator built from no memory at all reports 0.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.allocated() as f64 / self.capacity as f64 * 100.0
        }
    }
}

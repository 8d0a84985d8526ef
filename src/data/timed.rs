// Time series cursor
//
// Sequential access to the per-step snapshots of one simulation, plus the
// cross-step statistics (refugee deltas, global value populations) that the
// threshold and scaling code needs.

use super::{DataError, Snapshot};

/// Ordered snapshots with a cursor in `[0, end_step]`
#[derive(Debug, Clone)]
pub struct TimedData {
    snapshots: Vec<Snapshot>,
    current_step: usize,
    /// Every location magnitude across all steps, ascending, duplicates kept
    location_values: Vec<u64>,
    /// Every link magnitude across all steps, ascending, duplicates kept
    link_values: Vec<u64>,
    /// Largest absolute step-to-step change at any location
    max_diff: u64,
}

impl TimedData {
    /// Build the cursor over `snapshots`
    ///
    /// Rejects an empty series and series whose steps disagree on the number
    /// of locations (deltas are computed by position). Aggregates are
    /// prepared before the value is returned.
    pub fn new(snapshots: Vec<Snapshot>) -> Result<Self, DataError> {
        let Some(first) = snapshots.first() else {
            return Err(DataError::EmptyDataset);
        };

        let expected = first.locations.len();
        if let Some((step, snapshot)) = snapshots
            .iter()
            .enumerate()
            .find(|(_, s)| s.locations.len() != expected)
        {
            return Err(DataError::LocationCountMismatch {
                step,
                expected,
                found: snapshot.locations.len(),
            });
        }

        let mut data = Self {
            snapshots,
            current_step: 0,
            location_values: Vec::new(),
            link_values: Vec::new(),
            max_diff: 0,
        };
        data.prepare_aggregates();
        Ok(data)
    }

    /// Single pass over every step computing `difference` for each location,
    /// `max_diff`, and the sorted location/link value populations.
    ///
    /// Step 0 has no predecessor, so its differences are always 0.
    pub fn prepare_aggregates(&mut self) {
        let mut location_values = Vec::new();
        let mut link_values = Vec::new();
        let mut max_diff = 0u64;

        for i in 0..self.snapshots.len() {
            let (before, rest) = self.snapshots.split_at_mut(i);
            let current = &mut rest[0];
            let previous = before.last();

            for (j, location) in current.locations.iter_mut().enumerate() {
                location_values.push(location.refugees);

                location.difference = match previous {
                    Some(prev) => location.refugees as i64 - prev.locations[j].refugees as i64,
                    None => 0,
                };
                max_diff = max_diff.max(location.difference.unsigned_abs());
            }

            link_values.extend(current.links.iter().map(|link| link.refugees));
        }

        location_values.sort_unstable();
        link_values.sort_unstable();

        self.location_values = location_values;
        self.link_values = link_values;
        self.max_diff = max_diff;
    }

    /// Number of steps (always at least 1)
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Index of the last valid step
    pub fn end_step(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.current_step]
    }

    /// Snapshot before the current one; at step 0 this is the current one
    pub fn previous_snapshot(&self) -> &Snapshot {
        &self.snapshots[self.current_step.saturating_sub(1)]
    }

    pub fn last_step(&self) -> &Snapshot {
        &self.snapshots[self.end_step()]
    }

    pub fn at_end(&self) -> bool {
        self.current_step == self.end_step()
    }

    /// Advance one step. Returns `false` (and does nothing) at the end.
    pub fn next(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.current_step += 1;
        true
    }

    /// Go back one step. Returns `false` (and does nothing) at step 0.
    pub fn previous(&mut self) -> bool {
        if self.current_step == 0 {
            return false;
        }
        self.current_step -= 1;
        true
    }

    /// Jump to step `t`. Targets outside `[0, end_step]` are ignored.
    pub fn goto_step(&mut self, t: usize) -> bool {
        if t > self.end_step() {
            return false;
        }
        self.current_step = t;
        true
    }

    pub fn location_values(&self) -> &[u64] {
        &self.location_values
    }

    pub fn link_values(&self) -> &[u64] {
        &self.link_values
    }

    pub fn max_diff(&self) -> u64 {
        self.max_diff
    }

    pub fn max_location_value(&self) -> u64 {
        self.location_values.last().copied().unwrap_or(0)
    }

    pub fn max_link_value(&self) -> u64 {
        self.link_values.last().copied().unwrap_or(0)
    }
}

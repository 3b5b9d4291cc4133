use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::heap::PriorityIndex;
use crate::ordered::OrderedIndex;
use crate::types::{LapFilter, LapTime, Record};

/// Number of records ranked when nothing else is configured.
pub const DEFAULT_K: usize = 5;

/// Tuning knobs for the retrieval driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// How many of the fastest records each strategy returns.
    pub k: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { k: DEFAULT_K }
    }
}

impl Options {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

/// The two indexing strategies being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Binary min-heap, drained by repeated extract-min.
    PriorityIndex,
    /// Skip-list ordered index, read by ascending traversal.
    OrderedIndex,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::PriorityIndex, Strategy::OrderedIndex];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::PriorityIndex => "priority_index",
            Strategy::OrderedIndex => "ordered_index",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What one strategy produced, and how long building and querying took.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub strategy: Strategy,
    pub records: Vec<Record>,
    pub elapsed: Duration,
}

impl StrategyOutcome {
    /// Elapsed wall-clock time in fractional seconds.
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Both strategies' answers for one (race, lap).
#[derive(Debug, Clone)]
pub struct Comparison {
    pub filter: LapFilter,
    pub k: usize,
    /// How many rows passed the filter.
    pub matched: usize,
    pub priority: StrategyOutcome,
    pub ordered: StrategyOutcome,
}

impl Comparison {
    /// True when both rankings have the same rank-key sequence.
    ///
    /// Both indexes break ties by insertion order, so in practice the owner
    /// sequences match too; only the keys are required to.
    pub fn agrees(&self) -> bool {
        let keys = |outcome: &StrategyOutcome| -> Vec<u64> {
            outcome.records.iter().map(Record::rank_key).collect()
        };
        keys(&self.priority) == keys(&self.ordered)
    }

    pub fn outcomes(&self) -> [&StrategyOutcome; 2] {
        [&self.priority, &self.ordered]
    }
}

/// Build a fresh index of the given strategy over `records`, take the
/// `k` fastest, and time exactly that.
///
/// Records are copied into the index; the caller's slice is untouched.
pub fn run_strategy(strategy: Strategy, records: &[Record], k: usize) -> StrategyOutcome {
    let start = Instant::now();
    let ranked = match strategy {
        Strategy::PriorityIndex => {
            let mut index = PriorityIndex::with_capacity(records.len());
            index.extend(records.iter().cloned());
            index.top_k(k)
        }
        Strategy::OrderedIndex => {
            let index: OrderedIndex = records.iter().cloned().collect();
            index.top_k(k).cloned().collect()
        }
    };
    let elapsed = start.elapsed();

    debug!(
        "{strategy}: ranked {} of {} records in {:?}",
        ranked.len(),
        records.len(),
        elapsed
    );
    StrategyOutcome {
        strategy,
        records: ranked,
        elapsed,
    }
}

/// Runs both strategies over the same filtered rows and reports the results.
///
/// Nothing is cached: each call rebuilds both indexes so the timings
/// measure construction plus query.
#[derive(Debug, Clone, Default)]
pub struct RetrievalDriver {
    options: Options,
}

impl RetrievalDriver {
    pub fn new(options: Options) -> Self {
        RetrievalDriver { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Rank the fastest records of `filter` with both strategies.
    ///
    /// Filtering happens before either timer starts.
    pub fn compare(&self, rows: &[LapTime], filter: LapFilter) -> Comparison {
        let matching: Vec<Record> = rows
            .iter()
            .filter(|row| filter.matches(row))
            .map(|row| row.record.clone())
            .collect();
        info!(
            "{filter}: {} of {} rows match, ranking top {}",
            matching.len(),
            rows.len(),
            self.options.k
        );

        let priority = run_strategy(Strategy::PriorityIndex, &matching, self.options.k);
        let ordered = run_strategy(Strategy::OrderedIndex, &matching, self.options.k);

        let comparison = Comparison {
            filter,
            k: self.options.k,
            matched: matching.len(),
            priority,
            ordered,
        };
        if !comparison.agrees() {
            warn!("{filter}: strategies disagree on the ranking");
        }
        comparison
    }
}

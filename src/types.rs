use std::fmt;

use crate::error::{Error, Result};

/// Ranking key: elapsed lap time in milliseconds. Smaller is faster.
pub type RankKey = u64;

/// Identifies the driver that set a lap time.
pub type OwnerId = u32;

/// One timed event: who set it, how it is displayed, and how it ranks.
///
/// Immutable once built. Ordering across records is defined by the indexes,
/// which compare `(rank_key, insertion sequence)` so equal rank keys come out
/// in the order they went in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    owner_id: OwnerId,
    display_time: String,
    rank_key: RankKey,
}

impl Record {
    /// Build a record. Fails with `InvalidRecord` if `rank_key` is negative.
    pub fn new(owner_id: OwnerId, display_time: impl Into<String>, rank_key: i64) -> Result<Self> {
        let rank_key = RankKey::try_from(rank_key).map_err(|_| {
            Error::InvalidRecord(format!("negative rank key {rank_key} for owner {owner_id}"))
        })?;
        Ok(Record {
            owner_id,
            display_time: display_time.into(),
            rank_key,
        })
    }

    /// Build a record from an unparsed rank key, as found in source rows.
    pub fn parse(owner_id: OwnerId, display_time: impl Into<String>, raw_rank_key: &str) -> Result<Self> {
        let raw = raw_rank_key.trim();
        let rank_key: i64 = raw.parse().map_err(|_| {
            Error::InvalidRecord(format!("rank key {raw:?} is not an integer"))
        })?;
        Record::new(owner_id, display_time, rank_key)
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn display_time(&self) -> &str {
        &self.display_time
    }

    pub fn rank_key(&self) -> RankKey {
        self.rank_key
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} ms)", self.owner_id, self.display_time, self.rank_key)
    }
}

/// A record as it appears in the source data, tagged with where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapTime {
    pub race_id: u32,
    pub lap: u32,
    pub position: u32,
    pub record: Record,
}

/// Selects the rows of one lap of one race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapFilter {
    pub race_id: u32,
    pub lap: u32,
}

impl LapFilter {
    pub fn new(race_id: u32, lap: u32) -> Self {
        LapFilter { race_id, lap }
    }

    pub fn matches(&self, row: &LapTime) -> bool {
        row.race_id == self.race_id && row.lap == self.lap
    }
}

impl fmt::Display for LapFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "race {} lap {}", self.race_id, self.lap)
    }
}

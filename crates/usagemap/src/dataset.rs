//! The unit of loading: one day of usage.

use crate::error::ViewError;
use crate::timeline::IntervalSet;
use serde::{Deserialize, Serialize};
use usagemap_core::window_title;
use usagemap_layout::{RawNode, TreeError, UsageTree};

/// Seconds in one navigation step.
pub const DAY_SECONDS: i64 = 86_400;

/// First day with recorded usage, Unix seconds.
pub const FIRST_DAY: i64 = 1_396_738_800;

const fn first_day() -> i64 {
    FIRST_DAY
}

/// Tree, timeline rows and day metadata as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDataset {
    /// Usage hierarchy.
    pub usage: RawNode,
    /// Timeline rows.
    #[serde(default)]
    pub intervals: IntervalSet,
    /// Total active seconds for the day.
    #[serde(default)]
    pub total: u64,
    /// Day as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Start of the shown day, Unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Start of the newest day available.
    #[serde(default)]
    pub newest_timestamp: i64,
    /// Start of the oldest day available.
    #[serde(default = "first_day")]
    pub oldest_timestamp: i64,
}

impl UsageDataset {
    /// Dataset with only a tree.
    #[must_use]
    pub fn new(usage: RawNode) -> Self {
        Self {
            usage,
            intervals: IntervalSet::default(),
            total: 0,
            date: String::new(),
            timestamp: 0,
            newest_timestamp: 0,
            oldest_timestamp: FIRST_DAY,
        }
    }

    /// Decode JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Decode`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and build the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] if the hierarchy is malformed.
    pub fn tree(&self) -> Result<UsageTree, TreeError> {
        UsageTree::from_raw(&self.usage)
    }

    /// Window title, e.g. `"1h 2m 3s on 2014-04-06 - AppUsage"`.
    #[must_use]
    pub fn title(&self) -> String {
        window_title(self.total, &self.date)
    }

    /// Navigation cursor for this day.
    #[must_use]
    pub const fn cursor(&self) -> DayCursor {
        DayCursor::new(self.timestamp, self.newest_timestamp, self.oldest_timestamp)
    }
}

/// Day navigation bounded by the oldest and newest recorded days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCursor {
    /// Shown day.
    pub timestamp: i64,
    /// Newest day.
    pub newest: i64,
    /// Oldest day.
    pub oldest: i64,
}

impl DayCursor {
    /// Cursor at `timestamp`.
    #[must_use]
    pub const fn new(timestamp: i64, newest: i64, oldest: i64) -> Self {
        Self {
            timestamp,
            newest,
            oldest,
        }
    }

    /// The previous day, if not before `oldest`.
    #[must_use]
    pub fn older(&self) -> Option<i64> {
        let ts = self.timestamp.checked_sub(DAY_SECONDS)?;
        (ts >= self.oldest).then_some(ts)
    }

    /// The next day, if not after `newest`.
    #[must_use]
    pub fn newer(&self) -> Option<i64> {
        let ts = self.timestamp.checked_add(DAY_SECONDS)?;
        (ts <= self.newest).then_some(ts)
    }
}

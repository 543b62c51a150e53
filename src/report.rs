use std::collections::BTreeMap;

use nalgebra as na;
use serde_derive::Serialize;

use crate::error::Result;
use crate::orientation::Direction;
use crate::track::Track;

pub const UNDEFINED_DIRECTION: &str = "undefined";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrackReport {
    pub id: u32,
    pub direction: Option<Direction>,
    pub angles: Vec<f32>,
    pub frames_seen: u32,
    pub centroid_history: Vec<na::Point2<i32>>,
}

impl From<&Track> for TrackReport {
    fn from(t: &Track) -> TrackReport {
        TrackReport {
            id: t.id,
            direction: t.direction,
            angles: t.angles.clone(),
            frames_seen: t.frames_seen,
            centroid_history: t.centroid_history.clone(),
        }
    }
}

/// Per-video digest handed to report writers.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Summary {
    pub frames: u64,
    /// Sorted by track id
    pub tracks: Vec<TrackReport>,
    /// Tracks per direction label, tracks without orientation under `undefined`
    pub direction_counts: BTreeMap<String, usize>,
}

impl Summary {
    pub fn new<'a>(frames: u64, tracks: impl IntoIterator<Item = &'a Track>) -> Self {
        let mut tracks: Vec<TrackReport> = tracks.into_iter().map(Into::into).collect();
        tracks.sort_by_key(|t| t.id);

        let mut direction_counts: BTreeMap<String, usize> = Direction::ALL
            .iter()
            .map(|d| (d.label().to_string(), 0))
            .collect();
        direction_counts.insert(UNDEFINED_DIRECTION.to_string(), 0);

        for t in &tracks {
            let key = t.direction.map_or(UNDEFINED_DIRECTION, |d| d.label());
            *direction_counts.entry(key.to_string()).or_insert(0) += 1;
        }

        Self {
            frames,
            tracks,
            direction_counts,
        }
    }

    #[inline]
    pub fn count(&self, direction: Direction) -> usize {
        self.direction_counts
            .get(direction.label())
            .copied()
            .unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

use log::{debug, trace};
use nalgebra as na;

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::math;
use crate::track::Track;

/// Outcome of matching one frame of centroids against the current tracks.
#[derive(Debug, Default)]
pub struct MatchResult {
    /// Tracks to carry into the next frame, survivors first, then spawned tracks
    pub tracks: Vec<Track>,
    /// Tracks whose miss count went over the limit in this frame
    pub dropped: Vec<Track>,
}

/// Greedy nearest-neighbour assignment.
///
/// Tracks are visited in list order and each one takes the closest centroid not yet taken
/// by an earlier track (lowest index on ties), provided it is strictly closer than
/// `max_distance`. This is not a globally optimal assignment: an earlier track may take a
/// centroid a later track was closer to. Unmatched centroids spawn new tracks with ids
/// starting at `next_id`, in centroid order; `next_id` is advanced past every id handed out.
pub fn match_tracks(
    tracks: Vec<Track>,
    centroids: &[na::Point2<i32>],
    next_id: &mut u32,
    config: &TrackerConfig,
) -> MatchResult {
    let mut assigned = vec![false; centroids.len()];
    let mut result = MatchResult {
        tracks: Vec::with_capacity(tracks.len() + centroids.len()),
        dropped: Vec::new(),
    };

    for mut track in tracks {
        track.ellipse = None;

        let mut best: Option<(usize, f32)> = None;
        for (idx, c) in centroids.iter().enumerate() {
            if assigned[idx] {
                continue;
            }

            let dist = math::distance(&track.centroid, c);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }

        match best {
            Some((idx, dist)) if dist < config.max_distance => {
                trace!("track {} <- centroid #{} ({:.1}px)", track.id, idx, dist);

                assigned[idx] = true;
                track.update_position(centroids[idx], config);
                track.misses = 0;
                track.frames_seen += 1;
                track.detection = Some(idx);

                result.tracks.push(track);
            }
            _ => {
                track.misses += 1;
                track.detection = None;

                if track.misses <= config.max_misses {
                    result.tracks.push(track);
                } else {
                    debug!("track {} dropped after {} misses", track.id, track.misses);
                    result.dropped.push(track);
                }
            }
        }
    }

    let max_id = result
        .tracks
        .iter()
        .map(|t| t.id + 1)
        .max()
        .unwrap_or(0);
    *next_id = (*next_id).max(max_id);

    for (idx, c) in centroids.iter().enumerate() {
        if assigned[idx] {
            continue;
        }

        let mut track = Track::new(*next_id, *c, config);
        track.frames_seen = 1;
        track.detection = Some(idx);
        debug!("track {} spawned at ({}, {})", track.id, c.x, c.y);

        result.tracks.push(track);
        *next_id += 1;
    }

    result
}

/// Owns every live track of one video.
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    tracks: Vec<Track>,
    next_id: u32,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            tracks: Vec::with_capacity(64),
            next_id: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Matches this frame's centroids and returns the tracks dropped on the way.
    pub fn update(&mut self, centroids: &[na::Point2<i32>]) -> Vec<Track> {
        let tracks = std::mem::take(&mut self.tracks);
        let result = match_tracks(tracks, centroids, &mut self.next_id, &self.config);

        debug!(
            "{} centroids: {} tracks live, {} dropped",
            centroids.len(),
            result.tracks.len(),
            result.dropped.len()
        );

        self.tracks = result.tracks;
        result.dropped
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Tracks matched or spawned in the last frame
    #[inline]
    pub fn active(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.is_active())
    }

    #[inline]
    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut().filter(|t| t.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> na::Point2<i32> {
        na::Point2::new(x, y)
    }

    fn tracker(max_distance: f32, max_misses: u32) -> Tracker {
        Tracker::new(TrackerConfig {
            max_distance,
            max_misses,
            ..Default::default()
        })
        .unwrap()
    }

    fn ids(tracker: &Tracker) -> Vec<u32> {
        tracker.tracks().iter().map(|t| t.id).collect()
    }

    #[test]
    fn two_objects_one_missing() {
        let mut tracker = tracker(50.0, 3);

        tracker.update(&[pt(100, 100), pt(500, 500)]);
        assert_eq!(ids(&tracker), vec![0, 1]);

        let dropped = tracker.update(&[pt(105, 102)]);
        assert!(dropped.is_empty());
        assert_eq!(ids(&tracker), vec![0, 1]);

        let t0 = &tracker.tracks()[0];
        assert_eq!(t0.centroid, pt(105, 102));
        assert_eq!(t0.misses, 0);
        assert_eq!(t0.detection(), Some(0));

        let t1 = &tracker.tracks()[1];
        assert_eq!(t1.centroid, pt(500, 500));
        assert_eq!(t1.misses, 1);
        assert_eq!(t1.detection(), None);

        assert_eq!(tracker.active().count(), 1);
    }

    #[test]
    fn miss_then_drop() {
        let max_misses = 4;
        let mut tracker = tracker(50.0, max_misses);
        tracker.update(&[pt(10, 10)]);

        for _ in 0..max_misses {
            assert!(tracker.update(&[]).is_empty());
        }
        assert_eq!(ids(&tracker), vec![0]);
        assert_eq!(tracker.tracks()[0].misses, max_misses);

        let dropped = tracker.update(&[]);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, 0);
        assert!(tracker.tracks().is_empty());
    }

    #[test]
    fn match_resets_misses() {
        let mut tracker = tracker(50.0, 2);
        tracker.update(&[pt(10, 10)]);
        tracker.update(&[]);
        tracker.update(&[]);
        tracker.update(&[pt(12, 10)]);
        tracker.update(&[]);
        tracker.update(&[]);

        assert_eq!(ids(&tracker), vec![0]);
        assert_eq!(tracker.tracks()[0].misses, 2);
        assert_eq!(tracker.tracks()[0].frames_seen, 2);
    }

    #[test]
    fn distance_cutoff_is_strict() {
        let mut tracker = tracker(50.0, 5);
        tracker.update(&[pt(0, 0)]);

        // exactly at the cutoff: not a match
        tracker.update(&[pt(30, 40)]);
        assert_eq!(ids(&tracker), vec![0, 1]);
        assert_eq!(tracker.tracks()[0].centroid, pt(0, 0));
        assert_eq!(tracker.tracks()[0].misses, 1);

        tracker.update(&[pt(0, 200)]);
        assert_eq!(ids(&tracker), vec![0, 1, 2]);
        assert!(tracker.tracks()[..2].iter().all(|t| t.misses > 0));
    }

    #[test]
    fn ties_go_to_the_first_centroid() {
        let mut tracker = tracker(50.0, 5);
        tracker.update(&[pt(100, 100)]);

        tracker.update(&[pt(110, 100), pt(90, 100)]);

        assert_eq!(tracker.tracks()[0].centroid, pt(110, 100));
        assert_eq!(tracker.tracks()[0].detection(), Some(0));
        assert_eq!(tracker.tracks()[1].id, 1);
        assert_eq!(tracker.tracks()[1].centroid, pt(90, 100));
    }

    #[test]
    fn greedy_assignment_follows_track_order() {
        // A globally optimal matcher would pair (0 -> 75) and (1 -> 20) instead.
        let mut tracker = tracker(50.0, 5);
        tracker.update(&[pt(40, 0), pt(0, 0)]);
        tracker.update(&[pt(20, 0), pt(75, 0)]);

        // track 0 (at 40) grabs 20 although track 1 (at 0) has nothing else in range
        let t: Vec<_> = tracker
            .tracks()
            .iter()
            .map(|t| (t.id, t.centroid, t.misses))
            .collect();
        assert_eq!(
            t,
            vec![(0, pt(20, 0), 0), (1, pt(0, 0), 1), (2, pt(75, 0), 0)]
        );
    }

    #[test]
    fn ids_are_never_reused() {
        let mut tracker = tracker(50.0, 0);
        let mut seen = Vec::new();

        for frame in 0..20 {
            let x = (frame % 3) * 300;
            tracker.update(&[pt(x, 0), pt(x, 400)]);

            for t in tracker.active() {
                if t.frames_seen == 1 {
                    assert!(seen.iter().all(|&s| s < t.id));
                    seen.push(t.id);
                }
            }

            let mut live = ids(&tracker);
            live.dedup();
            assert_eq!(live.len(), tracker.tracks().len());
        }

        // all tracks die, ids keep counting
        tracker.update(&[]);
        tracker.update(&[]);
        assert!(tracker.tracks().is_empty());
        tracker.update(&[pt(0, 0)]);
        assert!(tracker.tracks()[0].id > *seen.last().unwrap());
    }

    #[test]
    fn empty_frame_only_accrues_misses() {
        let mut tracker = tracker(50.0, 5);
        tracker.update(&[pt(0, 0), pt(200, 0)]);
        tracker.update(&[]);

        assert!(tracker.tracks().iter().all(|t| t.misses == 1));
        assert_eq!(tracker.active().count(), 0);
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(Tracker::new(TrackerConfig {
            max_distance: -1.0,
            ..Default::default()
        })
        .is_err());
    }
}

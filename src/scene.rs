use image::Rgb;
use log::{info, warn};
use nalgebra as na;

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::frame::Frame;
use crate::geometry::{extract_detections, split_detections};
use crate::orientation::{compute_orientation, Ellipse};
use crate::report::Summary;
use crate::track::Track;
use crate::tracker::Tracker;

/// What an overlay renderer needs to draw one active track.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrack {
    pub id: u32,
    pub centroid: na::Point2<i32>,
    pub color: Rgb<u8>,
    /// Smoothed trail, oldest point first
    pub trail: Vec<na::Point2<i32>>,
    pub ellipse: Option<Ellipse>,
}

impl From<&Track> for ActiveTrack {
    fn from(t: &Track) -> ActiveTrack {
        ActiveTrack {
            id: t.id,
            centroid: t.centroid,
            color: t.color,
            trail: t.smoothed_history.to_vec_asc(),
            ellipse: t.ellipse().copied(),
        }
    }
}

/// Processing state of a single video.
pub struct Scene {
    tracker: Tracker,
    finished: Vec<Track>,
    frames: u64,
}

impl Scene {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        Ok(Self {
            tracker: Tracker::new(config)?,
            finished: Vec::new(),
            frames: 0,
        })
    }

    /// Runs one frame through detection filtering, matching and orientation.
    ///
    /// A frame rejected by validation leaves the scene as it was.
    pub fn update(&mut self, frame: &Frame) -> Result<()> {
        let detections = extract_detections(frame, self.tracker.config().min_mask_area)
            .map_err(|err| {
                warn!("frame at {:.3}s rejected: {}", frame.timestamp, err);
                err
            })?;

        let (centroids, masks) = split_detections(detections);

        let dropped = self.tracker.update(&centroids);
        self.finished.extend(dropped);

        for track in self.tracker.active_mut() {
            let mask = match track.detection().and_then(|idx| masks.get(idx)) {
                Some(mask) => mask,
                None => continue,
            };

            if let Some(orientation) = compute_orientation(mask) {
                track.record_orientation(orientation);
            }
        }

        self.frames += 1;

        Ok(())
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Tracks already dropped by the tracker
    #[inline]
    pub fn finished(&self) -> &[Track] {
        &self.finished
    }

    pub fn active_tracks(&self) -> Vec<ActiveTrack> {
        self.tracker.active().map(Into::into).collect()
    }

    /// Report over every track this scene has ever held
    pub fn summary(&self) -> Summary {
        Summary::new(
            self.frames,
            self.finished.iter().chain(self.tracker.tracks().iter()),
        )
    }

    /// Consumes the scene and reports on it
    pub fn finish(self) -> Summary {
        let summary = self.summary();
        info!(
            "scene finished after {} frames: {} tracks",
            summary.frames,
            summary.tracks.len()
        );

        summary
    }
}

use image::Rgb;
use nalgebra as na;

use crate::circular_queue::CircularQueue;
use crate::config::TrackerConfig;
use crate::math;
use crate::orientation::{categorize_direction, Direction, Ellipse, Orientation};
use crate::smoothing::smooth_path;

const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

/// Reproducible drawing color for a track id; neighbouring ids land far apart on the hue circle.
pub fn color_for_id(id: u32) -> Rgb<u8> {
    let h = (id as f32 * GOLDEN_RATIO_CONJUGATE).fract() * 6.0;
    let (s, v) = (0.85, 0.95);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
}

/// One tracked object. Mutated only by the tracker and, for the current frame, by the
/// orientation step.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: u32,
    pub color: Rgb<u8>,
    pub centroid: na::Point2<i32>,

    /// Consecutive frames without a match
    pub misses: u32,
    pub frames_seen: u32,

    pub raw_history: CircularQueue<na::Point2<i32>>,
    pub smoothed_history: CircularQueue<na::Point2<i32>>,
    pub centroid_history: Vec<na::Point2<i32>>,

    /// Raw point that produced the last smoothed trail point
    pub last_point: Option<na::Point2<i32>>,

    pub angles: Vec<f32>,

    /// Taken from the first angle ever observed, never changes afterwards
    pub direction: Option<Direction>,

    // current frame only
    pub(crate) detection: Option<usize>,
    pub(crate) ellipse: Option<Ellipse>,
}

impl Track {
    pub fn new(id: u32, centroid: na::Point2<i32>, config: &TrackerConfig) -> Self {
        let mut track = Self {
            id,
            color: color_for_id(id),
            centroid,
            misses: 0,
            frames_seen: 0,
            raw_history: CircularQueue::with_capacity(config.raw_history_capacity()),
            smoothed_history: CircularQueue::with_capacity(config.smoothed_history_capacity()),
            centroid_history: Vec::new(),
            last_point: None,
            angles: Vec::new(),
            direction: None,
            detection: None,
            ellipse: None,
        };

        track.update_position(centroid, config);
        track
    }

    /// Moves the track to `centroid` and extends the smoothed trail once the track has moved
    /// far enough and enough raw points are available.
    pub fn update_position(&mut self, centroid: na::Point2<i32>, config: &TrackerConfig) {
        self.centroid = centroid;
        self.raw_history.push(centroid);
        self.centroid_history.push(centroid);

        let moved = match &self.last_point {
            None => true,
            Some(last) => math::distance(&centroid, last) > config.min_movement_threshold,
        };

        if moved && self.raw_history.len() >= config.smoothing_window {
            let raw = self.raw_history.to_vec_asc();
            let smoothed = smooth_path(&raw, config.smoothing_window, config.gaussian_sigma);

            if let Some(&point) = smoothed.last() {
                self.smoothed_history.push(point);
            }

            self.last_point = Some(centroid);
        }
    }

    pub fn record_orientation(&mut self, orientation: Orientation) {
        self.angles.push(orientation.angle);
        self.ellipse = Some(orientation.ellipse);

        if self.direction.is_none() {
            self.direction = Some(categorize_direction(orientation.angle));
        }
    }

    /// Index of the detection matched in the current frame
    #[inline]
    pub fn detection(&self) -> Option<usize> {
        self.detection
    }

    /// Ellipse fitted in the current frame
    #[inline]
    pub fn ellipse(&self) -> Option<&Ellipse> {
        self.ellipse.as_ref()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.misses == 0
    }
}

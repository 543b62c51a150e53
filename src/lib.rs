pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod orientation;
pub mod report;
pub mod scene;
pub mod smoothing;
pub mod tracker;

mod circular_queue;
mod track;

pub use circular_queue::CircularQueue;
pub use config::TrackerConfig;
pub use detection::{Detection, Mask};
pub use frame::Frame;
pub use orientation::{categorize_direction, Direction, Ellipse, Orientation};
pub use report::Summary;
pub use scene::{ActiveTrack, Scene};
pub use track::{color_for_id, Track};
pub use tracker::Tracker;

use error::Error;
use std::collections::HashMap;
use std::rc::Rc;

pub trait Tracking {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<(), Error>;
    fn tracks(&self, src: &str) -> Rc<[ActiveTrack]>;
    fn summary(&self, src: &str) -> Option<Summary>;
}

/// Tracks blobs in any number of videos, each with its own independent scene.
pub struct BlobTracker {
    config: TrackerConfig,
    scenes: HashMap<String, Scene>,
}

impl BlobTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            scenes: HashMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[inline]
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    /// Ends processing of `src` and returns its final report
    pub fn finish(&mut self, src: &str) -> Option<Summary> {
        self.scenes.remove(src).map(Scene::finish)
    }
}

impl crate::Tracking for BlobTracker {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<(), Error> {
        let scene = match self.scenes.get_mut(src) {
            Some(scene) => scene,
            None => self
                .scenes
                .entry(src.to_string())
                .or_insert(Scene::new(self.config.clone())?),
        };

        scene.update(frame)
    }

    #[inline]
    fn tracks(&self, src: &str) -> Rc<[ActiveTrack]> {
        if let Some(scene) = self.scenes.get(src) {
            return scene.active_tracks().into_boxed_slice().into();
        }

        Rc::new([])
    }

    #[inline]
    fn summary(&self, src: &str) -> Option<Summary> {
        self.scenes.get(src).map(Scene::summary)
    }
}

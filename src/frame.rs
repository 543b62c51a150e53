use crate::detection::Mask;

/// Detector output for one video frame.
pub struct Frame {
    pub dims: (u32, u32),
    pub masks: Vec<Mask>,
    pub timestamp: f32, // in seconds
}

impl Frame {
    pub fn new(dims: (u32, u32), masks: Vec<Mask>, timestamp: f32) -> Self {
        Self {
            dims,
            masks,
            timestamp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Mask> {
        self.masks.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

use image::GrayImage;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Binary occupancy mask, any non-zero pixel is occupied
pub type Mask = GrayImage;

/// Inclusive pixel bounds
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl BBox {
    /// Bounds of all occupied pixels, `None` for an empty mask
    pub fn of_mask(mask: &Mask) -> Option<Self> {
        let mut bbox: Option<BBox> = None;

        for (x, y, px) in mask.enumerate_pixels() {
            if px.0[0] == 0 {
                continue;
            }

            bbox = Some(match bbox {
                None => BBox {
                    xmin: x,
                    ymin: y,
                    xmax: x,
                    ymax: y,
                },
                Some(b) => BBox {
                    xmin: b.xmin.min(x),
                    ymin: b.ymin.min(y),
                    xmax: b.xmax.max(x),
                    ymax: b.ymax.max(y),
                },
            });
        }

        bbox
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.xmax - self.xmin + 1
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.ymax - self.ymin + 1
    }

    /// Midpoint of the bounds, truncated
    #[inline]
    pub fn center(&self) -> na::Point2<i32> {
        na::Point2::new(
            ((self.xmin + self.xmax) / 2) as i32,
            ((self.ymin + self.ymax) / 2) as i32,
        )
    }
}

/// A mask that survived the area filter, rescaled to frame resolution.
#[derive(Debug, Clone)]
pub struct Detection {
    pub bbox: BBox,
    pub centroid: na::Point2<i32>,
    pub area: u32,
    pub mask: Mask,
}

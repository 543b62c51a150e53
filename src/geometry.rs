use image::imageops::{self, FilterType};
use log::debug;
use nalgebra as na;

use crate::detection::{BBox, Detection, Mask};
use crate::error::{Error, Result};
use crate::frame::Frame;

/// Checks frame and mask dimensions. All masks of a frame must come at the same resolution.
pub fn validate_frame(frame: &Frame) -> Result<()> {
    let (width, height) = frame.dims;
    if width == 0 || height == 0 {
        return Err(Error::InvalidFrame { width, height });
    }

    let mut expected = None;
    for (index, mask) in frame.iter().enumerate() {
        let found = mask.dimensions();
        if found.0 == 0 || found.1 == 0 {
            return Err(Error::EmptyMask { index });
        }

        match expected {
            None => expected = Some(found),
            Some(expected) if expected != found => {
                return Err(Error::MaskDimensions {
                    index,
                    expected,
                    found,
                })
            }
            _ => (),
        }
    }

    Ok(())
}

#[inline]
fn occupied(mask: &Mask) -> u32 {
    mask.pixels().filter(|px| px.0[0] != 0).count() as u32
}

/// Rescales every mask to frame resolution and keeps those covering at least `min_area` pixels.
///
/// Nearest-neighbour scaling keeps the mask binary. The order of surviving masks is preserved.
pub fn extract_detections(frame: &Frame, min_area: u32) -> Result<Vec<Detection>> {
    validate_frame(frame)?;

    let (width, height) = frame.dims;
    let mut detections = Vec::with_capacity(frame.len());

    for (index, mask) in frame.iter().enumerate() {
        let mask = if mask.dimensions() == frame.dims {
            mask.clone()
        } else {
            imageops::resize(mask, width, height, FilterType::Nearest)
        };

        let area = occupied(&mask);
        if area < min_area {
            debug!("mask #{} dropped: area {} < {}", index, area, min_area);
            continue;
        }

        let bbox = match BBox::of_mask(&mask) {
            Some(bbox) => bbox,
            None => continue,
        };

        detections.push(Detection {
            bbox,
            centroid: bbox.center(),
            area,
            mask,
        });
    }

    Ok(detections)
}

/// Splits detections into positionally paired centroids and masks.
pub fn split_detections(detections: Vec<Detection>) -> (Vec<na::Point2<i32>>, Vec<Mask>) {
    detections
        .into_iter()
        .map(|det| (det.centroid, det.mask))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rect_mask(dims: (u32, u32), x0: u32, y0: u32, w: u32, h: u32) -> Mask {
        Mask::from_fn(dims.0, dims.1, |x, y| {
            if x >= x0 && x < x0 + w && y >= y0 && y < y0 + h {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn small_mask_is_dropped() {
        // 25 x 20 = 500 px
        let frame = Frame::new((100, 100), vec![rect_mask((100, 100), 10, 10, 25, 20)], 0.0);

        let dets = extract_detections(&frame, 700).unwrap();
        assert!(dets.is_empty());
    }

    #[test]
    fn centroid_is_bbox_midpoint() {
        // An L shape: pixel weighted centroid would sit near the corner
        let mut mask = rect_mask((100, 100), 10, 10, 40, 5);
        for y in 10..61 {
            for x in 10..15 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        let frame = Frame::new((100, 100), vec![mask], 0.0);
        let dets = extract_detections(&frame, 10).unwrap();

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].centroid, na::Point2::new(29, 35));
    }

    #[test]
    fn order_is_preserved_and_gaps_are_closed() {
        let dims = (200, 100);
        let masks = vec![
            rect_mask(dims, 0, 0, 10, 10),
            rect_mask(dims, 100, 50, 30, 30),
            rect_mask(dims, 0, 90, 5, 5),
            rect_mask(dims, 150, 0, 40, 40),
        ];

        let frame = Frame::new(dims, masks, 0.0);
        let (centroids, masks) = split_detections(extract_detections(&frame, 200).unwrap());

        assert_eq!(
            centroids,
            vec![na::Point2::new(114, 64), na::Point2::new(169, 19)]
        );
        assert_eq!(masks.len(), 2);
        assert_eq!(occupied(&masks[0]), 900);
    }

    #[test]
    fn masks_are_rescaled_to_frame() {
        // 40x40 mask, 10x10 blob at (20, 20); frame is twice as large
        let frame = Frame::new((80, 80), vec![rect_mask((40, 40), 20, 20, 10, 10)], 0.0);

        let dets = extract_detections(&frame, 1).unwrap();

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].mask.dimensions(), (80, 80));
        assert_eq!(dets[0].area, 400);
        assert_eq!(
            dets[0].bbox,
            BBox {
                xmin: 40,
                ymin: 40,
                xmax: 59,
                ymax: 59
            }
        );
        assert!(dets[0].mask.pixels().all(|px| px.0[0] == 0 || px.0[0] == 255));
    }

    #[test]
    fn rejects_malformed_frames() {
        let frame = Frame::new((0, 10), vec![], 0.0);
        assert!(matches!(
            extract_detections(&frame, 1),
            Err(Error::InvalidFrame { .. })
        ));

        let frame = Frame::new((10, 10), vec![Mask::new(0, 5)], 0.0);
        assert!(matches!(
            extract_detections(&frame, 1),
            Err(Error::EmptyMask { index: 0 })
        ));

        let frame = Frame::new((10, 10), vec![Mask::new(10, 10), Mask::new(5, 5)], 0.0);
        assert!(matches!(
            extract_detections(&frame, 1),
            Err(Error::MaskDimensions { index: 1, .. })
        ));
    }

    #[test]
    fn no_masks_no_detections() {
        let frame = Frame::new((10, 10), vec![], 0.0);
        assert!(extract_detections(&frame, 1).unwrap().is_empty());
    }
}

use std::fmt;

use imageproc::contours::{find_contours, BorderType};
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::detection::Mask;
use crate::math::polygon_area;

/// Fewer contour points than this cannot support an ellipse fit
pub const MIN_CONTOUR_POINTS: usize = 5;

/// Coarse orientation bucket of a blob's major axis.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Horizontal,
    #[serde(rename = "diagonal_45")]
    Diagonal45,
    Vertical,
    #[serde(rename = "diagonal_135")]
    Diagonal135,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Diagonal45,
        Direction::Vertical,
        Direction::Diagonal135,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Diagonal45 => "diagonal_45",
            Direction::Vertical => "vertical",
            Direction::Diagonal135 => "diagonal_135",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets an angle in degrees (0/180 is horizontal) into one of four 45 degree wide sectors.
pub fn categorize_direction(angle: f32) -> Direction {
    let angle = angle.rem_euclid(180.0);

    if !(22.5..157.5).contains(&angle) {
        Direction::Horizontal
    } else if angle < 67.5 {
        Direction::Diagonal45
    } else if angle < 112.5 {
        Direction::Vertical
    } else {
        Direction::Diagonal135
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: na::Point2<f32>,
    /// Full major and minor axis lengths
    pub axes: (f32, f32),
    /// Major axis angle in degrees within `[0, 180)`
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub angle: f32,
    pub ellipse: Ellipse,
}

/// Outer contour enclosing the largest area; the first one wins ties.
pub fn largest_contour(mask: &Mask) -> Option<Vec<(i32, i32)>> {
    let mut best: Option<(f64, Vec<(i32, i32)>)> = None;

    for contour in find_contours::<i32>(mask) {
        if !matches!(contour.border_type, BorderType::Outer) {
            continue;
        }

        let points: Vec<(i32, i32)> = contour.points.iter().map(|p| (p.x, p.y)).collect();
        let area = polygon_area(&points);

        match &best {
            Some((best_area, _)) if area <= *best_area => (),
            _ => best = Some((area, points)),
        }
    }

    best.map(|(_, points)| points)
}

/// Fits an ellipse to contour points through their second order central moments.
pub fn fit_ellipse(points: &[(i32, i32)]) -> Option<Ellipse> {
    if points.len() < MIN_CONTOUR_POINTS {
        return None;
    }

    let n = points.len() as f32;
    let mean = points
        .iter()
        .fold(na::Vector2::zeros(), |acc: na::Vector2<f32>, &(x, y)| {
            acc + na::Vector2::new(x as f32, y as f32)
        })
        / n;

    let cov = points
        .iter()
        .fold(na::Matrix2::zeros(), |acc: na::Matrix2<f32>, &(x, y)| {
            let d = na::Vector2::new(x as f32, y as f32) - mean;
            acc + d * d.transpose()
        })
        / n;

    let eig = na::SymmetricEigen::new(cov);
    let (major, minor) = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
        (0, 1)
    } else {
        (1, 0)
    };

    let l_major = eig.eigenvalues[major];
    let l_minor = eig.eigenvalues[minor].max(0.0);
    if !l_major.is_finite() || l_major <= f32::EPSILON {
        return None;
    }

    let axis = eig.eigenvectors.column(major);
    let mut angle = axis[1].atan2(axis[0]).to_degrees().rem_euclid(180.0);
    if angle >= 180.0 {
        angle = 0.0;
    }

    // boundary points of an ellipse with semi-axis `a` have variance a^2 / 2 along it
    Some(Ellipse {
        center: na::Point2::from(mean),
        axes: (2.0 * (2.0 * l_major).sqrt(), 2.0 * (2.0 * l_minor).sqrt()),
        angle,
    })
}

/// Orientation of the dominant blob in `mask`, `None` when its contour is too small to fit.
pub fn compute_orientation(mask: &Mask) -> Option<Orientation> {
    let contour = largest_contour(mask)?;
    let ellipse = fit_ellipse(&contour)?;

    Some(Orientation {
        angle: ellipse.angle,
        ellipse,
    })
}

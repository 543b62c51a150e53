use nalgebra as na;
use num_traits::{NumCast, ToPrimitive};

pub fn gauss(x: f64, c: f64) -> f64 {
    (-((x * x) / (2.0 * c * c))).exp()
}

/// Normalized Gaussian weights over `-r..=r`, `r = trunc(4 * sigma + 0.5)`
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (4.0 * sigma + 0.5) as i32;
    let mut kernel: Vec<f64> = (-radius..=radius).map(|x| gauss(x as f64, sigma)).collect();

    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);

    kernel
}

#[inline]
pub fn to_f32(p: &na::Point2<i32>) -> na::Point2<f32> {
    na::Point2::new(p.x as f32, p.y as f32)
}

#[inline]
pub fn distance(a: &na::Point2<i32>, b: &na::Point2<i32>) -> f32 {
    na::distance(&to_f32(a), &to_f32(b))
}

/// Area enclosed by a closed polygon (shoelace formula)
pub fn polygon_area<T: ToPrimitive + Copy>(points: &[(T, T)]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let coord = |v: T| -> f64 { <f64 as NumCast>::from(v).unwrap_or(0.0) };

    let twice_area: f64 = (0..n)
        .map(|i| {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % n];

            coord(x1) * coord(y2) - coord(x2) * coord(y1)
        })
        .sum();

    twice_area.abs() / 2.0
}

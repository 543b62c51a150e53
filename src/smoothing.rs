use nalgebra as na;
use ndarray::Array1;

use crate::math::gaussian_kernel;

/// Maps an out-of-range index back into `0..n` by mirroring at both edges (`d c b a | a b c d`).
#[inline]
fn reflect(idx: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = idx.rem_euclid(period);

    if m >= n as isize {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

/// One dimensional Gaussian filter with reflected borders.
///
/// Each output is accumulated as `v[i] + sum(w[k] * (v[j] - v[i]))`, which equals the plain
/// weighted sum for a normalized kernel but reproduces constant runs exactly.
pub fn gaussian_filter1d(values: &Array1<f64>, sigma: f64) -> Array1<f64> {
    let n = values.len();
    if n == 0 {
        return Array1::zeros(0);
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;

    Array1::from_shape_fn(n, |i| {
        let center = values[i];
        let offset: f64 = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let j = reflect(i as isize + k as isize - radius, n);
                w * (values[j] - center)
            })
            .sum();

        center + offset
    })
}

/// Smooths a raw trail. Trails shorter than `window` are returned untouched.
pub fn smooth_path(points: &[na::Point2<i32>], window: usize, sigma: f32) -> Vec<na::Point2<i32>> {
    if points.len() < window {
        return points.to_vec();
    }

    let sigma = sigma as f64;
    let xs: Array1<f64> = points.iter().map(|p| p.x as f64).collect();
    let ys: Array1<f64> = points.iter().map(|p| p.y as f64).collect();

    let xs = gaussian_filter1d(&xs, sigma);
    let ys = gaussian_filter1d(&ys, sigma);

    xs.iter()
        .zip(ys.iter())
        .map(|(&x, &y)| na::Point2::new(x as i32, y as i32))
        .collect()
}

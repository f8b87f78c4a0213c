//! Frequency content of a sampled history
//!
//! Magnitudes of the forward FFT restricted to the non-negative bins
//! `k = 0..=n/2`, the same layout as numpy/scipy `rfft` and `rfftfreq`.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Peaks at or below this fraction of `n * max|x|` count as silence
const FLAT_TOLERANCE: f64 = 1e-9;

/// `|X_k|` for `k = 0..=n/2`
pub fn rfft_magnitude(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    let fft = FftPlanner::<f64>::new().plan_fft_forward(n);
    fft.process(&mut buffer);

    buffer.iter().take(n / 2 + 1).map(|c| c.norm()).collect()
}

/// Bin frequencies `k / (n d)` for `k = 0..=n/2`, `d` the sample spacing
pub fn rfft_freq(n: usize, d: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * d);
    (0..=n / 2).map(|k| k as f64 * scale).collect()
}

/// Frequency of the strongest non-DC bin; the mean is removed first so a
/// large equilibrium offset does not leak into low bins. `None` for fewer
/// than two samples or a history that never moves
pub fn dominant_frequency(samples: &[f64], d: f64) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let centred: Vec<f64> = samples.iter().map(|x| x - mean).collect();

    let mags = rfft_magnitude(&centred);
    let freqs = rfft_freq(samples.len(), d);
    let (peak, f) = mags
        .iter()
        .zip(freqs.iter())
        .skip(1)
        .max_by(|a, b| a.0.total_cmp(b.0))?;

    // a flat history has no dominant frequency, only rounding noise
    let scale = samples.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if *peak <= FLAT_TOLERANCE * scale * samples.len() as f64 {
        return None;
    }
    Some(*f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn bin_layout_matches_rfftfreq() {
        assert_eq!(rfft_freq(8, 0.5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(rfft_freq(5, 1.0).len(), 3);
        assert!(rfft_freq(0, 1.0).is_empty());
        assert_eq!(rfft_magnitude(&[1.0; 7]).len(), 4);
    }

    #[test]
    fn constant_signal_is_all_dc() {
        let mags = rfft_magnitude(&[2.0; 16]);
        assert!((mags[0] - 32.0).abs() < 1e-9);
        for m in &mags[1..] {
            assert!(m.abs() < 1e-9);
        }
    }

    #[test]
    fn cosine_lands_in_its_bin() {
        let n = 64;
        let d = 0.1;
        // 5 cycles over the window -> bin 5, frequency 5 / (64 * 0.1)
        let samples: Vec<f64> = (0..n)
            .map(|j| 3.0 + (2.0 * PI * 5.0 * j as f64 / n as f64).cos())
            .collect();

        let mags = rfft_magnitude(&samples);
        assert!((mags[5] - n as f64 / 2.0).abs() < 1e-8);
        assert!(mags[4] < 1e-8 && mags[6] < 1e-8);

        let f = dominant_frequency(&samples, d).unwrap();
        assert!((f - 5.0 / (n as f64 * d)).abs() < 1e-12);
    }

    #[test]
    fn too_short_for_a_peak() {
        assert_eq!(dominant_frequency(&[1.0], 0.1), None);
    }

    #[test]
    fn flat_history_has_no_peak() {
        assert_eq!(dominant_frequency(&[7.0; 100], 0.1), None);
        assert_eq!(dominant_frequency(&[0.0; 100], 0.1), None);
        // mean removal leaves rounding residue here
        assert_eq!(dominant_frequency(&[0.1; 97], 0.1), None);

        let mut bump = vec![7.0; 100];
        bump[10] = 7.5;
        assert!(dominant_frequency(&bump, 0.1).is_some());
    }
}

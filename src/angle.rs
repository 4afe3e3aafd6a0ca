//! Angular math kernel: pure functions over plain `f64`s, no I/O, tested
//! in isolation the way `rhorizons::utilities::take_or_empty` is.

/// Shortest arc between two longitudes, in `[0, 180]`.
pub fn angle(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

/// Strict local maximum at `cur`: `cur` must exceed `prev`, and be at least
/// `nxt`. The asymmetry (`>` vs `>=`) prevents a flat plateau from firing a
/// maximum at every minute of the plateau, while still firing exactly once
/// at the plateau's leading edge.
pub fn is_maximum(prev: f64, cur: f64, nxt: f64) -> bool {
    cur > prev && cur >= nxt
}

/// Strict local minimum at `cur`, with the same asymmetric tie policy as
/// [`is_maximum`].
pub fn is_minimum(prev: f64, cur: f64, nxt: f64) -> bool {
    cur < prev && cur <= nxt
}

/// `true` iff the signal crossed `thr` upward between `prev` and `cur`.
pub fn threshold_crossing_up(thr: f64, prev: f64, cur: f64) -> bool {
    prev < thr && cur >= thr
}

/// `true` iff the signal crossed `thr` downward between `prev` and `cur`.
pub fn threshold_crossing_down(thr: f64, prev: f64, cur: f64) -> bool {
    prev > thr && cur <= thr
}

/// `true` iff the signal wrapped from just under 360° to just over 0°
/// between `prev` and `cur`, used for the Aries-ingress / vernal-equinox
/// class of 0°-threshold detections.
pub fn wrap_crossing_down(prev: f64, cur: f64) -> bool {
    cur < 180.0 && prev > 180.0
}

/// Lexicographic k-subsets of `items`.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 {
        return vec![vec![]];
    }
    if k > items.len() {
        return vec![];
    }
    let mut result = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        result.push(idx.iter().map(|&i| items[i].clone()).collect());

        // Advance to the next lexicographic combination of indices.
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if idx[i] != i + items.len() - k {
                break;
            }
            if i == 0 {
                return result;
            }
        }
        idx[i] += 1;
        for j in (i + 1)..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

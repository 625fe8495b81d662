use std::f64::consts::{PI, TAU};

/// Normalizes an angle to `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Signed smallest difference `b - a`, in `(-π, π]`.
#[must_use]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut d = normalize_angle(b) - normalize_angle(a);
    if d > PI {
        d -= TAU;
    } else if d <= -PI {
        d += TAU;
    }
    d
}

/// Returns `true` if two direction angles point in opposite directions,
/// i.e. their difference is within `tolerance` radians of π.
#[must_use]
pub fn directions_opposite(a: f64, b: f64, tolerance: f64) -> bool {
    (angle_diff(a, b).abs() - PI).abs() <= tolerance
}

/// The rotation that aligns direction angle `from` with direction angle `to`,
/// treating `to` and `to + π` as equivalent (a wall segment has no inherent
/// orientation). Returns whichever of the parallel or anti-parallel
/// alignments requires the smaller absolute angle change.
#[must_use]
pub fn alignment_rotation(from: f64, to: f64) -> f64 {
    let parallel = angle_diff(from, to);
    let anti = angle_diff(from, to + PI);
    if parallel.abs() <= anti.abs() {
        parallel
    } else {
        anti
    }
}

/// Snaps an angle to the nearest multiple of `increment`, then normalizes.
#[must_use]
pub fn snap_angle(angle: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return normalize_angle(angle);
    }
    normalize_angle((angle / increment).round() * increment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-12;

    #[test]
    fn normalize_negative() {
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn normalize_above_tau() {
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < TOL);
    }

    #[test]
    fn normalize_is_idempotent() {
        let a = normalize_angle(-7.3);
        assert!((normalize_angle(a) - a).abs() < TOL);
    }

    #[test]
    fn diff_wraps_shortest_way() {
        // From 350° to 10° is +20°, not -340°.
        let d = angle_diff(350.0_f64.to_radians(), 10.0_f64.to_radians());
        assert!((d - 20.0_f64.to_radians()).abs() < 1e-9, "d={d}");
    }

    #[test]
    fn opposite_within_tolerance() {
        let tol = 10.0_f64.to_radians();
        assert!(directions_opposite(0.0, PI, tol));
        assert!(directions_opposite(0.0, PI + 0.1, tol));
        assert!(!directions_opposite(0.0, FRAC_PI_2, tol));
    }

    #[test]
    fn alignment_picks_smaller_rotation() {
        // Aligning 0° with 170°: anti-parallel (-10°) beats parallel (+170°).
        let r = alignment_rotation(0.0, 170.0_f64.to_radians());
        assert!((r + 10.0_f64.to_radians()).abs() < 1e-9, "r={r}");
    }

    #[test]
    fn alignment_parallel_when_closer() {
        let r = alignment_rotation(0.0, 20.0_f64.to_radians());
        assert!((r - 20.0_f64.to_radians()).abs() < 1e-9, "r={r}");
    }

    #[test]
    fn snap_angle_to_15_degrees() {
        let inc = 15.0_f64.to_radians();
        let a = snap_angle(16.0_f64.to_radians(), inc);
        assert!((a - inc).abs() < 1e-9, "a={a}");
        let b = snap_angle(352.6_f64.to_radians(), inc);
        assert!(b.abs() < 1e-9 || (b - TAU).abs() < 1e-9, "b={b}");
    }
}

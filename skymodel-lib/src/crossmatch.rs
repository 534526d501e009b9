//! Nearest-neighbour matching of sky positions.
//!
//! Each query point is matched to the closest reference point by great-circle
//! distance. The search is one-sided: two query points may share a reference.

/// The nearest reference point for one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyMatch {
    /// Index into the reference positions.
    pub index: usize,
    /// Angular separation in degrees.
    pub separation_deg: f64,
}

impl SkyMatch {
    /// Whether this match counts as a duplicate for the given radius.
    pub fn within(&self, radius_deg: f64) -> bool {
        self.separation_deg <= radius_deg
    }
}

/// Reference positions prepared for repeated nearest-neighbour queries.
pub struct SkyMatcher {
    /// Unit vectors of the reference positions; `None` where unset.
    vectors: Vec<Option<[f64; 3]>>,
    positions: Vec<Option<(f64, f64)>>,
}

impl SkyMatcher {
    pub fn new(reference: &[Option<(f64, f64)>]) -> Self {
        Self {
            vectors: reference
                .iter()
                .map(|p| p.map(|(ra, dec)| unit_vector(ra, dec)))
                .collect(),
            positions: reference.to_vec(),
        }
    }

    /// Nearest reference point to `(ra, dec)` in degrees. Ties go to the
    /// lowest index.
    pub fn nearest(&self, ra: f64, dec: f64) -> Option<SkyMatch> {
        let query = unit_vector(ra, dec);
        let mut best: Option<(usize, f64)> = None;
        for (i, v) in self.vectors.iter().enumerate() {
            let Some(v) = v else { continue };
            let dot = v[0] * query[0] + v[1] * query[1] + v[2] * query[2];
            if best.is_none_or(|(_, d)| dot > d) {
                best = Some((i, dot));
            }
        }
        let (index, _) = best?;
        let (ra1, dec1) = self.positions[index]?;
        Some(SkyMatch {
            index,
            separation_deg: angular_separation_deg(ra1, dec1, ra, dec),
        })
    }
}

/// For every query position, its nearest reference position.
pub fn match_positions(
    reference: &[Option<(f64, f64)>],
    query: &[Option<(f64, f64)>],
) -> Vec<Option<SkyMatch>> {
    let matcher = SkyMatcher::new(reference);
    query
        .iter()
        .map(|p| p.and_then(|(ra, dec)| matcher.nearest(ra, dec)))
        .collect()
}

fn unit_vector(ra_deg: f64, dec_deg: f64) -> [f64; 3] {
    let (sin_ra, cos_ra) = ra_deg.to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec_deg.to_radians().sin_cos();
    [cos_dec * cos_ra, cos_dec * sin_ra, sin_dec]
}

/// Great-circle separation in degrees (Vincenty formula, stable at all
/// distances).
pub fn angular_separation_deg(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (sin1, cos1) = dec1.to_radians().sin_cos();
    let (sin2, cos2) = dec2.to_radians().sin_cos();
    let (sin_dl, cos_dl) = (ra2 - ra1).to_radians().sin_cos();

    let num = ((cos2 * sin_dl).powi(2) + (cos1 * sin2 - sin1 * cos2 * cos_dl).powi(2)).sqrt();
    let den = sin1 * sin2 + cos1 * cos2 * cos_dl;
    num.atan2(den).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separation() {
        assert!((angular_separation_deg(0.0, 0.0, 90.0, 0.0) - 90.0).abs() < 1e-12);
        assert!((angular_separation_deg(10.0, 89.0, 190.0, 89.0) - 2.0).abs() < 1e-9);
        assert!(angular_separation_deg(123.4, -45.6, 123.4, -45.6).abs() < 1e-12);
        // 10 arcsec in RA at Dec 0
        let sep = angular_separation_deg(10.0, 0.0, 10.0 + 10.0 / 3600.0, 0.0);
        assert!((sep * 3600.0 - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_and_ties() {
        let reference = [Some((10.0, 0.0)), Some((20.0, 0.0)), Some((10.0, 0.0)), None];
        let matches = match_positions(&reference, &[Some((11.0, 0.0)), Some((19.0, 1.0)), None]);
        assert_eq!(matches[0].unwrap().index, 0);
        assert!((matches[0].unwrap().separation_deg - 1.0).abs() < 1e-9);
        assert_eq!(matches[1].unwrap().index, 1);
        assert!(matches[2].is_none());
    }

    #[test]
    fn test_one_sided() {
        let reference = [Some((0.0, 0.0))];
        let matches = match_positions(&reference, &[Some((0.0, 1.0)), Some((0.0, -1.0))]);
        assert!(matches.iter().all(|m| m.unwrap().index == 0));
    }

    #[test]
    fn test_empty_reference() {
        assert_eq!(match_positions(&[], &[Some((0.0, 0.0))]), vec![None]);
    }

    #[test]
    fn test_within() {
        let m = SkyMatch {
            index: 0,
            separation_deg: 0.5,
        };
        assert!(m.within(0.5));
        assert!(!m.within(0.1));
        assert!(!m.within(-1.0));
    }
}

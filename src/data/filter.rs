use super::model::Dataset;

// ---------------------------------------------------------------------------
// Peak subset: rows strictly above both thresholds
// ---------------------------------------------------------------------------

/// The rows of a [`Dataset`] that pass both thresholds, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakSubset {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PeakSubset {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Arithmetic mean of the Y values; `None` for an empty subset.
    pub fn mean_y(&self) -> Option<f64> {
        if self.y.is_empty() {
            return None;
        }
        Some(self.y.iter().sum::<f64>() / self.y.len() as f64)
    }
}

/// Select rows with `y > y_threshold` and `x > x_threshold`.
///
/// Both comparisons are strict, so rows sitting exactly on a threshold are
/// excluded. NaN cells never pass.
pub fn peak_subset(dataset: &Dataset, y_threshold: f64, x_threshold: f64) -> PeakSubset {
    let (x, y) = dataset
        .points()
        .filter(|&(x, y)| y > y_threshold && x > x_threshold)
        .unzip();
    PeakSubset { x, y }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sample() -> Dataset {
        Dataset::from_points("time", "current", &[(0.0, 1.0), (1.0, 5.0), (2.0, 10.0)]).unwrap()
    }

    #[test]
    fn keeps_rows_above_both_thresholds() {
        let subset = peak_subset(&sample(), 3.0, 0.0);
        assert_eq!(subset.points().collect::<Vec<_>>(), vec![(1.0, 5.0), (2.0, 10.0)]);
        assert_relative_eq!(subset.mean_y().unwrap(), 7.5);
    }

    #[test]
    fn boundary_values_are_excluded() {
        // y == 5 and x == 1 sit exactly on the thresholds
        let subset = peak_subset(&sample(), 5.0, 0.0);
        assert_eq!(subset.points().collect::<Vec<_>>(), vec![(2.0, 10.0)]);

        let subset = peak_subset(&sample(), 0.0, 1.0);
        assert_eq!(subset.points().collect::<Vec<_>>(), vec![(2.0, 10.0)]);
    }

    #[test]
    fn x_threshold_zero_drops_the_first_sample() {
        let subset = peak_subset(&sample(), 0.0, 0.0);
        assert_eq!(subset.len(), 2);
    }

    #[test]
    fn empty_subset_has_no_mean() {
        let subset = peak_subset(&sample(), 100.0, 0.0);
        assert!(subset.is_empty());
        assert_eq!(subset.mean_y(), None);
    }

    #[test]
    fn nan_rows_never_pass() {
        let ds = Dataset::from_points("t", "i", &[(1.0, f64::NAN), (f64::NAN, 4.0), (2.0, 4.0)])
            .unwrap();
        let subset = peak_subset(&ds, 0.0, 0.0);
        assert_eq!(subset.points().collect::<Vec<_>>(), vec![(2.0, 4.0)]);
    }

    #[test]
    fn tiny_thresholds_behave_like_the_measured_currents() {
        let ds = Dataset::from_points(
            "Time (s)",
            "Current (A)",
            &[(0.5, 1.0e-6), (1.0, 3.0e-6), (1.5, 4.0e-6), (2.0, 2.0e-6)],
        )
        .unwrap();
        let subset = peak_subset(&ds, 2.5e-6, 0.0);
        assert_eq!(subset.len(), 2);
        assert_relative_eq!(subset.mean_y().unwrap(), 3.5e-6, max_relative = 1e-12);
    }
}

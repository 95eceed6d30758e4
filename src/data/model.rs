use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Dataset – the loaded two-column table
// ---------------------------------------------------------------------------

/// A measurement curve: X (usually time) against Y (usually current).
///
/// Always holds at least one row and the same number of X and Y values.
/// There is no mutable access once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x_label: String,
    y_label: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Dataset {
    /// Build a dataset from column names and values.
    pub fn new(
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        x: Vec<f64>,
        y: Vec<f64>,
    ) -> Result<Self, LoadError> {
        if x.len() != y.len() {
            return Err(LoadError::EmptyOrMalformed(format!(
                "x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(LoadError::EmptyOrMalformed("no data rows".into()));
        }
        Ok(Dataset {
            x_label: x_label.into(),
            y_label: y_label.into(),
            x,
            y,
        })
    }

    /// Convenience constructor from `(x, y)` pairs.
    pub fn from_points(
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: &[(f64, f64)],
    ) -> Result<Self, LoadError> {
        let (x, y) = points.iter().copied().unzip();
        Self::new(x_label, y_label, x, y)
    }

    /// Name of the first data column (X axis).
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    /// Name of the second data column (Y axis).
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Rows as `(x, y)` pairs in file order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.x.len()
    }
}

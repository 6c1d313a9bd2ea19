use tracing::{debug, warn};

/// An ordered set of named numeric features.
///
/// The regressor reads values by position, so after [`FeatureRow::reindex`]
/// the order of columns is the order the model was trained with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, f64)>,
    filled: Vec<String>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns that [`FeatureRow::reindex`] had to fill with 0.
    pub fn filled_columns(&self) -> &[String] {
        &self.filled
    }

    /// Lay the row out as `feature_names`, in that order.
    ///
    /// Names the row does not have become 0; names the artifact does not know
    /// are dropped. Both are logged.
    pub fn reindex(&self, feature_names: &[String]) -> FeatureRow {
        let mut filled = Vec::new();
        let columns: Vec<(String, f64)> = feature_names
            .iter()
            .map(|name| {
                let value = self.get(name).unwrap_or_else(|| {
                    filled.push(name.clone());
                    0.0
                });
                (name.clone(), value)
            })
            .collect();

        if !filled.is_empty() {
            warn!(
                filled = filled.len(),
                expected = feature_names.len(),
                columns = ?filled,
                "Feature columns missing from request row, filled with 0"
            );
        }

        let dropped: Vec<&str> = self
            .names()
            .filter(|n| !feature_names.iter().any(|f| f == n))
            .collect();
        if !dropped.is_empty() {
            debug!(columns = ?dropped, "Dropping feature columns unknown to the model");
        }

        FeatureRow { columns, filled }
    }
}

impl FromIterator<(String, f64)> for FeatureRow {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut row = FeatureRow::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

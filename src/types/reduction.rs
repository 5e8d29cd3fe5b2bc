use crate::types::statistic::Statistic;
use serde::{Deserialize, Serialize};

/// One requested (column, statistic) pair of an aggregation.
///
/// The output column is named after the source column unless an alias is given,
/// which lets the same column be reduced by several statistics in one call.
///
/// # Examples
///
/// ```
/// use irish_climate::{Reduction, Statistic};
///
/// let mean_rain = Reduction::new("rain", Statistic::Mean);
/// assert_eq!(mean_rain.output_name(), "rain");
///
/// let max_rain = Reduction::new("rain", Statistic::Max).alias("rain_max");
/// assert_eq!(max_rain.output_name(), "rain_max");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reduction {
    /// Name of the measurement column to reduce.
    pub column: String,
    /// Statistic applied to the column within each bucket.
    pub statistic: Statistic,
    /// Output column name; defaults to `column`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Reduction {
    pub fn new(column: impl Into<String>, statistic: Statistic) -> Self {
        Self {
            column: column.into(),
            statistic,
            alias: None,
        }
    }

    /// Renames the output column of this reduction.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column)
    }

    /// One reduction per column, all using the same statistic.
    pub fn for_columns<S: AsRef<str>>(columns: &[S], statistic: Statistic) -> Vec<Reduction> {
        columns
            .iter()
            .map(|column| Reduction::new(column.as_ref(), statistic))
            .collect()
    }
}

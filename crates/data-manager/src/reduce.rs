//! Single-value reductions over aligned columns, as consumed by stat and
//! gauge panels. Nulls are gaps and never count.

use panel_charts_shared::ChartData;
use serde::{Deserialize, Serialize};

/// Reduction applied to one series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    Last,
    First,
    Min,
    Max,
    Mean,
    Sum,
    Count,
}

impl Reduction {
    /// Reduce the non-null values of `column`. `Count` is always `Some`;
    /// every other reduction is `None` for a column with no values.
    pub fn apply(self, column: &[Option<f64>]) -> Option<f64> {
        let mut values = column.iter().flatten().copied();
        match self {
            Reduction::Last => values.last(),
            Reduction::First => values.next(),
            Reduction::Min => values.reduce(f64::min),
            Reduction::Max => values.reduce(f64::max),
            Reduction::Sum => values.reduce(|a, b| a + b),
            Reduction::Mean => {
                let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
                (count > 0).then(|| sum / count as f64)
            }
            Reduction::Count => Some(values.count() as f64),
        }
    }
}

/// Reductions addressed by series name
pub trait SeriesReduce {
    /// Reduce the named series; `None` if the series does not exist or has
    /// nothing to reduce.
    fn reduce_series(&self, name: &str, reduction: Reduction) -> Option<f64>;

    /// Reduce every series, in series order.
    fn reduce_all(&self, reduction: Reduction) -> Vec<(String, Option<f64>)>;
}

impl SeriesReduce for ChartData {
    fn reduce_series(&self, name: &str, reduction: Reduction) -> Option<f64> {
        reduction.apply(self.series_column(name)?)
    }

    fn reduce_all(&self, reduction: Reduction) -> Vec<(String, Option<f64>)> {
        self.series()
            .iter()
            .zip(self.value_columns())
            .map(|(name, column)| (name.clone(), reduction.apply(column)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_charts_shared::TransformMetadata;

    const COLUMN: [Option<f64>; 5] = [None, Some(4.0), Some(-2.0), None, Some(10.0)];

    #[test]
    fn test_reductions_skip_gaps() {
        assert_eq!(Reduction::First.apply(&COLUMN), Some(4.0));
        assert_eq!(Reduction::Last.apply(&COLUMN), Some(10.0));
        assert_eq!(Reduction::Min.apply(&COLUMN), Some(-2.0));
        assert_eq!(Reduction::Max.apply(&COLUMN), Some(10.0));
        assert_eq!(Reduction::Sum.apply(&COLUMN), Some(12.0));
        assert_eq!(Reduction::Mean.apply(&COLUMN), Some(4.0));
        assert_eq!(Reduction::Count.apply(&COLUMN), Some(3.0));
    }

    #[test]
    fn test_empty_column() {
        let empty = [None, None];
        assert_eq!(Reduction::Mean.apply(&empty), None);
        assert_eq!(Reduction::Last.apply(&empty), None);
        assert_eq!(Reduction::Count.apply(&empty), Some(0.0));
    }

    #[test]
    fn test_reduce_by_series_name() {
        let data = ChartData::from_parts(
            vec![1.0, 2.0],
            vec![vec![Some(1.0), Some(3.0)], vec![None, Some(5.0)]],
            vec!["a".to_string(), "b".to_string()],
            TransformMetadata::default(),
        )
        .unwrap();

        assert_eq!(data.reduce_series("a", Reduction::Mean), Some(2.0));
        assert_eq!(data.reduce_series("missing", Reduction::Count), None);
        assert_eq!(
            data.reduce_all(Reduction::Last),
            vec![("a".to_string(), Some(3.0)), ("b".to_string(), Some(5.0))]
        );
    }

    #[test]
    fn test_reduction_wire_names() {
        let reduction: Reduction = serde_json::from_str("\"mean\"").unwrap();
        assert_eq!(reduction, Reduction::Mean);
    }
}

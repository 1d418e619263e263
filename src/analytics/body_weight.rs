//! Body-weight trend

use crate::analytics::SeriesPoint;
use crate::model::BodyWeightEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct BodyWeightSummary {
    /// Entries ordered by date
    pub series: Vec<SeriesPoint<f64>>,
    pub first: f64,
    pub last: f64,
    pub min: f64,
    pub max: f64,
}

impl BodyWeightSummary {
    /// `None` when nothing has been logged yet
    pub fn from_entries(entries: &[BodyWeightEntry]) -> Option<Self> {
        let mut series: Vec<_> = entries
            .iter()
            .map(|e| SeriesPoint { date: e.date, value: e.weight })
            .collect();
        series.sort_by_key(|p| p.date);

        let first = series.first()?.value;
        let last = series.last()?.value;
        let min = series.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = series.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);

        Some(Self { series, first, last, min, max })
    }

    pub fn change(&self) -> f64 {
        self.last - self.first
    }

    /// Change from first to last entry, in percent of the first
    pub fn change_percent(&self) -> f64 {
        if self.first == 0.0 {
            return 0.0;
        }
        self.change() / self.first * 100.0
    }

    /// One-line trend for CLI output
    pub fn format(&self, unit: &str) -> String {
        let sign = if self.change() >= 0.0 { "+" } else { "" };
        format!(
            "{} {} ({}{:.1}, {}{:.1}%) | min {} | max {}",
            self.last,
            unit,
            sign,
            self.change(),
            sign,
            self.change_percent(),
            self.min,
            self.max
        )
    }
}

//! Per-material results and the summary bar chart.

use std::fmt;

/// Title of the summary chart.
pub const CHART_TITLE: &str = "Number of Transmitted Particles for Each Material (Gamma Rays)";
pub const CHART_X_LABEL: &str = "Material";
pub const CHART_Y_LABEL: &str = "Number of Transmitted Particles";

/// Transmitted count per material, in the order runs were recorded.
///
/// Written by the driver once per run; recording the same material again
/// replaces its count in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Results {
    entries: Vec<(String, usize)>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the transmitted count for `material`.
    pub fn record(&mut self, material: &str, transmitted: usize) {
        match self.entries.iter_mut().find(|(name, _)| name == material) {
            Some(entry) => entry.1 = transmitted,
            None => self.entries.push((material.to_string(), transmitted)),
        }
    }

    pub fn get(&self, material: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == material)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bar chart keyed by material name, in recording order.
    pub fn bar_chart(&self) -> BarChart {
        BarChart {
            title: CHART_TITLE.to_string(),
            x_label: CHART_X_LABEL.to_string(),
            y_label: CHART_Y_LABEL.to_string(),
            labels: self.entries.iter().map(|(name, _)| name.clone()).collect(),
            values: self.entries.iter().map(|(_, count)| *count).collect(),
        }
    }
}

/// A labelled bar chart: `labels[i]` has height `values[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl BarChart {
    pub fn max_value(&self) -> usize {
        self.values.iter().copied().max().unwrap_or(0)
    }

    pub fn bars(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Text rendering, one row per bar, scaled to 40 columns.
impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 40;

        writeln!(f, "{}", self.title)?;
        let label_width = self.labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let max = self.max_value().max(1);
        for (label, value) in self.bars() {
            let len = (value * WIDTH).div_ceil(max);
            writeln!(
                f,
                "  {:<label_width$} |{:<bar_width$}| {}",
                label,
                "#".repeat(len),
                value,
                bar_width = WIDTH
            )?;
        }
        Ok(())
    }
}

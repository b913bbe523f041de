//! Fixed-width distribution of a bounded-risk feature over [0,1].

use serde::{Deserialize, Serialize};

use pulse_core::CustomerRecord;

/// One fixed-width bucket. Edges are inclusive-lower / exclusive-upper
/// except the final bin, which is closed on both ends so a value of
/// exactly 1.0 lands in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

impl HistogramBin {
    pub fn label(&self) -> String {
        format!("{:.1}-{:.1}", self.lower, self.upper)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bucket `field` across the records. Values outside [0,1] and
    /// non-numeric values are excluded entirely, not clamped; this is
    /// deliberately stricter than the zero-substitution rule used for
    /// means and ranges.
    pub fn compute(records: &[CustomerRecord], field: &str, bin_count: usize) -> Self {
        let bin_count = bin_count.max(1);
        let width = 1.0 / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: i as f64 * width,
                upper: (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for record in records {
            let value = match record.numeric(field) {
                Some(v) if (0.0..=1.0).contains(&v) => v,
                _ => continue,
            };
            let idx = ((value * bin_count as f64) as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Number of records that fell inside the [0,1] domain. Always at
    /// most the total record count.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

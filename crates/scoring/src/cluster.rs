//! Nearest-centroid segment assignment over pre-computed centroids.

use serde::{Deserialize, Serialize};
use tracing::debug;

use pulse_core::Centroid;

/// Result of classifying one normalized feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub index: usize,
    pub label: String,
    pub distance: f64,
}

/// Assigns normalized feature vectors to the nearest of a fixed set of
/// externally supplied centroids. The classifier never fits or mutates
/// its centroids.
#[derive(Debug, Clone)]
pub struct ClusterClassifier {
    centroids: Vec<Centroid>,
}

impl ClusterClassifier {
    pub fn new(centroids: Vec<Centroid>) -> Self {
        Self { centroids }
    }

    pub fn is_configured(&self) -> bool {
        !self.centroids.is_empty()
    }

    /// Nearest centroid by Euclidean distance. Ties go to the first
    /// centroid in scan order. `None` when no centroids are configured,
    /// which skips assignment rather than erroring.
    pub fn classify(&self, point: [f64; 3]) -> Option<ClusterAssignment> {
        let mut best: Option<ClusterAssignment> = None;

        for (index, centroid) in self.centroids.iter().enumerate() {
            let distance = euclidean_distance(point, centroid.coords);
            let closer = match &best {
                Some(current) => distance < current.distance,
                None => true,
            };
            if closer {
                best = Some(ClusterAssignment {
                    index,
                    label: centroid.label.clone(),
                    distance,
                });
            }
        }

        if let Some(assignment) = &best {
            debug!(
                cluster = assignment.index,
                label = %assignment.label,
                distance = assignment.distance,
                "segment assigned"
            );
        }
        best
    }
}

fn euclidean_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

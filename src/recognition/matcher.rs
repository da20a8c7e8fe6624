/// Embedding comparison and nearest-label matching
use serde::{Deserialize, Serialize};

/// Distance below which a probe is accepted as a known face
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 0.6;

/// Label reported when no enrolled face is close enough
pub const UNKNOWN_LABEL: &str = "unknown";

/// Face descriptor produced by the recognition capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Euclidean distance. Lower is more similar.
    ///
    /// Embeddings of different dimension never match.
    pub fn distance(&self, other: &Embedding) -> f32 {
        if self.values.len() != other.values.len() {
            return f32::INFINITY;
        }
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

/// All reference descriptors known for one label
#[derive(Debug, Clone)]
pub struct LabeledDescriptors {
    pub label: String,
    pub descriptors: Vec<Embedding>,
}

impl LabeledDescriptors {
    pub fn new(label: impl Into<String>, descriptors: Vec<Embedding>) -> Self {
        Self {
            label: label.into(),
            descriptors,
        }
    }

    /// Mean distance from `probe` to every descriptor of this label
    fn mean_distance(&self, probe: &Embedding) -> f32 {
        let total: f32 = self.descriptors.iter().map(|d| d.distance(probe)).sum();
        total / self.descriptors.len() as f32
    }
}

/// Best label for a probe
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub label: String,
    pub distance: f32,
}

impl FaceMatch {
    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }

    /// Display confidence, `round((1 - distance) * 100)`. Not a probability.
    pub fn confidence(&self) -> i32 {
        confidence_from_distance(self.distance)
    }
}

pub fn confidence_from_distance(distance: f32) -> i32 {
    ((1.0 - distance) * 100.0).round() as i32
}

/// Matches probes against a fixed set of labeled references.
///
/// Labels without any descriptor are dropped at construction.
#[derive(Debug, Clone)]
pub struct FaceMatcher {
    labeled: Vec<LabeledDescriptors>,
    threshold: f32,
}

impl FaceMatcher {
    pub fn new(labeled: Vec<LabeledDescriptors>, threshold: f32) -> Self {
        let labeled = labeled
            .into_iter()
            .filter(|l| !l.descriptors.is_empty())
            .collect();
        Self { labeled, threshold }
    }

    pub fn is_empty(&self) -> bool {
        self.labeled.is_empty()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Closest label by mean distance; `unknown` unless strictly under the threshold.
    pub fn find_best_match(&self, probe: &Embedding) -> FaceMatch {
        let best = self
            .labeled
            .iter()
            .map(|l| (l, l.mean_distance(probe)))
            .fold(None::<(&LabeledDescriptors, f32)>, |best, (l, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((l, d)),
            });

        match best {
            Some((labeled, distance)) if distance < self.threshold => FaceMatch {
                label: labeled.label.clone(),
                distance,
            },
            Some((_, distance)) => FaceMatch {
                label: UNKNOWN_LABEL.to_string(),
                distance,
            },
            None => FaceMatch {
                label: UNKNOWN_LABEL.to_string(),
                distance: f32::INFINITY,
            },
        }
    }
}

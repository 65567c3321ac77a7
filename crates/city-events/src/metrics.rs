//! Metric Vectors
//!
//! The bounded eight-field state describing a region's activity and mood.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound for every multiplicative metric.
pub const METRIC_MIN: f64 = 0.3;
/// Upper bound for every multiplicative metric.
pub const METRIC_MAX: f64 = 3.0;
/// Lower bound for sentiment.
pub const SENTIMENT_MIN: f64 = -1.0;
/// Upper bound for sentiment.
pub const SENTIMENT_MAX: f64 = 1.0;

/// One field of a [`MetricVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Traffic,
    Retail,
    Tourism,
    Nightlife,
    PublicSpaces,
    CulturalActivity,
    CommunityEngagement,
    Sentiment,
}

impl Metric {
    /// The seven multiplicative metrics, in storage order.
    pub const MULTIPLICATIVE: [Metric; 7] = [
        Metric::Traffic,
        Metric::Retail,
        Metric::Tourism,
        Metric::Nightlife,
        Metric::PublicSpaces,
        Metric::CulturalActivity,
        Metric::CommunityEngagement,
    ];

    /// Every metric including sentiment.
    pub const ALL: [Metric; 8] = [
        Metric::Traffic,
        Metric::Retail,
        Metric::Tourism,
        Metric::Nightlife,
        Metric::PublicSpaces,
        Metric::CulturalActivity,
        Metric::CommunityEngagement,
        Metric::Sentiment,
    ];

    pub fn is_sentiment(self) -> bool {
        matches!(self, Metric::Sentiment)
    }

    /// Inclusive bounds for this metric.
    pub fn bounds(self) -> (f64, f64) {
        if self.is_sentiment() {
            (SENTIMENT_MIN, SENTIMENT_MAX)
        } else {
            (METRIC_MIN, METRIC_MAX)
        }
    }

    /// Clamp a raw value into this metric's bounds. NaN maps to the neutral value.
    pub fn clamp(self, value: f64) -> f64 {
        if value.is_nan() {
            return self.neutral();
        }
        let (lo, hi) = self.bounds();
        value.clamp(lo, hi)
    }

    /// 1.0 for multiplicative metrics, 0.0 for sentiment.
    pub fn neutral(self) -> f64 {
        if self.is_sentiment() {
            0.0
        } else {
            1.0
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Traffic => "traffic",
            Metric::Retail => "retail",
            Metric::Tourism => "tourism",
            Metric::Nightlife => "nightlife",
            Metric::PublicSpaces => "public_spaces",
            Metric::CulturalActivity => "cultural_activity",
            Metric::CommunityEngagement => "community_engagement",
            Metric::Sentiment => "sentiment",
        };
        write!(f, "{}", name)
    }
}

/// Activity and mood for a cluster, neighborhood, or the whole city.
///
/// Multiplicative metrics stay within [0.3, 3.0]; sentiment within [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricVector {
    pub traffic: f64,
    pub retail: f64,
    pub tourism: f64,
    pub nightlife: f64,
    pub public_spaces: f64,
    pub cultural_activity: f64,
    pub community_engagement: f64,
    pub sentiment: f64,
}

impl Default for MetricVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl MetricVector {
    /// Every multiplicative metric at 1.0, sentiment at 0.
    pub fn neutral() -> Self {
        Self {
            traffic: 1.0,
            retail: 1.0,
            tourism: 1.0,
            nightlife: 1.0,
            public_spaces: 1.0,
            cultural_activity: 1.0,
            community_engagement: 1.0,
            sentiment: 0.0,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Traffic => self.traffic,
            Metric::Retail => self.retail,
            Metric::Tourism => self.tourism,
            Metric::Nightlife => self.nightlife,
            Metric::PublicSpaces => self.public_spaces,
            Metric::CulturalActivity => self.cultural_activity,
            Metric::CommunityEngagement => self.community_engagement,
            Metric::Sentiment => self.sentiment,
        }
    }

    /// Sets a metric, clamping it to its bounds.
    pub fn set(&mut self, metric: Metric, value: f64) {
        let value = metric.clamp(value);
        match metric {
            Metric::Traffic => self.traffic = value,
            Metric::Retail => self.retail = value,
            Metric::Tourism => self.tourism = value,
            Metric::Nightlife => self.nightlife = value,
            Metric::PublicSpaces => self.public_spaces = value,
            Metric::CulturalActivity => self.cultural_activity = value,
            Metric::CommunityEngagement => self.community_engagement = value,
            Metric::Sentiment => self.sentiment = value,
        }
    }

    /// Multiplies a non-sentiment metric and clamps.
    pub fn scale(&mut self, metric: Metric, factor: f64) {
        self.set(metric, self.get(metric) * factor);
    }

    /// Adds to a metric and clamps.
    pub fn shift(&mut self, metric: Metric, delta: f64) {
        self.set(metric, self.get(metric) + delta);
    }

    /// Clamps every field into bounds.
    pub fn clamp_all(&mut self) {
        for metric in Metric::ALL {
            self.set(metric, self.get(metric));
        }
    }

    /// True when every field is within bounds.
    pub fn is_within_bounds(&self) -> bool {
        Metric::ALL.iter().all(|&m| {
            let (lo, hi) = m.bounds();
            let v = self.get(m);
            v >= lo && v <= hi
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_vector() {
        let v = MetricVector::neutral();
        assert_eq!(v.traffic, 1.0);
        assert_eq!(v.sentiment, 0.0);
        assert!(v.is_within_bounds());
    }

    #[test]
    fn test_set_clamps() {
        let mut v = MetricVector::neutral();
        v.set(Metric::Nightlife, 9.0);
        v.set(Metric::Tourism, 0.01);
        v.set(Metric::Sentiment, -4.0);
        assert_eq!(v.nightlife, METRIC_MAX);
        assert_eq!(v.tourism, METRIC_MIN);
        assert_eq!(v.sentiment, SENTIMENT_MIN);
    }

    #[test]
    fn test_scale_and_shift() {
        let mut v = MetricVector::neutral();
        v.scale(Metric::Retail, 1.25);
        v.shift(Metric::Sentiment, 0.2);
        assert!((v.retail - 1.25).abs() < 1e-12);
        assert!((v.sentiment - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_nan_clamps_to_neutral() {
        assert_eq!(Metric::Traffic.clamp(f64::NAN), 1.0);
        assert_eq!(Metric::Sentiment.clamp(f64::NAN), 0.0);
    }

    #[test]
    fn test_metric_serialization() {
        assert_eq!(
            serde_json::to_string(&Metric::PublicSpaces).unwrap(),
            r#""public_spaces""#
        );
        assert_eq!(Metric::CommunityEngagement.to_string(), "community_engagement");
    }
}

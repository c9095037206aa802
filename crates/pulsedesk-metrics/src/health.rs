//! Health-score classification
//!
//! Two scales are in play: the dashboard and customer-detail views read a
//! 0-10 score, the admin view a 0-100 score. The dashboard and detail views
//! intentionally use different healthy/at-risk thresholds for the same
//! score; both are kept rather than unified. Classification is total over
//! all numeric input: out-of-range scores fall into the top or bottom
//! category without clamping errors.

use serde::{Deserialize, Serialize};

/// Three-level health category on the 0-10 scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthLevel {
    /// Account is in good shape
    Healthy,
    /// Account needs attention
    AtRisk,
    /// Account is in trouble
    Critical,
}

impl std::fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::AtRisk => write!(f, "At Risk"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Display color used by the admin view's 0-100 scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    /// Green / success
    Success,
    /// Amber / warning
    Warning,
    /// Red / error
    Error,
}

/// Classify a 0-10 score with the dashboard list thresholds (7 / 4)
#[must_use]
pub fn classify_dashboard(score: f64) -> HealthLevel {
    if score >= 7.0 {
        HealthLevel::Healthy
    } else if score >= 4.0 {
        HealthLevel::AtRisk
    } else {
        HealthLevel::Critical
    }
}

/// Classify a 0-10 score with the customer-detail thresholds (8 / 6)
#[must_use]
pub fn classify_detail(score: f64) -> HealthLevel {
    if score >= 8.0 {
        HealthLevel::Healthy
    } else if score >= 6.0 {
        HealthLevel::AtRisk
    } else {
        HealthLevel::Critical
    }
}

/// Classify a 0-100 admin-view score into its display color (80 / 60)
#[must_use]
pub fn classify_admin(score: f64) -> StatusColor {
    if score >= 80.0 {
        StatusColor::Success
    } else if score >= 60.0 {
        StatusColor::Warning
    } else {
        StatusColor::Error
    }
}

/// Display color for a 0-10 health level
#[must_use]
pub const fn color_for(level: HealthLevel) -> StatusColor {
    match level {
        HealthLevel::Healthy => StatusColor::Success,
        HealthLevel::AtRisk => StatusColor::Warning,
        HealthLevel::Critical => StatusColor::Error,
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_dashboard_thresholds() {
        assert_eq!(classify_dashboard(8.0), HealthLevel::Healthy);
        assert_eq!(classify_dashboard(7.0), HealthLevel::Healthy);
        assert_eq!(classify_dashboard(6.9), HealthLevel::AtRisk);
        assert_eq!(classify_dashboard(6.0), HealthLevel::AtRisk);
        assert_eq!(classify_dashboard(4.0), HealthLevel::AtRisk);
        assert_eq!(classify_dashboard(3.0), HealthLevel::Critical);
    }

    #[test]
    fn test_detail_thresholds_differ_from_dashboard() {
        // Same score, different view, different category
        assert_eq!(classify_detail(7.0), HealthLevel::AtRisk);
        assert_eq!(classify_dashboard(7.0), HealthLevel::Healthy);

        assert_eq!(classify_detail(8.0), HealthLevel::Healthy);
        assert_eq!(classify_detail(6.0), HealthLevel::AtRisk);
        assert_eq!(classify_detail(5.9), HealthLevel::Critical);
    }

    #[test]
    fn test_admin_scale() {
        assert_eq!(classify_admin(85.0), StatusColor::Success);
        assert_eq!(classify_admin(80.0), StatusColor::Success);
        assert_eq!(classify_admin(65.0), StatusColor::Warning);
        assert_eq!(classify_admin(60.0), StatusColor::Warning);
        assert_eq!(classify_admin(10.0), StatusColor::Error);
    }

    #[test]
    fn test_no_clamping_at_domain_edges() {
        assert_eq!(classify_dashboard(11.5), HealthLevel::Healthy);
        assert_eq!(classify_dashboard(-3.0), HealthLevel::Critical);
        assert_eq!(classify_admin(150.0), StatusColor::Success);
        assert_eq!(classify_admin(-1.0), StatusColor::Error);
    }

    #[test]
    fn test_level_display_and_color() {
        assert_eq!(format!("{}", HealthLevel::AtRisk), "At Risk");
        assert_eq!(color_for(HealthLevel::Healthy), StatusColor::Success);
        assert_eq!(color_for(HealthLevel::AtRisk), StatusColor::Warning);
        assert_eq!(color_for(HealthLevel::Critical), StatusColor::Error);
    }

    proptest! {
        #[test]
        fn prop_classification_total_and_monotonic(a in -50.0f64..50.0, b in -50.0f64..50.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let rank = |level: HealthLevel| match level {
                HealthLevel::Critical => 0,
                HealthLevel::AtRisk => 1,
                HealthLevel::Healthy => 2,
            };
            prop_assert!(rank(classify_dashboard(low)) <= rank(classify_dashboard(high)));
            prop_assert!(rank(classify_detail(low)) <= rank(classify_detail(high)));
        }
    }
}

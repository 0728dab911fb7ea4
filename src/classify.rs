use crate::registry::ThresholdBand;

/// Sentinel returned when no band matches or there was no data to classify.
pub const UNKNOWN_LABEL: &str = "unknown";
pub const NEUTRAL_COLOR: &str = "gray";

/// First-match classification in declaration order. Later bands can act as
/// catch-alls; overlapping bands resolve to the earliest one.
pub fn classify(value: f64, bands: &[ThresholdBand]) -> (&str, &str) {
    bands
        .iter()
        .find(|band| band.contains(value))
        .map(|band| (band.label.as_str(), band.color.as_str()))
        .unwrap_or((UNKNOWN_LABEL, NEUTRAL_COLOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(label: &str, min: Option<f64>, max: Option<f64>) -> ThresholdBand {
        ThresholdBand {
            label: label.to_string(),
            min,
            max,
            color: format!("{}-color", label),
        }
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let bands = vec![band("A", None, Some(10.0)), band("B", Some(5.0), None)];
        let (label, color) = classify(7.0, &bands);
        assert_eq!(label, "A");
        assert_eq!(color, "A-color");
    }

    #[test]
    fn test_gap_between_bands_is_unknown() {
        let bands = vec![band("excellent", None, Some(3.0)), band("critical", Some(10.0), None)];
        assert_eq!(classify(5.0, &bands), (UNKNOWN_LABEL, NEUTRAL_COLOR));
    }

    #[test]
    fn test_min_inclusive_max_exclusive() {
        let bands = vec![
            band("low", None, Some(85.0)),
            band("mid", Some(85.0), Some(95.0)),
            band("high", Some(95.0), None),
        ];
        assert_eq!(classify(84.999, &bands).0, "low");
        assert_eq!(classify(85.0, &bands).0, "mid");
        assert_eq!(classify(94.999, &bands).0, "mid");
        assert_eq!(classify(95.0, &bands).0, "high");
    }

    #[test]
    fn test_catch_all_band() {
        let bands = vec![band("good", Some(90.0), None), band("rest", None, None)];
        assert_eq!(classify(12.0, &bands).0, "rest");
        assert_eq!(classify(91.0, &bands).0, "good");
    }

    #[test]
    fn test_empty_band_list_is_unknown() {
        assert_eq!(classify(50.0, &[]), (UNKNOWN_LABEL, NEUTRAL_COLOR));
    }
}

//! Rule-based recommendation engine.
//!
//! A fixed rule table keyed off the diagnosis label. The keyword-substring
//! policy mirrors the label conventions of the class registry and must not be
//! generalized: the registry is an external contract.

/// Maximum number of recommendations per report.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Maintenance advice for healthy plants.
const HEALTHY_RECOMMENDATIONS: [&str; 3] = [
    "Continue current maintenance practices",
    "Regular monitoring for early disease detection",
    "Maintain proper irrigation and fertilization schedule",
];

/// General disease-management advice, in priority order.
const DISEASE_RECOMMENDATIONS: [&str; 5] = [
    "Isolate affected plants to prevent disease spread",
    "Consider appropriate fungicide/pesticide treatment",
    "Improve air circulation around plants",
    "Remove and destroy infected plant material",
    "Adjust watering practices to avoid leaf wetness",
];

/// Keyword-specific tips, scanned in priority order; at most one is appended.
const KEYWORD_TIPS: [(&str, &str); 4] = [
    ("scab", "Apply protective fungicide during wet periods"),
    ("blight", "Ensure proper plant spacing for better airflow"),
    ("rust", "Remove alternate host plants from vicinity"),
    ("bacterial", "Use copper-based bactericides as preventive measure"),
];

/// Generate recommendations for a diagnosis.
///
/// Pure function of the label; the confidence is part of the contract but the
/// current rule table does not branch on it. The result is always at most
/// [`MAX_RECOMMENDATIONS`] entries, and when a keyword tip matches it is the
/// final entry.
pub fn recommendations_for(label: &str, _confidence: f32) -> Vec<String> {
    let lowered = label.to_lowercase();

    if lowered.contains("healthy") {
        return HEALTHY_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect();
    }

    let mut recommendations: Vec<String> = DISEASE_RECOMMENDATIONS
        .iter()
        .map(|s| s.to_string())
        .collect();

    // First keyword match wins; the tip replaces the tail of the generic list
    // so it survives the cut to three entries
    if let Some(&(_, tip)) = KEYWORD_TIPS
        .iter()
        .find(|&&(keyword, _)| lowered.contains(keyword))
    {
        recommendations.truncate(MAX_RECOMMENDATIONS - 1);
        recommendations.push(tip.to_string());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_label_gets_maintenance_list() {
        let recs = recommendations_for("Apple___healthy", 95.0);
        assert_eq!(
            recs,
            vec![
                "Continue current maintenance practices",
                "Regular monitoring for early disease detection",
                "Maintain proper irrigation and fertilization schedule",
            ]
        );
    }

    #[test]
    fn test_scab_label_ends_with_fungicide_tip() {
        let recs = recommendations_for("Apple___Apple_scab", 12.0);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0], "Isolate affected plants to prevent disease spread");
        assert_eq!(recs[1], "Consider appropriate fungicide/pesticide treatment");
        assert_eq!(recs[2], "Apply protective fungicide during wet periods");
    }

    #[test]
    fn test_blight_label_ends_with_spacing_tip() {
        let recs = recommendations_for("Potato___Late_blight", 70.0);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[2], "Ensure proper plant spacing for better airflow");
    }

    #[test]
    fn test_rust_and_bacterial_tips() {
        let recs = recommendations_for("Corn_(maize)___Common_rust_", 50.0);
        assert_eq!(recs[2], "Remove alternate host plants from vicinity");

        let recs = recommendations_for("Pepper,_bell___Bacterial_spot", 50.0);
        assert_eq!(recs[2], "Use copper-based bactericides as preventive measure");
    }

    #[test]
    fn test_no_keyword_yields_generic_head() {
        let recs = recommendations_for("Tomato___Leaf_Mold", 88.0);
        assert_eq!(
            recs,
            vec![
                "Isolate affected plants to prevent disease spread",
                "Consider appropriate fungicide/pesticide treatment",
                "Improve air circulation around plants",
            ]
        );
    }

    #[test]
    fn test_keyword_priority_order() {
        // "scab" beats "blight" when both appear
        let recs = recommendations_for("Test___scab_blight", 50.0);
        assert_eq!(recs[2], "Apply protective fungicide during wet periods");
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let recs = recommendations_for("TOMATO___EARLY_BLIGHT", 50.0);
        assert_eq!(recs[2], "Ensure proper plant spacing for better airflow");
    }

    #[test]
    fn test_confidence_does_not_change_output() {
        let low = recommendations_for("Apple___Apple_scab", 1.0);
        let high = recommendations_for("Apple___Apple_scab", 99.9);
        assert_eq!(low, high);
    }
}

use crate::image_classifier::interface::Prediction;
use crate::prediction::label_metadata::{Accent, LabelMetadataTable};

/// Predictions ordered by descending confidence. Only [`RankedPredictions::rank`]
/// builds one, so index 0 is always the best class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedPredictions(Vec<Prediction>);

impl RankedPredictions {
    /// Stable sort, so equal confidences keep the classifier's order.
    pub fn rank(mut predictions: Vec<Prediction>) -> Self {
        predictions.sort_by(|a, b| sort_key(b.confidence).total_cmp(&sort_key(a.confidence)));
        Self(predictions)
    }

    pub fn best(&self) -> Option<&Prediction> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prediction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn confidence_sum(&self) -> f32 {
        self.0.iter().map(|p| p.confidence).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.label.as_str())
    }
}

fn sort_key(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence
    }
}

pub fn format_percent(confidence: f32) -> String {
    format!("{:.1}%", confidence * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub best_label: String,
    pub display_label: String,
    pub percent_text: String,
    pub headline: String,
    pub description: String,
    pub accent: Accent,
}

impl ResultSummary {
    pub fn from_ranked(ranked: &RankedPredictions, metadata: &LabelMetadataTable) -> Option<Self> {
        let best = ranked.best()?;
        let resolved = metadata.resolve(&best.label);
        let percent_text = format_percent(best.confidence);
        Some(Self {
            headline: format!(
                "Your image is {} likely to be \"{}\".",
                percent_text, resolved.display_label
            ),
            best_label: best.label.clone(),
            display_label: resolved.display_label,
            percent_text,
            description: resolved.message,
            accent: resolved.accent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::label_metadata::LabelMetadata;

    fn prediction(label: &str, confidence: f32) -> Prediction {
        Prediction {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_rank_sorts_descending() {
        let ranked = RankedPredictions::rank(vec![
            prediction("a", 0.1),
            prediction("b", 0.6),
            prediction("c", 0.3),
        ]);

        assert_eq!(ranked.labels().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        let confidences: Vec<f32> = ranked.iter().map(|p| p.confidence).collect();
        assert!(confidences.windows(2).all(|w| w[0] >= w[1]));
        assert!((ranked.confidence_sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_keeps_collaborator_order_for_ties() {
        let ranked = RankedPredictions::rank(vec![
            prediction("first", 0.25),
            prediction("top", 0.5),
            prediction("second", 0.25),
        ]);

        assert_eq!(
            ranked.labels().collect::<Vec<_>>(),
            vec!["top", "first", "second"]
        );
    }

    #[test]
    fn test_nan_ranks_as_zero() {
        let ranked = RankedPredictions::rank(vec![prediction("nan", f32::NAN), prediction("ok", 0.2)]);

        assert_eq!(ranked.best().unwrap().label, "ok");
    }

    #[test]
    fn test_format_percent_uses_one_decimal() {
        assert_eq!(format_percent(0.83), "83.0%");
        assert_eq!(format_percent(0.1234), "12.3%");
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_summary_mentions_best_label_and_percent() {
        let ranked = RankedPredictions::rank(vec![prediction("B", 0.17), prediction("A", 0.83)]);

        let summary = ResultSummary::from_ranked(&ranked, &LabelMetadataTable::new()).unwrap();

        assert_eq!(summary.best_label, "A");
        assert_eq!(summary.percent_text, "83.0%");
        assert_eq!(summary.headline, "Your image is 83.0% likely to be \"A\".");
    }

    #[test]
    fn test_summary_uses_label_metadata() {
        let mut metadata = LabelMetadataTable::new();
        metadata.insert(
            "A",
            LabelMetadata {
                display_label: "Cat person".to_string(),
                message: "Independent.".to_string(),
                accent: Accent::Rgb([1, 2, 3]),
            },
        );
        let ranked = RankedPredictions::rank(vec![prediction("A", 0.9), prediction("B", 0.1)]);

        let summary = ResultSummary::from_ranked(&ranked, &metadata).unwrap();

        assert_eq!(summary.display_label, "Cat person");
        assert_eq!(summary.description, "Independent.");
        assert_eq!(summary.accent, Accent::Rgb([1, 2, 3]));
        assert!(summary.headline.contains("\"Cat person\""));
    }

    #[test]
    fn test_empty_prediction_set_has_no_summary() {
        let ranked = RankedPredictions::rank(vec![]);

        assert!(ResultSummary::from_ranked(&ranked, &LabelMetadataTable::new()).is_none());
    }
}

use crate::prediction::label_metadata::{Accent, LabelMetadataTable};
use crate::prediction::rank::{format_percent, RankedPredictions};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub label: String,
    pub raw_label: String,
    pub fill: f32,
    pub percent_text: String,
    pub emphasized: bool,
    pub accent: Accent,
}

/// How a stream update finds the row to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKeying {
    /// Row `i` shows whichever class ranks `i` this tick.
    Rank,
    /// Each class keeps the slot it got on the first tick.
    #[default]
    Label,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Vec<DisplayRow>,
    slots: HashMap<String, usize>,
    #[cfg(test)]
    builds: u64,
}

impl RowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    /// Number of times the rows were created from scratch.
    #[cfg(test)]
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.slots.clear();
    }

    pub fn rebuild(&mut self, ranked: &RankedPredictions, metadata: &LabelMetadataTable) {
        self.clear();
        for (rank, prediction) in ranked.iter().enumerate() {
            self.slots.insert(prediction.label.clone(), rank);
            self.rows.push(DisplayRow {
                label: String::new(),
                raw_label: String::new(),
                fill: 0.0,
                percent_text: String::new(),
                emphasized: false,
                accent: Accent::Muted,
            });
            fill_row(&mut self.rows[rank], &prediction.label, prediction.confidence, rank == 0, metadata);
        }
        #[cfg(test)]
        {
            self.builds += 1;
        }
    }

    /// Mutates existing rows when they cover the same classes, rebuilds otherwise.
    pub fn update_in_place(
        &mut self,
        ranked: &RankedPredictions,
        metadata: &LabelMetadataTable,
        keying: RowKeying,
    ) {
        if !self.covers_same_labels(ranked) {
            self.rebuild(ranked, metadata);
            return;
        }

        for (rank, prediction) in ranked.iter().enumerate() {
            let slot = match keying {
                RowKeying::Rank => rank,
                RowKeying::Label => self.slots[&prediction.label],
            };
            fill_row(&mut self.rows[slot], &prediction.label, prediction.confidence, rank == 0, metadata);
        }

        if keying == RowKeying::Rank {
            for (slot, row) in self.rows.iter().enumerate() {
                self.slots.insert(row.raw_label.clone(), slot);
            }
        }
    }

    fn covers_same_labels(&self, ranked: &RankedPredictions) -> bool {
        !self.rows.is_empty()
            && self.rows.len() == ranked.len()
            && self.slots.len() == ranked.len()
            && ranked.labels().all(|label| self.slots.contains_key(label))
    }
}

fn fill_row(
    row: &mut DisplayRow,
    raw_label: &str,
    confidence: f32,
    emphasized: bool,
    metadata: &LabelMetadataTable,
) {
    let resolved = metadata.resolve(raw_label);
    if row.raw_label != raw_label {
        row.raw_label = raw_label.to_string();
        row.label = resolved.display_label;
    }
    row.fill = confidence.clamp(0.0, 1.0);
    row.percent_text = format_percent(confidence);
    row.emphasized = emphasized;
    row.accent = if emphasized { resolved.accent } else { Accent::Muted };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::interface::Prediction;

    fn ranked(pairs: &[(&str, f32)]) -> RankedPredictions {
        RankedPredictions::rank(
            pairs
                .iter()
                .map(|(label, confidence)| Prediction {
                    label: label.to_string(),
                    confidence: *confidence,
                })
                .collect(),
        )
    }

    #[test]
    fn test_rebuild_emphasizes_best_row_only() {
        let mut rows = RowSet::new();

        rows.rebuild(&ranked(&[("A", 0.83), ("B", 0.17)]), &LabelMetadataTable::new());

        let rows = rows.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "A");
        assert_eq!(rows[0].percent_text, "83.0%");
        assert!((rows[0].fill - 0.83).abs() < 1e-6);
        assert!(rows[0].emphasized);
        assert_eq!(rows[0].accent, Accent::Default);
        assert_eq!(rows[1].label, "B");
        assert_eq!(rows[1].percent_text, "17.0%");
        assert!(!rows[1].emphasized);
        assert_eq!(rows[1].accent, Accent::Muted);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let predictions = ranked(&[("x", 0.5), ("y", 0.3), ("z", 0.2)]);
        let metadata = LabelMetadataTable::new();
        let mut rows = RowSet::new();

        rows.rebuild(&predictions, &metadata);
        let first = rows.rows().to_vec();
        rows.rebuild(&predictions, &metadata);

        assert_eq!(rows.rows(), first.as_slice());
        assert_eq!(rows.builds(), 2);
    }

    #[test]
    fn test_first_stream_update_builds_rows() {
        let mut rows = RowSet::new();

        rows.update_in_place(
            &ranked(&[("A", 0.6), ("B", 0.4)]),
            &LabelMetadataTable::new(),
            RowKeying::Label,
        );

        assert_eq!(rows.builds(), 1);
        assert_eq!(rows.rows().len(), 2);
    }

    #[test]
    fn test_label_keyed_update_keeps_each_class_in_its_slot() {
        let metadata = LabelMetadataTable::new();
        let mut rows = RowSet::new();
        rows.update_in_place(&ranked(&[("A", 0.6), ("B", 0.4)]), &metadata, RowKeying::Label);

        rows.update_in_place(&ranked(&[("A", 0.2), ("B", 0.8)]), &metadata, RowKeying::Label);

        assert_eq!(rows.builds(), 1);
        let rows = rows.rows();
        assert_eq!(rows[0].label, "A");
        assert_eq!(rows[0].percent_text, "20.0%");
        assert!(!rows[0].emphasized);
        assert_eq!(rows[1].label, "B");
        assert_eq!(rows[1].percent_text, "80.0%");
        assert!(rows[1].emphasized);
    }

    #[test]
    fn test_rank_keyed_update_rewrites_rows_by_position() {
        let metadata = LabelMetadataTable::new();
        let mut rows = RowSet::new();
        rows.update_in_place(&ranked(&[("A", 0.6), ("B", 0.4)]), &metadata, RowKeying::Rank);

        rows.update_in_place(&ranked(&[("A", 0.2), ("B", 0.8)]), &metadata, RowKeying::Rank);

        assert_eq!(rows.builds(), 1);
        let rows = rows.rows();
        assert_eq!(rows[0].label, "B");
        assert!(rows[0].emphasized);
        assert_eq!(rows[1].label, "A");
        assert_eq!(rows[1].percent_text, "20.0%");
    }

    #[test]
    fn test_changed_label_set_rebuilds() {
        let metadata = LabelMetadataTable::new();
        let mut rows = RowSet::new();
        rows.update_in_place(&ranked(&[("A", 0.6), ("B", 0.4)]), &metadata, RowKeying::Label);

        rows.update_in_place(&ranked(&[("A", 0.6), ("C", 0.4)]), &metadata, RowKeying::Label);

        assert_eq!(rows.rows()[1].label, "C");
        assert_eq!(rows.builds(), 2);
    }

    #[test]
    fn test_rows_preserve_confidences() {
        let predictions = ranked(&[("a", 0.25), ("b", 0.5), ("c", 0.25)]);
        let mut rows = RowSet::new();

        rows.rebuild(&predictions, &LabelMetadataTable::new());

        let sum: f32 = rows.rows().iter().map(|r| r.fill).sum();
        assert!((sum - predictions.confidence_sum()).abs() < 1e-6);
    }
}

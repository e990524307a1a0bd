use std::collections::HashMap;

use super::EntityEncoder;

/// Fixed label vocabulary mapping opaque ids to dense indices.
///
/// `fit` reproduces the training pipeline's categorical encoder: classes
/// are sorted and deduplicated, so index order is stable across refits on
/// the same data. `from_classes` preserves a serialized artifact's order
/// as-is.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelVocabulary {
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self::from_classes(classes)
    }

    pub fn from_classes(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self { classes, index }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl EntityEncoder for LabelVocabulary {
    fn known(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn encode(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.classes.len()
    }
}

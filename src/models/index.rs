// src/models/index.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The corpus index document: which topics each subject holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusIndex {
    /// Subjects in document order.
    #[serde(default)]
    pub subjects: IndexMap<String, SubjectEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectEntry {
    /// Authoritative topic list, when the index carries one.
    #[serde(rename = "topicList", default, skip_serializing_if = "Option::is_none")]
    pub topic_list: Option<Vec<String>>,

    /// Topic metadata keyed by topic name. Only the keys are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SubjectEntry {
    /// Topic names of this subject: `topicList` if present, else the sorted keys of `topics`.
    pub fn topic_names(&self) -> Vec<String> {
        if let Some(list) = &self.topic_list {
            return list.clone();
        }
        let mut names: Vec<String> = self
            .topics
            .as_ref()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl CorpusIndex {
    /// Flattened `subject -> topics` view, used for error context and the chapter listing.
    pub fn chapter_listing(&self) -> IndexMap<String, Vec<String>> {
        self.subjects
            .iter()
            .map(|(name, entry)| (name.clone(), entry.topic_names()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_list_wins_over_topics() {
        let index: CorpusIndex = serde_json::from_str(
            r#"{"subjects":{"physics":{"topicList":["Units","Kinematics"],"topics":{"Zeta":{}}}}}"#,
        )
        .unwrap();
        assert_eq!(
            index.subjects["physics"].topic_names(),
            vec!["Units", "Kinematics"]
        );
    }

    #[test]
    fn topics_keys_are_sorted() {
        let index: CorpusIndex = serde_json::from_str(
            r#"{"subjects":{"chemistry":{"topics":{"Mole Concept":{"n":3},"Atomic Structure":{}}}}}"#,
        )
        .unwrap();
        assert_eq!(
            index.subjects["chemistry"].topic_names(),
            vec!["Atomic Structure", "Mole Concept"]
        );
    }

    #[test]
    fn subjects_keep_document_order() {
        let index: CorpusIndex = serde_json::from_str(
            r#"{"subjects":{"zoology":{},"botany":{"topicList":["Cells"]},"maths":{}}}"#,
        )
        .unwrap();
        let names: Vec<_> = index.chapter_listing().into_keys().collect();
        assert_eq!(names, vec!["zoology", "botany", "maths"]);
    }

    #[test]
    fn subject_without_topics_is_empty() {
        let index: CorpusIndex = serde_json::from_str(r#"{"subjects":{"maths":{}}}"#).unwrap();
        assert!(index.chapter_listing()["maths"].is_empty());
    }
}

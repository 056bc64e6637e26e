//! The worksheet document printed by the command line.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use spellkit_core::{
    CategoryCatalog, CategoryId, CategoryInfo, ExerciseSet, GradeLevel, Timestamp, WordItem,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub title: String,
    pub grade: GradeLevel,
    pub categories: Vec<CategoryId>,
    pub words: Vec<WordItem>,
    pub exercises: ExerciseSet,
    /// Rule cards for the handbook section, with rhyme and explanation
    #[serde(default)]
    pub rules: Vec<CategoryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

impl Worksheet {
    pub fn new(
        title: impl Into<String>,
        grade: GradeLevel,
        categories: Vec<CategoryId>,
        words: Vec<WordItem>,
        exercises: ExerciseSet,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            title: title.into(),
            grade,
            categories,
            words,
            exercises,
            rules: Vec::new(),
            story: None,
        }
    }

    /// Attach the catalog entry of every worksheet category, in request order.
    pub fn with_rules(mut self, catalog: &CategoryCatalog) -> Self {
        self.rules = self
            .categories
            .iter()
            .filter_map(|id| catalog.get(*id).cloned())
            .collect();
        self
    }

    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story = Some(story.into());
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// "Groep 5: Zingwoorden, Luchtwoorden"
pub fn default_title(grade: GradeLevel, categories: &[CategoryId], catalog: &CategoryCatalog) -> String {
    let names: Vec<String> = categories.iter().map(|id| catalog.name(*id)).collect();
    format!("Groep {}: {}", grade, names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_worksheet_has_fresh_id() {
        let a = Worksheet::new("a", GradeLevel::Group4, vec![2], vec![], ExerciseSet::empty());
        let b = Worksheet::new("b", GradeLevel::Group4, vec![2], vec![], ExerciseSet::empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.get_version_num(), 7);
        assert!(a.story.is_none());
    }

    #[test]
    fn test_json_document_shape() {
        let words = vec![WordItem::bare("koning", 2)];
        let sheet = Worksheet::new("Test", GradeLevel::Group78, vec![2], words, ExerciseSet::empty())
            .with_story("De **koning** lacht.");

        let value: serde_json::Value = serde_json::from_str(&sheet.to_json().unwrap()).unwrap();
        assert_eq!(value["grade"], "7/8");
        assert_eq!(value["categories"], serde_json::json!([2]));
        assert_eq!(value["title"], "Test");
        assert_eq!(value["story"], "De **koning** lacht.");
        assert!(value["exercises"].is_object());
    }

    #[test]
    fn test_rule_cards_carry_mnemonics() {
        let catalog = CategoryCatalog::builtin();
        let sheet = Worksheet::new("Ei", GradeLevel::Group5, vec![36, 99, 24], vec![], ExerciseSet::empty())
            .with_rules(catalog);

        assert_eq!(sheet.rules.len(), 2);
        let value: serde_json::Value = serde_json::from_str(&sheet.to_json().unwrap()).unwrap();
        assert_eq!(value["rules"][0]["id"], 36);
        assert!(value["rules"][0]["rhyme"].as_str().unwrap().starts_with("EI RAP:"));
        assert_eq!(value["rules"][1]["explanation"], "cadeau, bureau");
        assert!(value["rules"][1].get("rhyme").is_none());
    }

    #[test]
    fn test_default_title_lists_category_names() {
        let catalog = CategoryCatalog::builtin();
        let title = default_title(GradeLevel::Group5, &[2, 8], catalog);
        assert!(title.starts_with("Groep 5: "));
        assert!(title.contains(&catalog.name(2)));
        assert!(title.contains(&catalog.name(8)));
    }
}

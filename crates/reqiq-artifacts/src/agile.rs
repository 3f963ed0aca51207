//! Agile backlog schema: epics, user stories, Gherkin acceptance criteria.

use serde::{Deserialize, Serialize};

use crate::shared::{Confidence, MoscowPriority};

/// Fibonacci scale for story point estimates.
const FIBONACCI_POINTS: [u32; 6] = [1, 2, 3, 5, 8, 13];

fn default_story_points() -> u32 {
    3
}

/// Given / When / Then acceptance criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    pub given: String,
    pub when: String,
    pub then: String,
}

/// One user story in "As a [role], I want to [action] so that [benefit]" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub story: String,
    #[serde(default = "default_story_points")]
    pub story_points: u32,
    #[serde(default)]
    pub priority: MoscowPriority,
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub stories: Vec<UserStory>,
}

/// A complete agile backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgileBacklog {
    pub epics: Vec<Epic>,
    #[serde(default)]
    pub overall_confidence: Confidence,
}

impl AgileBacklog {
    /// Total number of stories across all epics.
    #[must_use]
    pub fn story_count(&self) -> usize {
        self.epics.iter().map(|e| e.stories.len()).sum()
    }

    /// Semantic contract rules on top of the schema shape.
    ///
    /// # Errors
    /// Returns a human-readable rule description on the first violation.
    pub(crate) fn check_rules(&self) -> Result<(), String> {
        for epic in &self.epics {
            if epic.id.trim().is_empty() {
                return Err("epic id must not be empty".to_string());
            }
            for story in &epic.stories {
                if story.id.trim().is_empty() {
                    return Err("story id must not be empty".to_string());
                }
                if !FIBONACCI_POINTS.contains(&story.story_points) {
                    return Err(format!(
                        "story {} has non-Fibonacci points {} (allowed: 1, 2, 3, 5, 8, 13)",
                        story.id, story.story_points
                    ));
                }
                for criterion in &story.acceptance_criteria {
                    if criterion.given.trim().is_empty()
                        || criterion.when.trim().is_empty()
                        || criterion.then.trim().is_empty()
                    {
                        return Err(format!(
                            "story {} has an acceptance criterion with an empty Gherkin clause",
                            story.id
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backlog_json(points: u32) -> serde_json::Value {
        serde_json::json!({
            "epics": [{
                "id": "EP-001",
                "title": "Epic",
                "description": "Desc",
                "stories": [{
                    "id": "US-001",
                    "title": "Story",
                    "story": "As a user, I want X so that Y",
                    "story_points": points,
                    "acceptance_criteria": [
                        {"given": "a state", "when": "an action", "then": "an outcome"}
                    ]
                }]
            }]
        })
    }

    #[test]
    fn valid_backlog_passes_rules() {
        let backlog: AgileBacklog = serde_json::from_value(backlog_json(5)).unwrap();
        assert!(backlog.check_rules().is_ok());
        assert_eq!(backlog.story_count(), 1);
    }

    #[test]
    fn story_points_default_to_three() {
        let mut value = backlog_json(5);
        value["epics"][0]["stories"][0]
            .as_object_mut()
            .unwrap()
            .remove("story_points");
        let backlog: AgileBacklog = serde_json::from_value(value).unwrap();
        assert_eq!(backlog.epics[0].stories[0].story_points, 3);
    }

    #[test]
    fn non_fibonacci_points_break_the_contract() {
        let backlog: AgileBacklog = serde_json::from_value(backlog_json(4)).unwrap();
        let err = backlog.check_rules().unwrap_err();
        assert!(err.contains("non-Fibonacci"));
    }

    #[test]
    fn empty_gherkin_clause_breaks_the_contract() {
        let mut value = backlog_json(3);
        value["epics"][0]["stories"][0]["acceptance_criteria"][0]["when"] = "".into();
        let backlog: AgileBacklog = serde_json::from_value(value).unwrap();
        let err = backlog.check_rules().unwrap_err();
        assert!(err.contains("Gherkin"));
    }
}

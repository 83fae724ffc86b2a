//! Keyword-scored, deterministic free-text classification.
//!
//! No LLM, no learned weights: a curated keyword table per intent, scored
//! and ranked. Small enough to audit by reading the table.

use coach_contracts::{AgentType, Intent};

use crate::table::route_intent;

/// `(phrase, weight)`. Phrases are matched as substrings of the
/// lowercased, whitespace-normalized message; weight scales each match.
type Keywords = &'static [(&'static str, f64)];

const KEYWORD_TABLE: &[(Intent, Keywords)] = &[
    (Intent::AssessSkillLevel, &[("assess", 2.0), ("skill level", 2.0), ("evaluate my knowledge", 1.0), ("quiz me", 1.0)]),
    (Intent::UpdateGoals, &[("goal", 2.0), ("want to learn", 1.5), ("objective", 1.0)]),
    (Intent::SetConstraints, &[("constraint", 2.0), ("available time", 1.5), ("minutes per day", 1.5), ("schedule", 1.0)]),
    (Intent::CreateProfile, &[("create profile", 2.0), ("sign up", 1.5), ("new account", 1.0)]),
    (Intent::UpdateProfile, &[("update profile", 2.0), ("change my name", 1.0), ("edit profile", 1.5)]),
    (Intent::GetProfile, &[("my profile", 2.0), ("who am i", 1.0), ("show profile", 1.5)]),
    (Intent::ParseTimeframe, &[("timeframe", 2.0), ("deadline", 1.5), ("by when", 1.0)]),
    (Intent::CreateLearningPath, &[("learning path", 2.0), ("curriculum", 1.5), ("study plan", 1.5)]),
    (Intent::GenerateCurriculum, &[("generate curriculum", 2.0), ("build a plan", 1.5)]),
    (Intent::UpdateCurriculum, &[("update curriculum", 2.0), ("change my plan", 1.5)]),
    (Intent::AdaptDifficulty, &[("too hard", 2.0), ("too easy", 2.0), ("adjust difficulty", 2.0), ("harder", 1.0), ("easier", 1.0)]),
    (Intent::RequestNextTopic, &[("next topic", 2.0), ("what's next", 1.5), ("continue", 1.0)]),
    (Intent::GetCurriculumStatus, &[("curriculum status", 2.0), ("where am i in my plan", 1.5)]),
    (Intent::ScheduleSpacedRepetition, &[("spaced repetition", 2.0), ("review schedule", 1.5)]),
    (Intent::AddMiniProject, &[("mini project", 2.0), ("small project", 1.5)]),
    (Intent::AdjustPacing, &[("pacing", 2.0), ("slow down", 1.5), ("speed up", 1.5)]),
    (Intent::GenerateExercise, &[("exercise", 2.0), ("give me a problem", 1.5), ("practice problem", 1.5)]),
    (Intent::CreateTestCases, &[("test cases", 2.0), ("unit tests for", 1.5)]),
    (Intent::GenerateHints, &[("hint", 2.0), ("i'm stuck", 1.5), ("give me a clue", 1.0)]),
    (Intent::CreateStretchExercise, &[("stretch exercise", 2.0), ("more challenging", 1.5)]),
    (Intent::CreateRecapExercise, &[("recap exercise", 2.0), ("review exercise", 1.5)]),
    (Intent::GenerateProjectExercise, &[("project exercise", 2.0), ("bigger project", 1.0)]),
    (Intent::EvaluateSubmission, &[("submit", 2.0), ("check my code", 1.5), ("grade this", 1.5)]),
    (Intent::RunTests, &[("run tests", 2.0), ("run the tests", 2.0)]),
    (Intent::GenerateFeedback, &[("feedback", 2.0), ("how did i do", 1.5)]),
    (Intent::CheckCodeQuality, &[("code quality", 2.0), ("code review", 1.5), ("clean code", 1.0)]),
    (Intent::CompareSubmissions, &[("compare", 2.0), ("which version is better", 1.5)]),
    (Intent::ValidateSolution, &[("is this correct", 2.0), ("validate", 1.5)]),
    (Intent::SearchResources, &[("find resources", 2.0), ("search for", 1.5), ("look up", 1.0)]),
    (Intent::GetResourceContent, &[("show me the article", 1.5), ("resource content", 2.0)]),
    (Intent::RecommendResources, &[("recommend", 2.0), ("suggest a tutorial", 1.5)]),
    (Intent::VerifyResourceQuality, &[("is this source good", 1.5), ("verify resource", 2.0)]),
    (Intent::FindRelatedResources, &[("related resources", 2.0), ("similar articles", 1.5)]),
    (Intent::CurateLearningPathResources, &[("curate resources", 2.0), ("resources for my path", 1.5)]),
    (Intent::CheckProgress, &[("my progress", 2.0), ("how am i doing", 1.5)]),
    (Intent::GetDailyTasks, &[("today's tasks", 2.0), ("what should i do today", 1.5)]),
    (Intent::RecordAttempt, &[("record attempt", 2.0), ("log my submission", 1.5)]),
    (Intent::DetectAdaptationTriggers, &[("adaptation trigger", 2.0), ("need to adapt", 1.5)]),
    (Intent::GetProgressVisualization, &[("progress chart", 2.0), ("visualize my progress", 1.5)]),
    (Intent::ReviewMistakes, &[("review my mistakes", 2.0), ("what did i get wrong", 1.5)]),
    (Intent::GetRecommendations, &[("what should i study next", 1.5), ("recommendations", 2.0)]),
    (Intent::GetStreakInfo, &[("streak", 2.0), ("how many days in a row", 1.5)]),
    (Intent::CalculateMetrics, &[("metrics", 2.0), ("calculate stats", 1.5)]),
];

#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub intent: Option<Intent>,
    pub target_agent: Option<AgentType>,
    pub confidence: f64,
    pub alternative_intents: Vec<(Intent, f64)>,
}

fn normalize(message: &str) -> String {
    let lower = message.to_lowercase();
    lower
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn classify(message: &str) -> Classification {
    let normalized = normalize(message);
    if normalized.is_empty() {
        return Classification::default();
    }

    let mut scores: Vec<(Intent, f64)> = Vec::with_capacity(KEYWORD_TABLE.len());
    for (intent, keywords) in KEYWORD_TABLE {
        let mut score = 0.0;
        for (phrase, weight) in *keywords {
            let matches = normalized.matches(phrase).count();
            if matches > 0 {
                score += weight * matches as f64;
            }
        }
        scores.push((*intent, score));
    }

    let total: f64 = scores.iter().map(|(_, s)| s).filter(|s| *s > 0.0).sum();
    if total <= 0.0 {
        return Classification::default();
    }

    // Declaration order (KEYWORD_TABLE order) breaks ties: the first max
    // encountered while scanning in order wins.
    let mut best_idx = 0usize;
    for (idx, (_, score)) in scores.iter().enumerate() {
        if *score > scores[best_idx].1 {
            best_idx = idx;
        }
    }
    let (best_intent, best_score) = scores[best_idx];

    let mut alternatives: Vec<(Intent, f64)> = scores
        .iter()
        .enumerate()
        .filter(|(idx, (_, s))| *idx != best_idx && *s > 0.0)
        .map(|(_, (i, s))| (*i, *s))
        .collect();
    alternatives.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    alternatives.truncate(3);

    Classification {
        intent: Some(best_intent),
        target_agent: Some(route_intent(best_intent)),
        confidence: best_score / total,
        alternative_intents: alternatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_yields_no_intent() {
        let c = classify("   ");
        assert!(c.intent.is_none());
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn unmatched_message_yields_no_intent() {
        let c = classify("the weather is nice today");
        assert!(c.intent.is_none());
    }

    #[test]
    fn clear_match_yields_high_confidence() {
        let c = classify("I'm stuck, can you give me a hint?");
        assert_eq!(c.intent, Some(Intent::GenerateHints));
        assert_eq!(c.target_agent, Some(AgentType::ExerciseGenerator));
        assert!(c.confidence > 0.5);
    }

    #[test]
    fn ambiguous_message_returns_low_confidence_with_alternatives() {
        let c = classify("this is too hard but I want a hint too hard hint");
        assert!(c.intent.is_some());
        // both "too hard" (AdaptDifficulty) and "hint" (GenerateHints) fire.
        assert!(!c.alternative_intents.is_empty() || c.confidence < 1.0);
    }
}

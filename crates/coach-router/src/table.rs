//! The static, immutable `Intent -> AgentType` table.
//!
//! Every enumerated intent appears exactly once. `adapt_difficulty` is
//! accepted by both the Curriculum Planner and the Exercise Generator at
//! the agent level (see `coach_contracts::Agent::supported_intents`), but
//! this table — the one thing `route_intent` and free-text classification
//! consult — resolves it to the Curriculum Planner, matching the
//! `exercise_submission` workflow's adaptation branch. A workflow step
//! that wants the Exercise Generator's own `adapt_difficulty` handler
//! targets it directly by `agent_type` and bypasses this table entirely.

use coach_contracts::{AgentType, Intent};

pub fn route_intent(intent: Intent) -> AgentType {
    use AgentType::*;
    match intent {
        Intent::AssessSkillLevel
        | Intent::UpdateGoals
        | Intent::SetConstraints
        | Intent::CreateProfile
        | Intent::UpdateProfile
        | Intent::GetProfile
        | Intent::ParseTimeframe => Profile,

        Intent::CreateLearningPath
        | Intent::GenerateCurriculum
        | Intent::UpdateCurriculum
        | Intent::AdaptDifficulty
        | Intent::RequestNextTopic
        | Intent::GetCurriculumStatus
        | Intent::ScheduleSpacedRepetition
        | Intent::AddMiniProject
        | Intent::AdjustPacing => CurriculumPlanner,

        Intent::GenerateExercise
        | Intent::CreateTestCases
        | Intent::GenerateHints
        | Intent::CreateStretchExercise
        | Intent::CreateRecapExercise
        | Intent::GenerateProjectExercise => ExerciseGenerator,

        Intent::EvaluateSubmission
        | Intent::RunTests
        | Intent::GenerateFeedback
        | Intent::CheckCodeQuality
        | Intent::CompareSubmissions
        | Intent::ValidateSolution => Reviewer,

        Intent::SearchResources
        | Intent::GetResourceContent
        | Intent::RecommendResources
        | Intent::VerifyResourceQuality
        | Intent::FindRelatedResources
        | Intent::CurateLearningPathResources => Resources,

        Intent::CheckProgress
        | Intent::GetDailyTasks
        | Intent::RecordAttempt
        | Intent::DetectAdaptationTriggers
        | Intent::GetProgressVisualization
        | Intent::ReviewMistakes
        | Intent::GetRecommendations
        | Intent::GetStreakInfo
        | Intent::CalculateMetrics => ProgressTracker,
    }
}

/// Parses a wire-format intent tag (`"get_profile"`) back into an [`Intent`].
/// Returns `None` for anything not in the closed vocabulary.
pub fn route_intent_string(tag: &str) -> Option<AgentType> {
    intent_from_str(tag).map(route_intent)
}

pub fn intent_from_str(tag: &str) -> Option<Intent> {
    Intent::ALL.iter().copied().find(|i| i.as_str() == tag)
}

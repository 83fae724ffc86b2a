//! The closed vocabulary shared by every agent, the router and the registry.

use serde::{Deserialize, Serialize};

/// The seven agent roles in the coordination core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Profile,
    CurriculumPlanner,
    ExerciseGenerator,
    Reviewer,
    Resources,
    ProgressTracker,
    Orchestrator,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Profile => "profile",
            AgentType::CurriculumPlanner => "curriculum_planner",
            AgentType::ExerciseGenerator => "exercise_generator",
            AgentType::Reviewer => "reviewer",
            AgentType::Resources => "resources",
            AgentType::ProgressTracker => "progress_tracker",
            AgentType::Orchestrator => "orchestrator",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed set of intents the coordination core understands. Every
/// variant routes, through the static table or a workflow step, to exactly
/// one [`AgentType`] — see `coach-router` for the canonical mapping and
/// `DESIGN.md` for the one documented overlap (`AdaptDifficulty`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    // Profile
    AssessSkillLevel,
    UpdateGoals,
    SetConstraints,
    CreateProfile,
    UpdateProfile,
    GetProfile,
    ParseTimeframe,

    // Curriculum Planner
    CreateLearningPath,
    GenerateCurriculum,
    UpdateCurriculum,
    AdaptDifficulty,
    RequestNextTopic,
    GetCurriculumStatus,
    ScheduleSpacedRepetition,
    AddMiniProject,
    AdjustPacing,

    // Exercise Generator
    GenerateExercise,
    CreateTestCases,
    GenerateHints,
    CreateStretchExercise,
    CreateRecapExercise,
    GenerateProjectExercise,

    // Reviewer
    EvaluateSubmission,
    RunTests,
    GenerateFeedback,
    CheckCodeQuality,
    CompareSubmissions,
    ValidateSolution,

    // Resources
    SearchResources,
    GetResourceContent,
    RecommendResources,
    VerifyResourceQuality,
    FindRelatedResources,
    CurateLearningPathResources,

    // Progress Tracker
    CheckProgress,
    GetDailyTasks,
    RecordAttempt,
    DetectAdaptationTriggers,
    GetProgressVisualization,
    ReviewMistakes,
    GetRecommendations,
    GetStreakInfo,
    CalculateMetrics,
}

impl Intent {
    /// All intents, in declaration order. Used by the router to build its
    /// static table and by tests asserting the table's covering property.
    pub const ALL: &'static [Intent] = &[
        Intent::AssessSkillLevel,
        Intent::UpdateGoals,
        Intent::SetConstraints,
        Intent::CreateProfile,
        Intent::UpdateProfile,
        Intent::GetProfile,
        Intent::ParseTimeframe,
        Intent::CreateLearningPath,
        Intent::GenerateCurriculum,
        Intent::UpdateCurriculum,
        Intent::AdaptDifficulty,
        Intent::RequestNextTopic,
        Intent::GetCurriculumStatus,
        Intent::ScheduleSpacedRepetition,
        Intent::AddMiniProject,
        Intent::AdjustPacing,
        Intent::GenerateExercise,
        Intent::CreateTestCases,
        Intent::GenerateHints,
        Intent::CreateStretchExercise,
        Intent::CreateRecapExercise,
        Intent::GenerateProjectExercise,
        Intent::EvaluateSubmission,
        Intent::RunTests,
        Intent::GenerateFeedback,
        Intent::CheckCodeQuality,
        Intent::CompareSubmissions,
        Intent::ValidateSolution,
        Intent::SearchResources,
        Intent::GetResourceContent,
        Intent::RecommendResources,
        Intent::VerifyResourceQuality,
        Intent::FindRelatedResources,
        Intent::CurateLearningPathResources,
        Intent::CheckProgress,
        Intent::GetDailyTasks,
        Intent::RecordAttempt,
        Intent::DetectAdaptationTriggers,
        Intent::GetProgressVisualization,
        Intent::ReviewMistakes,
        Intent::GetRecommendations,
        Intent::GetStreakInfo,
        Intent::CalculateMetrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::AssessSkillLevel => "assess_skill_level",
            Intent::UpdateGoals => "update_goals",
            Intent::SetConstraints => "set_constraints",
            Intent::CreateProfile => "create_profile",
            Intent::UpdateProfile => "update_profile",
            Intent::GetProfile => "get_profile",
            Intent::ParseTimeframe => "parse_timeframe",
            Intent::CreateLearningPath => "create_learning_path",
            Intent::GenerateCurriculum => "generate_curriculum",
            Intent::UpdateCurriculum => "update_curriculum",
            Intent::AdaptDifficulty => "adapt_difficulty",
            Intent::RequestNextTopic => "request_next_topic",
            Intent::GetCurriculumStatus => "get_curriculum_status",
            Intent::ScheduleSpacedRepetition => "schedule_spaced_repetition",
            Intent::AddMiniProject => "add_mini_project",
            Intent::AdjustPacing => "adjust_pacing",
            Intent::GenerateExercise => "generate_exercise",
            Intent::CreateTestCases => "create_test_cases",
            Intent::GenerateHints => "generate_hints",
            Intent::CreateStretchExercise => "create_stretch_exercise",
            Intent::CreateRecapExercise => "create_recap_exercise",
            Intent::GenerateProjectExercise => "generate_project_exercise",
            Intent::EvaluateSubmission => "evaluate_submission",
            Intent::RunTests => "run_tests",
            Intent::GenerateFeedback => "generate_feedback",
            Intent::CheckCodeQuality => "check_code_quality",
            Intent::CompareSubmissions => "compare_submissions",
            Intent::ValidateSolution => "validate_solution",
            Intent::SearchResources => "search_resources",
            Intent::GetResourceContent => "get_resource_content",
            Intent::RecommendResources => "recommend_resources",
            Intent::VerifyResourceQuality => "verify_resource_quality",
            Intent::FindRelatedResources => "find_related_resources",
            Intent::CurateLearningPathResources => "curate_learning_path_resources",
            Intent::CheckProgress => "check_progress",
            Intent::GetDailyTasks => "get_daily_tasks",
            Intent::RecordAttempt => "record_attempt",
            Intent::DetectAdaptationTriggers => "detect_adaptation_triggers",
            Intent::GetProgressVisualization => "get_progress_visualization",
            Intent::ReviewMistakes => "review_mistakes",
            Intent::GetRecommendations => "get_recommendations",
            Intent::GetStreakInfo => "get_streak_info",
            Intent::CalculateMetrics => "calculate_metrics",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Streak computation over a user's submission activity.

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_at_risk: bool,
    pub days_until_streak_lost: u32,
}

impl Default for StreakInfo {
    fn default() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            streak_at_risk: false,
            days_until_streak_lost: 0,
        }
    }
}

/// Projects submission timestamps onto local calendar days, then computes
/// current and longest streaks over the descending-sorted unique day set.
///
/// Current streak: the longest prefix `d0, d1, ...` of that set such that
/// `d0` is today or yesterday and each `d[i-1] - d[i]` is exactly one day.
/// Longest streak: the longest run of consecutive days anywhere in the set.
pub fn calculate_streak(submission_days: &[DateTime<Utc>], now: DateTime<Utc>) -> StreakInfo {
    if submission_days.is_empty() {
        return StreakInfo::default();
    }

    let mut days: Vec<NaiveDate> = submission_days.iter().map(|d| d.date_naive()).collect();
    days.sort_unstable();
    days.dedup();
    days.reverse(); // descending

    let today = now.date_naive();
    let last_activity = days[0];

    let mut current_streak = 0u32;
    let mut check_date = today;
    for &day in &days {
        if day == check_date || day == check_date - chrono::Duration::days(1) {
            current_streak += 1;
            check_date = day - chrono::Duration::days(1);
        } else {
            break;
        }
    }

    let mut longest_streak = 0u32;
    let mut run = 1u32;
    for i in 1..days.len() {
        if (days[i - 1] - days[i]).num_days() == 1 {
            run += 1;
        } else {
            longest_streak = longest_streak.max(run);
            run = 1;
        }
    }
    longest_streak = longest_streak.max(run).max(current_streak);

    let days_since_activity = (today - last_activity).num_days().max(0) as u32;
    let streak_at_risk = days_since_activity >= 1 && current_streak > 0;
    let days_until_streak_lost = if current_streak > 0 {
        2u32.saturating_sub(days_since_activity)
    } else {
        0
    };

    StreakInfo {
        current_streak,
        longest_streak,
        streak_at_risk,
        days_until_streak_lost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn days_ago(now: DateTime<Utc>, n: i64) -> DateTime<Utc> {
        now - Duration::days(n)
    }

    #[test]
    fn no_submissions_yields_zeroed_streak() {
        let info = calculate_streak(&[], Utc::now());
        assert_eq!(info, StreakInfo::default());
    }

    #[test]
    fn consecutive_days_ending_today_form_a_streak() {
        let now = Utc::now();
        let submissions = vec![days_ago(now, 0), days_ago(now, 1), days_ago(now, 2)];
        let info = calculate_streak(&submissions, now);
        assert_eq!(info.current_streak, 3);
        assert_eq!(info.longest_streak, 3);
        assert!(!info.streak_at_risk);
    }

    #[test]
    fn streak_still_counts_if_last_activity_was_yesterday() {
        let now = Utc::now();
        let submissions = vec![days_ago(now, 1), days_ago(now, 2)];
        let info = calculate_streak(&submissions, now);
        assert_eq!(info.current_streak, 2);
        assert!(info.streak_at_risk);
        assert_eq!(info.days_until_streak_lost, 1);
    }

    #[test]
    fn gap_of_two_days_breaks_the_current_streak() {
        let now = Utc::now();
        let submissions = vec![days_ago(now, 3), days_ago(now, 4), days_ago(now, 5)];
        let info = calculate_streak(&submissions, now);
        assert_eq!(info.current_streak, 0);
        assert_eq!(info.longest_streak, 3);
        assert!(!info.streak_at_risk);
    }

    #[test]
    fn longest_streak_can_exceed_the_current_one() {
        let now = Utc::now();
        // Active streak of 1 (today), and a past streak of 4 with a gap between.
        let submissions = vec![
            days_ago(now, 0),
            days_ago(now, 10),
            days_ago(now, 11),
            days_ago(now, 12),
            days_ago(now, 13),
        ];
        let info = calculate_streak(&submissions, now);
        assert_eq!(info.current_streak, 1);
        assert_eq!(info.longest_streak, 4);
    }
}

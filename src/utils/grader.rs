use crate::error::ProdeError;
use crate::models::{Match, Prediction, Score};
use serde::{Deserialize, Serialize};

/// How a prediction compares to the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Exact,
    CorrectTendency,
    Miss,
}

/// Points awarded per kind of hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringProfile {
    pub exact_score: u32,
    pub correct_result: u32,
    pub correct_goal_diff: u32,
}

/// Outcome plus the points it earned under a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub outcome: Outcome,
    pub goal_difference_hit: bool,
    pub points: u32,
}

impl ScoringProfile {
    pub const CLASSIC: ScoringProfile = ScoringProfile {
        exact_score: 3,
        correct_result: 1,
        correct_goal_diff: 0,
    };

    pub const EXTENDED: ScoringProfile = ScoringProfile {
        exact_score: 5,
        correct_result: 1,
        correct_goal_diff: 3,
    };

    /// An exact score also picks the winner, so it earns the same two points
    pub const SIMPLE: ScoringProfile = ScoringProfile {
        exact_score: 2,
        correct_result: 2,
        correct_goal_diff: 0,
    };

    /// Points for a bare three-way outcome
    pub fn points(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Exact => self.exact_score,
            Outcome::CorrectTendency => self.correct_result,
            Outcome::Miss => 0,
        }
    }

    /// Grade a prediction and award points, including the goal-difference tier.
    ///
    /// A correct tendency whose goal difference also matches earns
    /// `correct_goal_diff` when that beats `correct_result`. Profiles without a
    /// goal-difference value behave exactly like `points(grade(..))`.
    pub fn award(&self, prediction: Score, final_score: Score) -> Grade {
        let outcome = grade(prediction, final_score);
        let goal_difference_hit = outcome == Outcome::CorrectTendency
            && prediction.goal_difference() == final_score.goal_difference();

        let points = if goal_difference_hit {
            self.correct_goal_diff.max(self.correct_result)
        } else {
            self.points(outcome)
        };

        Grade {
            outcome,
            goal_difference_hit,
            points,
        }
    }
}

/// Classify a predicted score against the final score.
/// Exact: both goal counts match
/// CorrectTendency: same winner (or both a draw) but not exact
/// Miss: anything else
pub fn grade(prediction: Score, final_score: Score) -> Outcome {
    if prediction == final_score {
        Outcome::Exact
    } else if prediction.tendency() == final_score.tendency() {
        Outcome::CorrectTendency
    } else {
        Outcome::Miss
    }
}

/// Grade a stored prediction against a match record.
///
/// Refuses to grade until the match is finished with both scores present and
/// the prediction exists; incomplete data never turns into a `Miss`.
pub fn grade_match(m: &Match, prediction: Option<&Prediction>) -> Result<Outcome, ProdeError> {
    let final_score = m.final_score()?;
    let prediction = prediction.ok_or_else(|| {
        ProdeError::InvalidInput(format!("no prediction for match {}", m.id))
    })?;
    Ok(grade(prediction.score()?, final_score))
}

/// Like `grade_match`, awarding points under `profile`
pub fn award_match(
    m: &Match,
    prediction: &Prediction,
    profile: &ScoringProfile,
) -> Result<Grade, ProdeError> {
    let final_score = m.final_score()?;
    Ok(profile.award(prediction.score()?, final_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn s(home: u32, away: u32) -> Score {
        Score::new(home, away)
    }

    fn finished(home: Option<i32>, away: Option<i32>, status: &str) -> Match {
        Match {
            id: "match-9".to_string(),
            home_team: "Argentina".to_string(),
            away_team: "Brasil".to_string(),
            home_flag: None,
            away_flag: None,
            date: NaiveDate::from_ymd_opt(2026, 6, 20).unwrap(),
            time: Some("18:00".to_string()),
            status: status.to_string(),
            home_score: home,
            away_score: away,
            match_number: None,
            stage: None,
            group: None,
            stadium: None,
            city: None,
            user_prediction: None,
        }
    }

    fn prediction(home: i32, away: i32) -> Prediction {
        Prediction {
            id: None,
            match_id: "match-9".to_string(),
            user_id: "user-1".to_string(),
            home_score: home,
            away_score: away,
            points: None,
        }
    }

    #[test]
    fn test_classic_scenarios() {
        let classic = ScoringProfile::CLASSIC;

        let g = classic.award(s(2, 1), s(2, 1));
        assert_eq!((g.outcome, g.points), (Outcome::Exact, 3));

        // Home win predicted and occurred
        let g = classic.award(s(2, 1), s(3, 0));
        assert_eq!((g.outcome, g.points), (Outcome::CorrectTendency, 1));

        // Draw predicted, home win occurred
        let g = classic.award(s(1, 1), s(2, 0));
        assert_eq!((g.outcome, g.points), (Outcome::Miss, 0));

        let g = classic.award(s(0, 0), s(0, 0));
        assert_eq!((g.outcome, g.points), (Outcome::Exact, 3));
    }

    #[test]
    fn test_grade_properties() {
        for a in 0..5 {
            for b in 0..5 {
                assert_eq!(grade(s(a, b), s(a, b)), Outcome::Exact);
                for c in 0..5 {
                    for d in 0..5 {
                        let same_sign = s(a, b).tendency() == s(c, d).tendency();
                        let expected = if (a, b) == (c, d) {
                            Outcome::Exact
                        } else if same_sign {
                            Outcome::CorrectTendency
                        } else {
                            Outcome::Miss
                        };
                        assert_eq!(grade(s(a, b), s(c, d)), expected);
                        // No hidden state
                        assert_eq!(grade(s(a, b), s(c, d)), grade(s(a, b), s(c, d)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_goal_difference_tier() {
        let extended = ScoringProfile::EXTENDED;

        // Same margin, different score
        let g = extended.award(s(2, 1), s(3, 2));
        assert!(g.goal_difference_hit);
        assert_eq!(g.points, 3);

        // Both draws share a zero margin
        assert_eq!(extended.award(s(1, 1), s(2, 2)).points, 3);

        // Right winner, wrong margin
        assert_eq!(extended.award(s(1, 0), s(3, 0)).points, 1);
        assert_eq!(extended.award(s(3, 0), s(3, 0)).points, 5);

        // Classic has no goal-difference value and falls back to the tendency points
        assert_eq!(ScoringProfile::CLASSIC.award(s(2, 1), s(3, 2)).points, 1);
        assert_eq!(ScoringProfile::SIMPLE.award(s(2, 1), s(2, 1)).points, 2);
        assert_eq!(ScoringProfile::SIMPLE.award(s(0, 1), s(2, 1)).points, 0);
    }

    #[test]
    fn test_grade_match_requires_complete_data() {
        let m = finished(Some(2), Some(0), "finished");
        assert_eq!(grade_match(&m, Some(&prediction(1, 0))), Ok(Outcome::CorrectTendency));
        assert!(matches!(grade_match(&m, None), Err(ProdeError::InvalidInput(_))));
        assert!(matches!(
            grade_match(&m, Some(&prediction(-1, 0))),
            Err(ProdeError::InvalidInput(_))
        ));

        let missing_score = finished(Some(2), None, "finished");
        assert!(matches!(
            grade_match(&missing_score, Some(&prediction(2, 0))),
            Err(ProdeError::InvalidInput(_))
        ));

        let live = finished(Some(1), Some(0), "live");
        assert_eq!(
            grade_match(&live, Some(&prediction(1, 0))),
            Err(ProdeError::MatchNotFinished("match-9".to_string()))
        );

        let weird = finished(Some(1), Some(0), "abandoned");
        assert!(matches!(
            grade_match(&weird, Some(&prediction(1, 0))),
            Err(ProdeError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_award_match() {
        let m = finished(Some(3), Some(2), "finished");
        let grade = award_match(&m, &prediction(2, 1), &ScoringProfile::EXTENDED).unwrap();
        assert_eq!(grade.outcome, Outcome::CorrectTendency);
        assert_eq!(grade.points, 3);
    }
}

use std::ops::RangeInclusive;

use crate::hint::HintSchedule;

pub const DEFAULT_TICK_MILLIS: u32 = 1_000;
/// Accepted ticker periods. Each tick is displayed as one second.
pub const TICK_MILLIS_RANGE: RangeInclusive<u32> = 900..=1_100;
pub const DEFAULT_WRONG_ANSWER_TITLE: &str = "Incorrect";

/// Tunables read from the optional `settings` block of a question document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizSettings {
    /// When the hint appears and disappears, in seconds since the question opened.
    pub hint_schedule: HintSchedule,
    /// Ticker period. One tick always counts as one elapsed second, so the
    /// value must stay within [`TICK_MILLIS_RANGE`].
    pub tick_millis: u32,
    /// Title of the dialog opened after a wrong answer.
    pub wrong_answer_title: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("tick interval of {millis}ms is outside the accepted {min}..={max}ms")]
    TickOutOfRange { millis: u32, min: u32, max: u32 },
}

impl QuizSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !TICK_MILLIS_RANGE.contains(&self.tick_millis) {
            return Err(SettingsError::TickOutOfRange {
                millis: self.tick_millis,
                min: *TICK_MILLIS_RANGE.start(),
                max: *TICK_MILLIS_RANGE.end(),
            });
        }

        Ok(())
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            hint_schedule: HintSchedule::default(),
            tick_millis: DEFAULT_TICK_MILLIS,
            wrong_answer_title: DEFAULT_WRONG_ANSWER_TITLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hint::HintStep;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: QuizSettings =
            serde_json::from_str(r#"{ "tickMillis": 950 }"#).expect("settings should parse");

        assert_eq!(settings.tick_millis, 950);
        assert_eq!(settings.hint_schedule, HintSchedule::default());
        assert_eq!(settings.wrong_answer_title, DEFAULT_WRONG_ANSWER_TITLE);
    }

    #[test]
    fn custom_schedule_is_read() {
        let settings: QuizSettings = serde_json::from_str(
            r#"{ "hintSchedule": [{ "at": 5, "visible": true }], "wrongAnswerTitle": "Oops" }"#,
        )
        .expect("settings should parse");

        assert_eq!(settings.hint_schedule.steps(), &[HintStep::new(5, true)]);
        assert_eq!(settings.wrong_answer_title, "Oops");
    }

    #[test]
    fn default_settings_are_valid() {
        assert_eq!(QuizSettings::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let settings = QuizSettings {
            tick_millis: 0,
            ..QuizSettings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(SettingsError::TickOutOfRange {
                millis: 0,
                min: 900,
                max: 1_100,
            })
        );
    }

    #[test]
    fn rejects_tick_interval_far_from_one_second() {
        let fast = QuizSettings {
            tick_millis: 250,
            ..QuizSettings::default()
        };
        let slow = QuizSettings {
            tick_millis: 5_000,
            ..QuizSettings::default()
        };

        assert!(fast.validate().is_err());
        assert!(slow.validate().is_err());
    }
}

use crate::question::Question;

/// Session-scoped annotations for one question. Never written back to the
/// question document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionStats {
    pub correct_count: u32,
    /// Epoch milliseconds of each correct answer.
    pub answer_times: Vec<u64>,
}

impl QuestionStats {
    pub fn seeded_from(question: &Question) -> Self {
        Self {
            correct_count: question.correct_count,
            answer_times: question.answer_times.clone(),
        }
    }

    pub fn record_correct(&mut self, now_millis: u64) {
        self.correct_count = self.correct_count.saturating_add(1);
        self.answer_times.push(now_millis);
    }

    /// Mean of the recorded answer timestamps, in epoch milliseconds.
    pub fn average_answer_time(&self) -> Option<u64> {
        if self.answer_times.is_empty() {
            return None;
        }

        let total: u128 = self.answer_times.iter().map(|time| u128::from(*time)).sum();
        let average = total / self.answer_times.len() as u128;
        u64::try_from(average).ok()
    }

    /// Header label describing how long ago the average correct answer was.
    pub fn average_age_label(&self, now_millis: u64) -> String {
        match self.average_answer_time() {
            Some(average) => relative_minutes_label(now_millis.saturating_sub(average)),
            None => "no correct answers yet".to_string(),
        }
    }
}

pub fn relative_minutes_label(elapsed_millis: u64) -> String {
    match elapsed_millis / 60_000 {
        0 => "just now".to_string(),
        1 => "1 minute ago".to_string(),
        minutes => format!("{} minutes ago", minutes),
    }
}

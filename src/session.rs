use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;

use crate::question::{Question, QuestionBank};
use crate::settings::QuizSettings;
use crate::shuffle::shuffle_items;
use crate::stats::QuestionStats;

/// Which of the two mutually exclusive views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Question,
    Finished,
}

/// Contents of the dialog opened after a wrong answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub title: String,
    /// Secondary hint of the missed question. May contain markup.
    pub body: String,
}

/// Inputs accepted by [`Session::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Select(String),
    Advance { now_millis: u64 },
    Tick,
    DismissDialog,
    Restart,
}

/// What a dispatched action did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The action did not apply in the current state.
    Ignored,
    /// State changed but the active question stayed the same.
    Updated,
    /// A different question (or the first one again) is now active.
    QuestionChanged,
    /// The result view is now active.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// No option was selected, or the session is already finished.
    Ignored,
    Answered { correct: bool, finished: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
}

impl fmt::Display for QuizSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.score, self.total)
    }
}

/// State container for one run through the question bank.
///
/// Questions are copied into a session-local order once at construction, so
/// the bank itself is never reordered. Every transition goes through the
/// methods below (or [`Session::dispatch`]), which keeps the invariants in one
/// place: the index stays in range, the selection is always one of the current
/// options, and the score never exceeds the number of questions.
pub struct Session<R: Rng = StdRng> {
    rng: R,
    settings: QuizSettings,
    questions: Vec<Question>,
    stats: Vec<QuestionStats>,
    current: usize,
    score: usize,
    elapsed_seconds: u32,
    hint_visible: bool,
    selected: Option<String>,
    shuffled_options: Vec<String>,
    phase: Phase,
    dialog: Option<Feedback>,
}

impl<R: Rng> Session<R> {
    pub fn new(bank: &QuestionBank, mut rng: R) -> Self {
        let questions = shuffle_items(&mut rng, bank.questions());
        let stats = questions.iter().map(QuestionStats::seeded_from).collect();

        let mut session = Self {
            rng,
            settings: bank.settings().clone(),
            questions,
            stats,
            current: 0,
            score: 0,
            elapsed_seconds: 0,
            hint_visible: false,
            selected: None,
            shuffled_options: Vec::new(),
            phase: Phase::Question,
            dialog: None,
        };
        session.open_question(0);

        log::info!("quiz session started with {} questions", session.total());
        session
    }

    pub fn dispatch(&mut self, action: SessionAction) -> Transition {
        match action {
            SessionAction::Select(option) => {
                if self.select_option(&option) {
                    Transition::Updated
                } else {
                    Transition::Ignored
                }
            }
            SessionAction::Advance { now_millis } => match self.advance(now_millis) {
                AdvanceOutcome::Ignored => Transition::Ignored,
                AdvanceOutcome::Answered { finished: true, .. } => Transition::Finished,
                AdvanceOutcome::Answered { finished: false, .. } => Transition::QuestionChanged,
            },
            SessionAction::Tick => {
                if self.tick() {
                    Transition::Updated
                } else {
                    Transition::Ignored
                }
            }
            SessionAction::DismissDialog => {
                if self.dismiss_dialog() {
                    Transition::Updated
                } else {
                    Transition::Ignored
                }
            }
            SessionAction::Restart => {
                self.restart();
                Transition::QuestionChanged
            }
        }
    }

    /// Records `option` as the current selection, replacing any earlier one.
    ///
    /// Returns `false` without changing anything when the option is not shown
    /// for the current question or the session is finished.
    pub fn select_option(&mut self, option: &str) -> bool {
        if self.phase != Phase::Question {
            log::warn!("ignoring selection after the session finished");
            return false;
        }

        if !self.shuffled_options.iter().any(|shown| shown == option) {
            log::warn!("ignoring selection of unknown option {:?}", option);
            return false;
        }

        self.selected = Some(option.to_string());
        true
    }

    /// Scores the selected option and moves on to the next question or the
    /// result view.
    pub fn advance(&mut self, now_millis: u64) -> AdvanceOutcome {
        if self.phase != Phase::Question {
            return AdvanceOutcome::Ignored;
        }

        let Some(selected) = self.selected.take() else {
            return AdvanceOutcome::Ignored;
        };

        let question = &self.questions[self.current];
        let correct = question.is_correct(&selected);

        if correct {
            self.score += 1;
            self.stats[self.current].record_correct(now_millis);
        } else {
            self.dialog = Some(Feedback {
                title: self.settings.wrong_answer_title.clone(),
                body: question.secondary_hint.clone(),
            });
        }

        log::debug!(
            "question {} answered {}",
            self.current + 1,
            if correct { "correctly" } else { "incorrectly" }
        );

        let finished = self.current + 1 >= self.questions.len();
        if finished {
            self.phase = Phase::Finished;
            self.hint_visible = false;
            log::info!("quiz finished with score {}", self.summary());
        } else {
            self.open_question(self.current + 1);
        }

        AdvanceOutcome::Answered { correct, finished }
    }

    /// Advances the elapsed counter by one second.
    ///
    /// Ticks only count while a question is on screen: they are dropped once the
    /// session is finished and while the feedback dialog covers the question.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Question || self.dialog.is_some() {
            return false;
        }

        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        self.hint_visible = self.settings.hint_schedule.visible_at(self.elapsed_seconds);
        true
    }

    /// Closes the feedback dialog. The timer is left as it is.
    pub fn dismiss_dialog(&mut self) -> bool {
        self.dialog.take().is_some()
    }

    /// Returns to the first question with a zero score. The question order is
    /// kept; the first question's options are shuffled again.
    pub fn restart(&mut self) {
        self.score = 0;
        self.phase = Phase::Question;
        self.dialog = None;
        self.open_question(0);
        log::info!("quiz restarted");
    }

    fn open_question(&mut self, index: usize) {
        self.current = index;
        self.selected = None;
        self.elapsed_seconds = 0;
        self.hint_visible = self.settings.hint_schedule.visible_at(0);
        self.shuffled_options = shuffle_items(&mut self.rng, &self.questions[index].options);
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_stats(&self) -> &QuestionStats {
        &self.stats[self.current]
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn shuffled_options(&self) -> &[String] {
        &self.shuffled_options
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn can_advance(&self) -> bool {
        self.phase == Phase::Question && self.selected.is_some()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn dialog(&self) -> Option<&Feedback> {
        self.dialog.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            score: self.score,
            total: self.total(),
        }
    }
}

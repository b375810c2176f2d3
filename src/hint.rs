/// One row of a [`HintSchedule`]: from `at` seconds onward the hint is `visible`
/// until the next step takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HintStep {
    pub at: u32,
    pub visible: bool,
}

impl HintStep {
    pub const fn new(at: u32, visible: bool) -> Self {
        Self { at, visible }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HintScheduleError {
    #[error("hint step at {at}s must come after the previous step at {previous}s")]
    OutOfOrder { previous: u32, at: u32 },
    #[error("hint step at 0s must not be visible")]
    VisibleAtStart,
}

/// Step function from elapsed seconds to hint visibility.
///
/// Visibility at `t` is taken from the last step whose threshold is at or
/// below `t`. Before the first step the hint is hidden.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct HintSchedule {
    steps: Vec<HintStep>,
}

impl HintSchedule {
    pub fn new(steps: Vec<HintStep>) -> Result<Self, HintScheduleError> {
        if steps.first().is_some_and(|step| step.at == 0 && step.visible) {
            return Err(HintScheduleError::VisibleAtStart);
        }

        for pair in steps.windows(2) {
            if pair[1].at <= pair[0].at {
                return Err(HintScheduleError::OutOfOrder {
                    previous: pair[0].at,
                    at: pair[1].at,
                });
            }
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[HintStep] {
        &self.steps
    }

    pub fn visible_at(&self, elapsed_seconds: u32) -> bool {
        self.steps
            .iter()
            .take_while(|step| step.at <= elapsed_seconds)
            .last()
            .is_some_and(|step| step.visible)
    }
}

impl Default for HintSchedule {
    fn default() -> Self {
        Self {
            steps: vec![
                HintStep::new(10, true),
                HintStep::new(20, false),
                HintStep::new(30, true),
            ],
        }
    }
}

impl<'de> serde::Deserialize<'de> for HintSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let steps = Vec::<HintStep>::deserialize(deserializer)?;
        Self::new(steps).map_err(serde::de::Error::custom)
    }
}

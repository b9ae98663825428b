use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NeighborSearch,
    Accumulation,
    Averaging,
    Invariants,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NeighborSearch => "Neighbor Search",
            Phase::Accumulation => "q_lm Accumulation",
            Phase::Averaging => "Neighborhood Averaging",
            Phase::Invariants => "Invariant Evaluation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart {
        phase: Phase,
    },
    PhaseFinish {
        phase: Phase,
    },
    NeighborsFound {
        total_bonds: usize,
        isolated_particles: usize,
    },
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    /// A reporter that discards every event.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `work` between a `PhaseStart` and a `PhaseFinish` event.
    pub fn phase<T>(&self, phase: Phase, work: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { phase });
        let out = work();
        self.report(Progress::PhaseFinish { phase });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn silent_reporter_accepts_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".to_string()));
    }

    #[test]
    fn phase_wraps_work_in_start_and_finish_events() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e: Progress| {
            events.lock().unwrap().push(e);
        }));

        let value = reporter.phase(Phase::Averaging, || 42);

        assert_eq!(value, 42);
        drop(reporter);
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart {
                    phase: Phase::Averaging
                },
                Progress::PhaseFinish {
                    phase: Phase::Averaging
                },
            ]
        );
    }

    #[test]
    fn phase_names_are_human_readable() {
        assert_eq!(Phase::NeighborSearch.to_string(), "Neighbor Search");
        assert_eq!(Phase::Invariants.to_string(), "Invariant Evaluation");
    }
}

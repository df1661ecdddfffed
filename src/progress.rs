//! Progress reporting for long-running automaton passes.
//!
//! Determinization and duplicate trimming can take a while on large rule
//! sets. Callers that want to show progress pass a [`ProgressObserver`];
//! everyone else passes `None`.

/// Which pass is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaStatus {
    /// Powerset construction; `count` is the number of DFA states so far.
    DfaTransform,
    /// Duplicate-state elimination; `count` is the pass number.
    TrimDuplicates,
}

/// One progress checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaProgress {
    pub status: FaStatus,
    pub count: usize,
}

impl FaProgress {
    #[inline]
    pub fn new(status: FaStatus, count: usize) -> Self {
        Self { status, count }
    }
}

/// Receives checkpoints from automaton passes.
pub trait ProgressObserver {
    fn report(&mut self, progress: FaProgress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(FaProgress),
{
    #[inline]
    fn report(&mut self, progress: FaProgress) {
        self(progress)
    }
}

/// Forward a checkpoint to an optional observer.
#[inline]
pub(crate) fn report(observer: &mut Option<&mut dyn ProgressObserver>, progress: FaProgress) {
    if let Some(observer) = observer.as_deref_mut() {
        observer.report(progress);
    }
}

/// Reborrow an optional observer for a nested pass.
#[inline]
pub(crate) fn reborrow<'a>(
    observer: &'a mut Option<&mut dyn ProgressObserver>,
) -> Option<&'a mut dyn ProgressObserver> {
    match observer {
        Some(observer) => Some(&mut **observer),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut record = |p: FaProgress| seen.push(p);
            let mut observer: Option<&mut dyn ProgressObserver> = Some(&mut record);
            report(&mut observer, FaProgress::new(FaStatus::DfaTransform, 1));
            report(&mut observer, FaProgress::new(FaStatus::TrimDuplicates, 0));
        }
        assert_eq!(
            seen,
            vec![
                FaProgress::new(FaStatus::DfaTransform, 1),
                FaProgress::new(FaStatus::TrimDuplicates, 0),
            ]
        );
    }

    #[test]
    fn test_absent_observer() {
        let mut observer: Option<&mut dyn ProgressObserver> = None;
        report(&mut observer, FaProgress::new(FaStatus::DfaTransform, 3));
    }
}

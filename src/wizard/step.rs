use serde::{Deserialize, Serialize};

/// The four stations of the registration wizard, in order. Movement is
/// strictly linear: `next` and `back` saturate at the ends, there are no
/// skips or jumps, and no step validates its inputs before advancing.
/// The flow is deliberately unblockable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Operation metadata: product, origin, destination, fiscal code.
    Details,
    /// Document staging.
    Documents,
    /// Read-only financial estimate.
    Estimate,
    /// Summary; the only step where finish is available.
    Summary,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::Details;
    pub const LAST: WizardStep = WizardStep::Summary;

    /// 1-based position, as shown in the progress bar.
    pub fn number(self) -> u8 {
        match self {
            Self::Details => 1,
            Self::Documents => 2,
            Self::Estimate => 3,
            Self::Summary => 4,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Details => Self::Documents,
            Self::Documents => Self::Estimate,
            Self::Estimate => Self::Summary,
            Self::Summary => Self::Summary,
        }
    }

    pub fn back(self) -> Self {
        match self {
            Self::Details => Self::Details,
            Self::Documents => Self::Details,
            Self::Estimate => Self::Documents,
            Self::Summary => Self::Estimate,
        }
    }

    pub fn is_final(self) -> bool {
        self == Self::LAST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_ends_at_four() {
        assert_eq!(WizardStep::FIRST.number(), 1);
        assert_eq!(WizardStep::LAST.number(), 4);
    }

    #[test]
    fn next_saturates_at_summary() {
        let mut step = WizardStep::FIRST;
        for expected in [2, 3, 4, 4, 4] {
            step = step.next();
            assert_eq!(step.number(), expected);
        }
    }

    #[test]
    fn back_saturates_at_details() {
        let mut step = WizardStep::LAST;
        for expected in [3, 2, 1, 1, 1] {
            step = step.back();
            assert_eq!(step.number(), expected);
        }
    }

    #[test]
    fn every_transition_moves_at_most_one() {
        // Walk an arbitrary next/back sequence; the step number must stay
        // within [1,4] and change by at most 1 per call.
        let moves = [
            true, true, false, true, true, true, true, false, false, false, false, false, true,
        ];
        let mut step = WizardStep::FIRST;
        for forward in moves {
            let before = step.number() as i8;
            step = if forward { step.next() } else { step.back() };
            let after = step.number() as i8;
            assert!((1..=4).contains(&after));
            assert!((after - before).abs() <= 1);
        }
    }

    #[test]
    fn only_summary_is_final() {
        assert!(WizardStep::Summary.is_final());
        assert!(!WizardStep::Details.is_final());
        assert!(!WizardStep::Documents.is_final());
        assert!(!WizardStep::Estimate.is_final());
    }
}

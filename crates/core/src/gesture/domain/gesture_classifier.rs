use crate::gesture::domain::gesture::GestureClass;
use crate::gesture::domain::shape_descriptor::ShapeDescriptors;
use crate::shared::config::ProcessorConfig;

/// Condition over shape descriptors. Thresholds are data, not control flow.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleGuard {
    FingerGapsAtLeast(usize),
    /// False when solidity is undefined.
    SolidityBelow(f64),
    /// False when solidity is undefined.
    SolidityAbove(f64),
    /// Inclusive bounds on bounding-box width / height.
    AspectWithin(f64, f64),
    Any(Vec<RuleGuard>),
    All(Vec<RuleGuard>),
}

impl RuleGuard {
    pub fn matches(&self, d: &ShapeDescriptors) -> bool {
        match self {
            RuleGuard::FingerGapsAtLeast(n) => d.finger_gaps >= *n,
            RuleGuard::SolidityBelow(t) => d.solidity.is_some_and(|s| s < *t),
            RuleGuard::SolidityAbove(t) => d.solidity.is_some_and(|s| s > *t),
            RuleGuard::AspectWithin(lo, hi) => (*lo..=*hi).contains(&d.aspect_ratio),
            RuleGuard::Any(guards) => guards.iter().any(|g| g.matches(d)),
            RuleGuard::All(guards) => guards.iter().all(|g| g.matches(d)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureRule {
    pub guard: RuleGuard,
    pub class: GestureClass,
}

/// Ordered decision table: the first matching rule wins, `Ambiguous`
/// otherwise, `NoHand` when there is no region at all.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    rules: Vec<GestureRule>,
}

impl GestureClassifier {
    /// Default table. `Open` comes first: a partly occluded open hand can
    /// look compact, never the other way round.
    pub fn new(config: &ProcessorConfig) -> Self {
        Self::with_rules(vec![
            GestureRule {
                guard: RuleGuard::Any(vec![
                    RuleGuard::FingerGapsAtLeast(config.open_min_finger_gaps),
                    RuleGuard::SolidityBelow(config.open_max_solidity),
                ]),
                class: GestureClass::Open,
            },
            GestureRule {
                guard: RuleGuard::All(vec![
                    RuleGuard::SolidityAbove(config.fist_min_solidity),
                    RuleGuard::AspectWithin(config.fist_min_aspect, config.fist_max_aspect),
                ]),
                class: GestureClass::Fist,
            },
        ])
    }

    pub fn with_rules(rules: Vec<GestureRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[GestureRule] {
        &self.rules
    }

    pub fn classify(&self, descriptors: Option<&ShapeDescriptors>) -> GestureClass {
        let Some(d) = descriptors else {
            return GestureClass::NoHand;
        };
        self.rules
            .iter()
            .find(|rule| rule.guard.matches(d))
            .map_or(GestureClass::Ambiguous, |rule| rule.class)
    }
}

use std::fmt;
use std::fmt::Formatter;
use thiserror::Error;

/// Label used when the heat index is below the lowest tier
pub const BELOW_CAUTION: &str = "Below Caution";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PolicyError {
    #[error("no heat-stress tier covers a heat index of {0} °F")]
    NoMatchingTier(i32),
}

/// One band of the heat-stress work practice policy, bounds are inclusive and in °F
#[derive(Debug, PartialEq, Eq)]
pub struct PolicyTier {
    pub lower: i32,
    pub upper: Option<i32>,
    pub label: &'static str,
    pub work_max: &'static str,
    pub hydration: &'static str,
    pub work_rest: &'static str,
    pub checks_per_hour: &'static str,
}

impl PolicyTier {
    pub fn contains(&self, value: i32) -> bool {
        value >= self.lower && self.upper.is_none_or(|upper| value <= upper)
    }
}

/// Range as shown in reports, an open upper bound is shown as ∞
impl fmt::Display for PolicyTier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{}-{}", self.lower, upper),
            None => write!(f, "{}-∞", self.lower),
        }
    }
}

/// Tiers in ascending order, covering 80 °F and up without gaps
pub static POLICY: [PolicyTier; 4] = [
    PolicyTier {
        lower: 80,
        upper: Some(90),
        label: "Caution",
        work_max: "30",
        hydration: "1/20",
        work_rest: "Normal",
        checks_per_hour: "Periodic",
    },
    PolicyTier {
        lower: 91,
        upper: Some(103),
        label: "Extreme Caution",
        work_max: "15",
        hydration: "1/15",
        work_rest: "30-40/10",
        checks_per_hour: "1",
    },
    PolicyTier {
        lower: 104,
        upper: Some(124),
        label: "Danger",
        work_max: "10",
        hydration: "1/10",
        work_rest: "20-30/10",
        checks_per_hour: "2",
    },
    PolicyTier {
        lower: 125,
        upper: None,
        label: "Extreme Danger",
        work_max: "0",
        hydration: "1/10",
        work_rest: "10-20/10",
        checks_per_hour: "4",
    },
];

/// The heat index for the day together with the tier it falls in, if any
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeatAssessment {
    pub heat_index: i32,
    pub tier: Option<&'static PolicyTier>,
}

impl HeatAssessment {
    pub fn label(&self) -> &'static str {
        self.tier.map_or(BELOW_CAUTION, |t| t.label)
    }

    pub fn is_current(&self, tier: &PolicyTier) -> bool {
        self.tier.is_some_and(|t| t == tier)
    }
}

/// Returns the first tier, in ascending order, whose inclusive range holds the value
///
/// # Arguments
///
/// * 'heat_index' - heat index in whole degrees Fahrenheit
pub fn classify(heat_index: i32) -> Result<&'static PolicyTier, PolicyError> {
    POLICY
        .iter()
        .find(|t| t.contains(heat_index))
        .ok_or(PolicyError::NoMatchingTier(heat_index))
}

/// Classifies the heat index, treating values below the lowest tier as no heat stress
///
/// # Arguments
///
/// * 'heat_index' - heat index in whole degrees Fahrenheit
pub fn assess(heat_index: i32) -> Result<HeatAssessment, PolicyError> {
    match classify(heat_index) {
        Ok(tier) => Ok(HeatAssessment { heat_index, tier: Some(tier) }),
        Err(_) if heat_index < POLICY[0].lower => Ok(HeatAssessment { heat_index, tier: None }),
        Err(e) => Err(e),
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// One of the campaign actions `0..12`. Action `0` is the null action (no contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampaignAction(u8);

impl CampaignAction {
    pub const COUNT: usize = 12;
    pub const NULL: Self = Self(0);

    pub fn id(self) -> usize {
        self.0 as usize
    }

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// Value of the action slot in the predictor feature vector.
    pub fn feature(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<usize> for CampaignAction {
    type Error = EnvError;

    fn try_from(action: usize) -> Result<Self, Self::Error> {
        if action < Self::COUNT {
            Ok(Self(action as u8))
        } else {
            Err(EnvError::InvalidAction {
                action,
                n: Self::COUNT,
            })
        }
    }
}

impl fmt::Display for CampaignAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_twelve_actions_exist() {
        assert!(CampaignAction::try_from(0).unwrap().is_null());
        assert_eq!(CampaignAction::try_from(11).unwrap().id(), 11);
        assert!(matches!(
            CampaignAction::try_from(12),
            Err(EnvError::InvalidAction { action: 12, n: 12 })
        ));
    }
}

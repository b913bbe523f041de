//! Health-score to intervention-tier mapping with a static action table.

use std::fmt;

use serde::{Deserialize, Serialize};

use pulse_core::config::TierConfig;

/// The three discrete intervention categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionTier {
    AtRisk,
    Neutral,
    Healthy,
}

impl ActionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtRisk => "at-risk",
            Self::Neutral => "neutral",
            Self::Healthy => "healthy",
        }
    }
}

impl fmt::Display for ActionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named intervention actions. The selector only names them; dispatch
/// belongs to the workflow collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionName {
    RetentionEmail,
    ScheduleCall,
    NurtureSequence,
    SatisfactionSurvey,
    UpsellOffer,
    ReferralInvite,
}

impl ActionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RetentionEmail => "retention-email",
            Self::ScheduleCall => "schedule-call",
            Self::NurtureSequence => "nurture-sequence",
            Self::SatisfactionSurvey => "satisfaction-survey",
            Self::UpsellOffer => "upsell-offer",
            Self::ReferralInvite => "referral-invite",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRecommendation {
    pub tier: ActionTier,
    pub actions: [ActionName; 2],
}

/// Maps a health score onto a tier using closed intervals: both
/// boundary values belong to the lower tier (33.0 is at-risk, 66.0 is
/// neutral — observed behavior, kept as-is).
#[derive(Debug, Clone)]
pub struct TierSelector {
    at_risk_max: f64,
    neutral_max: f64,
}

impl TierSelector {
    pub fn new(config: &TierConfig) -> Self {
        Self {
            at_risk_max: config.at_risk_max,
            neutral_max: config.neutral_max,
        }
    }

    pub fn select(&self, health_score: f64) -> ActionTier {
        if health_score <= self.at_risk_max {
            ActionTier::AtRisk
        } else if health_score <= self.neutral_max {
            ActionTier::Neutral
        } else {
            ActionTier::Healthy
        }
    }

    /// Tier plus its fixed pair of recommended actions.
    pub fn recommend(&self, health_score: f64) -> TierRecommendation {
        let tier = self.select(health_score);
        TierRecommendation {
            tier,
            actions: actions_for(tier),
        }
    }
}

impl Default for TierSelector {
    fn default() -> Self {
        Self::new(&TierConfig::default())
    }
}

/// Static tier → action table.
pub fn actions_for(tier: ActionTier) -> [ActionName; 2] {
    match tier {
        ActionTier::AtRisk => [ActionName::RetentionEmail, ActionName::ScheduleCall],
        ActionTier::Neutral => [ActionName::NurtureSequence, ActionName::SatisfactionSurvey],
        ActionTier::Healthy => [ActionName::UpsellOffer, ActionName::ReferralInvite],
    }
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 嚴重程度分級，由最嚴重到最輕微
///
/// 排序只依 `ordinal()`，不依宣告順序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeverityTier {
    /// Immediate medical attention needed
    Emergency,
    /// Care needed within 24 hours
    Urgent,
    /// Care needed within 72 hours
    SemiUrgent,
    /// Care needed but not urgent
    Routine,
    /// Can be managed at home
    SelfCare,
}

impl SeverityTier {
    pub const ALL: [SeverityTier; 5] = [
        SeverityTier::Emergency,
        SeverityTier::Urgent,
        SeverityTier::SemiUrgent,
        SeverityTier::Routine,
        SeverityTier::SelfCare,
    ];

    /// 0 為最嚴重
    pub const fn ordinal(self) -> u8 {
        match self {
            SeverityTier::Emergency => 0,
            SeverityTier::Urgent => 1,
            SeverityTier::SemiUrgent => 2,
            SeverityTier::Routine => 3,
            SeverityTier::SelfCare => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Emergency => "emergency",
            SeverityTier::Urgent => "urgent",
            SeverityTier::SemiUrgent => "semi-urgent",
            SeverityTier::Routine => "routine",
            SeverityTier::SelfCare => "self-care",
        }
    }
}

impl Ord for SeverityTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for SeverityTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarePathway {
    EmergencyRoom,
    UrgentCare,
    PrimaryCare,
    Telehealth,
    SelfManagement,
}

impl CarePathway {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarePathway::EmergencyRoom => "emergency_room",
            CarePathway::UrgentCare => "urgent_care",
            CarePathway::PrimaryCare => "primary_care",
            CarePathway::Telehealth => "telehealth",
            CarePathway::SelfManagement => "self_management",
        }
    }
}

impl fmt::Display for CarePathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub severity: SeverityTier,
    #[serde(rename = "care_pathway")]
    pub pathway: CarePathway,
    pub instructions: String,
}

/// 單一症狀單元的分類紀錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitAssessment {
    pub unit: String,
    pub tier: SeverityTier,
    pub rule: &'static str,
}

/// 含逐單元追蹤的完整分類結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub units: Vec<UnitAssessment>,
    pub pediatric: bool,
    pub result: TriageResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub response: String,
    pub triage: TriageResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    Active,
    Unavailable,
}

impl ComponentState {
    pub fn from_available(available: bool) -> Self {
        if available {
            ComponentState::Active
        } else {
            ComponentState::Unavailable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub triage: ComponentState,
    pub rag: ComponentState,
    pub llm: ComponentState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub components: ComponentStatus,
}

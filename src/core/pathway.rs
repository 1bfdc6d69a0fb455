use crate::domain::model::{CarePathway, SeverityTier};

/// 固定對照表，每個分級對應唯一的就醫路徑
pub fn recommend_care_pathway(severity: SeverityTier) -> CarePathway {
    match severity {
        SeverityTier::Emergency => CarePathway::EmergencyRoom,
        SeverityTier::Urgent => CarePathway::UrgentCare,
        SeverityTier::SemiUrgent => CarePathway::PrimaryCare,
        SeverityTier::Routine => CarePathway::Telehealth,
        SeverityTier::SelfCare => CarePathway::SelfManagement,
    }
}

use crate::core::classifier::{aggregate, classify_unit};
use crate::core::instructions::care_instructions;
use crate::core::pathway::recommend_care_pathway;
use crate::core::pediatric::PediatricDetector;
use crate::core::rules::RuleRegistry;
use crate::core::segmenter::segment;
use crate::domain::model::{Assessment, SeverityTier, TriageResult, UnitAssessment};
use crate::utils::error::Result;
use std::collections::HashMap;

/// 規則式分級引擎
///
/// 建構後不可變，可在多個請求間共用（`Arc<TriageEngine>`）。
/// 對任何輸入都回傳結果，空白輸入為 SelfCare。
#[derive(Debug, Clone)]
pub struct TriageEngine {
    registry: RuleRegistry,
    pediatric: PediatricDetector,
}

impl TriageEngine {
    pub fn new() -> Result<Self> {
        Self::with_registry(RuleRegistry::new()?)
    }

    pub fn with_registry(registry: RuleRegistry) -> Result<Self> {
        Ok(Self {
            registry,
            pediatric: PediatricDetector::new()?,
        })
    }

    pub fn with_extra_patterns(extra: &HashMap<SeverityTier, Vec<String>>) -> Result<Self> {
        Self::with_registry(RuleRegistry::with_extra_patterns(extra)?)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn triage(&self, report: &str) -> TriageResult {
        self.assess(report).result
    }

    pub fn assess(&self, report: &str) -> Assessment {
        let units: Vec<UnitAssessment> = segment(report)
            .into_iter()
            .map(|unit| {
                let classification = classify_unit(&self.registry, unit);
                UnitAssessment {
                    unit: unit.to_string(),
                    tier: classification.tier,
                    rule: classification.rule,
                }
            })
            .collect();

        let severity = aggregate(units.iter().map(|u| u.tier));
        let pathway = recommend_care_pathway(severity);
        let pediatric = self.pediatric.is_pediatric(report);

        tracing::info!(
            "🩺 Triage verdict: {} -> {} ({} units, pediatric: {})",
            severity,
            pathway,
            units.len(),
            pediatric
        );

        Assessment {
            units,
            pediatric,
            result: TriageResult {
                severity,
                pathway,
                instructions: care_instructions(pathway, pediatric).to_string(),
            },
        }
    }
}

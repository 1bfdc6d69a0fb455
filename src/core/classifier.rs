use crate::core::rules::RuleRegistry;
use crate::domain::model::SeverityTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: SeverityTier,
    pub rule: &'static str,
}

/// 對單一症狀單元套用規則清單，必定回傳一個分級
pub fn classify_unit(registry: &RuleRegistry, unit: &str) -> Classification {
    let rule = registry.first_match(unit);

    match registry.matched_pattern(rule, unit) {
        Some(pattern) => tracing::debug!(
            "🔎 '{}' -> {} via {} (pattern: {})",
            unit,
            rule.tier,
            rule.name,
            pattern
        ),
        None => tracing::debug!("🔎 '{}' -> {} via {}", unit, rule.tier, rule.name),
    }

    Classification {
        tier: rule.tier,
        rule: rule.name,
    }
}

/// 取最嚴重（ordinal 最小）的分級；沒有任何單元時為 SelfCare
pub fn aggregate<I>(tiers: I) -> SeverityTier
where
    I: IntoIterator<Item = SeverityTier>,
{
    tiers
        .into_iter()
        .min_by_key(|tier| tier.ordinal())
        .unwrap_or(SeverityTier::SelfCare)
}

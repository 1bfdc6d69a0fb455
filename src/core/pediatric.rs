use crate::utils::error::{Result, TriageError};
use regex::{RegexSet, RegexSetBuilder};

pub const PEDIATRIC_PATTERNS: &[&str] = &[
    r"(baby|infant|child|kid|toddler|newborn)",
    r"(\d+)[\s-]*(month|year|week)[\s-]*(old)",
    r"my son",
    r"my daughter",
    r"pediatric",
    r"children",
];

/// 判斷描述是否與兒童有關，只影響指示文字的選擇
#[derive(Debug, Clone)]
pub struct PediatricDetector {
    set: RegexSet,
}

impl PediatricDetector {
    pub fn new() -> Result<Self> {
        let set = RegexSetBuilder::new(PEDIATRIC_PATTERNS)
            .case_insensitive(true)
            .build()
            .map_err(|source| TriageError::RegistryError {
                tier: "pediatric".to_string(),
                source,
            })?;
        Ok(Self { set })
    }

    /// 對整段原始描述搜尋，而非逐單元
    pub fn is_pediatric(&self, report: &str) -> bool {
        self.set.is_match(report)
    }
}

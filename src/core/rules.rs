use crate::domain::model::SeverityTier;
use crate::utils::error::{Result, TriageError};
use regex::{RegexSet, RegexSetBuilder};
use std::collections::HashMap;

pub const INTENSIFIER_TERMS: &[&str] = &["severe", "extreme", "intense", "unbearable", "worst"];
pub const PAIN_CONTEXT_TERMS: &[&str] = &["pain", "headache", "chest", "breathing"];
pub const CHRONIC_TERMS: &[&str] = &["chronic", "persistent", "ongoing", "months", "weeks"];
pub const WORSENING_TERMS: &[&str] = &["worse", "worsening", "increased", "higher", "elevated"];

const ASTHMA_TERMS: &[&str] = &["asthma"];
const ASTHMA_ACUTE_TERMS: &[&str] = &["attack", "can't breathe", "severe", "emergency"];
const BLOOD_SUGAR_TERMS: &[&str] = &["blood sugar", "diabetes"];
const BLOOD_SUGAR_DANGER_TERMS: &[&str] = &["very high", "extremely", "dangerously"];
const BACK_PAIN_TERMS: &[&str] = &["back pain"];
const BACK_PAIN_SEVERE_TERMS: &[&str] = &["severe", "can't move", "debilitating"];

pub const EMERGENCY_PATTERNS: &[&str] = &[
    r"difficulty breathing",
    r"shortness of breath",
    r"chest pain",
    r"severe (pain|bleeding)",
    r"unconscious",
    r"unresponsive",
    r"stroke",
    r"heart attack",
    r"seizure",
    r"unable to (speak|move)",
    r"sudden (numbness|weakness)",
    r"severe head(ache)? with (fever|stiff neck)",
    r"suicidal",
    r"overdose",
    r"poisoning",
    r"(baby|infant|child).*(not breathing|turning blue|choking)",
    r"(baby|infant|child).*(unresponsive|unconscious|won't wake up)",
    r"(baby|infant|child).*(seizure|convulsion)",
    r"(baby|infant|child).*(severe dehydration|not urinating)",
    r"(baby|infant|child).*(rash.*(doesn't blanch|doesn't fade))",
    r"(baby|infant|child).*(lethargic|extremely weak)",
    r"(baby|infant|child).*(high fever.*(under|less than) (3|three) months)",
];

pub const URGENT_PATTERNS: &[&str] = &[
    r"high fever",
    r"persistent vomiting",
    r"dehydration",
    r"infection",
    r"moderate (pain|bleeding)",
    r"broken bone",
    r"deep cut",
    r"burn",
    r"allergic reaction",
    r"pregnancy complication",
    r"severe (rash|swelling)",
    r"eye injury",
    r"mental health crisis",
    r"(baby|infant|child).*(fever.*(102|103|104|105))",
    r"(baby|infant|child).*(not feeding|refusing to eat|drink)",
    r"(baby|infant|child).*(unusual (crying|screaming))",
    r"(baby|infant|child).*(bulging fontanelle)",
    r"(baby|infant|child).*(persistent vomiting|diarrhea)",
];

pub const SEMI_URGENT_PATTERNS: &[&str] = &[
    r"ear(ache|infection)",
    r"sinus (pain|infection)",
    r"minor infection",
    r"mild to moderate pain",
    r"(sprain|strain)",
    r"minor injury",
    r"persistent symptoms",
    r"worsening chronic condition",
    r"fever.*(101|102)",
    r"swollen.*(ankle|joint|knee|wrist)",
    r"diarrhea.*(3|three|several) days",
    r"persistent diarrhea",
    r"fall",
    r"fell",
    r"falling",
    r"twisted",
    r"twist",
    r"asthma.*(significantly worse|severe|attack)",
    r"blood sugar.*(very high|dangerously high|extremely elevated)",
    r"(diabetes|diabetic).*(uncontrolled|out of control)",
    r"back pain.*(severe|debilitating|can't move)",
    r"(baby|infant|child).*(ear infection|ear pain)",
    r"(baby|infant|child).*(fever.*(100|101))",
    r"(baby|infant|child).*(mild rash)",
    r"(baby|infant|child).*(cough|cold).*(several days)",
];

pub const ROUTINE_PATTERNS: &[&str] = &[
    r"chronic condition",
    r"follow-up",
    r"medication refill",
    r"mild symptoms",
    r"general check-up",
    r"non-urgent concern",
    r"mild (rash|pain)",
    r"routine screening",
    r"asthma.*(worse|worsening)",
    r"persistent.*(pain|ache)",
    r"blood sugar.*(higher|elevated|abnormal)",
    r"(diabetes|diabetic).*(control|management)",
    r"back pain.*(chronic|persistent|ongoing)",
    r"(month|months|week|weeks|day|days)",
    r"(baby|infant|child).*(mild fever)",
    r"(baby|infant|child).*(minor cough|runny nose)",
    r"(baby|infant|child).*(diaper rash)",
    r"(baby|infant|child).*(feeding question|growth concern)",
];

pub const SELF_CARE_PATTERNS: &[&str] = &[
    r"common cold",
    r"minor headache",
    r"mild fever",
    r"sore throat",
    r"minor cut",
    r"scrape",
    r"bruise",
    r"mild allergies",
    r"mild digestive issues",
    r"general fatigue",
    r"tired",
    r"fatigue",
    r"runny nose",
    r"sneezing",
    r"cough",
    r"mild cough",
    r"occasional cough",
    r"slight headache",
    r"mild pain",
    r"minor pain",
    r"slight pain",
    r"itchy",
    r"itching",
    r"dry skin",
    r"rash",
    r"minor rash",
    r"upset stomach",
    r"indigestion",
    r"gas",
    r"bloating",
    r"(baby|infant|child).*(slight fever|low-grade fever)",
    r"(baby|infant|child).*(minor cough|sniffle)",
    r"(baby|infant|child).*(small scrape|minor bruise)",
    r"(baby|infant|child).*(teething)",
    r"(baby|infant|child).*(mild diaper rash)",
    r"(baby|infant|child).*(occasional fussiness)",
];

/// 某一分級的正規表示式集合，保留原始順序
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: RegexSet,
}

impl PatternSet {
    pub fn new(tier: SeverityTier, patterns: Vec<String>) -> Result<Self> {
        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()
            .map_err(|source| TriageError::RegistryError {
                tier: tier.as_str().to_string(),
                source,
            })?;

        Ok(Self { patterns, set })
    }

    /// 回傳第一個命中的樣式（依列表順序）
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.set
            .matches(text)
            .iter()
            .next()
            .map(|index| self.patterns[index].as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Condition {
    /// 小寫後包含任一關鍵字
    ContainsAny(&'static [&'static str]),
    All(Vec<Condition>),
    Matches(PatternSet),
    Always,
}

impl Condition {
    fn all_of(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::All(conditions.into_iter().collect())
    }

    /// `lowered` 必須已轉小寫
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Condition::ContainsAny(terms) => terms.iter().any(|term| lowered.contains(term)),
            Condition::All(conditions) => conditions.iter().all(|c| c.matches(lowered)),
            Condition::Matches(set) => set.first_match(lowered).is_some(),
            Condition::Always => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    pub condition: Condition,
    pub tier: SeverityTier,
}

impl Rule {
    fn new(name: &'static str, condition: Condition, tier: SeverityTier) -> Self {
        Self {
            name,
            condition,
            tier,
        }
    }
}

/// 依優先順序排列的規則清單，由上而下評估，第一個命中者勝出
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn new() -> Result<Self> {
        Self::with_extra_patterns(&HashMap::new())
    }

    /// 額外樣式附加在該分級內建樣式之後，不影響內建優先順序
    pub fn with_extra_patterns(extra: &HashMap<SeverityTier, Vec<String>>) -> Result<Self> {
        use Condition::ContainsAny;
        use SeverityTier::*;

        let tier_set = |tier: SeverityTier, builtin: &[&str]| -> Result<Condition> {
            let mut patterns: Vec<String> = builtin.iter().map(|p| p.to_string()).collect();
            if let Some(additional) = extra.get(&tier) {
                patterns.extend(additional.iter().cloned());
            }
            Ok(Condition::Matches(PatternSet::new(tier, patterns)?))
        };

        let rules = vec![
            Rule::new(
                "intensifier-override",
                Condition::all_of([
                    ContainsAny(INTENSIFIER_TERMS),
                    ContainsAny(PAIN_CONTEXT_TERMS),
                ]),
                Emergency,
            ),
            Rule::new(
                "asthma-acute",
                Condition::all_of([ContainsAny(ASTHMA_TERMS), ContainsAny(ASTHMA_ACUTE_TERMS)]),
                Emergency,
            ),
            Rule::new(
                "asthma-worsening",
                Condition::all_of([ContainsAny(ASTHMA_TERMS), ContainsAny(WORSENING_TERMS)]),
                SemiUrgent,
            ),
            Rule::new("asthma-stable", ContainsAny(ASTHMA_TERMS), Routine),
            Rule::new(
                "blood-sugar-dangerous",
                Condition::all_of([
                    ContainsAny(BLOOD_SUGAR_TERMS),
                    ContainsAny(BLOOD_SUGAR_DANGER_TERMS),
                ]),
                Urgent,
            ),
            Rule::new(
                "blood-sugar-worsening",
                Condition::all_of([ContainsAny(BLOOD_SUGAR_TERMS), ContainsAny(WORSENING_TERMS)]),
                SemiUrgent,
            ),
            Rule::new("blood-sugar-stable", ContainsAny(BLOOD_SUGAR_TERMS), Routine),
            Rule::new(
                "back-pain-severe",
                Condition::all_of([
                    ContainsAny(BACK_PAIN_TERMS),
                    ContainsAny(BACK_PAIN_SEVERE_TERMS),
                ]),
                SemiUrgent,
            ),
            Rule::new(
                "back-pain-chronic",
                Condition::all_of([ContainsAny(BACK_PAIN_TERMS), ContainsAny(CHRONIC_TERMS)]),
                Routine,
            ),
            Rule::new("back-pain-mild", ContainsAny(BACK_PAIN_TERMS), SelfCare),
            Rule::new(
                "emergency-patterns",
                tier_set(Emergency, EMERGENCY_PATTERNS)?,
                Emergency,
            ),
            Rule::new("urgent-patterns", tier_set(Urgent, URGENT_PATTERNS)?, Urgent),
            Rule::new(
                "semi-urgent-patterns",
                tier_set(SemiUrgent, SEMI_URGENT_PATTERNS)?,
                SemiUrgent,
            ),
            Rule::new("routine-patterns", tier_set(Routine, ROUTINE_PATTERNS)?, Routine),
            Rule::new(
                "chronic-worsening",
                Condition::all_of([ContainsAny(CHRONIC_TERMS), ContainsAny(WORSENING_TERMS)]),
                Routine,
            ),
            // 只會確認預設值，保留是為了追蹤時能指出命中的字句
            Rule::new(
                "self-care-patterns",
                tier_set(SelfCare, SELF_CARE_PATTERNS)?,
                SelfCare,
            ),
            Rule::new("default", Condition::Always, SelfCare),
        ];

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// 最後一條規則永遠成立，因此必定回傳一條規則
    pub fn first_match(&self, unit: &str) -> &Rule {
        let lowered = unit.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.condition.matches(&lowered))
            .unwrap_or(&self.rules[self.rules.len() - 1])
    }

    /// 命中某分級樣式集合時，回傳該樣式字串
    pub fn matched_pattern(&self, rule: &Rule, unit: &str) -> Option<String> {
        match &rule.condition {
            Condition::Matches(set) => set.first_match(&unit.to_lowercase()).map(str::to_string),
            _ => None,
        }
    }
}

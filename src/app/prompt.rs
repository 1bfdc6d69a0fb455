use crate::domain::model::TriageResult;

/// 組合送給生成服務的提示詞，包含分級結果與文獻背景
///
/// 每行前的八個空白與 `Triage Assessment: ` 的結尾空白是模板原文的一部分。
pub fn build_prompt(symptoms: &str, triage: &TriageResult, context: &str) -> String {
    format!(
        concat!(
            "You are a medical AI assistant providing brief, focused symptom analysis.\n",
            "        \n",
            "        User Symptoms: {symptoms}\n",
            "        \n",
            "        Triage Assessment: \n",
            "        - Severity: {severity}\n",
            "        - Care: {pathway}\n",
            "        \n",
            "        Medical Context:\n",
            "        {context}\n",
            "        \n",
            "        Provide a VERY BRIEF response (maximum 250 words) with:\n",
            "        1. Possible explanations for these specific symptoms (2-3 sentences)\n",
            "        2. Brief self-care advice (2-3 bullet points)\n",
            "        3. When to seek medical help (1-2 sentences)\n",
            "        \n",
            "        IMPORTANT:\n",
            "        - Be extremely concise and specific\n",
            "        - Focus only on the symptoms described\n",
            "        - Avoid generic advice or repetition\n",
            "        - For serious symptoms, emphasize seeking care\n",
            "        \n",
            "        Medical AI:"
        ),
        symptoms = symptoms,
        severity = triage.severity,
        pathway = triage.pathway,
        context = context,
    )
}

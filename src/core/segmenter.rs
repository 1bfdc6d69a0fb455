/// 分隔符號優先順序：換行、" - "、項目符號、逗號
pub const DELIMITERS: [&str; 4] = ["\n", " - ", "• ", ", "];

/// 將症狀描述切成症狀單元
///
/// 只使用第一個出現在文字中的分隔符號切割整段文字，切割後去除空白並丟棄空單元。
/// 空白輸入回傳空序列。
pub fn segment(report: &str) -> Vec<&str> {
    let delimiter = DELIMITERS
        .iter()
        .copied()
        .find(|delimiter| report.contains(delimiter));

    let parts: Vec<&str> = match delimiter {
        Some(delimiter) => report.split(delimiter).collect(),
        None => vec![report],
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .collect()
}

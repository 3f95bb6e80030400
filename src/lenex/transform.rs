// ==========================================
// 游泳赛事报名转换系统 - 报名 → 成绩 文档转换
// ==========================================
// 用途: 将已编排的报名文档改写为成绩录入模板
//   ENTRIES → RESULTS, ENTRY → RESULT, entrytime → swimtime
// ==========================================

use crate::lenex::error::LenexResult;
use crate::lenex::file::{read_document_text, write_document_bytes};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument};

/// 替换顺序固定: ENTRIES 必须先于 ENTRY
const REPLACEMENTS: [(&str, &str); 3] = [
    ("ENTRIES", "RESULTS"),
    ("ENTRY", "RESULT"),
    ("entrytime", "swimtime"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementCount {
    pub from: &'static str,
    pub to: &'static str,
    pub count: usize,
}

/// 文本级替换，返回新文本与每项替换次数
pub fn entries_to_results(content: &str) -> (String, Vec<ReplacementCount>) {
    let mut text = content.to_string();
    let mut stats = Vec::with_capacity(REPLACEMENTS.len());

    for (from, to) in REPLACEMENTS {
        let count = text.matches(from).count();
        text = text.replace(from, to);
        stats.push(ReplacementCount { from, to, count });
    }

    (text, stats)
}

/// 文件级转换（支持 .lef/.xml/.lxf）
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn transform_file(input: &Path, output: &Path) -> LenexResult<Vec<ReplacementCount>> {
    let content = read_document_text(input)?;
    debug!(chars = content.chars().count(), "读取输入文档");

    let (transformed, stats) = entries_to_results(&content);
    for stat in &stats {
        info!(from = stat.from, to = stat.to, count = stat.count, "替换完成");
    }

    write_document_bytes(output, transformed.as_bytes())?;
    info!("成绩模板已保存");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_follow_replacement_order() {
        let input = r#"<ENTRIES><ENTRY eventid="1" entrytime="NT"/><ENTRY eventid="2" entrytime="NT"/></ENTRIES>"#;
        let (out, stats) = entries_to_results(input);

        assert_eq!(
            out,
            r#"<RESULTS><RESULT eventid="1" swimtime="NT"/><RESULT eventid="2" swimtime="NT"/></RESULTS>"#
        );
        assert_eq!(stats[0].count, 2); // ENTRIES 开闭标签
        assert_eq!(stats[1].count, 2);
        assert_eq!(stats[2].count, 2);
    }
}

// ==========================================
// 游泳赛事报名转换系统 - 表头自动定位
// ==========================================
// 输入: 表头行 + 表头文本→字段词表 + 基础列映射
// 输出: 更新后的列映射 + 未能定位的字段
// 匹配: 忽略大小写与首尾空白；同一字段多次命中时以最右列为准
// ==========================================

use crate::config::registration_config::ColumnMapping;
use crate::domain::row::{Cell, RowField};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDetection {
    pub mapping: ColumnMapping,
    /// 命中的字段 → (列号, 表头原文)
    pub matched: BTreeMap<RowField, (i32, String)>,
    /// 未在表头中找到的字段（保留基础映射中的列号）
    pub not_found: Vec<RowField>,
}

pub fn detect_columns(
    header: &[Cell],
    auto_location: &BTreeMap<String, RowField>,
    base: &ColumnMapping,
) -> ColumnDetection {
    let lexicon: BTreeMap<String, RowField> = auto_location
        .iter()
        .map(|(k, v)| (k.trim().to_lowercase(), *v))
        .collect();

    let mut mapping = base.clone();
    let mut matched = BTreeMap::new();

    for (index, cell) in header.iter().enumerate() {
        let text = cell.to_string();
        if let Some(field) = lexicon.get(&text.trim().to_lowercase()) {
            debug!(column = index, header = %text, field = %field, "表头命中");
            mapping.set(*field, index as i32);
            matched.insert(*field, (index as i32, text.trim().to_string()));
        }
    }

    let found: BTreeSet<RowField> = matched.keys().copied().collect();
    let not_found = RowField::ALL
        .iter()
        .copied()
        .filter(|f| !found.contains(f))
        .collect();

    ColumnDetection {
        mapping,
        matched,
        not_found,
    }
}

// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持俄文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言（报名表与赛事组织方均为俄文）
pub const DEFAULT_LOCALE: &str = "ru";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"ru" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 已提供翻译的语言
pub fn available_locales() -> Vec<String> {
    rust_i18n::available_locales!()
        .into_iter()
        .map(|l| l.to_string())
        .collect()
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use swim_reg::i18n::t;
/// let msg = t("cli.no_issues");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use swim_reg::i18n::t_with_args;
/// let msg = t_with_args("cli.report_written", &[("path", "/tmp/report.json")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    fill(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译（不修改全局语言，供并发转换使用）
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn fill(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

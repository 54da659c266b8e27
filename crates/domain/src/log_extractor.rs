//! 从任务执行日志中提取错误信息
//!
//! QRS重载日志每行形如 `<时间戳> <级别或标记> <内容...>`，出错时第二列为 `Error:`。
//! 日志末尾通常是一个空行，因此从倒数第二行开始向前扫描，最近的一条错误优先。

/// 未找到错误行时返回的占位内容
pub const NO_ERROR_MESSAGE: &str = "no error message";

const ERROR_MARKER: &str = "Error:";

/// 返回日志中最后一条错误行的内容；第0行和最后一行不参与匹配
pub fn extract_error_message(log: &str) -> String {
    let lines: Vec<&str> = log.split('\n').collect();

    (1..lines.len().saturating_sub(1))
        .rev()
        .find_map(|index| error_text(lines[index]))
        .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string())
}

fn error_text(line: &str) -> Option<String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.get(1) {
        Some(&marker) if marker == ERROR_MARKER => Some(fields[2..].join(" ")),
        _ => None,
    }
}

//! LRC 格式生成器

use crate::converter::types::SyncedLyricLine;

/// LRC 生成的主入口函数。
///
/// 每行输出为 `[mm:ss.xx]text`，以换行结尾。
pub fn generate_lrc(lines: &[SyncedLyricLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}{}\n", format_lrc_time_cs(line.timestamp_ms), line.text))
        .collect()
}

/// 将毫秒时间格式化为 LRC 时间字符串 `[mm:ss.xx]`。
///
/// 此函数输出百分秒 (xx)，不足一百分秒的部分被截断。
///
/// # 参数
/// * `ms` - 需要格式化的总毫秒数。
///
/// # 返回
/// `String` - 格式化后的 LRC 时间标签字符串。
pub fn format_lrc_time_cs(ms: u64) -> String {
    let minutes = ms / 60000;
    let seconds = (ms % 60000) / 1000;
    let centiseconds = (ms % 1000) / 10;
    format!("[{minutes:02}:{seconds:02}.{centiseconds:02}]")
}

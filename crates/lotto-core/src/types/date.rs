//! 유연한 날짜 파싱.
//!
//! 수집되는 CSV 파일들은 날짜 형식이 일관적이지 않습니다.
//! `DD/MM/YYYY`와 `YYYY/MM/DD`를 모두 허용하고, `-` 구분자와
//! 뒤에 붙은 시각 부분은 정규화 단계에서 처리합니다.

use chrono::NaiveDate;

/// 날짜 문자열을 유연하게 파싱합니다.
///
/// 허용 형식:
/// - `DD/MM/YYYY`, `DD-MM-YYYY`
/// - `YYYY/MM/DD`, `YYYY-MM-DD`
/// - 위 형식 뒤에 공백으로 구분된 시각이 붙은 경우 (시각은 무시)
///
/// 형식이 모호한 경우 `DD/MM/YYYY`를 우선합니다.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.split(' ').next()?.replace('-', "/");

    for fmt in ["%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Some(date);
        }
    }

    None
}

//! 원본 과거 결과 CSV 파싱.
//!
//! lotoideas 내보내기 형식: 헤더 한 줄 다음부터 행마다
//! 열 0 = 추첨 날짜, 열 1~6 = 여섯 개 번호. 날짜 형식과 구분자가
//! 파일마다 들쭉날쭉하므로 유연한 날짜 파서를 사용합니다.
//!
//! 잘못된 행(번호 누락, 숫자 아님, 범위 밖, 중복, 날짜 불명)은
//! 파싱을 중단시키지 않고 건너뛴 뒤 개수만 집계합니다.

use crate::error::{DataError, Result};
use lotto_core::{parse_flexible_date, DrawNumbers, DrawRecord, Lottery, DRAW_SIZE};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// 파싱 결과: 유효한 추첨 목록과 건너뛴 행 수.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// 날짜 오름차순으로 정렬된 추첨 목록
    pub draws: Vec<DrawRecord>,
    /// 검증 실패로 건너뛴 행 수
    pub skipped: usize,
}

/// 리더에서 과거 결과 CSV를 파싱합니다.
///
/// 반환되는 추첨 목록은 날짜 오름차순으로 정렬됩니다 (안정 정렬,
/// 같은 날짜는 입력 순서 유지).
pub fn parse_history_csv<R: Read>(reader: R, lottery: Lottery) -> Result<ParseOutcome> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut draws = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in csv_reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                debug!(line, error = %e, "Unreadable CSV row skipped");
                skipped += 1;
                continue;
            }
        };

        match parse_row(&record, lottery) {
            Some(draw) => draws.push(draw),
            None => {
                debug!(line, row = ?record, "Invalid draw row skipped");
                skipped += 1;
            }
        }
    }

    draws.sort_by_key(|d| d.date);

    if skipped > 0 {
        warn!(
            lottery = %lottery,
            parsed = draws.len(),
            skipped,
            "History CSV parsed with skipped rows"
        );
    }

    Ok(ParseOutcome { draws, skipped })
}

/// 파일에서 과거 결과 CSV를 파싱합니다.
pub fn parse_history_file<P: AsRef<Path>>(path: P, lottery: Lottery) -> Result<ParseOutcome> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::NotFound(format!("{}: {}", path.display(), e)))?;
    parse_history_csv(file, lottery)
}

fn parse_row(record: &csv::StringRecord, lottery: Lottery) -> Option<DrawRecord> {
    if record.len() < 1 + DRAW_SIZE {
        return None;
    }

    let date = parse_flexible_date(record.get(0)?)?;

    let mut numbers = [0u8; DRAW_SIZE];
    for (i, slot) in numbers.iter_mut().enumerate() {
        *slot = record.get(1 + i)?.parse().ok()?;
    }

    let numbers = DrawNumbers::new(numbers).ok()?;
    Some(DrawRecord::new(date, numbers, lottery))
}

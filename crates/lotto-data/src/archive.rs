//! 병합 아카이브 읽기/쓰기.
//!
//! 두 복권의 이력을 하나로 합친 `estadistiques_loteries_NETA.csv`를
//! 다룹니다. 기존 스크립트들이 쓰던 열 이름을 그대로 유지합니다:
//! `Data` (날짜), `Combinacio` (`[n1, n2, n3, n4, n5, n6]` 표기),
//! `Origen` (복권 표시 이름). `Combinacio` 값에 쉼표가 들어가므로
//! 반드시 인용 처리가 필요합니다.

use crate::error::{DataError, Result};
use lotto_core::{parse_flexible_date, DrawNumbers, DrawRecord, Lottery, DRAW_SIZE};
use std::path::Path;
use tracing::{debug, info, warn};

/// `Combinacio` 열 표기: `[5, 12, 23, 31, 40, 47]`.
pub fn format_combination(numbers: &DrawNumbers) -> String {
    let parts: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// `Combinacio` 열 값 파싱. 대괄호는 있어도 없어도 허용합니다.
pub fn parse_combination(raw: &str) -> Option<DrawNumbers> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');

    let mut numbers = [0u8; DRAW_SIZE];
    let mut count = 0usize;
    for part in trimmed.split(',') {
        if count >= DRAW_SIZE {
            return None;
        }
        numbers[count] = part.trim().parse().ok()?;
        count += 1;
    }
    if count != DRAW_SIZE {
        return None;
    }

    DrawNumbers::new(numbers).ok()
}

/// 추첨 목록을 아카이브 파일로 씁니다.
///
/// 날짜 오름차순으로 정렬해 기록합니다 (같은 날짜는 입력 순서 유지).
pub fn write_archive<P: AsRef<Path>>(path: P, draws: &[DrawRecord]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut sorted: Vec<&DrawRecord> = draws.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Data", "Combinacio", "Origen"])?;

    for draw in &sorted {
        writer.write_record([
            draw.date.format("%d/%m/%Y").to_string(),
            format_combination(&draw.numbers),
            draw.lottery.display_name().to_string(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), draws = sorted.len(), "Archive written");
    Ok(sorted.len())
}

/// 아카이브 파일을 추첨 목록으로 읽습니다.
///
/// 유효하지 않은 행은 건너뛰고 경고만 남깁니다. 반환 목록은
/// 날짜 오름차순입니다.
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<Vec<DrawRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::NotFound(format!("{}: {}", path.display(), e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut draws = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let parsed = (|| {
            let date = parse_flexible_date(record.get(0)?)?;
            let numbers = parse_combination(record.get(1)?)?;
            let lottery = Lottery::from_str(record.get(2)?)?;
            Some(DrawRecord::new(date, numbers, lottery))
        })();

        match parsed {
            Some(draw) => draws.push(draw),
            None => {
                debug!(line, row = ?record, "Invalid archive row skipped");
                skipped += 1;
            }
        }
    }

    draws.sort_by_key(|d| d.date);

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Archive read with skipped rows");
    }

    Ok(draws)
}

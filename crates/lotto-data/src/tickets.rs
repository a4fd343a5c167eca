//! 생성된 티켓 저장/불러오기.
//!
//! `apostes_actuals.csv`: 열 `Data/Tipus/Combinacio`, 행은
//! `Principal`(주 베팅)과 `Secundaria`(보조 베팅) 두 줄입니다.
//! 새 티켓을 저장하면 이전 티켓을 덮어씁니다.

use crate::archive::{format_combination, parse_combination};
use crate::error::{DataError, Result};
use lotto_core::{parse_flexible_date, BetKind, DrawNumbers, Ticket};
use std::path::Path;
use tracing::info;

/// 티켓을 파일에 저장합니다. 기존 파일은 덮어씁니다.
pub fn save_ticket<P: AsRef<Path>>(path: P, ticket: &Ticket) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Data", "Tipus", "Combinacio"])?;

    let date = ticket.generated_on.format("%d/%m/%Y").to_string();
    for kind in [BetKind::Primary, BetKind::Secondary] {
        writer.write_record([
            date.clone(),
            kind.archive_str().to_string(),
            format_combination(ticket.bet(kind)),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), date = %ticket.generated_on, "Ticket saved");
    Ok(())
}

/// 파일에서 티켓을 불러옵니다.
///
/// 두 베팅 행이 모두 있어야 합니다. 파일이 없으면 `NotFound`,
/// 형식이 깨졌으면 `InvalidData`를 반환합니다.
pub fn load_ticket<P: AsRef<Path>>(path: P) -> Result<Ticket> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::NotFound(format!("{}: {}", path.display(), e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut generated_on = None;
    let mut primary: Option<DrawNumbers> = None;
    let mut secondary: Option<DrawNumbers> = None;

    for record in reader.records() {
        let record = record?;
        let date = record
            .get(0)
            .and_then(parse_flexible_date)
            .ok_or_else(|| DataError::InvalidData("티켓 날짜 파싱 실패".to_string()))?;
        let kind = record
            .get(1)
            .and_then(BetKind::from_archive_str)
            .ok_or_else(|| DataError::InvalidData("알 수 없는 베팅 종류".to_string()))?;
        let numbers = record
            .get(2)
            .and_then(parse_combination)
            .ok_or_else(|| DataError::InvalidData("티켓 조합 파싱 실패".to_string()))?;

        generated_on = Some(date);
        match kind {
            BetKind::Primary => primary = Some(numbers),
            BetKind::Secondary => secondary = Some(numbers),
        }
    }

    match (generated_on, primary, secondary) {
        (Some(date), Some(primary), Some(secondary)) => {
            Ok(Ticket::new(date, primary, secondary))
        }
        _ => Err(DataError::InvalidData(
            "티켓 파일에 주/보조 베팅 행이 모두 필요함".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lotto-tickets-{}-{}", std::process::id(), name))
    }

    fn sample_ticket() -> Ticket {
        Ticket::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            DrawNumbers::new([1, 2, 3, 4, 5, 6]).unwrap(),
            DrawNumbers::new([10, 11, 12, 13, 14, 15]).unwrap(),
        )
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip.csv");
        let ticket = sample_ticket();

        save_ticket(&path, &ticket).unwrap();
        let loaded = load_ticket(&path).unwrap();

        assert_eq!(loaded, ticket);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_overwrites_previous() {
        let path = temp_path("overwrite.csv");
        save_ticket(&path, &sample_ticket()).unwrap();

        let newer = Ticket::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            DrawNumbers::new([7, 8, 9, 10, 11, 12]).unwrap(),
            DrawNumbers::new([20, 21, 22, 23, 24, 25]).unwrap(),
        );
        save_ticket(&path, &newer).unwrap();

        let loaded = load_ticket(&path).unwrap();
        assert_eq!(loaded, newer);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_ticket("/nonexistent/tickets.csv"),
            Err(DataError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_incomplete_ticket() {
        let path = temp_path("incomplete.csv");
        std::fs::write(
            &path,
            "Data,Tipus,Combinacio\n01/06/2025,Principal,\"[1, 2, 3, 4, 5, 6]\"\n",
        )
        .unwrap();

        assert!(matches!(
            load_ticket(&path),
            Err(DataError::InvalidData(_))
        ));
        std::fs::remove_file(&path).ok();
    }
}

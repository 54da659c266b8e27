use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone};
use reporter_domain::FailedTaskRecord;
use reporter_errors::{ReporterError, ReporterResult};
use tracing::{debug, info};

pub const CSV_HEADER: [&str; 7] = [
    "id",
    "task_id",
    "start",
    "stop",
    "date_entered",
    "name",
    "error",
];

/// 按日期追加写入失败任务报告
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// `DD_MM_YYYY.csv`
    pub fn file_name_for(date: NaiveDate) -> String {
        date.format("%d_%m_%Y.csv").to_string()
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(Self::file_name_for(date))
    }

    /// 写入当天的文件
    pub fn write_batch(&self, records: &[FailedTaskRecord]) -> ReporterResult<PathBuf> {
        self.write_batch_for_date(Local::now().date_naive(), records)
    }

    pub fn write_batch_for_date(
        &self,
        date: NaiveDate,
        records: &[FailedTaskRecord],
    ) -> ReporterResult<PathBuf> {
        let path = self.path_for(date);
        let file = open_append(&path)?;
        let is_new = file
            .metadata()
            .map_err(|e| storage_error(&path, e))?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            debug!("新建CSV文件，写入表头: {}", path.display());
            writer
                .write_record(CSV_HEADER)
                .map_err(|e| storage_error(&path, e))?;
        }

        for record in records {
            writer
                .write_record(record_fields(record))
                .map_err(|e| storage_error(&path, e))?;
        }

        writer.flush().map_err(|e| storage_error(&path, e))?;

        info!(
            "失败任务已写入CSV: path={}, rows={}",
            path.display(),
            records.len()
        );
        Ok(path)
    }
}

/// RFC 3339格式，保留小数秒和时区偏移，可无损解析回同一时刻
pub fn format_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn record_fields(record: &FailedTaskRecord) -> [String; 7] {
    [
        record.id.clone(),
        record.task_id.clone(),
        format_timestamp(&record.start),
        format_timestamp(&record.stop),
        format_timestamp(&record.date_recorded),
        record.name.clone(),
        record.error_message.clone(),
    ]
}

fn open_append(path: &Path) -> ReporterResult<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }
    options.open(path).map_err(|e| storage_error(path, e))
}

fn storage_error(path: &Path, err: impl Display) -> ReporterError {
    ReporterError::storage(format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn record(task_id: &str, error: &str) -> FailedTaskRecord {
        FailedTaskRecord {
            id: format!("result-{task_id}"),
            task_id: task_id.to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            stop: Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 30).unwrap(),
            date_recorded: Local::now(),
            name: format!("Reload {task_id}"),
            error_message: error.to_string(),
        }
    }

    fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap()
            .records()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_file_name_for() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(CsvSink::file_name_for(date), "07_03_2024.csv");
    }

    #[test]
    fn test_fresh_file_gets_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let path = sink
            .write_batch_for_date(date, &[record("t1", "disk full"), record("t2", "timeout")])
            .unwrap();

        assert_eq!(path, dir.path().join("01_03_2024.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(
            content.lines().next().unwrap(),
            "id,task_id,start,stop,date_entered,name,error"
        );

        let rows = read_rows(&path);
        assert_eq!(&rows[1][0], "result-t1");
        assert_eq!(&rows[1][1], "t1");
        assert_eq!(&rows[1][5], "Reload t1");
        assert_eq!(&rows[1][6], "disk full");
    }

    #[test]
    fn test_header_written_once_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        sink.write_batch_for_date(date, &[record("t1", "a")]).unwrap();
        sink.write_batch_for_date(date, &[]).unwrap();
        let path = sink
            .write_batch_for_date(date, &[record("t2", "b"), record("t3", "c")])
            .unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 4);
        let headers = rows.iter().filter(|r| &r[0] == "id").count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let path = sink
            .write_batch_for_date(date, &[record("t1", "Field 'A', \"B\" not found")])
            .unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows[1].len(), 7);
        assert_eq!(&rows[1][6], "Field 'A', \"B\" not found");
    }

    #[test]
    fn test_timestamps_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let mut original = record("t1", "x");
        original.start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let path = sink
            .write_batch_for_date(date, std::slice::from_ref(&original))
            .unwrap();

        let rows = read_rows(&path);
        let start = DateTime::parse_from_rfc3339(&rows[1][2]).unwrap();
        let stop = DateTime::parse_from_rfc3339(&rows[1][3]).unwrap();
        let recorded = DateTime::parse_from_rfc3339(&rows[1][4]).unwrap();
        assert_eq!(start, original.start);
        assert_eq!(stop, original.stop);
        assert_eq!(recorded, original.date_recorded);
    }

    #[test]
    fn test_format_timestamp_includes_offset() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(&utc), "2024-03-01T10:00:00+00:00");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = utc.with_timezone(&offset);
        assert_eq!(format_timestamp(&local), "2024-03-01T12:00:00+02:00");
    }

    #[test]
    fn test_unwritable_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("missing").join("nested"));
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let err = sink.write_batch_for_date(date, &[record("t1", "x")]).err().unwrap();
        assert!(matches!(err, ReporterError::Storage(_)));
    }
}

//! CSV writers for the cleaned tables.
//!
//! Every table starts with its header row, even when empty. Missing values
//! (`None`) are written as empty fields. Existing files are overwritten.

use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{OutputError, OutputResult};
use crate::models::{CampaignRow, CleanedTables, ClientRow, EconomicsRow};

/// An output row type with a fixed file name and column order.
///
/// `COLUMNS` must list the struct fields in declaration order.
pub trait TableRow: Serialize {
    const FILE_NAME: &'static str;
    const COLUMNS: &'static [&'static str];
}

impl TableRow for ClientRow {
    const FILE_NAME: &'static str = "client.csv";
    const COLUMNS: &'static [&'static str] = &[
        "client_id",
        "age",
        "job",
        "marital",
        "education",
        "credit_default",
        "mortgage",
    ];
}

impl TableRow for CampaignRow {
    const FILE_NAME: &'static str = "campaign.csv";
    const COLUMNS: &'static [&'static str] = &[
        "client_id",
        "number_contacts",
        "contact_duration",
        "previous_campaign_contacts",
        "previous_outcome",
        "campaign_outcome",
        "last_contact_date",
    ];
}

impl TableRow for EconomicsRow {
    const FILE_NAME: &'static str = "economics.csv";
    const COLUMNS: &'static [&'static str] = &["client_id", "cons_price_idx", "euribor_three_months"];
}

/// Paths of the three written tables
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenTables {
    pub client: PathBuf,
    pub campaign: PathBuf,
    pub economics: PathBuf,
}

fn write_rows<R: TableRow, W: Write>(rows: &[R], writer: W, path: &Path) -> OutputResult<()> {
    let csv_err = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(R::COLUMNS).map_err(csv_err)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a table as CSV text.
pub fn table_to_string<R: TableRow>(rows: &[R]) -> OutputResult<String> {
    let mut buf = Vec::new();
    write_rows(rows, &mut buf, Path::new(R::FILE_NAME))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// A table written to a temporary file next to its final path.
struct StagedTable {
    file: NamedTempFile,
    path: PathBuf,
}

impl StagedTable {
    /// Rename the staged file over its final path.
    fn commit(self) -> OutputResult<PathBuf> {
        let Self { file, path } = self;
        file.persist(&path).map_err(|e| OutputError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        Ok(path)
    }
}

fn stage_table<R: TableRow>(rows: &[R], dir: &Path) -> OutputResult<StagedTable> {
    let path = dir.join(R::FILE_NAME);
    let io_err = |source| OutputError::Io {
        path: path.clone(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix(R::FILE_NAME)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err)?;
    set_readable(file.as_file()).map_err(io_err)?;
    write_rows(rows, file.as_file_mut(), &path)?;

    Ok(StagedTable { file, path })
}

#[cfg(unix)]
fn set_readable(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable(_file: &File) -> std::io::Result<()> {
    Ok(())
}

/// Write one table to `dir/<FILE_NAME>`, replacing any previous file.
pub fn write_table<R: TableRow>(rows: &[R], dir: &Path) -> OutputResult<PathBuf> {
    stage_table(rows, dir)?.commit()
}

/// Write `client.csv`, `campaign.csv` and `economics.csv` into `dir`.
///
/// All three tables are fully written to temporary files before any of
/// them replaces a previous output.
pub fn write_tables(tables: &CleanedTables, dir: &Path) -> OutputResult<WrittenTables> {
    fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let client = stage_table(&tables.client, dir)?;
    let campaign = stage_table(&tables.campaign, dir)?;
    let economics = stage_table(&tables.economics, dir)?;

    Ok(WrittenTables {
        client: client.commit()?,
        campaign: campaign.commit()?,
        economics: economics.commit()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> CleanedTables {
        CleanedTables {
            client: vec![ClientRow {
                client_id: 0,
                age: 41,
                job: Some("blue_collar".into()),
                marital: Some("married".into()),
                education: None,
                credit_default: 0,
                mortgage: 1,
            }],
            campaign: vec![CampaignRow {
                client_id: 0,
                number_contacts: 2,
                contact_duration: 180,
                previous_campaign_contacts: 0,
                previous_outcome: 0,
                campaign_outcome: 1,
                last_contact_date: "2022-05-07".into(),
            }],
            economics: vec![EconomicsRow {
                client_id: 0,
                cons_price_idx: 93.994,
                euribor_three_months: 4.857,
            }],
        }
    }

    #[test]
    fn test_client_csv_layout() {
        let text = table_to_string(&tables().client).unwrap();
        assert_eq!(
            text,
            "client_id,age,job,marital,education,credit_default,mortgage\n\
             0,41,blue_collar,married,,0,1\n"
        );
    }

    #[test]
    fn test_campaign_csv_layout() {
        let text = table_to_string(&tables().campaign).unwrap();
        assert_eq!(
            text,
            "client_id,number_contacts,contact_duration,previous_campaign_contacts,previous_outcome,campaign_outcome,last_contact_date\n\
             0,2,180,0,0,1,2022-05-07\n"
        );
    }

    #[test]
    fn test_economics_csv_layout() {
        let text = table_to_string(&tables().economics).unwrap();
        assert_eq!(
            text,
            "client_id,cons_price_idx,euribor_three_months\n0,93.994,4.857\n"
        );
    }

    #[test]
    fn test_empty_table_has_header() {
        let text = table_to_string::<EconomicsRow>(&[]).unwrap();
        assert_eq!(text, "client_id,cons_price_idx,euribor_three_months\n");
    }

    #[test]
    fn test_write_tables_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/output");

        let written = write_tables(&tables(), &out).unwrap();
        assert_eq!(written.client, out.join("client.csv"));

        write_tables(&CleanedTables::default(), &out).unwrap();
        let client = std::fs::read_to_string(&written.client).unwrap();
        assert_eq!(client, "client_id,age,job,marital,education,credit_default,mortgage\n");
    }

    struct UnwritableRow;

    impl Serialize for UnwritableRow {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot serialize"))
        }
    }

    impl TableRow for UnwritableRow {
        const FILE_NAME: &'static str = "client.csv";
        const COLUMNS: &'static [&'static str] = &["client_id"];
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("client.csv");
        std::fs::write(&previous, "client_id\n7\n").unwrap();

        assert!(write_table(&[UnwritableRow], dir.path()).is_err());

        assert_eq!(std::fs::read_to_string(&previous).unwrap(), "client_id\n7\n");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("client.csv")]);
    }
}

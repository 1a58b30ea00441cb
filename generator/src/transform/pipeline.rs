//! High-level pipeline: load, normalize, assemble, write.
//!
//! Stages hand their results to the next one as plain values; nothing is
//! kept between runs. Loads run one after another and each completes before
//! the next starts. Documents are assembled, and the province check done,
//! before the first file is written.
//!
//! # Example
//!
//! ```rust,ignore
//! use wilayah::{run, GeneratorOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = run(&GeneratorOptions::default()).await?;
//!     println!("{} files in {}", summary.files_written, summary.output_dir.display());
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use super::assemble::assemble;
use super::normalize::normalize_rows;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success};
use crate::models::{Dataset, RegionLevel};
use crate::output::{prepare_tree, write_all, write_document};
use crate::parser::{load_table, LoadOptions, LoadedTable};

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Directory holding `provinces.csv`, `regencies.csv`, ...
    pub data_dir: PathBuf,

    /// Root of the generated API tree
    pub output_dir: PathBuf,

    pub load: LoadOptions,

    /// Inputs carry a header row; columns are resolved through the alias
    /// table instead of the fixed positional sets.
    pub with_headers: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("api"),
            load: LoadOptions::default(),
            with_headers: false,
        }
    }
}

impl GeneratorOptions {
    /// Input file for one level.
    pub fn input_path(&self, level: RegionLevel) -> PathBuf {
        self.data_dir.join(format!("{}.csv", level.collection()))
    }
}

/// Record counts per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub provinces: usize,
    pub regencies: usize,
    pub districts: usize,
    pub villages: usize,
}

impl LevelCounts {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            provinces: dataset.provinces.len(),
            regencies: dataset.regencies.len(),
            districts: dataset.districts.len(),
            villages: dataset.villages.len(),
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub counts: LevelCounts,
    pub files_written: usize,
    /// Output root, canonicalized when possible
    pub output_dir: PathBuf,
}

/// Run the whole pipeline.
pub async fn run(options: &GeneratorOptions) -> PipelineResult<RunSummary> {
    log_info("🚀 Starting CSV import...");

    let dataset = load_dataset(options).await?;
    let files_written = generate(&dataset, &options.output_dir).await?;

    let output_dir = tokio::fs::canonicalize(&options.output_dir)
        .await
        .unwrap_or_else(|_| options.output_dir.clone());

    log_info("✨ API generation completed!");
    log_info(format!("📦 Total files generated: {}", files_written));
    log_info(format!("📂 Output directory: {}", output_dir.display()));

    Ok(RunSummary {
        counts: LevelCounts::of(&dataset),
        files_written,
        output_dir,
    })
}

/// Load all four tables, then normalize them.
pub async fn load_dataset(options: &GeneratorOptions) -> PipelineResult<Dataset> {
    log_info("📖 Reading CSV files...");

    let mut tables: Vec<(RegionLevel, LoadedTable)> = Vec::with_capacity(RegionLevel::ALL.len());
    for level in RegionLevel::ALL {
        let path = options.input_path(level);
        log_info(format!("Reading {}:", display_name(&path)));

        let columns = if options.with_headers {
            None
        } else {
            Some(level.input_columns())
        };
        let table = load_table(&path, columns, &options.load).await?;
        tables.push((level, table));
    }

    log_info("🔄 Normalizing data...");
    let mut dataset = Dataset::default();
    for (level, table) in &tables {
        *dataset.level_mut(*level) = normalize_rows(&table.rows, *level);
    }

    let counts = LevelCounts::of(&dataset);
    log_info("📊 Data Summary:");
    log_info_indent(format!("Provinces: {}", counts.provinces), 1);
    log_info_indent(format!("Regencies: {}", counts.regencies), 1);
    log_info_indent(format!("Districts: {}", counts.districts), 1);
    log_info_indent(format!("Villages: {}", counts.villages), 1);

    Ok(dataset)
}

/// Assemble and write every document for an in-memory dataset.
///
/// Returns the number of files written. Nothing is written when the
/// dataset has no provinces.
pub async fn generate(dataset: &Dataset, output_dir: &Path) -> PipelineResult<usize> {
    let documents = assemble(dataset)?;

    log_info("📁 Creating directory structure...");
    prepare_tree(output_dir).await?;

    log_info("🔨 Generating API files...");
    let mut written = 0;
    for group in &documents {
        write_document(output_dir, &group.listing).await?;
        log_success(group.listing.path.display().to_string());

        if group.level.child().is_some() {
            let count = write_all(output_dir, &group.details).await?;
            log_success(format!("{} {} detail files", count, group.level));
        }
        written += group.file_count();
    }

    Ok(written)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadError, PipelineError};
    use std::collections::BTreeMap;
    use std::fs;

    fn write_inputs(dir: &Path, provinces: &str, regencies: &str, districts: &str, villages: &str) {
        fs::write(dir.join("provinces.csv"), provinces).unwrap();
        fs::write(dir.join("regencies.csv"), regencies).unwrap();
        fs::write(dir.join("districts.csv"), districts).unwrap();
        fs::write(dir.join("villages.csv"), villages).unwrap();
    }

    fn options(root: &Path) -> GeneratorOptions {
        GeneratorOptions {
            data_dir: root.join("data"),
            output_dir: root.join("api"),
            ..GeneratorOptions::default()
        }
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            for entry in fs::read_dir(&current).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    files.insert(path.clone(), fs::read(&path).unwrap());
                }
            }
        }
        files
    }

    fn read_json(path: PathBuf) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn setup() -> (tempfile::TempDir, GeneratorOptions) {
        let tmp = tempfile::tempdir().unwrap();
        let opts = options(tmp.path());
        fs::create_dir_all(&opts.data_dir).unwrap();
        (tmp, opts)
    }

    #[test]
    fn test_default_options() {
        let opts = GeneratorOptions::default();
        assert_eq!(opts.input_path(RegionLevel::Regency), PathBuf::from("data").join("regencies.csv"));
        assert_eq!(opts.output_dir, PathBuf::from("api"));
        assert_eq!(opts.load.delimiter, b',');
        assert!(!opts.with_headers);
    }

    #[tokio::test]
    async fn test_full_run() {
        let (_tmp, opts) = setup();
        write_inputs(
            &opts.data_dir,
            "11,Aceh\n12,SUMATERA UTARA\n",
            "1101,11,KAB. ACEH\n1201,12,KAB. NIAS\n1102,11,KAB. ACEH SINGKIL\n9901,99,KAB. YATIM\n",
            "110101,1101,TEUPAH SELATAN\n",
            "1101012001,110101,LATIUNG\n",
        );

        let summary = run(&opts).await.unwrap();
        assert_eq!(summary.counts, LevelCounts { provinces: 2, regencies: 4, districts: 1, villages: 1 });
        assert_eq!(summary.files_written, 4 + 2 + 4 + 1);

        let api = &opts.output_dir;
        assert_eq!(read_json(api.join("provinces.json")).as_array().unwrap().len(), 2);
        assert_eq!(read_json(api.join("regencies.json")).as_array().unwrap().len(), 4);
        assert_eq!(read_json(api.join("districts.json")).as_array().unwrap().len(), 1);
        assert_eq!(read_json(api.join("villages.json")).as_array().unwrap().len(), 1);
        assert!(api.join("villages").is_dir());

        let aceh = read_json(api.join("provinces").join("11.json"));
        let ids: Vec<&str> = aceh["regencies"].as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1101", "1102"]);

        let district = read_json(api.join("districts").join("110101.json"));
        assert_eq!(district["regency_id"], "1101");
        assert_eq!(district["villages"][0]["district_id"], "110101");
    }

    #[tokio::test]
    async fn test_concrete_scenario_bytes() {
        let (_tmp, opts) = setup();
        write_inputs(&opts.data_dir, "11,Aceh\n", "1101,11,KAB. ACEH\n", "", "");

        run(&opts).await.unwrap();

        let listing = fs::read_to_string(opts.output_dir.join("provinces.json")).unwrap();
        assert_eq!(listing, "[\n  {\n    \"id\": \"11\",\n    \"name\": \"Aceh\"\n  }\n]");

        let detail = read_json(opts.output_dir.join("provinces").join("11.json"));
        assert_eq!(
            detail,
            serde_json::json!({
                "id": "11",
                "name": "Aceh",
                "regencies": [{"id": "1101", "province_id": "11", "name": "KAB. ACEH"}]
            })
        );
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let (_tmp, opts) = setup();
        write_inputs(&opts.data_dir, "11,Aceh\n", "1101,11,KAB. SIMEULUE\n", "110101,1101,TEUPAH SELATAN\n", "");

        run(&opts).await.unwrap();
        let first = snapshot(&opts.output_dir);
        run(&opts).await.unwrap();
        let second = snapshot(&opts.output_dir);

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_provinces_writes_nothing() {
        let (_tmp, opts) = setup();
        write_inputs(&opts.data_dir, "", "1101,11,KAB. ACEH\n", "", "");

        let err = run(&opts).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
        assert!(!opts.output_dir.exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_fatal() {
        let (_tmp, opts) = setup();
        fs::write(opts.data_dir.join("provinces.csv"), "11,Aceh\n").unwrap();

        let err = run(&opts).await.unwrap_err();
        match err {
            PipelineError::Load(LoadError::MissingFile { path }) => {
                assert_eq!(path, opts.data_dir.join("regencies.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!opts.output_dir.exists());
    }

    #[tokio::test]
    async fn test_header_mode_resolves_aliases() {
        let (_tmp, mut opts) = setup();
        opts.with_headers = true;
        write_inputs(
            &opts.data_dir,
            "KODE,NAMA\n11,ACEH\n",
            "kode,kode_provinsi,nama\n1101,11,KAB. SIMEULUE\n",
            "id,kabupaten_id,name\n110101,1101,TEUPAH SELATAN\n",
            "code,district_code,NAME\n1101012001,110101,LATIUNG\n",
        );

        run(&opts).await.unwrap();

        let provinces = read_json(opts.output_dir.join("provinces.json"));
        assert_eq!(provinces, serde_json::json!([{"id": "11", "name": "ACEH"}]));
        let regency = read_json(opts.output_dir.join("regencies").join("1101.json"));
        assert_eq!(regency["province_id"], "11");
        assert_eq!(regency["districts"][0]["id"], "110101");
        let villages = read_json(opts.output_dir.join("villages.json"));
        assert_eq!(villages[0]["district_id"], "110101");
    }

    #[tokio::test]
    async fn test_generate_from_memory() {
        let tmp = tempfile::tempdir().unwrap();
        let dataset = Dataset {
            provinces: normalize_rows(
                &[serde_json::json!({"id": "31", "name": "DKI JAKARTA"})
                    .as_object()
                    .unwrap()
                    .clone()],
                RegionLevel::Province,
            ),
            ..Dataset::default()
        };

        let written = generate(&dataset, tmp.path()).await.unwrap();
        assert_eq!(written, 4 + 1);
        assert_eq!(read_json(tmp.path().join("provinces").join("31.json"))["regencies"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_duplicate_ids_last_detail_wins() {
        let (_tmp, opts) = setup();
        write_inputs(&opts.data_dir, "11,Aceh\n11,NAD\n", "1101,11,KAB. SIMEULUE\n", "", "");

        let summary = run(&opts).await.unwrap();
        assert_eq!(summary.counts.provinces, 2);

        let listing = read_json(opts.output_dir.join("provinces.json"));
        assert_eq!(
            listing,
            serde_json::json!([{"id": "11", "name": "Aceh"}, {"id": "11", "name": "NAD"}])
        );

        let detail = fs::read_to_string(opts.output_dir.join("provinces").join("11.json")).unwrap();
        assert_eq!(
            detail,
            "{\n  \"id\": \"11\",\n  \"name\": \"NAD\",\n  \"regencies\": [\n    {\n      \"id\": \"1101\",\n      \"province_id\": \"11\",\n      \"name\": \"KAB. SIMEULUE\"\n    }\n  ]\n}"
        );
    }

    #[tokio::test]
    async fn test_absolute_id_stays_under_output_root() {
        let tmp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let root = tmp.path().join("api");
        let id = outside.path().join("pwn").to_string_lossy().into_owned();

        let dataset = Dataset {
            provinces: normalize_rows(
                &[serde_json::json!({"id": id, "name": "Luar"}).as_object().unwrap().clone()],
                RegionLevel::Province,
            ),
            ..Dataset::default()
        };
        generate(&dataset, &root).await.unwrap();

        assert!(!outside.path().join("pwn.json").exists());
        let inside = snapshot(&root);
        assert!(inside.keys().all(|p| p.starts_with(&root)));
        assert_eq!(inside.len(), 5);
    }
}

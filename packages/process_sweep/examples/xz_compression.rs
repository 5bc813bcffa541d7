//! Measures how the `xz` presets trade processor time for compression ratio.
//!
//! Every preset from `-0` to `-9` is tried with and without `--extreme`. Each run compresses
//! its own copy of a generated input file inside its scratch directory. The results are
//! printed as tab-separated rows, ready to paste into a spreadsheet.
//!
//! Requires `xz` on the `PATH`. Run with: `cargo run --example xz_compression`.
#![expect(
    clippy::cast_precision_loss,
    reason = "this is example code that does not need production-level safety"
)]

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use new_zealand::nz;
use param_space::{Assignment, Shape, Space};
use process_sweep::{Field, InvokeError, InvokeResult, Lifecycle, Record};

/// Used as the raw material of the input file, since it is text that compresses well.
const SEED: &[u8] = include_bytes!("xz_compression.rs");

const COLUMNS: [&str; 8] = [
    "exit",
    "size_raw",
    "size_compressed",
    "usertime",
    "systemtime",
    "ratio",
    "extreme",
    "args",
];

#[derive(Debug, Default)]
struct Xz {
    file_path: PathBuf,
    size_raw: Option<u64>,
    size_compressed: Option<u64>,
    exit_code: Option<i32>,
    user_time: Option<Duration>,
    system_time: Option<Duration>,
    extreme: bool,
    args: String,
    exception: Option<String>,
}

impl Lifecycle<&'static str> for Xz {
    fn pre(&mut self, workdir: &Path) {
        let file_path = workdir.join("example.file");
        write_input(&file_path).expect("scratch directory must be writable");

        self.size_raw = fs::metadata(&file_path).ok().map(|metadata| metadata.len());
        self.file_path = file_path;
    }

    fn argv(&mut self, assignment: &Assignment<&'static str>) -> Vec<OsString> {
        self.extreme = assignment.get("extreme").is_some_and(|value| !value.is_empty());

        let args: Vec<&str> = assignment
            .values()
            .copied()
            .filter(|value| !value.is_empty())
            .collect();
        self.args = args.join(" ");

        ["xz", "--compress", "--keep"]
            .into_iter()
            .chain(args)
            .map(OsString::from)
            .chain([self.file_path.clone().into_os_string()])
            .collect()
    }

    fn success(&mut self, result: InvokeResult) {
        self.exit_code = Some(result.exit_code());
        self.user_time = Some(result.user_time());
        self.system_time = Some(result.system_time());
    }

    fn error(&mut self, error: InvokeError) {
        eprintln!("{}: {error}", self.args);
        self.exception = Some(error.to_string());
    }

    fn post(&mut self) {
        let mut compressed = self.file_path.clone().into_os_string();
        compressed.push(".xz");

        self.size_compressed = fs::metadata(compressed).ok().map(|metadata| metadata.len());
    }

    fn data(&mut self) -> Record {
        let ratio = self
            .size_raw
            .zip(self.size_compressed)
            .filter(|(_, compressed)| *compressed > 0)
            .map(|(raw, compressed)| format!("{:.1}", raw as f64 / compressed as f64));

        Record::from([
            ("exit".to_string(), Field::from(self.exit_code)),
            ("size_raw".to_string(), Field::from(self.size_raw)),
            ("size_compressed".to_string(), Field::from(self.size_compressed)),
            ("usertime".to_string(), Field::from(self.user_time)),
            ("systemtime".to_string(), Field::from(self.system_time)),
            ("ratio".to_string(), Field::from(ratio)),
            ("extreme".to_string(), Field::from(self.extreme)),
            ("args".to_string(), Field::from(self.args.as_str())),
            ("exception".to_string(), Field::from(self.exception.clone())),
        ])
    }
}

/// Writes every tail of the seed that overlaps its middle, ten times over, which gives plenty
/// of repetitive text.
fn write_input(path: &Path) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    for _ in 0..10 {
        for chunk_length in 0..SEED.len() {
            let start = SEED.len().saturating_sub(chunk_length);

            if let Some(chunk) = SEED.get(start..chunk_length) {
                file.write_all(chunk)?;
            }
        }
    }

    file.flush()
}

fn main() {
    let presets = vec!["-0", "-1", "-2", "-3", "-4", "-5", "-6", "-7", "-8", "-9"];

    let space = Space::from_pairs([("preset", presets), ("extreme", vec!["", "-e"])])
        .expect("axis names and values are hardcoded and valid");

    println!("Running {} xz invocations...", space.count(Shape::Cube));

    let records = process_sweep::run::<Xz, _>(nz!(1), &space, Shape::Cube);

    println!("{}", COLUMNS.join("\t"));

    for record in &records {
        let row: Vec<String> = COLUMNS
            .iter()
            .map(|column| record.get(*column).map(ToString::to_string).unwrap_or_default())
            .collect();

        println!("{}", row.join("\t"));
    }
}

//! Command-line inspector for Cryptdatum files.
//!
//! ```text
//! cryptdatum file-has-header <file>
//! cryptdatum file-has-valid-header <file>
//! cryptdatum file-has-invalid-header <file>
//! cryptdatum file-info <file> [--json]
//! cryptdatum --version
//! ```
//!
//! Exit status is 0 when the answer is "yes", 1 when it is "no" or the file
//! cannot be decoded, and 2 on usage errors. Files shorter than one header
//! are a read error for every command.

use std::fs::File;
use std::io::Read;
use std::process::ExitCode;

use cryptdatum::{
    decode_header, format_timestamp_rfc3339, has_header, validate_header, DatumFlag,
    DecodeError, Field, Header, Layout, CRATE_VERSION, HEADER_SIZE,
};
use serde::Serialize;

const USAGE: &str = "usage: cryptdatum <file-has-header|file-has-valid-header|file-has-invalid-header|file-info> <file> [--json]";

const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    ExitCode::from(run(&args))
}

/// Answer to a yes/no command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
}

impl Answer {
    fn from_bool(yes: bool) -> Self {
        if yes { Answer::Yes } else { Answer::No }
    }

    fn code(self) -> u8 {
        match self {
            Answer::Yes => 0,
            Answer::No => 1,
        }
    }
}

/// Runs one command and returns the process exit status.
fn run(args: &[String]) -> u8 {
    if matches!(args, [flag] if flag == "--version") {
        println!("cryptdatum {}", CRATE_VERSION);
        return Answer::Yes.code();
    }

    let (command, path, options) = match args {
        [command, path, options @ ..] => (command.as_str(), path.as_str(), options),
        _ => {
            eprintln!("{}", USAGE);
            return EXIT_USAGE;
        }
    };
    let json = options.iter().any(|o| o == "--json");

    let result = match command {
        "file-has-header" => cmd_file_has_header(path),
        "file-has-valid-header" => cmd_file_has_valid_header(path, true),
        "file-has-invalid-header" => cmd_file_has_valid_header(path, false),
        "file-info" => cmd_file_info(path, json),
        _ => {
            eprintln!("invalid command: {}", command);
            eprintln!("{}", USAGE);
            return EXIT_USAGE;
        }
    };

    match result {
        Ok(answer) => answer.code(),
        Err(err) => {
            if json {
                println!("{}", error_json(&err));
            } else {
                eprintln!("error: {}", err);
            }
            Answer::No.code()
        }
    }
}

/// Reads exactly one header worth of bytes from the start of a file.
fn read_head(path: &str) -> Result<Vec<u8>, DecodeError> {
    let mut head = Vec::with_capacity(HEADER_SIZE);
    File::open(path)?
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut head)?;
    if head.len() < HEADER_SIZE {
        return Err(DecodeError::UnexpectedEof {
            context: "header",
            read: head.len(),
        });
    }
    Ok(head)
}

fn cmd_file_has_header(path: &str) -> Result<Answer, DecodeError> {
    let head = read_head(path)?;
    Ok(Answer::from_bool(has_header(&head)))
}

fn cmd_file_has_valid_header(path: &str, expect_valid: bool) -> Result<Answer, DecodeError> {
    let head = read_head(path)?;
    let valid = match validate_header(&head) {
        Ok(_) => true,
        Err(reason) => {
            eprintln!("{}: {}", path, reason);
            false
        }
    };
    Ok(Answer::from_bool(valid == expect_valid))
}

fn cmd_file_info(path: &str, json: bool) -> Result<Answer, DecodeError> {
    let mut file = File::open(path)?;
    let header = decode_header(&mut file)?;
    let report = HeaderReport::new(&header);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{}", out),
            Err(err) => {
                eprintln!("error: failed to serialize report: {}", err);
                return Ok(Answer::No);
            }
        }
    } else {
        print_report(&report);
    }
    Ok(Answer::Yes)
}

fn error_json(err: &DecodeError) -> serde_json::Value {
    serde_json::json!({
        "error": err.to_string(),
        "kind": err.kind().as_str(),
    })
}

// =============================================================================
// REPORT
// =============================================================================

#[derive(Debug, Serialize)]
struct FlagReport {
    name: &'static str,
    bits: u64,
    set: bool,
}

#[derive(Debug, Serialize)]
struct HeaderReport {
    version: u16,
    flags: u64,
    timestamp: u64,
    created: String,
    opc: u32,
    chunk_size: u16,
    network_id: u32,
    size: u64,
    size_human: String,
    checksum: u64,
    compression: u16,
    encryption: u16,
    signature_type: u16,
    signature_size: u16,
    metadata_spec: u16,
    metadata_size: u32,
    flag_bits: Vec<FlagReport>,
}

impl HeaderReport {
    fn new(header: &Header) -> Self {
        Self {
            version: header.version,
            flags: header.flags.bits(),
            timestamp: header.timestamp,
            created: format_timestamp_rfc3339(header.timestamp),
            opc: header.opc,
            chunk_size: header.chunk_size,
            network_id: header.network_id,
            size: header.size,
            size_human: pretty_size(header.size),
            checksum: header.checksum,
            compression: header.compression,
            encryption: header.encryption,
            signature_type: header.signature_type,
            signature_size: header.signature_size,
            metadata_spec: header.metadata_spec,
            metadata_size: header.metadata_size,
            flag_bits: DatumFlag::ALL
                .into_iter()
                .map(|flag| FlagReport {
                    name: flag.name(),
                    bits: flag.bits(),
                    set: header.has_flag(flag),
                })
                .collect(),
        }
    }

    /// Value rows in wire order, magic and delimiter excluded.
    fn fields(&self) -> Vec<(Field, u64)> {
        vec![
            (Field::Version, self.version as u64),
            (Field::Flags, self.flags),
            (Field::Timestamp, self.timestamp),
            (Field::Opc, self.opc as u64),
            (Field::ChunkSize, self.chunk_size as u64),
            (Field::NetworkId, self.network_id as u64),
            (Field::Size, self.size),
            (Field::Checksum, self.checksum),
            (Field::Compression, self.compression as u64),
            (Field::Encryption, self.encryption as u64),
            (Field::SignatureType, self.signature_type as u64),
            (Field::SignatureSize, self.signature_size as u64),
            (Field::MetadataSpec, self.metadata_spec as u64),
            (Field::MetadataSize, self.metadata_size as u64),
        ]
    }
}

fn pretty_size(size: u64) -> String {
    const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];
    let mut unit = 0;
    let mut value = size;
    while value >= 1024 && unit < UNITS.len() - 1 {
        value /= 1024;
        unit += 1;
    }
    format!("{} {}", value, UNITS[unit])
}

fn print_report(report: &HeaderReport) {
    let layout = Layout::for_version(report.version).unwrap_or(Layout::LATEST);

    println!("+-------------------------------------------------------------------------------+");
    println!(
        "| CRYPTDATUM  SIZE: {:<14} CREATED: {:<36} |",
        report.size_human, report.created
    );
    println!("+-----------------------+--------+----------+-------------+----------------------+");
    println!("| Field                 | Offset | Size (B) | Type        | Value                |");
    println!("+-----------------------+--------+----------+-------------+----------------------+");
    for (field, value) in report.fields() {
        let (offset, width) = layout.span(field);
        println!(
            "| {:<21} | {:<6} | {:<8} | {:<11} | {:<20} |",
            field.name().to_uppercase(),
            offset,
            width,
            format!("{}-bit uint", width * 8),
            value
        );
    }
    println!("+-----------------------+--------+----------+-------------+----------------------+");
    println!("| Datum flag            | Bits   | Set                                           |");
    println!("+-----------------------+--------+-----------------------------------------------+");
    for flag in &report.flag_bits {
        println!("| {:<21} | {:<6} | {:<45} |", flag.name, flag.bits, flag.set);
    }
    println!("+-----------------------+--------+-----------------------------------------------+");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use cryptdatum::{encode_header_unchecked, ErrorKind, HeaderBuilder, MAGIC_DATE};

    /// Writes `contents` to a per-process temp file and returns its path.
    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cryptdatum-cli-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn valid_bytes() -> Vec<u8> {
        let mut bytes = HeaderBuilder::new().size(5).checksum(42).encode().unwrap().to_vec();
        bytes.extend_from_slice(b"hello");
        bytes
    }

    fn invalid_bytes() -> Vec<u8> {
        // Checksum flag without a checksum
        let header = HeaderBuilder::new().flag(DatumFlag::Checksum).build();
        encode_header_unchecked(&header).to_vec()
    }

    #[test]
    fn test_file_has_header() {
        let valid = temp_file("has-header-valid", &valid_bytes());
        let invalid = temp_file("has-header-invalid", &invalid_bytes());
        let foreign = temp_file("has-header-foreign", &[0u8; 80]);
        let short = temp_file("has-header-short", &valid_bytes()[..HEADER_SIZE - 1]);

        assert_eq!(cmd_file_has_header(valid.to_str().unwrap()).unwrap(), Answer::Yes);
        assert_eq!(cmd_file_has_header(invalid.to_str().unwrap()).unwrap(), Answer::Yes);
        assert_eq!(cmd_file_has_header(foreign.to_str().unwrap()).unwrap(), Answer::No);
        assert!(matches!(
            cmd_file_has_header(short.to_str().unwrap()),
            Err(DecodeError::UnexpectedEof { read: 63, .. })
        ));

        for path in [valid, invalid, foreign, short] {
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn test_file_has_valid_and_invalid_header() {
        let valid = temp_file("validity-valid", &valid_bytes());
        let invalid = temp_file("validity-invalid", &invalid_bytes());
        let valid = valid.to_str().unwrap().to_string();
        let invalid = invalid.to_str().unwrap().to_string();

        assert_eq!(cmd_file_has_valid_header(&valid, true).unwrap(), Answer::Yes);
        assert_eq!(cmd_file_has_valid_header(&invalid, true).unwrap(), Answer::No);
        assert_eq!(cmd_file_has_valid_header(&valid, false).unwrap(), Answer::No);
        assert_eq!(cmd_file_has_valid_header(&invalid, false).unwrap(), Answer::Yes);

        assert_eq!(run(&args(&["file-has-valid-header", &valid])), 0);
        assert_eq!(run(&args(&["file-has-valid-header", &invalid])), 1);
        assert_eq!(run(&args(&["file-has-invalid-header", &valid])), 1);
        assert_eq!(run(&args(&["file-has-invalid-header", &invalid])), 0);

        std::fs::remove_file(valid).unwrap();
        std::fs::remove_file(invalid).unwrap();
    }

    #[test]
    fn test_short_file_is_an_error_for_every_command() {
        let short = temp_file("short", &valid_bytes()[..10]);
        let short = short.to_str().unwrap().to_string();

        assert!(cmd_file_has_valid_header(&short, false).is_err());
        for command in ["file-has-header", "file-has-valid-header", "file-has-invalid-header", "file-info"] {
            assert_eq!(run(&args(&[command, &short])), 1, "{}", command);
        }

        std::fs::remove_file(short).unwrap();
    }

    #[test]
    fn test_file_info() {
        let valid = temp_file("info-valid", &valid_bytes());
        let invalid = temp_file("info-invalid", &invalid_bytes());
        let foreign = temp_file("info-foreign", &[0u8; 80]);

        assert_eq!(cmd_file_info(valid.to_str().unwrap(), false).unwrap(), Answer::Yes);
        assert_eq!(cmd_file_info(valid.to_str().unwrap(), true).unwrap(), Answer::Yes);
        assert!(matches!(
            cmd_file_info(invalid.to_str().unwrap(), false),
            Err(DecodeError::InvalidHeader(_))
        ));
        assert!(matches!(
            cmd_file_info(foreign.to_str().unwrap(), false),
            Err(DecodeError::UnsupportedFormat)
        ));
        assert_eq!(run(&args(&["file-info", foreign.to_str().unwrap(), "--json"])), 1);

        for path in [valid, invalid, foreign] {
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn test_missing_file() {
        let err = cmd_file_has_header("/nonexistent/cryptdatum/file").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(run(&args(&["file-info", "/nonexistent/cryptdatum/file"])), 1);
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(run(&[]), EXIT_USAGE);
        assert_eq!(run(&args(&["file-info"])), EXIT_USAGE);
        assert_eq!(run(&args(&["file-has-magic", "x.cdt"])), EXIT_USAGE);
        assert_eq!(run(&args(&["--version"])), 0);
    }

    #[test]
    fn test_error_json() {
        let json = error_json(&DecodeError::UnsupportedFormat);
        assert_eq!(json["kind"], "unsupported_format");
        assert!(json["error"].as_str().unwrap().contains("unsupported format"));
    }

    #[test]
    fn test_pretty_size() {
        assert_eq!(pretty_size(0), "0 B");
        assert_eq!(pretty_size(1023), "1023 B");
        assert_eq!(pretty_size(1024), "1 KB");
        assert_eq!(pretty_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(pretty_size(u64::MAX), "15 EB");
    }

    #[test]
    fn test_report_fields() {
        let header = HeaderBuilder::new().size(2048).opc(7).build();
        let report = HeaderReport::new(&header);

        assert_eq!(report.created, "2022-05-10T04:03:02.000000001Z");
        assert_eq!(report.size_human, "2 KB");
        assert_eq!(report.flag_bits.len(), 14);
        assert!(report.flag_bits.iter().any(|f| f.name == "DATUM OPC" && f.set));
        assert!(report.flag_bits.iter().any(|f| f.name == "DATUM EMPTY" && !f.set));
        assert_eq!(report.fields().len(), 14);
        assert_eq!(report.fields()[3], (Field::Opc, 7));
    }

    #[test]
    fn test_report_json() {
        let header = HeaderBuilder::new().build();
        let json = serde_json::to_value(HeaderReport::new(&header)).unwrap();

        assert_eq!(json["version"], 1);
        assert_eq!(json["timestamp"], MAGIC_DATE);
        assert_eq!(json["flags"], 4);
        assert_eq!(json["flag_bits"][2]["name"], "DATUM EMPTY");
        assert_eq!(json["flag_bits"][2]["set"], true);
    }
}

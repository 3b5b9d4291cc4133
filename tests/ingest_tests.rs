// Ingestion tests
// Lap time rows and the driver table, from memory and from disk.

use std::io::{Cursor, Write};

use laptime_topk::ingest::{self, DriverDirectory, IngestMode};
use laptime_topk::Error;

const LAP_TIMES: &str = "\
raceId,driverId,lap,position,time,milliseconds
841,20,1,1,\"1:38.109\",98109
841,8,1,2,\"1:40.573\",100573

841,17,2,3,\"1:41.083\",101083
";

// =============================================================================
// Test 1: Header and blank lines are skipped
// =============================================================================
#[test]
fn parses_rows_and_skips_header() {
    let rows = ingest::parse_lap_times(Cursor::new(LAP_TIMES), IngestMode::Strict).unwrap();
    assert_eq!(rows.len(), 3);

    let first = &rows[0];
    assert_eq!(first.race_id, 841);
    assert_eq!(first.lap, 1);
    assert_eq!(first.position, 1);
    assert_eq!(first.record.owner_id(), 20);
    assert_eq!(first.record.display_time(), "1:38.109");
    assert_eq!(first.record.rank_key(), 98109);

    assert_eq!(rows[2].lap, 2);
}

// =============================================================================
// Test 2: Headerless input
// =============================================================================
#[test]
fn parses_without_header() {
    let rows = ingest::parse_lap_times(Cursor::new("1,2,3,4,1:30.000,90000\n"), IngestMode::Strict).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.rank_key(), 90000);
}

// =============================================================================
// Test 3: Strict mode surfaces the first malformed row
// =============================================================================
#[test]
fn strict_mode_rejects_malformed_row() {
    let input = "1,2,3,4,1:30.000,90000\n1,2,3\n";
    let err = ingest::parse_lap_times(Cursor::new(input), IngestMode::Strict).unwrap_err();
    match err {
        Error::MalformedRow { line, .. } => assert_eq!(line, 2),
        other => panic!("expected MalformedRow, got {other:?}"),
    }
}

// =============================================================================
// Test 4: Negative milliseconds are rejected by the record model
// =============================================================================
#[test]
fn strict_mode_rejects_negative_time() {
    let input = "1,2,3,4,x,-1\n";
    let err = ingest::parse_lap_times(Cursor::new(input), IngestMode::Strict).unwrap_err();
    assert!(matches!(err, Error::MalformedRow { line: 1, .. }));
}

// =============================================================================
// Test 5: Lenient mode skips bad rows
// =============================================================================
#[test]
fn lenient_mode_skips_malformed_rows() {
    let input = "\
1,2,3,4,1:30.000,90000
1,2,3
1,x,3,4,1:31.000,91000
1,5,3,4,1:32.000,\\N
1,6,3,4,1:33.000,93000
";
    let rows = ingest::parse_lap_times(Cursor::new(input), IngestMode::Lenient).unwrap();
    let owners: Vec<u32> = rows.iter().map(|r| r.record.owner_id()).collect();
    assert_eq!(owners, vec![2, 6]);
}

// =============================================================================
// Test 6: Load from disk
// =============================================================================
#[test]
fn load_lap_times_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lap_times.csv");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(LAP_TIMES.as_bytes())
        .unwrap();

    let rows = ingest::load_lap_times(&path, IngestMode::default()).unwrap();
    assert_eq!(rows.len(), 3);
}

// =============================================================================
// Test 7: Missing file is an IO error
// =============================================================================
#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ingest::load_lap_times(&dir.path().join("absent.csv"), IngestMode::Lenient).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(matches!(DriverDirectory::load(&dir.path().join("absent.csv")), Err(Error::Io(_))));
}

// =============================================================================
// Test 8: Driver names
// =============================================================================
#[test]
fn driver_directory_builds_display_names() {
    let input = "\
driverId,driverRef,number,code,forename,surname,dob,nationality,url
1,\"hamilton\",44,\"HAM\",\"Lewis\",\"Hamilton\",\"1985-01-07\",\"British\",\"http://x\"
2,\"heidfeld\",\\N,\"HEI\",\"Nick\",\"\",\"1977-05-10\",\"German\",\"http://x\"
3,\"rosberg\"
bad,\"nobody\",1,X,A,B
";
    let drivers = DriverDirectory::parse(Cursor::new(input)).unwrap();
    assert_eq!(drivers.len(), 3);
    assert_eq!(drivers.name(1), "Lewis Hamilton");
    assert_eq!(drivers.name(2), "Nick");
    assert_eq!(drivers.name(3), "rosberg");
    assert_eq!(drivers.name(99), "#99");
}

// =============================================================================
// Test 9: Directory from pairs
// =============================================================================
#[test]
fn driver_directory_from_pairs() {
    let drivers: DriverDirectory = [(20, "Sebastian Vettel".to_string())].into_iter().collect();
    assert_eq!(drivers.name(20), "Sebastian Vettel");
    assert!(!drivers.is_empty());
    assert!(DriverDirectory::default().is_empty());
}

// =============================================================================
// Test 10: A corrupt first row is data, not a header
// =============================================================================
// Only a row starting with "raceId" is skipped as a header. Anything else
// on the first line goes through validation like every other row.
#[test]
fn corrupt_first_row_is_not_mistaken_for_header() {
    let input = "x1,2,3,4,1:30.000,90000\n1,3,3,4,1:31.000,91000\n";

    let err = ingest::parse_lap_times(Cursor::new(input), IngestMode::Strict).unwrap_err();
    assert!(matches!(err, Error::MalformedRow { line: 1, .. }));

    let rows = ingest::parse_lap_times(Cursor::new(input), IngestMode::Lenient).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.owner_id(), 3);
}

// =============================================================================
// Test 11: Header match ignores case
// =============================================================================
#[test]
fn header_match_ignores_case() {
    let input = "RACEID,DRIVERID,LAP,POSITION,TIME,MILLISECONDS\n1,3,3,4,1:31.000,91000\n";
    let rows = ingest::parse_lap_times(Cursor::new(input), IngestMode::Strict).unwrap();
    assert_eq!(rows.len(), 1);
}

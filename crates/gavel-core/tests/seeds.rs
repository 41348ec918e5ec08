use std::io::Write;

use gavel_core::seeds::{parse_seeds, read_seeds};
use tempfile::NamedTempFile;

#[test]
fn test_accepts_two_colon_lines_in_order() {
    let input = parse_seeds("com.example:app:1.0\n  org.example:lib:2.0  \n");
    let texts: Vec<String> = input.coordinates.iter().map(|c| c.to_text()).collect();
    assert_eq!(texts, vec!["com.example:app:1.0", "org.example:lib:2.0"]);
    assert!(input.rejected.is_empty());
}

#[test]
fn test_rejects_wrong_colon_count_and_continues() {
    let input = parse_seeds("com.example:app\ncom.example:app:1.0:jar\ncom.example:ok:1.0\n");
    assert_eq!(input.coordinates.len(), 1);
    assert_eq!(input.coordinates[0].artifact, "ok");
    assert_eq!(input.rejected.len(), 2);
    assert!(input.rejected[0].to_string().contains("com.example:app"));
}

#[test]
fn test_rejects_empty_segment() {
    let input = parse_seeds("com.example::1.0\n");
    assert!(input.coordinates.is_empty());
    assert_eq!(input.rejected.len(), 1);
}

#[test]
fn test_skips_blank_and_comment_lines() {
    let input = parse_seeds("\n# seeds\n\ncom.example:app:1.0\n");
    assert_eq!(input.coordinates.len(), 1);
    assert!(input.rejected.is_empty());
}

#[test]
fn test_read_seeds_from_file() {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(tmp, "com.example:app:1.0").unwrap();
    tmp.flush().unwrap();
    let input = read_seeds(tmp.path()).unwrap();
    assert_eq!(input.coordinates.len(), 1);
}

//! Credentials only ever come from the AWS profile/environment chain
//!
//! Scans the source tree for literal access key ids.

use std::fs;
use std::path::Path;

const KEY_PREFIXES: [&str; 2] = ["AKIA", "ASIA"];

// Prefix followed by 16 upper-case alphanumerics
fn find_access_key(text: &str) -> Option<&str> {
    for prefix in KEY_PREFIXES {
        for (start, _) in text.match_indices(prefix) {
            let candidate = &text[start..];
            let body = &candidate.as_bytes()[prefix.len()..];
            if body.len() >= 16
                && body[..16]
                    .iter()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            {
                return Some(&candidate[..prefix.len() + 16]);
            }
        }
    }
    None
}

fn scan(dir: &Path, findings: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            scan(&path, findings);
        } else if path.extension().and_then(|e| e.to_str()) == Some("rs")
            || path.extension().and_then(|e| e.to_str()) == Some("toml")
        {
            let text = fs::read_to_string(&path).unwrap();
            if let Some(key) = find_access_key(&text) {
                findings.push(format!("{}: {}", path.display(), key));
            }
        }
    }
}

#[test]
fn test_detector_matches_key_shape() {
    let fake = format!("{}{}", "AKIA", "ABCDEFGHIJ012345");
    assert!(find_access_key(&format!("key = \"{}\"", fake)).is_some());
    assert!(find_access_key("AKIA is a prefix, not a key").is_none());
}

#[test]
fn test_no_access_keys_in_source() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut findings = Vec::new();
    scan(&root.join("src"), &mut findings);
    for file in ["Cargo.toml", ".pricectl.toml"] {
        let path = root.join(file);
        if path.exists() {
            if let Some(key) = find_access_key(&fs::read_to_string(&path).unwrap()) {
                findings.push(format!("{}: {}", path.display(), key));
            }
        }
    }

    assert!(
        findings.is_empty(),
        "Found literal AWS access keys: {:?}",
        findings
    );
}

//! Region code to Price List location name
//!
//! The Price List API filters by the `location` attribute, which carries the
//! human readable region name ("EU (Ireland)") rather than the region code.
//! Note the API says "EU" where the console says "Europe".

use tracing::warn;

/// Region codes known to the Price List API, with their `location` names
const REGION_MAP: &[(&str, &str)] = &[
    ("us-east-1", "US East (N. Virginia)"),
    ("us-east-2", "US East (Ohio)"),
    ("us-west-1", "US West (N. California)"),
    ("us-west-2", "US West (Oregon)"),
    ("af-south-1", "Africa (Cape Town)"),
    ("ap-east-1", "Asia Pacific (Hong Kong)"),
    ("ap-south-1", "Asia Pacific (Mumbai)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
    ("ap-northeast-2", "Asia Pacific (Seoul)"),
    ("ap-northeast-3", "Asia Pacific (Osaka)"),
    ("ap-southeast-1", "Asia Pacific (Singapore)"),
    ("ap-southeast-2", "Asia Pacific (Sydney)"),
    ("ap-southeast-3", "Asia Pacific (Jakarta)"),
    ("ca-central-1", "Canada (Central)"),
    ("eu-central-1", "EU (Frankfurt)"),
    ("eu-west-1", "EU (Ireland)"),
    ("eu-west-2", "EU (London)"),
    ("eu-west-3", "EU (Paris)"),
    ("eu-north-1", "EU (Stockholm)"),
    ("eu-south-1", "EU (Milan)"),
    ("me-south-1", "Middle East (Bahrain)"),
    ("sa-east-1", "South America (Sao Paulo)"),
];

const UNKNOWN_PREFIX: &str = "Unknown region: ";

/// Outcome of resolving a region code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion {
    pub code: String,
    /// Location name, or the "Unknown region: {code}" sentinel
    pub name: String,
    pub known: bool,
}

/// Resolve a region code to its Price List location name.
///
/// Unknown codes never fail: they resolve to the sentinel name, a warning is
/// logged, and lookups against it simply find no prices.
pub fn resolve(region_code: &str) -> ResolvedRegion {
    match lookup(region_code) {
        Some(name) => ResolvedRegion {
            code: region_code.to_string(),
            name: name.to_string(),
            known: true,
        },
        None => {
            warn!(
                "'{}' is not a recognized AWS region code. Available regions: {}",
                region_code,
                known_regions()
                    .map(|(code, _)| code)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            ResolvedRegion {
                code: region_code.to_string(),
                name: format!("{}{}", UNKNOWN_PREFIX, region_code),
                known: false,
            }
        }
    }
}

pub fn lookup(region_code: &str) -> Option<&'static str> {
    REGION_MAP
        .iter()
        .find(|(code, _)| *code == region_code)
        .map(|(_, name)| *name)
}

pub fn known_regions() -> impl Iterator<Item = (&'static str, &'static str)> {
    REGION_MAP.iter().copied()
}

pub fn is_unknown_name(name: &str) -> bool {
    name.starts_with(UNKNOWN_PREFIX)
}

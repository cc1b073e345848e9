//! Type definitions for AWS Bedrock provider

use nutype::nutype;

/// AWS region hosting the Bedrock Runtime endpoint (e.g. `us-east-1`)
#[nutype(
    sanitize(trim, lowercase),
    validate(predicate = |region: &str| is_region_name(region)),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct AwsRegion(String);

/// `<partition>-<area>[-<area>]-<number>`, e.g. `eu-west-1`, `us-gov-west-1`
fn is_region_name(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    let Some((number, rest)) = parts.split_last() else {
        return false;
    };
    let Some((partition, areas)) = rest.split_first() else {
        return false;
    };

    partition.len() == 2
        && partition.chars().all(|c| c.is_ascii_lowercase())
        && !areas.is_empty()
        && areas
            .iter()
            .all(|a| !a.is_empty() && a.chars().all(|c| c.is_ascii_lowercase()))
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}

//! JSON payloads of the catalog API and their mapping onto core types.

use catalog_core::{CampaignTag, Product, Provider};
use catalog_logging::catalog_warn;
use serde::Deserialize;

use crate::{FailureKind, FetchError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRecord {
    code: String,
    name: String,
    #[serde(default, alias = "url")]
    image_url: String,
    #[serde(default)]
    campaign_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    product_code: String,
    product_name: String,
    product_rate: f64,
    #[serde(default)]
    provider_code: Option<String>,
}

pub fn parse_providers(bytes: &[u8]) -> Result<Vec<Provider>, FetchError> {
    let records: Vec<ProviderRecord> = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::InvalidPayload, err.to_string()))?;

    Ok(records
        .into_iter()
        .map(|record| {
            let campaign_tag = resolve_campaign_tag(&record.code, record.campaign_tag.as_deref());
            Provider {
                code: record.code,
                name: record.name,
                image_url: record.image_url,
                campaign_tag,
            }
        })
        .collect())
}

/// Parses the product list of `provider_code`. Products without a provider
/// code are stamped with the fetched one; explicit codes are kept for the
/// aggregator to verify.
pub fn parse_products(provider_code: &str, bytes: &[u8]) -> Result<Vec<Product>, FetchError> {
    let records: Vec<ProductRecord> = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::InvalidPayload, err.to_string()))?;

    records
        .into_iter()
        .map(|record| {
            if !record.product_rate.is_finite() || record.product_rate < 0.0 {
                return Err(FetchError::new(
                    FailureKind::InvalidPayload,
                    format!(
                        "product {} has invalid rate {}",
                        record.product_code, record.product_rate
                    ),
                ));
            }
            Ok(Product {
                product_code: record.product_code,
                product_name: record.product_name,
                product_rate: record.product_rate,
                provider_code: record
                    .provider_code
                    .unwrap_or_else(|| provider_code.to_string()),
            })
        })
        .collect()
}

fn resolve_campaign_tag(code: &str, tag: Option<&str>) -> CampaignTag {
    match tag.map(str::trim) {
        Some(tag) if tag.eq_ignore_ascii_case("free") => CampaignTag::Free,
        Some(tag) if tag.eq_ignore_ascii_case("prepaid") => CampaignTag::Prepaid,
        Some(other) => {
            catalog_warn!(
                "Provider {} has unrecognised campaign tag {:?}; inferring from code",
                code,
                other
            );
            CampaignTag::infer_from_code(code)
        }
        None => CampaignTag::infer_from_code(code),
    }
}

//! Wire formats of the external lookup services.

use serde::{Deserialize, Deserializer, Serialize};

use super::PrivacyFlags;

/// Response of the free geolocation service (`/json/{ip}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreeLookupResponse {
    /// `"success"` or `"fail"`
    #[serde(default)]
    pub status: String,

    /// Failure reason when `status` is `"fail"`
    #[serde(default)]
    pub message: Option<String>,

    /// Full country name
    #[serde(default)]
    pub country: Option<String>,

    /// Two-letter country code
    #[serde(default, rename = "countryCode")]
    pub country_code: Option<String>,

    /// ISP name
    #[serde(default)]
    pub isp: Option<String>,

    /// Organization name
    #[serde(default)]
    pub org: Option<String>,

    /// The address that was looked up
    #[serde(default)]
    pub query: Option<String>,
}

impl FreeLookupResponse {
    /// Returns true when the service reported success
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Returns true when the service explicitly refused the lookup
    #[must_use]
    pub fn is_fail(&self) -> bool {
        self.status == "fail"
    }

    /// ISP name, joined with the organization when that says something different
    #[must_use]
    pub fn combined_name(&self) -> String {
        let isp = self.isp.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A");
        match self.org.as_deref() {
            Some(org) if !org.is_empty() && org != isp => format!("{isp} / {org}"),
            _ => isp.to_string(),
        }
    }
}

/// Response of the paid lookup service (`/{ip}?token=...`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaidLookupResponse {
    /// The address that was looked up
    #[serde(default)]
    pub ip: Option<String>,

    /// Reverse hostname
    #[serde(default)]
    pub hostname: Option<String>,

    /// Two-letter country code
    #[serde(default)]
    pub country: Option<String>,

    /// `AS<number> <name>`
    #[serde(default)]
    pub org: Option<String>,

    /// Privacy detection block; only present on plans that include it.
    /// An empty `{}` block counts as absent.
    #[serde(default, deserialize_with = "non_empty_privacy")]
    pub privacy: Option<PrivacyFlags>,
}

fn non_empty_privacy<'de, D>(deserializer: D) -> std::result::Result<Option<PrivacyFlags>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => PrivacyFlags::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl PaidLookupResponse {
    /// Organization with the leading `AS<digits> ` removed
    #[must_use]
    pub fn organization(&self) -> String {
        self.org
            .as_deref()
            .filter(|s| !s.is_empty())
            .map_or_else(|| "N/A".to_string(), |org| strip_asn_prefix(org).to_string())
    }
}

/// The part of an RDAP `ip network` object the pipeline reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RdapNetwork {
    /// Network name registered with the RIR
    #[serde(default)]
    pub name: Option<String>,

    /// Registry handle
    #[serde(default)]
    pub handle: Option<String>,
}

fn strip_asn_prefix(org: &str) -> &str {
    let Some(rest) = org.strip_prefix("AS") else {
        return org;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return org;
    }
    rest[digits..].strip_prefix(char::is_whitespace).map_or(org, str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_name() {
        let resp = FreeLookupResponse {
            isp: Some("Google LLC".into()),
            org: Some("Google Public DNS".into()),
            ..Default::default()
        };
        assert_eq!(resp.combined_name(), "Google LLC / Google Public DNS");

        let same = FreeLookupResponse {
            isp: Some("Cloudflare, Inc.".into()),
            org: Some("Cloudflare, Inc.".into()),
            ..Default::default()
        };
        assert_eq!(same.combined_name(), "Cloudflare, Inc.");

        assert_eq!(FreeLookupResponse::default().combined_name(), "N/A");
    }

    #[test]
    fn test_asn_prefix_stripping() {
        let resp = PaidLookupResponse {
            org: Some("AS15169 Google LLC".into()),
            ..Default::default()
        };
        assert_eq!(resp.organization(), "Google LLC");

        assert_eq!(strip_asn_prefix("ASUS Cloud"), "ASUS Cloud");
        assert_eq!(strip_asn_prefix("AS13335"), "AS13335");
        assert_eq!(PaidLookupResponse::default().organization(), "N/A");
    }

    #[test]
    fn test_free_response_parsing() {
        let json = r#"{"status":"fail","message":"private range","query":"10.0.0.1"}"#;
        let resp: FreeLookupResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_fail());
        assert_eq!(resp.message.as_deref(), Some("private range"));
    }

    #[test]
    fn test_paid_response_without_privacy() {
        let json = r#"{"ip":"8.8.8.8","country":"US","org":"AS15169 Google LLC"}"#;
        let resp: PaidLookupResponse = serde_json::from_str(json).unwrap();
        assert!(resp.privacy.is_none());
        assert_eq!(resp.country.as_deref(), Some("US"));
    }

    #[test]
    fn test_paid_response_empty_privacy_is_absent() {
        let json = r#"{"org":"AS39351 NordVPN Hosting","privacy":{}}"#;
        let resp: PaidLookupResponse = serde_json::from_str(json).unwrap();
        assert!(resp.privacy.is_none());

        let json = r#"{"org":"AS15169 Google LLC","privacy":null}"#;
        let resp: PaidLookupResponse = serde_json::from_str(json).unwrap();
        assert!(resp.privacy.is_none());

        let json = r#"{"privacy":{"vpn":false,"proxy":false,"tor":false,"relay":false,"hosting":false}}"#;
        let resp: PaidLookupResponse = serde_json::from_str(json).unwrap();
        assert!(resp.privacy.is_some_and(|p| p.is_clear()));
    }
}

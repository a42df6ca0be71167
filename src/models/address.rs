use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{5})\b").unwrap());

/// A service address, parsed once at ingestion so the proximity scorer
/// works against structured fields instead of re-running regexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub raw: String,
    pub zip: Option<String>,
    pub city: Option<String>,
}

impl Address {
    pub fn parse(raw: &str) -> Self {
        let zip = ZIP_RE
            .captures(raw)
            .map(|caps| caps[1].to_string());

        // Coarse city heuristic: second-to-last comma-delimited segment,
        // e.g. "12 Oak St, Springfield, IL 62704" -> "springfield".
        let segments: Vec<&str> = raw.split(',').map(str::trim).collect();
        let city = if segments.len() >= 2 {
            let token = segments[segments.len() - 2];
            if token.is_empty() {
                None
            } else {
                Some(token.to_lowercase())
            }
        } else {
            None
        };

        Self {
            raw: raw.to_string(),
            zip,
            city,
        }
    }

    pub fn zip_prefix(&self) -> Option<&str> {
        self.zip.as_deref().map(|zip| &zip[..3])
    }
}

#[cfg(test)]
mod tests {
    use super::Address;

    #[test]
    fn extracts_zip_and_city() {
        let addr = Address::parse("12 Oak St, Springfield, IL 62704");
        assert_eq!(addr.zip.as_deref(), Some("62704"));
        assert_eq!(addr.city.as_deref(), Some("springfield"));
        assert_eq!(addr.zip_prefix(), Some("627"));
    }

    #[test]
    fn missing_zip_and_city_parse_to_none() {
        let addr = Address::parse("warehouse 4");
        assert!(addr.zip.is_none());
        assert!(addr.city.is_none());
    }

    #[test]
    fn street_number_is_not_mistaken_for_zip() {
        let addr = Address::parse("123 Main St");
        assert!(addr.zip.is_none());
    }

    #[test]
    fn five_digit_street_number_matches_first() {
        // Known limit of the heuristic: the first 5-digit run wins.
        let addr = Address::parse("90210 Sunset Blvd, Beverly Hills, CA");
        assert_eq!(addr.zip.as_deref(), Some("90210"));
        assert_eq!(addr.city.as_deref(), Some("beverly hills"));
    }
}

//! Bank identification from first-page text
//!
//! Used only to select which template to load. The shipped identifier
//! looks for an IFSC code and maps its four-letter prefix to a bank id;
//! anything else falls back to the [`UNKNOWN_BANK`] sentinel.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel bank id for documents no identifier recognizes
pub const UNKNOWN_BANK: &str = "others";

/// Identification result: bank id plus the matched code, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankMatch {
    pub bank: String,
    pub ifsc: Option<String>,
}

/// Bank identification collaborator
pub trait BankIdentifier {
    fn identify(&self, first_page_text: &str) -> BankMatch;
}

lazy_static! {
    // Labelled form takes priority over any stray IFSC-shaped token.
    static ref LABELLED_IFSC: Regex =
        Regex::new(r"RTGS/NEFT IFSC\s*:\s*([A-Z]{4}0[A-Z0-9]{6})").unwrap();
    static ref GENERIC_IFSC: Regex = Regex::new(r"\b([A-Z]{4}0[A-Z0-9]{6})\b").unwrap();
}

/// Identifies the issuing bank by the first IFSC code on the page
pub struct IfscBankIdentifier;

impl IfscBankIdentifier {
    fn extract_first_ifsc(text: &str) -> Option<String> {
        let upper = text.to_uppercase();

        if let Some(captures) = LABELLED_IFSC.captures(&upper) {
            return Some(captures[1].to_string());
        }
        if let Some(captures) = GENERIC_IFSC.captures(&upper) {
            return Some(captures[1].to_string());
        }
        // Some statements carry the bank name but no printed IFSC.
        if upper.contains("HDFC BANK") {
            return Some("HDFC0000000".to_string());
        }
        None
    }

    fn bank_from_prefix(ifsc: &str) -> &'static str {
        match ifsc.get(..4) {
            Some("HDFC") => "hdfc",
            Some("SBIN") => "sbi",
            Some("ICIC") => "icici",
            Some("CNRB") => "canara",
            Some("IBKL") => "idbi",
            Some("IDIB") => "indian",
            Some("UTIB") => "axis",
            Some("BARB") => "bob",
            Some("FDRL") => "federal",
            Some("TMBL") => "tmb",
            Some("UBIN") => "union",
            Some("CIUB") => "city_union",
            Some("IDFB") => "idfc",
            Some("DLXB") => "dhanlaxmi",
            Some("PUNB") => "punjab_national",
            _ => UNKNOWN_BANK,
        }
    }
}

impl BankIdentifier for IfscBankIdentifier {
    fn identify(&self, first_page_text: &str) -> BankMatch {
        let ifsc = Self::extract_first_ifsc(first_page_text);
        let bank = ifsc
            .as_deref()
            .map(Self::bank_from_prefix)
            .unwrap_or(UNKNOWN_BANK)
            .to_string();
        BankMatch { bank, ifsc }
    }
}

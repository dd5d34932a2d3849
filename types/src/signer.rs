//! Signer identity as shown to the user.

use serde::{Deserialize, Serialize};

/// Subject fields of a signing certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSubject {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    /// Personal identification code (certificate `serialNumber` attribute).
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Display fields derived once per signature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerInfo {
    pub signer_name: String,
    pub personal_id: String,
    /// `yyyy-mm-dd HH:mm`, the raw claimed time if it could not be parsed,
    /// or empty.
    pub signature_date: String,
}

impl SignerInfo {
    /// Placeholder used when a signature could not be processed at all.
    pub fn unknown() -> Self {
        Self {
            signer_name: "Unknown".to_string(),
            personal_id: String::new(),
            signature_date: String::new(),
        }
    }
}

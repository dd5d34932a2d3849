//! Signer display fields from a raw signature.

use chrono::{Local, TimeZone};
use edoc_types::{RawSignature, SignerInfo};
use edoc_utils::format_signing_time_in;

/// Display fields for `signature`, dates rendered in local time.
pub fn extract_signer_info(signature: &RawSignature) -> SignerInfo {
    extract_signer_info_in(signature, &Local)
}

/// Display fields for `signature`, dates rendered in `tz`.
///
/// The name is `givenName surname` when both are present, else the common
/// name. The personal id is the subject serial number.
pub fn extract_signer_info_in<Tz>(signature: &RawSignature, tz: &Tz) -> SignerInfo
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut info = SignerInfo::default();

    if let Some(subject) = &signature.signer_info {
        let given = non_empty(subject.given_name.as_deref());
        let surname = non_empty(subject.surname.as_deref());
        info.signer_name = match (given, surname) {
            (Some(given), Some(surname)) => format!("{given} {surname}"),
            _ => non_empty(subject.common_name.as_deref())
                .unwrap_or_default()
                .to_string(),
        };
        info.personal_id = subject.serial_number.clone().unwrap_or_default();
    }

    if let Some(raw) = non_empty(signature.signing_time.as_deref()) {
        info.signature_date = format_signing_time_in(raw, tz);
    }

    info
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use edoc_types::CertificateSubject;

    fn signature(subject: CertificateSubject, signing_time: Option<&str>) -> RawSignature {
        RawSignature {
            id: "S0".into(),
            signer_info: Some(subject),
            signing_time: signing_time.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn prefers_given_name_and_surname() {
        let sig = signature(
            CertificateSubject {
                given_name: Some("ANNA".into()),
                surname: Some("OZOLA".into()),
                common_name: Some("OZOLA,ANNA".into()),
                serial_number: Some("PNOLV-120389-11111".into()),
            },
            Some("2024-05-06T07:08:09Z"),
        );
        let info = extract_signer_info_in(&sig, &Utc);
        assert_eq!(info.signer_name, "ANNA OZOLA");
        assert_eq!(info.personal_id, "PNOLV-120389-11111");
        assert_eq!(info.signature_date, "2024-05-06 07:08");
    }

    #[test]
    fn falls_back_to_common_name() {
        let sig = signature(
            CertificateSubject {
                given_name: Some("ANNA".into()),
                common_name: Some("ANNA OZOLA".into()),
                ..Default::default()
            },
            None,
        );
        let info = extract_signer_info_in(&sig, &Utc);
        assert_eq!(info.signer_name, "ANNA OZOLA");
        assert_eq!(info.personal_id, "");
        assert_eq!(info.signature_date, "");
    }

    #[test]
    fn keeps_unparseable_signing_time() {
        let sig = signature(CertificateSubject::default(), Some("not a date"));
        assert_eq!(extract_signer_info_in(&sig, &Utc).signature_date, "not a date");
    }

    #[test]
    fn missing_subject_yields_empty_fields() {
        let info = extract_signer_info_in(&RawSignature::default(), &Utc);
        assert_eq!(info, SignerInfo::default());
    }
}

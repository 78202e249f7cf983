use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Declares an enum that maps onto a fixed set of wire strings.
/// Values the server sends that we don't know yet land in `Other`, so decoding
/// a response never fails because of a new tag.
macro_rules! wire_tag {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                let known = match value.as_str() {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                };
                known.unwrap_or_else(|| Self::Other(value))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(tag: $name) -> String {
                match tag {
                    $name::Other(value) => value,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_tag! {
    /// Named group of documents an applicant has to provide.
    IdDocSetType {
        Identity => "IDENTITY",
        Identity2 => "IDENTITY2",
        Selfie => "SELFIE",
        Selfie2 => "SELFIE2",
        ProofOfResidence => "PROOF_OF_RESIDENCE",
        PaymentMethods => "PAYMENT_METHODS",
    }
}

wire_tag! {
    /// Kind of a single identity document.
    IdDocType {
        IdCard => "ID_CARD",
        Passport => "PASSPORT",
        Drivers => "DRIVERS",
        BankCard => "BANK_CARD",
        UtilityBill => "UTILITY_BILL",
        BankStatement => "BANK_STATEMENT",
        Snils => "SNILS",
        Selfie => "SELFIE",
        VideoSelfie => "VIDEO_SELFIE",
        ProfileImage => "PROFILE_IMAGE",
        IdDocPhoto => "ID_DOC_PHOTO",
        Agreement => "AGREEMENT",
        Contract => "CONTRACT",
        ResidencePermit => "RESIDENCE_PERMIT",
        EmploymentCertificate => "EMPLOYMENT_CERTIFICATE",
        DriversTranslation => "DRIVERS_TRANSLATION",
        InvestorDoc => "INVESTOR_DOC",
        VehicleRegistrationCertificate => "VEHICLE_REGISTRATION_CERTIFICATE",
        // the service really spells this one with a space
        IncomeSource => "INCOME SOURCE",
        Misc => "OTHER",
    }
}

wire_tag! {
    IdDocSubType {
        FrontSide => "FRONT_SIDE",
        BackSide => "BACK_SIDE",
    }
}

wire_tag! {
    /// Review lifecycle as reported by the service. The client only observes it.
    ReviewStatus {
        Init => "init",
        Pending => "pending",
        Queued => "queued",
        Completed => "completed",
        CompletedSent => "completedSent",
        CompletedSentFailure => "completedSentFailure",
    }
}

wire_tag! {
    ReviewAnswer {
        Green => "GREEN",
        Red => "RED",
    }
}

wire_tag! {
    /// Whether a rejected applicant may resubmit documents.
    ReviewRejectType {
        Final => "FINAL",
        Retry => "RETRY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tag_roundtrips_to_wire_string() {
        let tag: IdDocType = serde_json::from_str("\"INCOME SOURCE\"").unwrap();

        assert_eq!(tag, IdDocType::IncomeSource);
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"INCOME SOURCE\"");
    }

    #[test]
    fn test_unknown_tag_is_kept_verbatim() {
        // Given
        let raw = "\"onHold\"";

        // When
        let status: ReviewStatus = serde_json::from_str(raw).unwrap();

        // Then
        assert_eq!(status, ReviewStatus::Other("onHold".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), raw);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert_eq!(
            ReviewAnswer::from("green"),
            ReviewAnswer::Other("green".to_string())
        );
        assert_eq!(ReviewAnswer::from("GREEN"), ReviewAnswer::Green);
    }

    #[test]
    fn test_display_uses_wire_string() {
        assert_eq!(IdDocSetType::ProofOfResidence.to_string(), "PROOF_OF_RESIDENCE");
        assert_eq!(ReviewStatus::CompletedSentFailure.to_string(), "completedSentFailure");
    }
}

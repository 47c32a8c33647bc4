use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use phonenumber::country;

use crate::domain::validation::ValidationError;

/// Defines a string newtype that is trimmed and must be non-empty.
macro_rules! trimmed_string {
    ($(#[$meta:meta])* $name:ident => $field:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $(#[$meta])*
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Parameter name used by the API (`", $field, "`).")]
            pub const FIELD: &'static str = $field;

            #[doc = concat!("Create a validated [`", stringify!($name), "`].")]
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Empty { field: Self::FIELD });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Borrow the validated value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

trimmed_string! {
    /// Alibaba Cloud AccessKey id.
    ///
    /// Invariant: non-empty after trimming.
    AccessKeyId => "AccessKeyId"
}

trimmed_string! {
    /// API version of a product, e.g. `2017-05-25` for SMS.
    ApiVersion => "Version"
}

trimmed_string! {
    /// SMS signature name registered in the SMS console.
    SignName => "SignName"
}

trimmed_string! {
    /// SMS template code, e.g. `SMS_154950909`.
    TemplateCode => "TemplateCode"
}

trimmed_string! {
    /// DirectMail sender address configured in the console.
    AccountName => "AccountName"
}

trimmed_string! {
    /// A single DirectMail recipient address.
    MailAddress => "ToAddress"
}

trimmed_string! {
    /// Name of a DirectMail receiver list used by batch sends.
    ReceiversName => "ReceiversName"
}

trimmed_string! {
    /// Name of a DirectMail template used by batch sends.
    TemplateName => "TemplateName"
}

#[derive(Clone, PartialEq, Eq)]
/// Alibaba Cloud AccessKey secret.
///
/// Invariant: must not be empty (whitespace is preserved). The `Debug`
/// implementation never prints the value.
pub struct AccessKeySecret(String);

impl AccessKeySecret {
    /// Create a validated [`AccessKeySecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty {
                field: "AccessKeySecret",
            });
        }
        Ok(Self(value))
    }

    /// Borrow the secret for signing.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessKeySecret(****)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Mail subject (`Subject`).
///
/// Invariant: non-empty after trimming. The original value is preserved.
pub struct Subject(String);

impl Subject {
    /// Parameter name used by DirectMail (`Subject`).
    pub const FIELD: &'static str = "Subject";

    /// Create a validated subject.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the subject as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// HTML mail body (`HtmlBody`), up to 28K per DirectMail limits.
///
/// Invariant: non-empty after trimming. The original value is preserved.
pub struct HtmlBody(String);

impl HtmlBody {
    /// Parameter name used by DirectMail (`HtmlBody`).
    pub const FIELD: &'static str = "HtmlBody";

    /// Create a validated body.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the body as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number as sent to the SMS API.
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Parameter name used by `SendSms` (`PhoneNumbers`).
    pub const FIELD: &'static str = "PhoneNumbers";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// The number without its E.164 decoration, see [`strip_e164`].
    pub fn without_e164_prefix(&self) -> &str {
        strip_e164(&self.0)
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Convert an already-parsed phone number to a normalized raw value (E.164).
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parameter name used by `SendSms` (`PhoneNumbers`).
    pub const FIELD: &'static str = "PhoneNumbers";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

/// Strips the E.164 decoration some query APIs (e.g. `QuerySendDetails`) reject.
///
/// The leading `+` is removed, and a mainland China number written with its
/// `86` country code (`8613812345678`) loses the country code as well.
pub fn strip_e164(number: &str) -> &str {
    let number = number.strip_prefix('+').unwrap_or(number);
    if number.len() == 13 && number.starts_with("861") {
        &number[2..]
    } else {
        number
    }
}

const CHINA_STANDARD_TIME: FixedOffset = match FixedOffset::east_opt(8 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC+08:00 is a valid offset"),
};

/// Formats an instant as a China Standard Time (UTC+08:00) date, `yyyyMMdd`.
pub fn to_cst_date_string(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&CHINA_STANDARD_TIME)
        .format("%Y%m%d")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Calendar date in China Standard Time, as the SMS query APIs expect it.
///
/// Invariant: a valid date in `yyyyMMdd` form.
pub struct CstDate(String);

impl CstDate {
    /// The CST date an instant falls on.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(to_cst_date_string(instant))
    }

    /// The current CST date.
    pub fn today() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Accept an already formatted `yyyyMMdd` date.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        let well_formed = trimmed.len() == 8
            && trimmed.bytes().all(|b| b.is_ascii_digit())
            && NaiveDate::parse_from_str(trimmed, "%Y%m%d").is_ok();
        if !well_formed {
            return Err(ValidationError::InvalidDate { input: value });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the `yyyyMMdd` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Which traffic `QuerySendStatistics` reports on (`IsGlobe`).
pub enum Region {
    #[default]
    Mainland,
    International,
}

impl Region {
    pub fn as_param(self) -> u8 {
        match self {
            Self::Mainland => 1,
            Self::International => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// SMS template category (`TemplateType`).
pub enum TemplateType {
    VerificationCode,
    Notification,
    Promotion,
    International,
    Digital,
}

impl TemplateType {
    pub fn as_param(self) -> u8 {
        match self {
            Self::VerificationCode => 0,
            Self::Notification => 1,
            Self::Promotion => 2,
            Self::International => 3,
            Self::Digital => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// DirectMail sender address mode (`AddressType`).
pub enum AddressType {
    Random,
    #[default]
    Sender,
}

impl AddressType {
    pub fn as_param(self) -> u8 {
        match self {
            Self::Random => 0,
            Self::Sender => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Delivery status filter for DirectMail statistics (`Status`).
pub enum MailStatus {
    Succeeded,
    InvalidAddress,
    Spam,
    Failed,
}

impl MailStatus {
    pub fn as_param(self) -> u8 {
        match self {
            Self::Succeeded => 0,
            Self::InvalidAddress => 2,
            Self::Spam => 3,
            Self::Failed => 4,
        }
    }
}

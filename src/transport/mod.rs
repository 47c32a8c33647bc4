//! Transport layer: parameter encoding, request signing and response decoding.

mod email;
mod params;
mod response;
mod sign;
mod sms;

pub use email::{
    encode_account_summary, encode_batch_send_mail, encode_mail_statistics,
    encode_single_send_mail,
};
pub use params::{ParamLayers, Params, Priority, SIGNATURE};
pub use response::{Outcome, TransportError, decode_response};
pub use sign::{
    CommonParams, SignedParams, canonical_query, compute_signature, percent_encode, sign,
    string_to_sign,
};
pub use sms::{
    encode_query_send_details, encode_query_send_statistics, encode_send_batch_sms,
    encode_send_sms,
};

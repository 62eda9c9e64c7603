//! OAuth 1.0a request signing primitives.
//!
//! - [`encoder`] percent-encodes text under the OAuth parameter encoding rules.
//! - [`v1::signer`] builds the signature base string and computes PLAINTEXT,
//!   HMAC-SHA1 and HMAC-SHA256 signatures.
//! - [`parameters`] holds request parameters for signing.
//! - [`builder`] fills in the `oauth_*` protocol parameters and formats the
//!   `Authorization` header.
//!
//! ```
//! use oauthsign1a::{build_base_string, sign, ParameterSet, SignatureMethod, SignatureTreatment};
//!
//! let params = ParameterSet::try_from(vec![
//!     ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
//!     ("oauth_token", "nnch734d00sl2jdk"),
//!     ("oauth_signature_method", "HMAC-SHA1"),
//!     ("oauth_timestamp", "1191242096"),
//!     ("oauth_nonce", "kllo9940pd9333jh"),
//!     ("oauth_version", "1.0"),
//! ])?;
//! let base = build_base_string(
//!     "GET",
//!     "http://photos.example.net/photos?file=vacation.jpg&size=original",
//!     &params,
//! )?;
//! let signature = sign(
//!     SignatureMethod::HmacSha1,
//!     SignatureTreatment::Unescaped,
//!     &base,
//!     "kd94hf93k423kf44",
//!     Some("pfkkdhi9sl3r4s00"),
//! )?;
//! assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
//! # Ok::<(), oauthsign1a::Error>(())
//! ```

pub mod builder;
pub mod encoder;
pub mod error;
pub mod parameters;
pub mod v1;

mod util;

pub use builder::{OAuthSignBuilder, SignedRequest, SigningConfig};
pub use encoder::{encode, EncodeMode};
pub use error::{Error, Result};
pub use parameters::{Parameter, ParameterSet};
pub use v1::{
    build_base_string, normalize_parameters, normalize_url, sign, sign_with_secrets, Secrets,
    SignatureMethod, SignatureTreatment,
};

//! Signature base string assembly and signature computation.
//!
//! ```text
//! base string = METHOD & encode(normalized url) & encode(normalized params)
//! key         = encode(consumer secret) & encode(token secret)
//! ```
//!
//! https://tools.ietf.org/html/rfc5849#section-3.4

use crate::encoder::{encode, encode_strict, EncodeMode};
use crate::error::{Error, Result};
use crate::parameters::ParameterSet;
use crate::util;
use crate::v1::values::*;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use std::borrow::Cow;
use tracing::{debug, trace};
use url::Url;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Consumer secret and optional token secret, borrowed for one signing call.
#[derive(Clone)]
pub struct Secrets<'a> {
    consumer_secret: Cow<'a, str>,
    token_secret: Option<Cow<'a, str>>,
}

impl<'a> Secrets<'a> {
    pub fn new<T>(consumer_secret: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Secrets {
            consumer_secret: consumer_secret.into(),
            token_secret: None,
        }
    }

    pub fn with_token<TConsumerSecret, TTokenSecret>(
        consumer_secret: TConsumerSecret,
        token_secret: TTokenSecret,
    ) -> Self
    where
        TConsumerSecret: Into<Cow<'a, str>>,
        TTokenSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            consumer_secret: consumer_secret.into(),
            token_secret: Some(token_secret.into()),
        }
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn token_secret(&self) -> Option<&str> {
        self.token_secret.as_deref()
    }
}

// secrets stay out of logs
impl std::fmt::Debug for Secrets<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("consumer_secret", &"***")
            .field("token_secret", &self.token_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Normalize a request URL: lowercase scheme and host, drop the default
/// port, the query and the fragment. Path case is preserved.
pub fn normalize_url(url: &str) -> Result<String> {
    let url = util::parse_url(url)?;
    Ok(util::url_to_endpoint_and_queries(&url).0)
}

/// Build the normalized parameter string from the URL query and `parameters`.
///
/// Every name and value is strict-encoded, then the pairs are sorted by
/// encoded name and then encoded value, and joined as `name=value&...`.
/// `oauth_signature` never takes part; `realm` is dropped from `parameters`
/// but kept when it appears in the query string.
pub fn normalize_parameters(url: &str, parameters: &ParameterSet<'_>) -> Result<String> {
    let url = util::parse_url(url)?;
    let (_, query) = util::url_to_endpoint_and_queries(&url);
    Ok(normalize_pairs(query, parameters))
}

fn normalize_pairs(query: Vec<(Cow<'_, str>, Cow<'_, str>)>, parameters: &ParameterSet<'_>) -> String {
    // realm is an Authorization header attribute; a query parameter of that
    // name is an ordinary parameter and is signed
    let user_params = parameters
        .iter()
        .map(|p| (p.name(), p.value()))
        .filter(|(k, _)| *k != OAUTH_PARAM_KEY_REALM);
    let query_params = query.iter().map(|(k, v)| (&**k, &**v));

    // join two parameter sources and sort by alphabetical order
    let mut params = query_params
        .chain(user_params)
        .filter(|(k, _)| *k != OAUTH_PARAM_KEY_SIGNATURE)
        .map(|(k, v)| (encode_strict(k), encode_strict(v)))
        .collect::<Vec<(String, String)>>();
    // stable; byte-wise on name, then value
    params.sort();

    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&")
}

/// Build the signature base string for a request.
///
/// Query parameters of `url` are merged with `parameters`. The parameter
/// string is encoded per pair and then once more as a whole, which is what
/// OAuth 1.0a requires.
pub fn build_base_string(
    http_method: &str,
    url: &str,
    parameters: &ParameterSet<'_>,
) -> Result<String> {
    let url: Url = util::parse_url(url)?;
    let (endpoint, query) = util::url_to_endpoint_and_queries(&url);
    debug!(endpoint = %endpoint, "normalized request url");

    let http_method = http_method.trim().to_ascii_uppercase();
    let params = normalize_pairs(query, parameters);
    let base_str = format!(
        "{}&{}&{}",
        encode_strict(&http_method),
        encode_strict(&endpoint),
        encode_strict(&params)
    );
    trace!(base_string = %base_str, "built signature base string");
    Ok(base_str)
}

/// Compute a signature over `base_string`.
///
/// The key is `encode(consumer_secret)&encode(token_secret)`, with an absent
/// token secret treated as empty. PLAINTEXT returns the key itself; the HMAC
/// methods return the base64 digest. With [`SignatureTreatment::Escaped`] the
/// result is strict-encoded once more.
///
/// # Errors
/// [`Error::UnsupportedSignatureMethod`] for RSA-SHA1, which needs key
/// material this crate does not handle.
pub fn sign(
    method: SignatureMethod,
    treatment: SignatureTreatment,
    base_string: &str,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> Result<String> {
    let sign_key = format!(
        "{}&{}",
        encode(consumer_secret, EncodeMode::Strict),
        encode(token_secret.unwrap_or(""), EncodeMode::Strict)
    );

    let signature = match method {
        SignatureMethod::PlainText => sign_key,
        SignatureMethod::HmacSha1 => keyed_digest::<HmacSha1>(&sign_key, base_string),
        SignatureMethod::HmacSha256 => keyed_digest::<HmacSha256>(&sign_key, base_string),
        SignatureMethod::RsaSha1 => {
            return Err(Error::UnsupportedSignatureMethod(method.as_str().to_string()))
        }
    };
    debug!(method = %method, ?treatment, "computed oauth signature");

    Ok(match treatment {
        SignatureTreatment::Escaped => encode_strict(&signature),
        SignatureTreatment::Unescaped => signature,
    })
}

/// [`sign`] with the secrets taken from a [`Secrets`] pair.
pub fn sign_with_secrets(
    method: SignatureMethod,
    treatment: SignatureTreatment,
    base_string: &str,
    secrets: &Secrets<'_>,
) -> Result<String> {
    sign(
        method,
        treatment,
        base_string,
        secrets.consumer_secret(),
        secrets.token_secret(),
    )
}

fn keyed_digest<M>(sign_key: &str, base_string: &str) -> String
where
    M: Mac + KeyInit,
{
    // NOTE: HMAC accepts keys of any length, so this never fails.
    let mut mac = <M as KeyInit>::new_from_slice(sign_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTOS_BASE_STRING: &str = "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal";

    fn photos_parameters() -> ParameterSet<'static> {
        ParameterSet::try_from(vec![
            ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
            ("oauth_token", "nnch734d00sl2jdk"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1191242096"),
            ("oauth_nonce", "kllo9940pd9333jh"),
            ("oauth_version", "1.0"),
        ])
        .unwrap()
    }

    fn hmac_sha1(cs: &str, ts: Option<&str>, bs: &str) -> String {
        sign(
            SignatureMethod::HmacSha1,
            SignatureTreatment::Unescaped,
            bs,
            cs,
            ts,
        )
        .unwrap()
    }

    #[test]
    fn test_hmac_sha1_standard_cases() {
        assert_eq!(hmac_sha1("cs", None, "bs"), "egQqG5AJep5sJ7anhXju1unge2I=");
        assert_eq!(hmac_sha1("cs", Some("ts"), "bs"), "VZVjXceV7JgPq/dOTnNmEfO0Fv8=");
        assert_eq!(
            hmac_sha1("kd94hf93k423kf44", Some("pfkkdhi9sl3r4s00"), PHOTOS_BASE_STRING),
            "tR3+Ty81lMeYAr/Fid0kMTYa/WM="
        );
    }

    #[test]
    fn test_missing_token_secret_is_empty() {
        assert_eq!(hmac_sha1("cs", None, "bs"), hmac_sha1("cs", Some(""), "bs"));
    }

    #[test]
    fn test_escaped_treatment() {
        let escaped = sign(
            SignatureMethod::HmacSha1,
            SignatureTreatment::Escaped,
            PHOTOS_BASE_STRING,
            "kd94hf93k423kf44",
            Some("pfkkdhi9sl3r4s00"),
        )
        .unwrap();
        assert_eq!(escaped, "tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D");
    }

    #[test]
    fn test_plaintext() {
        let plain = |treatment| {
            sign(
                SignatureMethod::PlainText,
                treatment,
                "ignored",
                "kd94hf93k423kf44",
                Some("pfkkdhi9sl3r4s00"),
            )
            .unwrap()
        };
        assert_eq!(plain(SignatureTreatment::Unescaped), "kd94hf93k423kf44&pfkkdhi9sl3r4s00");
        assert_eq!(plain(SignatureTreatment::Escaped), "kd94hf93k423kf44%26pfkkdhi9sl3r4s00");

        let secrets = Secrets::new("c s");
        let sig = sign_with_secrets(
            SignatureMethod::PlainText,
            SignatureTreatment::Unescaped,
            "",
            &secrets,
        )
        .unwrap();
        assert_eq!(sig, "c%20s&");
    }

    #[test]
    fn test_hmac_sha256() {
        let sig = sign(
            SignatureMethod::HmacSha256,
            SignatureTreatment::Unescaped,
            "bs",
            "cs",
            None,
        )
        .unwrap();
        assert_eq!(sig, "kWNIhpsQfKsXX+tw7xo2n09Z77xczTK6fc8ZPau76DY=");

        let sig = sign(
            SignatureMethod::HmacSha256,
            SignatureTreatment::Unescaped,
            "bs",
            "cs",
            Some("ts"),
        )
        .unwrap();
        assert_eq!(sig, "9HGKdfyP38c9+AtaEhdNhLubhigOrxSw0l46B8qgPso=");
    }

    #[test]
    fn test_rsa_sha1_unsupported() {
        let err = sign(
            SignatureMethod::RsaSha1,
            SignatureTreatment::Unescaped,
            "bs",
            "cs",
            None,
        )
        .unwrap_err();
        assert_eq!(err, Error::UnsupportedSignatureMethod("RSA-SHA1".into()));
    }

    #[test]
    fn test_build_base_string_photos() {
        let base = build_base_string(
            "get",
            "http://photos.example.net/photos?file=vacation.jpg&size=original",
            &photos_parameters(),
        )
        .unwrap();
        assert_eq!(base, PHOTOS_BASE_STRING);
    }

    #[test]
    fn test_base_string_rfc5849_initiate() {
        // https://tools.ietf.org/html/rfc5849#section-1.2
        let params = ParameterSet::try_from(vec![
            ("realm", "Photos"),
            ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "137131200"),
            ("oauth_nonce", "wIjqoS"),
            ("oauth_callback", "http://printer.example.com/ready"),
        ])
        .unwrap();
        let base =
            build_base_string("post", "https://photos.example.net/initiate", &params).unwrap();
        assert_eq!(
            hmac_sha1("kd94hf93k423kf44", None, &base),
            "74KNZJeDHnMBp0EMJ9ZHt/XKycU="
        );
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("HTTP://Photos.Example.NET:80/Photos?size=original#x").unwrap(),
            "http://photos.example.net/Photos"
        );
        assert_eq!(
            normalize_url("https://example.com:8443/a").unwrap(),
            "https://example.com:8443/a"
        );
        assert!(matches!(
            normalize_url("::not a url::"),
            Err(Error::MalformedUrl { .. })
        ));
    }

    #[test]
    fn test_normalize_parameters_ordering() {
        let params = ParameterSet::try_from(vec![
            ("a", "2"),
            ("a", "1"),
            ("b", "z z"),
            ("oauth_signature", "dropped"),
            ("A", "upper"),
        ])
        .unwrap();
        let normalized = normalize_parameters("http://example.com/?c=3&a=10", &params).unwrap();
        assert_eq!(normalized, "A=upper&a=1&a=10&a=2&b=z%20z&c=3");
    }

    #[test]
    fn test_realm_in_query_is_signed() {
        let normalized =
            normalize_parameters("http://example.com/r?realm=x&a=1", &ParameterSet::new()).unwrap();
        assert_eq!(normalized, "a=1&realm=x");

        let params = ParameterSet::try_from(vec![("realm", "header-only")]).unwrap();
        let normalized = normalize_parameters("http://example.com/r?realm=x&a=1", &params).unwrap();
        assert_eq!(normalized, "a=1&realm=x");

        let normalized =
            normalize_parameters("http://example.com/r?oauth_signature=s&a=1", &ParameterSet::new())
                .unwrap();
        assert_eq!(normalized, "a=1");
    }

    #[test]
    fn test_query_is_decoded_before_encoding() {
        let normalized =
            normalize_parameters("http://example.com/r?q=a+b%21&x%3Dy=%E3%80%81", &ParameterSet::new())
                .unwrap();
        assert_eq!(normalized, "q=a%20b%21&x%3Dy=%E3%80%81");
    }

    #[test]
    fn test_malformed_url_fails_fast() {
        let err = build_base_string("GET", "photos.example.net/photos", &ParameterSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedUrl { .. }));
    }

    #[test]
    fn test_secrets_debug_hides_values() {
        let secrets = Secrets::with_token("very-secret", "also-secret");
        let debug = format!("{:?}", secrets);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("also-secret"));
        assert_eq!(secrets.token_secret(), Some("also-secret"));
    }
}

//! Convenience layer over [`crate::v1::signer`].
//!
//! [`OAuthSignBuilder`] fills in the standard `oauth_*` protocol parameters,
//! signs the request and formats the result for an `Authorization` header or
//! a query string. Nonce and timestamp are generated here only when the caller
//! leaves them unset.

use crate::encoder::encode_strict;
use crate::error::Result;
use crate::parameters::ParameterSet;
use crate::v1::signer::{build_base_string, sign_with_secrets, Secrets};
use crate::v1::values::*;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

/// Signing settings a host application can keep in its own config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub signature_method: SignatureMethod,
    pub treatment: SignatureTreatment,
    /// `oauth_version`; `None` leaves the parameter out.
    pub version: Option<String>,
    pub realm: Option<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        SigningConfig {
            signature_method: SignatureMethod::HmacSha1,
            treatment: SignatureTreatment::Unescaped,
            version: Some(OAUTH_VALUE_VERSION.to_string()),
            realm: None,
        }
    }
}

/// OAuth Signature Builder
#[derive(Clone, Debug)]
pub struct OAuthSignBuilder<'a> {
    consumer_key: Cow<'a, str>,
    token: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<i64>,
    callback: Option<Cow<'a, str>>,
    verifier: Option<Cow<'a, str>>,
    config: SigningConfig,
    parameters: ParameterSet<'a>,
}

impl<'a> OAuthSignBuilder<'a> {
    pub fn new<T: Into<Cow<'a, str>>>(consumer_key: T) -> Self {
        OAuthSignBuilder {
            consumer_key: consumer_key.into(),
            token: None,
            nonce: None,
            timestamp: None,
            callback: None,
            verifier: None,
            config: SigningConfig::default(),
            parameters: ParameterSet::new(),
        }
    }

    pub fn token(&mut self, token: impl Into<Cow<'a, str>>) -> &mut Self {
        self.token = Some(token.into());
        self
    }

    pub fn nonce(&mut self, nonce: impl Into<Cow<'a, str>>) -> &mut Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn timestamp(&mut self, timestamp: i64) -> &mut Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn callback(&mut self, callback: impl Into<Cow<'a, str>>) -> &mut Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn verifier(&mut self, verifier: impl Into<Cow<'a, str>>) -> &mut Self {
        self.verifier = Some(verifier.into());
        self
    }

    pub fn signature_method(&mut self, method: SignatureMethod) -> &mut Self {
        self.config.signature_method = method;
        self
    }

    pub fn treatment(&mut self, treatment: SignatureTreatment) -> &mut Self {
        self.config.treatment = treatment;
        self
    }

    pub fn version(&mut self, version: Option<impl Into<String>>) -> &mut Self {
        self.config.version = version.map(Into::into);
        self
    }

    pub fn realm(&mut self, realm: impl Into<String>) -> &mut Self {
        self.config.realm = Some(realm.into());
        self
    }

    pub fn config(&mut self, config: SigningConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Add a request parameter (form body or extra query parameter).
    pub fn param<TName, TValue>(&mut self, name: TName, value: TValue) -> Result<&mut Self>
    where
        TName: Into<Cow<'a, str>>,
        TValue: Into<Cow<'a, str>>,
    {
        self.parameters.add_pair(name, value)?;
        Ok(self)
    }

    pub fn params(&mut self, parameters: &ParameterSet<'a>) -> &mut Self {
        self.parameters.extend_from(parameters);
        self
    }

    /// Sign a request to `url` (query string included) with `http_method`.
    pub fn sign(&self, http_method: &str, url: &str, secrets: &Secrets<'_>) -> Result<SignedRequest> {
        let nonce = self
            .nonce
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let timestamp = self.timestamp.unwrap_or_else(|| Utc::now().timestamp());
        let timestamp_str = timestamp.to_string();

        // build authorization basic parameters
        let basic_params = vec![
            (OAUTH_PARAM_KEY_CONSUMER_KEY, Some(&*self.consumer_key)),
            (OAUTH_PARAM_KEY_TOKEN, self.token.as_deref()),
            (
                OAUTH_PARAM_KEY_SIGNATURE_METHOD,
                Some(self.config.signature_method.as_str()),
            ),
            (OAUTH_PARAM_KEY_TIMESTAMP, Some(timestamp_str.as_str())),
            (OAUTH_PARAM_KEY_NONCE, Some(nonce.as_str())),
            (OAUTH_PARAM_KEY_VERSION, self.config.version.as_deref()),
            (OAUTH_PARAM_KEY_CALLBACK, self.callback.as_deref()),
            (OAUTH_PARAM_KEY_VERIFIER, self.verifier.as_deref()),
        ]
        .into_iter()
        // trim None value
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect::<Vec<(&str, &str)>>();

        let mut all_params = ParameterSet::with_capacity(basic_params.len() + self.parameters.len());
        all_params.add_range(basic_params.iter().copied())?;
        all_params.extend_from(&self.parameters);

        let base_string = build_base_string(http_method, url, &all_params)?;
        let raw_signature = sign_with_secrets(
            self.config.signature_method,
            SignatureTreatment::Unescaped,
            &base_string,
            secrets,
        )?;
        let signature = match self.config.treatment {
            SignatureTreatment::Escaped => encode_strict(&raw_signature),
            SignatureTreatment::Unescaped => raw_signature.clone(),
        };

        let mut oauth_parameters = basic_params
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        oauth_parameters.push((OAUTH_PARAM_KEY_SIGNATURE.to_string(), raw_signature));

        Ok(SignedRequest {
            signature,
            base_string,
            oauth_parameters,
            realm: self.config.realm.clone(),
            nonce,
            timestamp,
        })
    }
}

/// Result of [`OAuthSignBuilder::sign`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// Signature with the configured treatment applied.
    pub signature: String,
    pub base_string: String,
    /// `oauth_*` protocol parameters, unencoded, `oauth_signature` last.
    pub oauth_parameters: Vec<(String, String)>,
    pub realm: Option<String>,
    pub nonce: String,
    pub timestamp: i64,
}

impl SignedRequest {
    /// Value for the `Authorization` header.
    ///
    /// ```text
    /// OAuth realm="Photos", oauth_consumer_key="dpf43f3p2l4k3l03", ...
    /// ```
    pub fn authorization_header(&self) -> String {
        let realm = self.realm.as_ref().map(|r| {
            format!(
                "{}=\"{}\"",
                OAUTH_PARAM_KEY_REALM,
                r.replace('\\', "\\\\").replace('"', "\\\"")
            )
        });
        let params = self
            .oauth_parameters
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode_strict(k), encode_strict(v)));
        let fields = realm.into_iter().chain(params).collect::<Vec<String>>();
        format!("{} {}", OAUTH_HEADER, fields.join(", "))
    }

    /// Protocol parameters as an encoded query string, for requests that
    /// carry OAuth in the URL instead of a header.
    pub fn query_string(&self) -> String {
        self.oauth_parameters
            .iter()
            .map(|(k, v)| format!("{}={}", encode_strict(k), encode_strict(v)))
            .collect::<Vec<String>>()
            .join("&")
    }
}

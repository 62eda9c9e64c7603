pub mod signer;
pub mod values;

pub use signer::{
    build_base_string, normalize_parameters, normalize_url, sign, sign_with_secrets, Secrets,
};
pub use values::{SignatureMethod, SignatureTreatment};

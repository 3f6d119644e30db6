//! ViaCEP lookup client.
//!
//! # Responsibility
//! - Query `GET {base_url}/{digits}/json/` and map the payload to `Address`.
//! - Translate ViaCEP's `"erro": true` body into `ResolveError::NotFound`.
//!
//! # Invariants
//! - The returned address is keyed by the requested postal code.
//! - Every request is bounded by the configured timeout.

use crate::model::address::{Address, PostalCode};
use crate::resolver::{AddressResolver, ResolveError, ResolveResult};
use log::{debug, error, info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Public ViaCEP endpoint.
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";
/// Default upper bound for one lookup request.
pub const DEFAULT_VIACEP_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the ViaCEP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaCepConfig {
    /// Base URL without the trailing `/{cep}/json/` segment.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VIACEP_BASE_URL.to_string(),
            timeout: DEFAULT_VIACEP_TIMEOUT,
        }
    }
}

/// Wire shape of a ViaCEP JSON answer.
#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    ibge: String,
    #[serde(default)]
    gia: String,
    #[serde(default)]
    ddd: String,
    #[serde(default)]
    siafi: String,
    /// Present only on misses; ViaCEP has sent both `true` and `"true"`.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

/// Blocking ViaCEP client implementing `AddressResolver`.
pub struct ViaCepResolver {
    base_url: String,
    http: Client,
}

impl ViaCepResolver {
    /// Builds a client with the configured timeout.
    pub fn new(config: &ViaCepConfig) -> ResolveResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn lookup_url(&self, postal_code: &PostalCode) -> String {
        format!("{}/{}/json/", self.base_url, postal_code.digits())
    }

    fn fetch(&self, postal_code: &PostalCode) -> ResolveResult<Address> {
        let response = self.http.get(self.lookup_url(postal_code)).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::UnexpectedStatus {
                postal_code: postal_code.clone(),
                status: status.as_u16(),
            });
        }

        let payload: ViaCepPayload = response
            .json()
            .map_err(|err| ResolveError::InvalidResponse(err.to_string()))?;
        payload_to_address(postal_code, payload)
    }
}

impl AddressResolver for ViaCepResolver {
    fn resolve(&self, postal_code: &PostalCode) -> ResolveResult<Address> {
        let started_at = Instant::now();
        debug!("event=address_lookup module=resolver status=start cep={postal_code}");

        let result = self.fetch(postal_code);
        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => info!(
                "event=address_lookup module=resolver status=ok cep={postal_code} duration_ms={duration_ms}"
            ),
            Err(ResolveError::NotFound(_)) => warn!(
                "event=address_lookup module=resolver status=not_found cep={postal_code} duration_ms={duration_ms}"
            ),
            Err(err) => error!(
                "event=address_lookup module=resolver status=error cep={postal_code} duration_ms={duration_ms} error={err}"
            ),
        }
        result
    }
}

fn payload_to_address(requested: &PostalCode, payload: ViaCepPayload) -> ResolveResult<Address> {
    if is_miss_marker(payload.erro.as_ref()) {
        return Err(ResolveError::NotFound(requested.clone()));
    }

    if let Some(cep) = payload.cep.as_deref() {
        let answered = PostalCode::parse(cep)
            .map_err(|err| ResolveError::InvalidResponse(err.to_string()))?;
        if &answered != requested {
            return Err(ResolveError::InvalidResponse(format!(
                "requested {requested} but lookup answered {answered}"
            )));
        }
    }

    Ok(Address {
        postal_code: requested.clone(),
        street: payload.logradouro,
        complement: payload.complemento,
        neighborhood: payload.bairro,
        city: payload.localidade,
        state: payload.uf,
        ibge_code: payload.ibge,
        gia_code: payload.gia,
        area_code: payload.ddd,
        siafi_code: payload.siafi,
    })
}

fn is_miss_marker(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(serde_json::Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{payload_to_address, ViaCepConfig, ViaCepPayload, ViaCepResolver};
    use crate::model::address::PostalCode;
    use crate::resolver::ResolveError;

    fn payload(json: &str) -> ViaCepPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn payload_maps_viacep_fields() {
        let requested = PostalCode::parse("01001-000").unwrap();
        let address = payload_to_address(
            &requested,
            payload(
                r#"{
                    "cep": "01001-000",
                    "logradouro": "Praça da Sé",
                    "complemento": "lado ímpar",
                    "bairro": "Sé",
                    "localidade": "São Paulo",
                    "uf": "SP",
                    "ibge": "3550308",
                    "gia": "1004",
                    "ddd": "11",
                    "siafi": "7107"
                }"#,
            ),
        )
        .unwrap();

        assert_eq!(address.postal_code, requested);
        assert_eq!(address.street, "Praça da Sé");
        assert_eq!(address.neighborhood, "Sé");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.state, "SP");
        assert_eq!(address.area_code, "11");
    }

    #[test]
    fn error_marker_means_not_found_in_both_spellings() {
        let requested = PostalCode::parse("99999-999").unwrap();
        for body in [r#"{"erro": true}"#, r#"{"erro": "true"}"#] {
            let err = payload_to_address(&requested, payload(body)).unwrap_err();
            assert!(matches!(err, ResolveError::NotFound(code) if code == requested));
        }
    }

    #[test]
    fn mismatched_answer_is_rejected() {
        let requested = PostalCode::parse("01001-000").unwrap();
        let err = payload_to_address(&requested, payload(r#"{"cep": "20040-020"}"#)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidResponse(_)));
    }

    #[test]
    fn lookup_url_uses_digits_and_trims_trailing_slash() {
        let resolver = ViaCepResolver::new(&ViaCepConfig {
            base_url: "http://localhost:8080/ws/".to_string(),
            ..ViaCepConfig::default()
        })
        .unwrap();

        let url = resolver.lookup_url(&PostalCode::parse("01001-000").unwrap());
        assert_eq!(url, "http://localhost:8080/ws/01001000/json/");
    }
}

use custreg_core::{
    Address, AddressResolver, PostalCode, ResolveError, ResolveResult, ViaCepConfig,
    ViaCepResolver,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs the blocking client off the async test runtime.
async fn resolve_against(server: &MockServer, raw_cep: &str) -> ResolveResult<Address> {
    let config = ViaCepConfig {
        base_url: format!("{}/ws", server.uri()),
        timeout: Duration::from_secs(2),
    };
    let postal_code = PostalCode::parse(raw_cep).unwrap();

    tokio::task::spawn_blocking(move || {
        let resolver = ViaCepResolver::new(&config)?;
        resolver.resolve(&postal_code)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn resolves_address_from_lookup_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/01001000/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "unidade": "",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "estado": "São Paulo",
            "regiao": "Sudeste",
            "ibge": "3550308",
            "gia": "1004",
            "ddd": "11",
            "siafi": "7107"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let address = resolve_against(&server, "01001-000").await.unwrap();

    assert_eq!(address.postal_code.as_str(), "01001-000");
    assert_eq!(address.street, "Praça da Sé");
    assert_eq!(address.city, "São Paulo");
    assert_eq!(address.state, "SP");
    assert_eq!(address.siafi_code, "7107");
}

#[tokio::test(flavor = "multi_thread")]
async fn error_marker_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/99999999/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "erro": "true"
        })))
        .mount(&server)
        .await;

    let err = resolve_against(&server, "99999-999").await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(code) if code.as_str() == "99999-999"));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = resolve_against(&server, "01001-000").await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UnexpectedStatus { status: 400, .. }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = resolve_against(&server, "01001-000").await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidResponse(_)));
}

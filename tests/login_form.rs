// tests/login_form.rs
//
// Discovery + credential resolution over a scripted session, the way the worker chains them.

use cara_cracha::core::net::{Request, Response, Session, Transport, TransportError};
use cara_cracha::error::Result;
use cara_cracha::progress::NullProgress;
use cara_cracha::specs::login::{Credentials, discover, fill_credentials};

const LOGIN: &str = "https://canaime.example/sgp2rr/login/login_principal.php";

/// Serves one fixed body for any URL.
struct OnePage(&'static str);

impl Transport for OnePage {
    fn execute(&mut self, req: &Request) -> std::result::Result<Response, TransportError> {
        Ok(Response::new(200, req.url.clone(), self.0.as_bytes()))
    }
    fn set_verify_tls(&mut self, _verify: bool) -> Result<()> {
        Ok(())
    }
}

#[test]
fn portal_style_form_resolves_by_candidate_names() {
    // no type hints: the portal names its fields in Portuguese
    let page = r#"
        <form name="form1" method="post" action="valida_login.php">
          <input name="usuario" size="20">
          <input name="senha" size="20">
          <input type="hidden" name="origem" value="sgp">
          <input type="submit" value="Entrar">
        </form>"#;
    let mut session = Session::new(OnePage(page));
    let form = discover(&mut session, LOGIN, &mut NullProgress).unwrap();

    assert!(form.has_form);
    assert_eq!(form.action_url, "https://canaime.example/sgp2rr/login/valida_login.php");
    // nameless submit is not part of the payload
    assert_eq!(form.base_payload.len(), 1);

    let creds = Credentials::new("op", "pw");
    let resolved = fill_credentials(&form.base_payload, &creds, &form.raw_markup);
    assert_eq!(resolved.username_field.as_deref(), Some("usuario"));
    assert_eq!(resolved.password_field.as_deref(), Some("senha"));

    let pairs = resolved.payload.pairs();
    assert_eq!(pairs[0], ("origem".to_string(), "sgp".to_string()));
    assert_eq!(resolved.payload.get("usuario"), Some("op"));
    assert_eq!(resolved.payload.get("senha"), Some("pw"));
    // blind candidates ride along too
    assert_eq!(resolved.payload.get("login"), Some("op"));
    assert_eq!(resolved.payload.get("pwd"), Some("pw"));
}

#[test]
fn only_the_first_form_counts() {
    let page = r#"
        <form action="/search"><input type="hidden" name="q" value=""></form>
        <form action="/auth"><input type="password" name="p"></form>"#;
    let mut session = Session::new(OnePage(page));
    let form = discover(&mut session, LOGIN, &mut NullProgress).unwrap();
    assert_eq!(form.action_url, "https://canaime.example/search");

    let resolved = fill_credentials(&form.base_payload, &Credentials::new("u", "p"), &form.raw_markup);
    assert_eq!(resolved.password_field, None);
}

#[test]
fn bad_login_url_is_an_error() {
    let mut session = Session::new(OnePage("<form></form>"));
    let err = discover(&mut session, "not a url", &mut NullProgress).unwrap_err();
    assert!(err.to_string().contains("invalid URL"));
}

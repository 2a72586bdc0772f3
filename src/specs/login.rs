// src/specs/login.rs
//
// Login form discovery and credential field resolution.
// Both parsers are pure: markup in, payload out. Only `discover` touches the network.

use std::fmt;

use scraper::{ElementRef, Html};
use url::Url;

use crate::config::consts::{PASSWORD_CANDIDATES, USERNAME_CANDIDATES};
use crate::core::html::{input_name, input_type, selector};
use crate::core::net::{CallSite, Session, Transport};
use crate::error::{Result, ScrapeError};
use crate::progress::Progress;

/// Ordered form name/value pairs, serialized in insertion order like a browser would.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = s!(value),
            None => self.0.push((s!(name), s!(value))),
        }
    }

    /// Insert only when the key is absent.
    pub fn set_default(&mut self, name: &str, value: &str) {
        if !self.has(name) {
            self.0.push((s!(name), s!(value)));
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Operator credentials. Never logged; `Debug` hides the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginForm {
    pub action_url: String,
    /// hidden + submit inputs only
    pub base_payload: FormFields,
    /// The whole login page, kept for the credential resolver
    pub raw_markup: String,
    /// False when the page has no `<form>`: nothing to POST
    pub has_form: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLogin {
    pub payload: FormFields,
    pub username_field: Option<String>,
    pub password_field: Option<String>,
}

/// GET the login page (TLS downgrade applies) and parse its first form.
pub fn discover<T: Transport>(
    session: &mut Session<T>,
    login_url: &str,
    progress: &mut dyn Progress,
) -> Result<LoginForm> {
    let resp = session.get(login_url, CallSite::LoginPage, progress)?;
    parse_login_form(login_url, &resp.text())
}

/// Locate the first `<form>` and derive its absolute action + hidden/submit payload.
/// A page without a form is a valid "no login needed" answer, not an error.
pub fn parse_login_form(login_url: &str, markup: &str) -> Result<LoginForm> {
    let base = Url::parse(login_url)
        .map_err(|source| ScrapeError::Url { url: s!(login_url), source })?;

    let doc = Html::parse_document(markup);
    let Some(form) = first_form(&doc) else {
        return Ok(LoginForm {
            action_url: s!(login_url),
            base_payload: FormFields::new(),
            raw_markup: s!(markup),
            has_form: false,
        });
    };

    let action = form.value().attr("action").map(str::trim).unwrap_or_default();
    let action_url = if action.is_empty() {
        s!(login_url)
    } else {
        base.join(action)
            .map_err(|source| ScrapeError::Url { url: s!(action), source })?
            .to_string()
    };

    let mut payload = FormFields::new();
    for input in inputs(form) {
        let Some(name) = input_name(input) else { continue };
        let ty = input_type(input);
        if ty == "hidden" || ty == "submit" {
            payload.set(name, input.value().attr("value").unwrap_or_default());
        }
    }

    Ok(LoginForm { action_url, base_payload: payload, raw_markup: s!(markup), has_form: true })
}

/// Fill username/password into the base payload using type hints first,
/// then well-known names, then blind injection of every candidate name.
pub fn fill_credentials(base: &FormFields, creds: &Credentials, markup: &str) -> ResolvedLogin {
    let doc = Html::parse_document(markup);
    let form = first_form(&doc);

    let mut password_field = form.and_then(|f| {
        inputs(f)
            .into_iter()
            .find(|i| input_type(*i) == "password")
            .and_then(input_name)
            .map(String::from)
    });
    let mut username_field = form.and_then(|f| {
        inputs(f)
            .into_iter()
            .find(|i| matches!(input_type(*i).as_str(), "text" | "email"))
            .and_then(input_name)
            .map(String::from)
    });

    if let Some(f) = form {
        let names: Vec<&str> = inputs(f).into_iter().filter_map(input_name).collect();
        if username_field.is_none() {
            username_field = first_candidate(USERNAME_CANDIDATES, &names);
        }
        if password_field.is_none() {
            password_field = first_candidate(PASSWORD_CANDIDATES, &names);
        }
    }

    let mut payload = base.clone();
    if let Some(name) = &username_field {
        payload.set(name, &creds.username);
    }
    if let Some(name) = &password_field {
        payload.set(name, &creds.password);
    }

    // Some forms only reveal their field names by guessing
    for key in USERNAME_CANDIDATES {
        payload.set_default(key, &creds.username);
    }
    for key in PASSWORD_CANDIDATES {
        payload.set_default(key, &creds.password);
    }

    ResolvedLogin { payload, username_field, password_field }
}

fn first_form(doc: &Html) -> Option<ElementRef<'_>> {
    let sel = selector("form")?;
    doc.select(&sel).next()
}

fn inputs(form: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    selector("input")
        .map(|sel| form.select(&sel).collect())
        .unwrap_or_default()
}

fn first_candidate(candidates: &[&str], names: &[&str]) -> Option<String> {
    candidates.iter().find(|c| names.contains(c)).map(|c| s!(*c))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN: &str = "https://portal.example/sgp/login/login_principal.php";

    fn creds() -> Credentials {
        Credentials::new("agent", "s3cret")
    }

    #[test]
    fn form_action_resolves_against_login_url() {
        let html = r#"
            <form method="post" action="../valida.php">
              <input type="hidden" name="token" value="abc">
              <input type="submit" name="entrar" value="Entrar">
              <input type="text" name="u">
              <input type="password" name="p">
              <input type="hidden" value="orphan">
            </form>"#;
        let form = parse_login_form(LOGIN, html).unwrap();
        assert!(form.has_form);
        assert_eq!(form.action_url, "https://portal.example/sgp/valida.php");
        assert_eq!(
            form.base_payload.pairs(),
            &[(s!("token"), s!("abc")), (s!("entrar"), s!("Entrar"))]
        );
    }

    #[test]
    fn empty_action_falls_back_to_login_url() {
        let form = parse_login_form(LOGIN, r#"<form action=""><input type="HIDDEN" name="h"></form>"#).unwrap();
        assert_eq!(form.action_url, LOGIN);
        assert_eq!(form.base_payload.get("h"), Some(""));
    }

    #[test]
    fn page_without_form_needs_no_login() {
        let form = parse_login_form(LOGIN, "<html><body>Welcome</body></html>").unwrap();
        assert!(!form.has_form);
        assert_eq!(form.action_url, LOGIN);
        assert!(form.base_payload.is_empty());
    }

    #[test]
    fn reparsing_cached_markup_is_idempotent() {
        let html = r#"<form action="/auth"><input type="hidden" name="csrf" value="1"></form>"#;
        let first = parse_login_form(LOGIN, html).unwrap();
        let again = parse_login_form(LOGIN, &first.raw_markup).unwrap();
        assert_eq!(first.action_url, again.action_url);
        assert_eq!(first.base_payload, again.base_payload);
    }

    #[test]
    fn type_hints_pick_fields() {
        let html = r#"<form><input type="password" name="p"><input type="text" name="u"></form>"#;
        let r = fill_credentials(&FormFields::new(), &creds(), html);
        assert_eq!(r.username_field.as_deref(), Some("u"));
        assert_eq!(r.password_field.as_deref(), Some("p"));
        assert_eq!(r.payload.get("u"), Some("agent"));
        assert_eq!(r.payload.get("p"), Some("s3cret"));
    }

    #[test]
    fn email_type_counts_as_username() {
        let html = r#"<form><input type="email" name="mail"><input type="password" name="pw"></form>"#;
        let r = fill_credentials(&FormFields::new(), &creds(), html);
        assert_eq!(r.username_field.as_deref(), Some("mail"));
    }

    #[test]
    fn candidate_names_used_when_types_are_missing() {
        let html = r#"<form><input name="login"><input name="senha"></form>"#;
        let r = fill_credentials(&FormFields::new(), &creds(), html);
        assert_eq!(r.username_field.as_deref(), Some("login"));
        assert_eq!(r.password_field.as_deref(), Some("senha"));
    }

    #[test]
    fn fallback_injects_every_candidate_without_clobbering() {
        let mut base = FormFields::new();
        base.set("user", "preset");
        let r = fill_credentials(&base, &creds(), "<p>no form here</p>");
        assert_eq!(r.username_field, None);
        assert_eq!(r.password_field, None);
        assert_eq!(r.payload.get("user"), Some("preset"));
        for k in USERNAME_CANDIDATES.iter().filter(|k| **k != "user") {
            assert_eq!(r.payload.get(k), Some("agent"));
        }
        for k in PASSWORD_CANDIDATES {
            assert_eq!(r.payload.get(k), Some("s3cret"));
        }
    }

    #[test]
    fn nameless_password_input_is_not_resolved_by_type() {
        let html = r#"<form><input type="password"><input type="password" name="later"></form>"#;
        let r = fill_credentials(&FormFields::new(), &creds(), html);
        assert_eq!(r.password_field, None);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let dbg = format!("{:?}", creds());
        assert!(dbg.contains("agent"));
        assert!(!dbg.contains("s3cret"));
    }
}

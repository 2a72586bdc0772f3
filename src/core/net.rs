// src/core/net.rs
//
// Session transport: one cookie jar per run, a one-shot TLS downgrade policy,
// and a `Transport` seam so the worker can be driven against a fake site in tests.

use std::error::Error as StdError;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::config::options::PortalOptions;
use crate::error::{Result, ScrapeError};
use crate::progress::{NullProgress, Progress};
use crate::specs::login::FormFields;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    PostForm(Vec<(String, String)>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
}

impl Request {
    pub fn get(url: &str) -> Self {
        Self { method: Method::Get, url: s!(url) }
    }

    pub fn post_form(url: &str, form: &FormFields) -> Self {
        Self { method: Method::PostForm(form.pairs().to_vec()), url: s!(url) }
    }
}

#[derive(Clone, Debug)]
pub struct Response {
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    /// `charset` parameter of the Content-Type header, if any
    pub charset: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self { status, url: url.into(), charset: None, body: body.into() }
    }

    pub fn with_charset(mut self, charset: &str) -> Self {
        self.charset = Some(s!(charset));
        self
    }

    /// Decode with the declared charset. Undeclared bodies are UTF-8 when they
    /// validate, else windows-1252 (the portal serves Latin-1 pages).
    pub fn text(&self) -> String {
        let declared = self.charset.as_deref().and_then(|l| Encoding::for_label(l.as_bytes()));
        let encoding = declared.unwrap_or_else(|| match std::str::from_utf8(&self.body) {
            Ok(_) => UTF_8,
            Err(_) => WINDOWS_1252,
        });
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw failure from a transport, before the session attaches a URL.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Tls(String),
    #[error("{0}")]
    Other(String),
}

/// One HTTP round trip. Redirects are followed by the implementation.
pub trait Transport {
    fn execute(&mut self, req: &Request) -> std::result::Result<Response, TransportError>;

    /// Called at most once per run, with `false`, after a TLS failure.
    fn set_verify_tls(&mut self, verify: bool) -> Result<()>;
}

/// Named request origins. Decides whether the TLS downgrade applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallSite {
    LoginPage,
    Credentials,
    Roster,
    Detail,
    Photo,
    AuthCheck,
}

impl CallSite {
    pub fn tls_fallback(self) -> bool {
        matches!(
            self,
            CallSite::LoginPage | CallSite::Credentials | CallSite::Roster | CallSite::Detail
        )
    }

    fn label(self) -> &'static str {
        match self {
            CallSite::LoginPage => "loading the login page",
            CallSite::Credentials => "sending credentials",
            CallSite::Roster => "loading the roster",
            CallSite::Detail => "loading inmate details",
            CallSite::Photo => "downloading a photo",
            CallSite::AuthCheck => "re-checking the session",
        }
    }
}

/// Run-scoped HTTP session. Owns the transport and the single TLS-verify flag.
pub struct Session<T: Transport = HttpTransport> {
    transport: T,
    verify_tls: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, verify_tls: true }
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&mut self, url: &str, site: CallSite, progress: &mut dyn Progress) -> Result<Response> {
        self.send(Request::get(url), site, progress)
    }

    pub fn post_form(
        &mut self,
        url: &str,
        form: &FormFields,
        site: CallSite,
        progress: &mut dyn Progress,
    ) -> Result<Response> {
        self.send(Request::post_form(url, form), site, progress)
    }

    /// Execute with the one-shot TLS downgrade, then enforce 2xx.
    fn send(&mut self, req: Request, site: CallSite, progress: &mut dyn Progress) -> Result<Response> {
        logd!("HTTP {:?} {} ({:?})", method_name(&req.method), req.url, site);
        let resp = match self.transport.execute(&req) {
            Ok(resp) => resp,
            Err(TransportError::Tls(detail)) if site.tls_fallback() => {
                let msg = format!(
                    "Warning: certificate problem while {}. Retrying without verification (insecure).",
                    site.label()
                );
                logw!("{msg} ({detail})");
                progress.warn(&msg);
                self.disable_verification()?;
                self.transport.execute(&req).map_err(|e| attach_url(&req.url, e))?
            }
            Err(e) => return Err(attach_url(&req.url, e)),
        };

        if !resp.is_success() {
            return Err(ScrapeError::Status { status: resp.status, url: resp.url });
        }
        Ok(resp)
    }

    fn disable_verification(&mut self) -> Result<()> {
        if self.verify_tls {
            self.transport.set_verify_tls(false)?;
            self.verify_tls = false;
        }
        Ok(())
    }

    /// Best-effort photo download: any failure is just "no photo".
    pub fn fetch_bytes(&mut self, url: &str) -> Option<Vec<u8>> {
        match self.get(url, CallSite::Photo, &mut NullProgress) {
            Ok(resp) => Some(resp.body),
            Err(e) => {
                logd!("Photo {url}: {e}");
                None
            }
        }
    }
}

fn method_name(m: &Method) -> &'static str {
    match m {
        Method::Get => "GET",
        Method::PostForm(_) => "POST",
    }
}

fn attach_url(url: &str, e: TransportError) -> ScrapeError {
    match e {
        TransportError::Tls(detail) => ScrapeError::Tls { url: s!(url), detail },
        TransportError::Other(detail) => ScrapeError::Transport { url: s!(url), detail },
    }
}

/* ---------------- reqwest transport ---------------- */

/// Production transport: blocking reqwest client over a shared cookie jar.
/// Flipping TLS verification rebuilds the client around the same jar.
pub struct HttpTransport {
    jar: Arc<Jar>,
    client: Client,
    headers: HeaderMap,
    timeout: std::time::Duration,
}

impl HttpTransport {
    pub fn new(opts: &PortalOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&opts.user_agent)?);
        headers.insert(REFERER, header_value(&opts.login_url)?);

        let jar = Arc::new(Jar::default());
        let client = build_client(&jar, &headers, opts.timeout, true)?;
        Ok(Self { jar, client, headers, timeout: opts.timeout })
    }
}

fn header_value(v: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(v).map_err(|e| ScrapeError::ClientBuild(format!("header {v:?}: {e}")))
}

fn build_client(
    jar: &Arc<Jar>,
    headers: &HeaderMap,
    timeout: std::time::Duration,
    verify: bool,
) -> Result<Client> {
    Client::builder()
        .cookie_provider(Arc::clone(jar))
        .default_headers(headers.clone())
        .timeout(timeout)
        .danger_accept_invalid_certs(!verify)
        .build()
        .map_err(|e| ScrapeError::ClientBuild(e.to_string()))
}

impl Transport for HttpTransport {
    fn execute(&mut self, req: &Request) -> std::result::Result<Response, TransportError> {
        let builder = match &req.method {
            Method::Get => self.client.get(&req.url),
            Method::PostForm(pairs) => self.client.post(&req.url).form(pairs),
        };
        let resp = builder.send().map_err(classify)?;
        let status = resp.status().as_u16();
        let url = resp.url().to_string();
        let charset = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_param);
        let body = resp.bytes().map_err(classify)?.to_vec();
        Ok(Response { status, url, charset, body })
    }

    fn set_verify_tls(&mut self, verify: bool) -> Result<()> {
        self.client = build_client(&self.jar, &self.headers, self.timeout, verify)?;
        Ok(())
    }
}

/// `text/html; charset="ISO-8859-1"` → `ISO-8859-1`.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| s!(value.trim().trim_matches('"')))
    })
}

fn classify(e: reqwest::Error) -> TransportError {
    let detail = error_chain(&e);
    if looks_like_tls_failure(&detail) {
        TransportError::Tls(detail)
    } else {
        TransportError::Other(detail)
    }
}

/// Flattened `Display` of an error and all its sources.
pub fn error_chain(e: &dyn StdError) -> String {
    let mut out = e.to_string();
    let mut cur = e.source();
    while let Some(c) = cur {
        out.push_str(": ");
        out.push_str(&c.to_string());
        cur = c.source();
    }
    out
}

/// reqwest does not expose a TLS error kind; rustls/webpki messages are recognisable though.
pub fn looks_like_tls_failure(chain: &str) -> bool {
    let lc = chain.to_ascii_lowercase();
    ["certificate", "tls", "ssl", "handshake", "unknownissuer", "invalid peer"]
        .iter()
        .any(|needle| lc.contains(needle))
}

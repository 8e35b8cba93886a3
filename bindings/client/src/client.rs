use std::io::Read;
use std::time::Instant;

use anyhow::Context;
use ureq::http::Response as HttpResponse;
use ureq::{Agent, Body};

use crate::request::{Method, Page, Request, Response, TimeoutClass};
use crate::session::Session;
use crate::target::Target;

/// Redirects are followed by hand so that cookies set along the way end up in the session.
const MAX_REDIRECTS: usize = 10;

/// Blocking HTTP client for the target shop.
///
/// One agent per timeout class. Agents pool connections, so a single client is shared by every
/// worker while each worker keeps its own [Session].
#[derive(Clone)]
pub struct TargetClient {
    base_url: String,
    normal: Agent,
    reset: Agent,
}

impl std::fmt::Debug for TargetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TargetClient {
    /// Create a client for a target such as `http://127.0.0.1`.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("Invalid target URL: {base_url}"))?;
        if parsed.cannot_be_a_base() {
            anyhow::bail!("Target URL cannot be used as a base: {base_url}");
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            normal: Self::agent(TimeoutClass::Normal),
            reset: Self::agent(TimeoutClass::Reset),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn agent(timeout: TimeoutClass) -> Agent {
        ureq::config::Config::builder()
            .timeout_global(Some(timeout.duration()))
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .new_agent()
    }

    fn url_for(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else if location.starts_with('/') {
            format!("{}{}", self.base_url, location)
        } else {
            format!("{}/{}", self.base_url, location)
        }
    }

    fn send(
        agent: &Agent,
        method: Method,
        url: &str,
        form: &[(String, String)],
        session: &Session,
    ) -> Result<HttpResponse<Body>, ureq::Error> {
        let cookie_header = session.cookie_header();
        match method {
            Method::Get => {
                let mut builder = agent.get(url);
                if let Some(cookies) = &cookie_header {
                    builder = builder.header("Cookie", cookies);
                }
                builder.call()
            }
            Method::Post => {
                let mut builder = agent.post(url);
                if let Some(cookies) = &cookie_header {
                    builder = builder.header("Cookie", cookies);
                }
                builder.send_form(form.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            }
        }
    }

    /// Send the request and follow any redirects, returning the final response and the session
    /// with every cookie set along the way.
    fn exchange(
        &self,
        request: &Request,
        session: &Session,
        timeout: TimeoutClass,
    ) -> anyhow::Result<(HttpResponse<Body>, Session)> {
        let agent = match timeout {
            TimeoutClass::Normal => &self.normal,
            TimeoutClass::Reset => &self.reset,
        };

        let mut session = session.clone();
        let mut method = request.method();
        let mut url = self.url_for(request.path());
        let mut form = request.form();

        for _ in 0..=MAX_REDIRECTS {
            let mut response = Self::send(agent, method, &url, form, &session)
                .with_context(|| format!("Request failed: {method:?} {url}"))?;

            session = session.with_set_cookies(
                response
                    .headers()
                    .get_all("set-cookie")
                    .iter()
                    .filter_map(|v| v.to_str().ok()),
            );

            let location = response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok())
                .map(|l| l.to_string());
            match location {
                Some(location) if response.status().is_redirection() => {
                    drain(response.body_mut())?;
                    url = self.url_for(&location);
                    method = Method::Get;
                    form = &[];
                }
                _ => return Ok((response, session)),
            }
        }

        anyhow::bail!("Too many redirects for {}", request.path())
    }
}

fn drain(body: &mut Body) -> anyhow::Result<()> {
    let mut buf = [0u8; 8192];
    let mut reader = body.as_reader();
    while reader.read(&mut buf).context("Failed to read response body")? > 0 {}
    Ok(())
}

impl Target for TargetClient {
    fn try_call(
        &self,
        request: &Request,
        session: &Session,
        timeout: TimeoutClass,
    ) -> anyhow::Result<Response> {
        let started = Instant::now();
        let (mut response, session) = self.exchange(request, session, timeout)?;
        drain(response.body_mut())?;

        let status = response.status().as_u16();
        log::trace!(
            "{:?} {} -> {} in {}ms",
            request.method(),
            request.path(),
            status,
            started.elapsed().as_millis()
        );

        Ok(Response { status, session })
    }

    fn fetch_page(&self, path: &str, session: &Session) -> anyhow::Result<Page> {
        let (mut response, _) = self.exchange(&Request::get(path), session, TimeoutClass::Normal)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("Failed to read page body for {path}"))?;

        Ok(Page { status, body })
    }
}

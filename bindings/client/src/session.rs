use cookie::time::OffsetDateTime;
use cookie::Cookie;

/// The cookies a simulated user carries between calls.
///
/// A session is never shared between workers and is never updated in place: every call hands back
/// a new session built from the one that was sent and the cookies the target set in response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookies: Vec<(String, String)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The value for a `Cookie` request header, or `None` if there is nothing to send.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Apply `Set-Cookie` header values to a copy of this session.
    ///
    /// A cookie with the same name is replaced where it stands, new cookies are appended and
    /// cookies the target expires are dropped. Header values that do not parse are skipped.
    pub fn with_set_cookies<'a>(&self, set_cookies: impl IntoIterator<Item = &'a str>) -> Session {
        let mut next = self.clone();
        for header in set_cookies {
            let cookie = match Cookie::parse(header) {
                Ok(cookie) => cookie,
                Err(e) => {
                    log::trace!("Ignoring malformed Set-Cookie header {header:?}: {e}");
                    continue;
                }
            };

            let position = next.cookies.iter().position(|(n, _)| n == cookie.name());
            if is_expired(&cookie) {
                if let Some(position) = position {
                    next.cookies.remove(position);
                }
                continue;
            }

            let entry = (cookie.name().to_string(), cookie.value().to_string());
            match position {
                Some(position) => next.cookies[position] = entry,
                None => next.cookies.push(entry),
            }
        }

        next
    }
}

fn is_expired(cookie: &Cookie<'_>) -> bool {
    if let Some(max_age) = cookie.max_age() {
        return max_age.is_zero() || max_age.is_negative();
    }

    cookie
        .expires_datetime()
        .map(|expires| expires <= OffsetDateTime::now_utc())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_session_sends_no_cookie_header() {
        assert_eq!(None, Session::new().cookie_header());
    }

    #[test]
    fn set_cookie_adds_and_replaces() {
        let session = Session::new().with_set_cookies([
            "connect.sid=abc; Path=/; HttpOnly",
            "theme=dark",
        ]);
        assert_eq!(Some("connect.sid=abc; theme=dark".to_string()), session.cookie_header());

        let next = session.with_set_cookies(["connect.sid=def; Path=/"]);
        assert_eq!(Some("def"), next.get("connect.sid"));
        assert_eq!(2, next.len());

        // The previous session is untouched.
        assert_eq!(Some("abc"), session.get("connect.sid"));
    }

    #[test]
    fn expired_cookies_are_removed() {
        let session = Session::new().with_set_cookies(["connect.sid=abc", "theme=dark"]);

        let next = session.with_set_cookies([
            "connect.sid=; Max-Age=0",
            "theme=dark; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        ]);
        assert!(next.is_empty());
    }

    #[test]
    fn malformed_headers_are_skipped() {
        let session = Session::new().with_set_cookies(["=novalue", "ok=1"]);
        assert_eq!(Some("ok=1".to_string()), session.cookie_header());
    }
}

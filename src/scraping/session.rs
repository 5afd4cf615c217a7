use cookie::SameSite;
use fantoccini::cookies::Cookie;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::AppError;

/// One cookie record as found in a browser-extension export: loosely typed,
/// with most fields optional and `sameSite` using whatever vocabulary the
/// exporting extension preferred.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCookie {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Unix timestamp, usually fractional. Chrome extensions export this as
    /// `expirationDate`; Playwright-style dumps call it `expires`.
    #[serde(default, alias = "expirationDate")]
    pub expires: Option<serde_json::Value>,
    #[serde(default)]
    pub http_only: Option<bool>,
    #[serde(default)]
    pub secure: Option<bool>,
    /// Kept as a raw JSON value; exports have been seen carrying strings,
    /// null, and the occasional boolean here.
    #[serde(default)]
    pub same_site: Option<serde_json::Value>,
}

/// The closed set of same-site classes the rendering engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    None,
    Lax,
    Strict,
}

impl SameSitePolicy {
    /// Maps the foreign vocabulary onto the closed set. Only `lax` and
    /// `strict` are recognized; everything else (`none`, `no_restriction`,
    /// `unspecified`, `null`, absent, non-string) becomes `None`, the most
    /// permissive class, so replayed sessions keep working.
    fn from_raw(raw: Option<&serde_json::Value>) -> Self {
        match raw.and_then(|v| v.as_str()) {
            Some(s) if s.eq_ignore_ascii_case("lax") => Self::Lax,
            Some(s) if s.eq_ignore_ascii_case("strict") => Self::Strict,
            _ => Self::None,
        }
    }
}

/// A cookie in the canonical form the session bootstrapper injects.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Unix timestamp in seconds; `0` means session cookie.
    pub expires: i64,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSitePolicy,
}

impl SessionCookie {
    /// Converts to the cookie type the WebDriver client injects. A `0`
    /// expiry is expressed by not setting an expiry at all (session cookie).
    pub fn to_webdriver_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), self.value.clone());
        cookie.set_domain(self.domain.clone());
        cookie.set_path(self.path.clone());
        cookie.set_secure(self.secure);
        cookie.set_http_only(self.http_only);
        cookie.set_same_site(match self.same_site {
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
        });
        if self.expires > 0 {
            if let Ok(at) = OffsetDateTime::from_unix_timestamp(self.expires) {
                cookie.set_expires(at);
            }
        }
        cookie
    }
}

/// Normalizes a whole export. Pure; the only failure is a record missing one
/// of the required fields (`name`, `value`, `domain`), reported with the
/// record index and field name before any browser work starts.
pub fn normalize_cookies(raw: &[RawCookie]) -> Result<Vec<SessionCookie>, AppError> {
    raw.iter()
        .enumerate()
        .map(|(index, cookie)| normalize_cookie(index, cookie))
        .collect()
}

fn normalize_cookie(index: usize, raw: &RawCookie) -> Result<SessionCookie, AppError> {
    let name = required_field(index, "name", &raw.name)?;
    let value = required_field(index, "value", &raw.value)?;
    let domain = required_field(index, "domain", &raw.domain)?;

    // Non-numeric or absent expiry means a session cookie, encoded as 0.
    let expires = match &raw.expires {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0) as i64,
        _ => 0,
    };

    Ok(SessionCookie {
        name,
        value,
        domain,
        path: raw.path.clone().unwrap_or_else(|| "/".to_string()),
        expires,
        http_only: raw.http_only.unwrap_or(false),
        secure: raw.secure.unwrap_or(false),
        same_site: SameSitePolicy::from_raw(raw.same_site.as_ref()),
    })
}

fn required_field(
    index: usize,
    field: &'static str,
    value: &Option<String>,
) -> Result<String, AppError> {
    value
        .clone()
        .ok_or(AppError::CredentialError { index, field })
}

/// Parses a cookie export file body: either a bare JSON array of records or
/// the `{"cookies": [...]}` wrapper browser extensions produce.
pub fn parse_cookie_export(json: &str) -> Result<Vec<RawCookie>, AppError> {
    #[derive(Deserialize)]
    struct Export {
        #[serde(default)]
        cookies: Vec<RawCookie>,
    }

    match serde_json::from_str::<Vec<RawCookie>>(json) {
        Ok(cookies) => Ok(cookies),
        Err(_) => {
            let export: Export = serde_json::from_str(json)?;
            Ok(export.cookies)
        }
    }
}

//! HTTP handlers.

use crate::i18n::Language;
use crate::locale::EffectiveLocale;
use crate::preference::PreferenceStore;
use crate::server::AppState;
use crate::session::{Session, PREVIOUS_URL_KEY};
use crate::view::SharedProps;
use axum::{
    async_trait,
    extract::{FromRequest, Query, Request, State},
    http::{
        header::{CONTENT_TYPE, HOST, REFERER},
        HeaderMap,
    },
    response::{IntoResponse, Redirect},
    Extension, Form, Json,
};
use serde::Deserialize;
use std::convert::Infallible;
use tracing::{debug, info};
use url::Url;

/// Body of a language change request.
#[derive(Debug, Default, Deserialize)]
pub struct LanguageForm {
    #[serde(default)]
    pub language: Option<String>,
}

/// Language change input, accepted as a URL-encoded form or as JSON.
///
/// A `language` in the body wins; otherwise the query string is consulted.
/// Never rejects: an unreadable body is treated as if no language was sent.
#[derive(Debug, Default)]
pub struct LanguageInput(pub LanguageForm);

#[async_trait]
impl<S> FromRequest<S> for LanguageInput
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = Query::<LanguageForm>::try_from_uri(req.uri())
            .map(|Query(form)| form.language)
            .unwrap_or_else(|e| {
                debug!("Unreadable language query: {}", e);
                None
            });

        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);

        let form = if is_json {
            Json::<LanguageForm>::from_request(req, state)
                .await
                .map(|Json(form)| form)
                .map_err(|e| debug!("Unreadable JSON language body: {}", e))
        } else {
            Form::<LanguageForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(|e| debug!("Unreadable form language body: {}", e))
        };

        let mut form = form.unwrap_or_default();
        if form.language.is_none() {
            form.language = from_query;
        }

        Ok(LanguageInput(form))
    }
}

/// Pick the language to store for a submitted token.
///
/// Anything that is not an exact supported code becomes `default`.
pub fn chosen_language(token: Option<&str>, default: Language) -> Language {
    token.and_then(Language::from_code).unwrap_or(default)
}

/// Where "back" points for this request.
///
/// Same-origin `Referer` first, then the last page recorded in the session,
/// then the site root.
pub fn previous_url(headers: &HeaderMap, session: &Session) -> String {
    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|referer| is_same_origin(referer, headers))
        .map(str::to_string)
        .or_else(|| session.get(PREVIOUS_URL_KEY))
        .unwrap_or_else(|| "/".to_string())
}

/// Whether `referer` points at this host.
///
/// The referer is resolved against the request's `Host`, so relative paths
/// are accepted while protocol-relative and backslash forms (which browsers
/// read as another host) are not. With no `Host` header only relative
/// referers pass.
fn is_same_origin(referer: &str, headers: &HeaderMap) -> bool {
    let absolute = Url::parse(referer).is_ok();
    let base = match headers.get(HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => Url::parse(&format!("http://{}/", host)).ok(),
        None if !absolute => Url::parse("http://localhost/").ok(),
        None => None,
    };
    let Some(base) = base else {
        return false;
    };

    match base.join(referer) {
        Ok(target) => {
            matches!(target.scheme(), "http" | "https")
                && target.host() == base.host()
                && target.port() == base.port()
        }
        Err(e) => {
            debug!("Ignoring unparseable referer: {}", e);
            false
        }
    }
}

/// `POST /language`: store the chosen language and send the visitor back.
pub async fn store_language(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    LanguageInput(form): LanguageInput,
) -> Redirect {
    let language = chosen_language(form.language.as_deref(), state.config.default_locale);
    if form.language.as_deref() != Some(language.code()) {
        debug!(
            "Unsupported language {:?}, storing default '{}'",
            form.language, language
        );
    }

    PreferenceStore::new(&session).set(language);
    info!("Language preference set to '{}'", language);

    Redirect::to(&previous_url(&headers, &session))
}

/// `GET /`: the shared locale payload for the current request.
pub async fn shared_props(
    State(state): State<AppState>,
    Extension(locale): Extension<EffectiveLocale>,
) -> Json<SharedProps> {
    Json(SharedProps::assemble(locale, state.catalog.clone()))
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

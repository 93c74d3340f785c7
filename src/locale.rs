//! Per-request locale resolution.

use crate::i18n::Language;
use crate::preference::PreferenceStore;
use crate::server::AppState;
use crate::session::Session;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::fmt;
use tracing::debug;

/// The language in effect for the current request.
///
/// Computed fresh for every request and never written back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveLocale(pub Language);

impl EffectiveLocale {
    pub fn language(&self) -> Language {
        self.0
    }

    pub fn code(&self) -> &'static str {
        self.0.code()
    }
}

impl fmt::Display for EffectiveLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Resolve the effective locale from a stored preference.
///
/// Resolution order:
/// 1. The stored code, if it names a supported language
/// 2. The configured default
///
/// # Example
/// ```
/// use locale_switch::i18n::Language;
/// use locale_switch::locale::resolve_effective_locale;
///
/// assert_eq!(resolve_effective_locale(Some("es"), Language::En).language(), Language::Es);
/// assert_eq!(resolve_effective_locale(Some("xx"), Language::En).language(), Language::En);
/// assert_eq!(resolve_effective_locale(None, Language::Pt).language(), Language::Pt);
/// ```
pub fn resolve_effective_locale(stored: Option<&str>, default: Language) -> EffectiveLocale {
    let language = match stored {
        Some(code) => Language::from_code(code).unwrap_or_else(|| {
            debug!("Ignoring unsupported stored language '{}'", code);
            default
        }),
        None => default,
    };
    EffectiveLocale(language)
}

/// Middleware: establish the [`EffectiveLocale`] for the request.
///
/// Must run inside the session middleware. A request that somehow reaches
/// this point without a session gets the configured default.
pub async fn set_language(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let stored = request
        .extensions()
        .get::<Session>()
        .and_then(|session| PreferenceStore::new(session).get());

    let locale = resolve_effective_locale(stored.as_deref(), state.config.default_locale);
    request.extensions_mut().insert(locale);

    next.run(request).await
}

//! Interface locale: persisted choice plus a small message catalog.
//!
//! DESIGN
//! ======
//! Russian is both the default and the fallback language; English strings
//! are looked up first when selected and fall back to Russian, then to the
//! key itself, so a missing translation never renders empty.

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use super::storage::KeyValueStorage;

/// Storage key holding the selected locale code.
pub const LOCALE_KEY: &str = "cms-admin-locale";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Ru => Self::En,
            Self::En => Self::Ru,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}' (expected 'ru' or 'en')")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            other => Err(UnknownLocale(other.to_owned())),
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

const RU: &[(&str, &str)] = &[
    ("auth.login", "Войти"),
    ("auth.logout", "Выйти"),
    ("auth.register", "Регистрация"),
    ("auth.loggedInAs", "Вы вошли как"),
    ("auth.notLoggedIn", "Вход не выполнен"),
    ("auth.superAdmin", "Суперадминистратор"),
    ("nav.dashboard", "Панель управления"),
    ("nav.contentTypes", "Типы контента"),
    ("nav.entries", "Записи"),
    ("nav.users", "Пользователи"),
    ("nav.roles", "Роли"),
    ("nav.permissions", "Права доступа"),
    ("nav.redirected", "Перенаправлено на"),
    ("nav.notFound", "Страница не найдена"),
    ("errors.loginFailed", "Ошибка входа"),
    ("errors.registrationFailed", "Ошибка регистрации"),
    ("errors.sessionEnded", "Сессия завершена"),
    ("locale.current", "Текущий язык"),
];

const EN: &[(&str, &str)] = &[
    ("auth.login", "Log in"),
    ("auth.logout", "Log out"),
    ("auth.register", "Register"),
    ("auth.loggedInAs", "Logged in as"),
    ("auth.notLoggedIn", "Not logged in"),
    ("auth.superAdmin", "Super admin"),
    ("nav.dashboard", "Dashboard"),
    ("nav.contentTypes", "Content types"),
    ("nav.entries", "Entries"),
    ("nav.users", "Users"),
    ("nav.roles", "Roles"),
    ("nav.permissions", "Permissions"),
    ("nav.redirected", "Redirected to"),
    ("nav.notFound", "Page not found"),
    ("errors.loginFailed", "Login failed"),
    ("errors.registrationFailed", "Registration failed"),
    ("errors.sessionEnded", "Session ended"),
    ("locale.current", "Current language"),
];

fn catalog(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::Ru => RU,
        Locale::En => EN,
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    catalog(locale).iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translate `key`, falling back to Russian and then to the key itself.
#[must_use]
pub fn translate<'a>(locale: Locale, key: &'a str) -> &'a str {
    lookup(locale, key)
        .or_else(|| lookup(Locale::default(), key))
        .unwrap_or(key)
}

// =============================================================================
// STORE
// =============================================================================

/// Selected locale, persisted across runs.
pub struct LocaleStore {
    storage: Arc<dyn KeyValueStorage>,
    locale: RwLock<Locale>,
}

impl LocaleStore {
    /// Read the saved locale; missing or unknown values yield the default.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let locale = storage
            .get(LOCALE_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self { storage, locale: RwLock::new(locale) }
    }

    #[must_use]
    pub fn current(&self) -> Locale {
        *self.locale.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_locale(&self, locale: Locale) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale;
        if let Err(e) = self.storage.set(LOCALE_KEY, locale.code()) {
            tracing::warn!(%locale, error = %e, "failed to persist locale");
        }
        tracing::debug!(%locale, "locale changed");
    }

    /// Flip ru <-> en and return the new locale.
    pub fn toggle(&self) -> Locale {
        let next = self.current().toggled();
        self.set_locale(next);
        next
    }

    #[must_use]
    pub fn is_russian(&self) -> bool {
        self.current() == Locale::Ru
    }

    #[must_use]
    pub fn is_english(&self) -> bool {
        self.current() == Locale::En
    }

    #[must_use]
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(self.current(), key)
    }
}

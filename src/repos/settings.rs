// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{decode_all, to_record};
use crate::db::Store;
use crate::error::StoreError;
use crate::migration::{SETTING_LANGUAGE, SETTING_THEME};
use crate::models::{Language, Setting, Theme};
use crate::schema::Collection;
use crate::utils::require_text;

const COLLECTION: Collection = Collection::Settings;

/// Single-value preferences keyed by name. Writing a key replaces it.
pub struct SettingsRepository {
    store: Store,
    cache: BTreeMap<String, Value>,
}

impl SettingsRepository {
    pub async fn load(store: Store) -> Result<Self, StoreError> {
        let rows: Vec<Setting> = decode_all(COLLECTION, store.get_all(COLLECTION).await?)?;
        let cache = rows.into_iter().map(|s| (s.key, s.value)).collect();
        Ok(Self { store, cache })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cache.get(key)
    }

    pub fn all(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.cache.iter()
    }

    pub async fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let setting = Setting {
            key: require_text("key", key)?,
            value,
        };
        self.store.update(COLLECTION, to_record(COLLECTION, &setting)?).await?;
        self.cache.insert(setting.key, setting.value);
        Ok(())
    }

    pub async fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.store.delete(COLLECTION, key).await?;
        self.cache.remove(key);
        Ok(())
    }

    /// Drops the language and theme entries so both read as their defaults.
    pub async fn reset(&mut self) -> Result<(), StoreError> {
        for key in [SETTING_LANGUAGE, SETTING_THEME] {
            self.remove(key).await?;
        }
        Ok(())
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.cache.get(key).and_then(Value::as_str)
    }

    pub fn language(&self) -> Language {
        self.text(SETTING_LANGUAGE)
            .and_then(Language::from_code)
            .unwrap_or(Language::En)
    }

    pub async fn set_language(&mut self, language: Language) -> Result<(), StoreError> {
        self.set(SETTING_LANGUAGE, Value::String(language.code().to_string()))
            .await
    }

    pub async fn toggle_language(&mut self) -> Result<Language, StoreError> {
        let next = self.language().toggled();
        self.set_language(next).await?;
        Ok(next)
    }

    pub fn theme(&self) -> Theme {
        self.text(SETTING_THEME)
            .and_then(Theme::from_name)
            .unwrap_or(Theme::Light)
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.set(SETTING_THEME, Value::String(theme.name().to_string()))
            .await
    }

    pub async fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        let next = self.theme().toggled();
        self.set_theme(next).await?;
        Ok(next)
    }
}

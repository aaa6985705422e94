// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

pub const DEFAULT_LANG: &str = "es";

// Catálogos embutidos no binário
const CATALOGS: &[(&str, &str)] = &[
    ("es", include_str!("../../locales/es.json")),
    ("en", include_str!("../../locales/en.json")),
];

/// Mensagens traduzidas, carregadas uma vez na inicialização.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load_embedded() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("Catálogo de traduções inválido: {}", lang))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    /// Traduz `key` para `lang`; cai para o espanhol e, em último caso, devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        [lang, DEFAULT_LANG]
            .iter()
            .filter_map(|l| self.catalogs.get(*l))
            .find_map(|catalog| catalog.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

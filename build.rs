// build.rs
//
// Generates the `t!` message macro from `locales/<lang>.toml`.
// Locale files group messages in TOML tables; nested keys are flattened
// with dots, so `[projects.info] scanning = "..."` becomes `t!("projects.info.scanning")`.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_LANG: &str = "en";

fn main() {
    let lang = resolve_language();
    println!("cargo:rustc-env=ONEC_KIT_LANG_EFFECTIVE={}", lang);

    println!("cargo:rerun-if-env-changed=ONEC_KIT_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=locales/");

    // English is always loaded first so every key has a value.
    let mut messages = load_catalogue(FALLBACK_LANG)
        .unwrap_or_else(|| panic!("Missing fallback catalogue: locales/{}.toml", FALLBACK_LANG));

    if lang != FALLBACK_LANG {
        match load_catalogue(&lang) {
            Some(specific) => messages.extend(specific),
            None => println!(
                "cargo:warning=Language file 'locales/{}.toml' not found. Falling back to '{}'.",
                lang, FALLBACK_LANG
            ),
        }
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("translations.rs");
    fs::write(&dest_path, render_macro(&messages)).expect("Failed to write translations.rs");
}

/// `lang_*` cargo features win over the `ONEC_KIT_LANG` variable.
fn resolve_language() -> String {
    let mut from_features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    from_features.sort();

    match from_features.first() {
        Some(first) => {
            if from_features.len() > 1 {
                println!(
                    "cargo:warning=Multiple language features enabled ({:?}). Using '{}'.",
                    from_features, first
                );
            }
            first.clone()
        }
        None => env::var("ONEC_KIT_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string()),
    }
}

fn load_catalogue(lang: &str) -> Option<BTreeMap<String, String>> {
    let path = format!("locales/{}.toml", lang);
    let content = fs::read_to_string(&path).ok()?;
    let table: toml::Table =
        toml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e));

    let mut messages = BTreeMap::new();
    flatten("", &table, &mut messages);
    Some(messages)
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            other => panic!("Message '{}' must be a string, found {}", full_key, other.type_str()),
        }
    }
}

fn render_macro(messages: &BTreeMap<String, String>) -> String {
    let mut code = String::from(
        "/// Expands to the localized message for a key, checked at compile time.\n#[macro_export]\nmacro_rules! t {\n",
    );
    for (key, value) in messages {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, escaped));
    }
    code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    code.push('}');
    code
}

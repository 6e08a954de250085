use std::error::Error;
use std::{ fs, path::Path };
use serde_json::{ Value, Map };
use anyhow::{ Context, Result };

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    let messages_dir = Path::new(&manifest_dir).join("messages");
    let out_path = Path::new(&std::env::var("OUT_DIR")?).join("all_translations.json");

    println!("cargo:rerun-if-changed=messages");

    // include_str! needs the file even without bundles
    if !messages_dir.exists() {
        println!("cargo:warning=No messages/ folder found, bundling no translations");
        fs::write(out_path, "{}")?;
        return Ok(());
    }

    let translations = build_translations(&messages_dir)?;
    fs::write(out_path, serde_json::to_string_pretty(&translations)?)?;
    Ok(())
}

fn build_translations(messages_dir: &Path) -> Result<Value> {
    let mut translations = Map::new();

    for locale_entry in fs::read_dir(messages_dir)? {
        let locale_dir = locale_entry?;
        if !locale_dir.file_type()?.is_dir() {
            continue;
        }

        let locale_tag = locale_dir.file_name().to_string_lossy().to_string();
        let mut bundle_files = Map::new();

        for file_entry in fs::read_dir(locale_dir.path())? {
            let file_path = file_entry?.path();

            if let Some("json") = file_path.extension().and_then(|e| e.to_str()) {
                let file_stem = file_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string();

                let content = fs::read_to_string(&file_path)?;
                let json: Value = serde_json
                    ::from_str(&content)
                    .with_context(|| format!("invalid bundle {}", file_path.display()))?;
                bundle_files.insert(file_stem, json);
            }
        }
        translations.insert(locale_tag, Value::Object(bundle_files));
    }

    Ok(Value::Object(translations))
}

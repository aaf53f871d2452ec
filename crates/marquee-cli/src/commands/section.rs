//! Section commands: list the registry, get, and set content

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use marquee_core::sections::{
    self, Contact, Faqs, Hero, SectionInfo, SectionKind, Services, Team, REGISTRY,
};
use marquee_core::{
    CollectionBinding, ContentStore, ContentWriter, Direction, DocumentBinding, Query,
    SINGLETON_ID,
};

use crate::output::Output;

pub fn list(output: &Output) -> Result<()> {
    output.section_table(REGISTRY);
    Ok(())
}

pub async fn get(store: Arc<dyn ContentStore>, section: &str, output: &Output) -> Result<()> {
    let info = lookup(section)?;
    match info.kind {
        SectionKind::Singleton => {
            let mut binding: DocumentBinding<Value> =
                DocumentBinding::bind(store, info.collection, SINGLETON_ID);
            let snapshot = binding.wait_settled().await;
            if let Some(error) = snapshot.error {
                bail!("failed to load '{}': {}", section, error);
            }
            match snapshot.value {
                Some(value) => output.value(&value),
                None => output.success("(not set)"),
            }
        }
        SectionKind::Collection => {
            let query = Query::new().order_by("order", Direction::Ascending);
            let mut binding: CollectionBinding<Value> =
                CollectionBinding::bind(store, info.collection, query);
            let snapshot = binding.wait_settled().await;
            if let Some(error) = snapshot.error {
                bail!("failed to load '{}': {}", section, error);
            }
            output.value(&Value::Array(snapshot.value));
        }
    }
    Ok(())
}

pub async fn set(
    writer: &ContentWriter,
    section: &str,
    file: Option<PathBuf>,
    payload: Option<String>,
    output: &Output,
) -> Result<()> {
    let info = lookup(section)?;
    if info.kind != SectionKind::Singleton {
        bail!(
            "'{}' is a collection section; use `marquee {} create` instead",
            section,
            singular(section)
        );
    }

    let raw = match (file, payload) {
        (Some(path), _) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read payload file {:?}", path))?,
        (None, Some(inline)) => inline,
        (None, None) => bail!("provide the payload via --file or --payload"),
    };
    let value: Value =
        serde_json::from_str(&raw).context("payload is not valid JSON")?;

    // Validate against the section's typed shape before touching the store
    validate(info, &value)?;

    let fields = match value {
        Value::Object(mut fields) => {
            fields.remove("id");
            fields
        }
        _ => bail!("payload must be a JSON object"),
    };
    writer.set(info.collection, SINGLETON_ID, fields, false).await?;
    output.success(&format!("Saved section '{}'", section));
    Ok(())
}

fn lookup(section: &str) -> Result<&'static SectionInfo> {
    sections::section_info(section).with_context(|| {
        format!(
            "unknown section '{}'; run `marquee sections` for the list",
            section
        )
    })
}

fn validate(info: &SectionInfo, value: &Value) -> Result<()> {
    match info.name {
        "hero" => check::<Hero>(info.name, value),
        "services" => check::<Services>(info.name, value),
        "faqs" => check::<Faqs>(info.name, value),
        "team" => check::<Team>(info.name, value),
        "contact" => check::<Contact>(info.name, value),
        other => bail!("section '{}' cannot be set directly", other),
    }
}

fn check<T: DeserializeOwned>(name: &str, value: &Value) -> Result<()> {
    serde_json::from_value::<T>(value.clone())
        .with_context(|| format!("payload does not match the '{}' schema", name))?;
    Ok(())
}

fn singular(section: &str) -> &str {
    section.strip_suffix('s').unwrap_or(section)
}

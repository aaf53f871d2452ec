//! Visibility gate commands

use std::sync::Arc;

use anyhow::{bail, Result};

use marquee_core::sections::REGISTRY;
use marquee_core::visibility::{self, VisibilityGate};
use marquee_core::{ContentStore, ContentWriter};

use crate::output::Output;

pub async fn show(store: Arc<dyn ContentStore>, output: &Output) -> Result<()> {
    let mut gate = VisibilityGate::bind(store);
    let snapshot = gate.wait_settled().await;
    if let Some(error) = snapshot.error {
        bail!("failed to load visibility map: {}", error);
    }

    let map = snapshot.value;
    let rows: Vec<(&str, bool)> = REGISTRY
        .iter()
        .map(|info| (info.name, visibility::is_visible(map.as_ref(), info.name)))
        .collect();

    match output.format {
        crate::output::OutputFormat::Json => {
            let value: serde_json::Map<String, serde_json::Value> = rows
                .iter()
                .map(|(name, visible)| (name.to_string(), serde_json::Value::Bool(*visible)))
                .collect();
            output.value(&serde_json::Value::Object(value));
        }
        _ => {
            for (name, visible) in rows {
                println!("{:<14} {}", name, if visible { "on" } else { "off" });
            }
        }
    }
    Ok(())
}

pub async fn set(
    writer: &ContentWriter,
    section: &str,
    state: &str,
    output: &Output,
) -> Result<()> {
    if marquee_core::sections::section_info(section).is_none() {
        bail!(
            "unknown section '{}'; run `marquee sections` for the list",
            section
        );
    }

    let visible = match state {
        "on" | "show" | "true" => true,
        "off" | "hide" | "false" => false,
        other => bail!("invalid state '{}'; use 'on' or 'off'", other),
    };

    visibility::set_visible(writer, section, visible).await?;
    output.success(&format!(
        "Section '{}' is now {}",
        section,
        if visible { "visible" } else { "hidden" }
    ));
    Ok(())
}

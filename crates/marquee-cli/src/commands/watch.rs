//! Live-follow a section until Ctrl-C

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use marquee_core::sections::{self, SectionKind};
use marquee_core::{
    CollectionBinding, ContentStore, Direction, DocumentBinding, Query, SINGLETON_ID,
};

use crate::output::Output;

pub async fn run(store: Arc<dyn ContentStore>, section: &str, output: &Output) -> Result<()> {
    let info = sections::section_info(section).with_context(|| {
        format!(
            "unknown section '{}'; run `marquee sections` for the list",
            section
        )
    })?;

    output.success(&format!("Watching '{}' (Ctrl-C to stop)", section));
    match info.kind {
        SectionKind::Singleton => watch_document(store, info.collection, output).await,
        SectionKind::Collection => watch_collection(store, info.collection, output).await,
    }
}

async fn watch_document(
    store: Arc<dyn ContentStore>,
    collection: &str,
    output: &Output,
) -> Result<()> {
    let mut binding: DocumentBinding<Value> =
        DocumentBinding::bind(store, collection, SINGLETON_ID);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            snapshot = binding.changed() => {
                if let Some(error) = &snapshot.error {
                    eprintln!("error: {}", error);
                }
                match snapshot.value {
                    Some(value) => output.value(&value),
                    None => output.success("(not set)"),
                }
            }
        }
    }
}

async fn watch_collection(
    store: Arc<dyn ContentStore>,
    collection: &str,
    output: &Output,
) -> Result<()> {
    let query = Query::new().order_by("order", Direction::Ascending);
    let mut binding: CollectionBinding<Value> = CollectionBinding::bind(store, collection, query);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            snapshot = binding.changed() => {
                if let Some(error) = &snapshot.error {
                    eprintln!("error: {}", error);
                }
                output.value(&Value::Array(snapshot.value));
            }
        }
    }
}

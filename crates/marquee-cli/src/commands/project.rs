//! Project entry commands

use std::sync::Arc;

use anyhow::{bail, Result};

use marquee_core::sections::Project;
use marquee_core::{CollectionBinding, ContentStore, ContentWriter, Direction, Query, Section};

use crate::output::Output;

pub async fn create(
    writer: &ContentWriter,
    title: String,
    summary: String,
    image_url: String,
    link_url: String,
    order: i64,
    output: &Output,
) -> Result<()> {
    let project = Project {
        title,
        summary,
        image_url,
        link_url,
        order,
        ..Default::default()
    };
    let id = writer.create_entry(&project).await?;
    output.id(&id);
    Ok(())
}

pub async fn list(store: Arc<dyn ContentStore>, output: &Output) -> Result<()> {
    let query = Query::new().order_by("order", Direction::Ascending);
    let mut binding: CollectionBinding<Project> =
        CollectionBinding::bind(store, Project::COLLECTION, query);
    let snapshot = binding.wait_settled().await;
    if let Some(error) = snapshot.error {
        bail!("failed to load projects: {}", error);
    }
    output.project_list(&snapshot.value);
    Ok(())
}

pub async fn delete(writer: &ContentWriter, id: &str, output: &Output) -> Result<()> {
    writer.delete_entry::<Project>(id).await?;
    output.success(&format!("Deleted project {}", id));
    Ok(())
}

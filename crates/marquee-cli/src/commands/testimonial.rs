//! Testimonial entry commands

use std::sync::Arc;

use anyhow::{bail, Result};

use marquee_core::sections::Testimonial;
use marquee_core::{CollectionBinding, ContentStore, ContentWriter, Direction, Query, Section};

use crate::output::Output;

pub async fn create(
    writer: &ContentWriter,
    author: String,
    quote: String,
    role: String,
    order: i64,
    output: &Output,
) -> Result<()> {
    let testimonial = Testimonial {
        author,
        quote,
        role,
        order,
        ..Default::default()
    };
    let id = writer.create_entry(&testimonial).await?;
    output.id(&id);
    Ok(())
}

pub async fn list(store: Arc<dyn ContentStore>, output: &Output) -> Result<()> {
    let query = Query::new().order_by("order", Direction::Ascending);
    let mut binding: CollectionBinding<Testimonial> =
        CollectionBinding::bind(store, Testimonial::COLLECTION, query);
    let snapshot = binding.wait_settled().await;
    if let Some(error) = snapshot.error {
        bail!("failed to load testimonials: {}", error);
    }
    output.testimonial_list(&snapshot.value);
    Ok(())
}

pub async fn delete(writer: &ContentWriter, id: &str, output: &Output) -> Result<()> {
    writer.delete_entry::<Testimonial>(id).await?;
    output.success(&format!("Deleted testimonial {}", id));
    Ok(())
}

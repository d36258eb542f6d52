//! Command execution. Results go to stdout; failures are returned as errors.

use std::sync::Arc;

use anyhow::{Context, bail};
use serde::Serialize;
use serde_json::json;

use blog_core::detail::{DetailView, EntityDetail};
use blog_core::domain::Entity;
use blog_core::form::{EntityForm, FormBinding, FormError, FormValues};
use blog_core::store::EntityStore;

use crate::cli::{EntityCommand, Resource};
use crate::state::AppState;

pub async fn run(state: &AppState, resource: Resource) -> anyhow::Result<()> {
    match resource {
        Resource::Posts(command) => execute(&state.posts, &state.users, command).await,
        Resource::Comments(command) => execute(&state.comments, &state.posts, command).await,
    }
}

/// Run one command against `store`, with `related` supplying the
/// candidates of the form's selection control.
async fn execute<E, R>(
    store: &Arc<EntityStore<E>>,
    related: &Arc<EntityStore<R>>,
    command: EntityCommand,
) -> anyhow::Result<()>
where
    E: FormBinding + DetailView,
    R: Entity,
{
    match command {
        EntityCommand::List(page) => {
            store.fetch_list(page.into()).await?;
            print_collection(store)
        }
        EntityCommand::Search { query, page } => {
            store.search(&query, page.into()).await?;
            print_collection(store)
        }
        EntityCommand::Get { id } => {
            let detail = EntityDetail::new(store.clone(), id);
            detail.mount().await?;

            println!("{}", detail.title());
            for field in detail.fields() {
                println!("  {:<14} {}", field.label, field.value);
            }
            Ok(())
        }
        EntityCommand::Save { id, fields } => {
            let mut form = EntityForm::new(store.clone(), related.clone(), id.as_deref())?;
            form.mount().await;
            if let (false, Some(message)) = (form.is_new(), form.error_message()) {
                bail!("Cannot edit {}: {message}", E::NAME);
            }

            let values: FormValues = fields.into_iter().collect();
            let saved = match form.submit(&values).await {
                Ok(saved) => saved,
                Err(FormError::Invalid(errors)) => {
                    for error in &errors {
                        tracing::warn!(field = %error.field, "{}", error.message);
                    }
                    return Err(FormError::Invalid(errors).into());
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(navigation) = form.poll_navigation() {
                tracing::info!(route = %navigation.route, id = saved.id(), "Saved");
            }
            print_json(&saved)
        }
        EntityCommand::Delete { id } => {
            store.delete(id).await?;
            println!("Deleted {} {id}", E::NAME);
            Ok(())
        }
    }
}

fn print_collection<E: Entity>(store: &EntityStore<E>) -> anyhow::Result<()> {
    let state = store.state();
    print_json(&json!({
        "totalItems": state.total_items,
        "links": state.links,
        "items": state.entities,
    }))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}

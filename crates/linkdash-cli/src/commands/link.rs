//! Link command handlers

use anyhow::{anyhow, bail, Context, Result};
use tracing::warn;
use uuid::Uuid;

use linkdash_core::dashboard::LinkForm;
use linkdash_core::{Link, LinkId};

use super::Store;
use crate::output::{short_id, Output};

/// List all links in dashboard order
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_links(store.links());
    Ok(())
}

/// Add a new link, normalized the same way as the dashboard form
pub fn add(store: &mut Store, title: String, url: String, output: &Output) -> Result<()> {
    let form = LinkForm {
        title,
        url,
        ..LinkForm::default()
    };
    let (title, url) = form
        .submission()
        .ok_or_else(|| anyhow!("Title and URL must both be non-empty"))?;

    let id = store.add(title, url);
    ensure_saved(store)?;

    let link = store
        .get(&id)
        .ok_or_else(|| anyhow!("Link vanished after adding: {}", id))?;
    output.success(&format!("Added link: {}", id));
    output.print_link(link);
    Ok(())
}

/// Change the title and/or URL of a link
pub fn edit(
    store: &mut Store,
    id: String,
    title: Option<String>,
    url: Option<String>,
    output: &Output,
) -> Result<()> {
    if title.is_none() && url.is_none() {
        bail!("Nothing to change. Pass --title and/or --url.");
    }

    let link_id = parse_link_id(&id, store)?;
    let link = store
        .get(&link_id)
        .ok_or_else(|| anyhow!("Link not found: {}", id))?;

    let mut form = LinkForm::from_link(link);
    if let Some(title) = title {
        form.title = title;
    }
    if let Some(url) = url {
        form.url = url;
    }
    let (title, url) = form
        .submission()
        .ok_or_else(|| anyhow!("Title and URL must both be non-empty"))?;

    store.update(&link_id, title, url);
    ensure_saved(store)?;

    if let Some(link) = store.get(&link_id) {
        output.success("Link updated");
        output.print_link(link);
    }
    Ok(())
}

/// Delete a link
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let link_id = parse_link_id(&id, store)?;

    let removed = store.delete(&link_id);
    ensure_saved(store)?;

    if removed {
        output.success(&format!("Deleted link: {}", link_id));
    } else {
        output.warn(&format!("No link with ID {}", link_id));
    }
    Ok(())
}

/// Open a link in the default browser
pub fn open(store: &Store, id: String, output: &Output) -> Result<()> {
    let link_id = parse_link_id(&id, store)?;
    let link = store
        .get(&link_id)
        .ok_or_else(|| anyhow!("Link not found: {}", id))?;

    let url = link.target_url();
    open::that(&url).with_context(|| format!("Failed to open {}", url))?;

    output.success(&format!("Opened '{}'", link.title));
    Ok(())
}

/// Fail when the last write did not reach storage
///
/// The dashboard keeps running on in-memory state after a failed write, but
/// a one-shot command would silently lose the change.
fn ensure_saved(store: &Store) -> Result<()> {
    if store.is_durable() {
        return Ok(());
    }
    let reason = store.last_error().unwrap_or("unknown storage error");
    warn!("Command finished with unsaved changes: {}", reason);
    bail!("Change was not saved: {}", reason)
}

/// Resolve a link ID (an exact stored ID, a full UUID, or a prefix)
fn parse_link_id(id: &str, store: &Store) -> Result<LinkId> {
    let exact = LinkId::from(id);
    if store.get(&exact).is_some() || Uuid::parse_str(id).is_ok() {
        return Ok(exact);
    }

    let matches = match_prefix(store.links(), id);

    match matches.len() {
        0 => bail!("No link found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple links match '{}':", id);
            for link in &matches {
                eprintln!("  {} - {}", short_id(link), link.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

fn match_prefix<'a>(links: &'a [Link], prefix: &str) -> Vec<&'a Link> {
    if prefix.is_empty() {
        return Vec::new();
    }
    links
        .iter()
        .filter(|l| l.id.as_str().starts_with(prefix))
        .collect()
}

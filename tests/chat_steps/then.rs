//! Then steps for chat creation BDD scenarios.

use super::world::{ChatWorld, parse_instant, split_users};
use chatstore::chat::{domain::Chat, ports::ChatRepositoryError};
use eyre::eyre;
use rstest_bdd_macros::then;

fn created(world: &ChatWorld) -> Result<&Chat, eyre::Report> {
    world
        .created_chat
        .as_ref()
        .ok_or_else(|| eyre!("no chat was created in this scenario"))
}

fn create_error(world: &ChatWorld) -> Result<&ChatRepositoryError, eyre::Report> {
    match world.last_create_result.as_ref() {
        Some(Err(err)) => Ok(err),
        Some(Ok(chat)) => Err(eyre!("expected creation to fail, created {}", chat.id())),
        None => Err(eyre!("missing create result in scenario world")),
    }
}

fn single_lookup_error(world: &ChatWorld) -> Result<&ChatRepositoryError, eyre::Report> {
    match world.lookup_results.as_slice() {
        [Err(err)] => Ok(err),
        other => Err(eyre!("expected one failed lookup, found {other:?}")),
    }
}

#[then("the chat has a generated id and a creation date")]
fn chat_has_identity(world: &ChatWorld) -> Result<(), eyre::Report> {
    let chat = created(world)?;
    let stored = world.store.chats()?;
    if stored.iter().map(Chat::id).collect::<Vec<_>>() != vec![chat.id()] {
        return Err(eyre!("expected exactly the created chat to be stored"));
    }
    if chat.created_at().timestamp_millis() <= 0 {
        return Err(eyre!("creation date was not assigned"));
    }
    Ok(())
}

#[then(r#"memberships exist for "{participants}" in the new chat"#)]
fn memberships_exist(world: &ChatWorld, participants: String) -> Result<(), eyre::Report> {
    let chat = created(world)?;
    let members = world.store.memberships()?;
    let users: Vec<String> = members
        .iter()
        .filter(|member| member.chat_id() == chat.id())
        .map(|member| member.user_id().as_str().to_owned())
        .collect();
    if users != split_users(&participants) || members.len() != users.len() {
        return Err(eyre!("unexpected memberships: {users:?}"));
    }
    Ok(())
}

#[then(r#"every membership window opens at "{start}" and ends at "{end}""#)]
fn windows_have_bounds(world: &ChatWorld, start: String, end: String) -> Result<(), eyre::Report> {
    let expected_start = parse_instant(&start)?;
    let expected_end = parse_instant(&end)?;
    if created(world)?.created_at() != expected_start {
        return Err(eyre!("chat was not created at {expected_start}"));
    }
    for member in world.store.memberships()? {
        let window = member.window();
        if window.start() != expected_start || window.end() != expected_end {
            return Err(eyre!(
                "membership of {} has window {} to {}",
                member.user_id(),
                window.start(),
                window.end()
            ));
        }
    }
    Ok(())
}

#[then("creation fails because input is empty")]
fn creation_fails_empty(world: &ChatWorld) -> Result<(), eyre::Report> {
    match create_error(world)? {
        ChatRepositoryError::Empty => Ok(()),
        other => Err(eyre!("expected empty input error, got {other}")),
    }
}

#[then("creation fails with an internal error")]
fn creation_fails_internal(world: &ChatWorld) -> Result<(), eyre::Report> {
    match create_error(world)? {
        ChatRepositoryError::Internal(_) => Ok(()),
        other => Err(eyre!("expected internal error, got {other}")),
    }
}

#[then("no chat or membership is stored")]
fn nothing_stored(world: &ChatWorld) -> Result<(), eyre::Report> {
    let chats = world.store.chats()?;
    let members = world.store.memberships()?;
    if !chats.is_empty() || !members.is_empty() {
        return Err(eyre!(
            "expected no writes, found {} chats and {} memberships",
            chats.len(),
            members.len()
        ));
    }
    if world.store.open_sessions() != 0 {
        return Err(eyre!("a storage session was left open"));
    }
    Ok(())
}

#[then("both lookups return the created chat")]
fn both_lookups_match(world: &ChatWorld) -> Result<(), eyre::Report> {
    let chat = created(world)?;
    if world.lookup_results.len() != 2 {
        return Err(eyre!("expected two lookups"));
    }
    for result in &world.lookup_results {
        match result {
            Ok(found) if found == chat => {}
            Ok(found) => return Err(eyre!("lookup returned chat {}", found.id())),
            Err(err) => return Err(eyre!("lookup failed: {err}")),
        }
    }
    Ok(())
}

#[then("both listings contain the same {count:usize} chats")]
fn listings_match(world: &ChatWorld, count: usize) -> Result<(), eyre::Report> {
    match world.listings.as_slice() {
        [first, second] if first == second && first.len() == count => Ok(()),
        other => Err(eyre!(
            "unexpected listings: {:?}",
            other.iter().map(Vec::len).collect::<Vec<_>>()
        )),
    }
}

#[then("the lookup fails because nothing can be searched")]
fn lookup_cannot_find(world: &ChatWorld) -> Result<(), eyre::Report> {
    match single_lookup_error(world)? {
        ChatRepositoryError::CannotFind => Ok(()),
        other => Err(eyre!("expected cannot-find error, got {other}")),
    }
}

#[then("the lookup fails with not found")]
fn lookup_not_found(world: &ChatWorld) -> Result<(), eyre::Report> {
    match single_lookup_error(world)? {
        ChatRepositoryError::NotFound => Ok(()),
        other => Err(eyre!("expected not found, got {other}")),
    }
}

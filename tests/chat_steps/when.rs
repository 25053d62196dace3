//! When steps for chat creation BDD scenarios.

use super::world::{ChatWorld, run_async};
use chatstore::chat::{
    domain::{ChatCriteria, ChatId},
    ports::ChatRepository,
};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the chat is created")]
fn create_chat(world: &mut ChatWorld) -> Result<(), eyre::Report> {
    let draft = world
        .pending_draft
        .clone()
        .ok_or_else(|| eyre::eyre!("missing pending draft in scenario world"))?;

    let result = run_async(world.service.create(draft));
    if let Ok(chat) = &result {
        world.created_chat = Some(chat.clone());
    }
    world.last_create_result = Some(result);
    Ok(())
}

#[when(r#"the personal chat between "{first}" and "{second}" is requested"#)]
fn request_personal_chat(world: &mut ChatWorld, first: String, second: String) {
    let result = run_async(
        world
            .service
            .find_personal_chat_between_users(&first, &second),
    );
    world.lookup_results.push(result);
}

#[when(r#"the chats owned by "{owner}" are listed twice"#)]
fn list_owned_chats_twice(world: &mut ChatWorld, owner: String) -> Result<(), eyre::Report> {
    for _ in 0..2 {
        let listing =
            run_async(world.service.find_owned_chats(&owner)).wrap_err("list owned chats")?;
        world.listings.push(listing);
    }
    Ok(())
}

#[when("a chat is requested with no criteria")]
fn request_without_criteria(world: &mut ChatWorld) {
    let result = run_async(world.service.find(ChatCriteria::new()));
    world.lookup_results.push(result);
}

#[when("a chat is requested by an unknown identifier")]
fn request_unknown_chat(world: &mut ChatWorld) {
    let result = run_async(world.service.find(ChatCriteria::new().with_id(ChatId::new())));
    world.lookup_results.push(result);
}

//! Given steps for chat creation BDD scenarios.

use super::world::{ChatWorld, parse_instant, run_async, split_users};
use chatstore::chat::{
    adapters::memory::StoreFault,
    domain::{ChatDraft, ChatKind},
    ports::ChatRepository,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"the clock reads "{instant}""#)]
fn clock_reads(world: &mut ChatWorld, instant: String) -> Result<(), eyre::Report> {
    world.set_clock(parse_instant(&instant)?);
    Ok(())
}

#[given(r#"a personal chat draft owned by "{owner}" with participants "{participants}""#)]
fn personal_draft(world: &mut ChatWorld, owner: String, participants: String) {
    world.pending_draft = Some(
        ChatDraft::new(ChatKind::Personal, owner).with_participants(split_users(&participants)),
    );
}

#[given(r#"a group chat draft owned by "{owner}" with participants "{participants}""#)]
fn group_draft(world: &mut ChatWorld, owner: String, participants: String) {
    world.pending_draft = Some(
        ChatDraft::new(ChatKind::Group, owner)
            .with_title("team")
            .with_participants(split_users(&participants)),
    );
}

#[given(r#"a group chat draft owned by "{owner}" with no participants"#)]
fn group_draft_without_participants(world: &mut ChatWorld, owner: String) {
    world.pending_draft = Some(ChatDraft::new(ChatKind::Group, owner).with_title("empty"));
}

#[given("membership inserts fail")]
fn membership_inserts_fail(world: &mut ChatWorld) -> Result<(), eyre::Report> {
    world
        .store
        .fail_on(StoreFault::InsertMemberships)
        .wrap_err("inject membership insert failure")
}

#[given(r#"a personal chat between "{owner}" and "{other}" owned by "{creator}""#)]
fn existing_personal_chat(
    world: &mut ChatWorld,
    owner: String,
    other: String,
    creator: String,
) -> Result<(), eyre::Report> {
    let draft = ChatDraft::new(ChatKind::Personal, creator).with_participants([owner, other]);
    let created = run_async(world.service.create(draft)).wrap_err("create personal chat")?;
    world.created_chat = Some(created);
    Ok(())
}

#[given(r#"user "{owner}" owns {count:usize} chats"#)]
fn user_owns_chats(world: &mut ChatWorld, owner: String, count: usize) -> Result<(), eyre::Report> {
    for index in 0..count {
        let draft = ChatDraft::new(ChatKind::Group, owner.clone())
            .with_title(format!("chat {index}"))
            .with_participants([owner.clone(), format!("member-{index}")]);
        run_async(world.service.create(draft)).wrap_err("create owned chat")?;
    }
    Ok(())
}

use super::*;

/// Tests creating a ticket from a button.
///
/// Expected: Ok with an open, unclaimed ticket that can be found by channel
#[tokio::test]
async fn creates_open_ticket() -> Result<(), AppError> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (panel, button) = factory::helpers::create_panel_with_button(db).await?;

    let repo = TicketRepository::new(db);
    let ticket = repo
        .create(CreateTicketParam {
            guild_id: panel.guild_id as u64,
            channel_id: 4242,
            creator_id: 10,
            button_id: Some(button.id),
            option_id: None,
        })
        .await?;

    assert!(ticket.is_open());
    assert_eq!(ticket.claimed_by, None);
    assert!(ticket.added_users.is_empty());

    let found = repo.get_by_channel(4242).await?;
    assert_eq!(found.map(|t| t.id), Some(ticket.id));

    Ok(())
}

/// Tests that closing, claiming and adding users are persisted.
///
/// Expected: Ok with every change visible on reload
#[tokio::test]
async fn persists_ticket_changes() -> Result<(), AppError> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (panel, button) = factory::helpers::create_panel_with_button(db).await?;
    let created = factory::create_ticket(db, panel.guild_id, 10, button.id).await?;

    let repo = TicketRepository::new(db);
    repo.set_claimed_by(created.id, Some(20)).await?;
    repo.set_added_users(created.id, &[30, 31]).await?;
    repo.close(created.id, Utc::now()).await?;

    let ticket = repo.get_by_id(created.id).await?.unwrap();

    assert!(!ticket.is_open());
    assert_eq!(ticket.claimed_by, Some(20));
    assert_eq!(ticket.added_users, vec![30, 31]);

    Ok(())
}

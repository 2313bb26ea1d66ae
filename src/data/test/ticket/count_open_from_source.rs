use super::*;

/// Tests that only open tickets from the same button by the same member count.
///
/// Expected: Ok(1)
#[tokio::test]
async fn counts_open_tickets_from_button() -> Result<(), AppError> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (panel, button) = factory::helpers::create_panel_with_button(db).await?;
    let other_button = factory::create_button(db, panel.id).await?;

    factory::create_ticket(db, panel.guild_id, 10, button.id).await?;
    factory::ticket::TicketFactory::new(db, panel.guild_id, 10)
        .button_id(button.id)
        .closed()
        .build()
        .await?;
    factory::create_ticket(db, panel.guild_id, 10, other_button.id).await?;
    factory::create_ticket(db, panel.guild_id, 11, button.id).await?;

    let source = TicketButtonRepository::new(db)
        .get_by_id(button.id)
        .await?
        .map(TicketSource::Button)
        .unwrap();

    let count = TicketRepository::new(db)
        .count_open_from_source(panel.guild_id as u64, 10, &source)
        .await?;

    assert_eq!(count, 1);

    Ok(())
}

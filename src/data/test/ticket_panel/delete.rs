use super::*;

/// Tests that deleting a panel removes its buttons, menus and options.
///
/// Expected: Ok(Some(panel)) with all component tables empty
#[tokio::test]
async fn deletes_panel_with_components() -> Result<(), AppError> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (panel, _) = factory::helpers::create_panel_with_button(db).await?;
    let menus = TicketSelectMenuRepository::new(db);
    let menu = menus.create(panel.id, "Pick".to_string()).await?;
    menus
        .add_option(CreateTicketSelectOptionParam {
            menu_id: menu.id,
            label: "General".to_string(),
            description: None,
            emoji: None,
            open_message: None,
            category_id: None,
            archive_category_id: None,
            support_roles: vec![],
            max_tickets: 1,
        })
        .await?;

    let deleted = TicketPanelRepository::new(db)
        .delete(panel.guild_id as u64, panel.id)
        .await?;

    assert_eq!(deleted.map(|p| p.id), Some(panel.id));
    assert_eq!(entity::prelude::TicketPanel::find().count(db).await?, 0);
    assert_eq!(entity::prelude::TicketButton::find().count(db).await?, 0);
    assert_eq!(entity::prelude::TicketSelectMenu::find().count(db).await?, 0);
    assert_eq!(entity::prelude::TicketSelectOption::find().count(db).await?, 0);

    Ok(())
}

/// Tests deleting a panel that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_panel() -> Result<(), AppError> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let deleted = TicketPanelRepository::new(db).delete(1, 999).await?;

    assert!(deleted.is_none());

    Ok(())
}

use super::*;

/// Tests loading a panel with its buttons and select menu options.
///
/// Expected: Ok with 2 buttons and 1 menu holding 1 option
#[tokio::test]
async fn loads_buttons_and_menus() -> Result<(), AppError> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (panel, _) = factory::helpers::create_panel_with_button(db).await?;
    factory::ticket_button::TicketButtonFactory::new(db, panel.id)
        .label("Report")
        .support_roles(&[111])
        .build()
        .await?;

    let menus = TicketSelectMenuRepository::new(db);
    let menu = menus.create(panel.id, "Pick a topic".to_string()).await?;
    menus
        .add_option(CreateTicketSelectOptionParam {
            menu_id: menu.id,
            label: "Billing".to_string(),
            description: None,
            emoji: None,
            open_message: None,
            category_id: None,
            archive_category_id: None,
            support_roles: vec![222],
            max_tickets: 1,
        })
        .await?;

    let loaded = TicketPanelRepository::new(db)
        .get_with_components(panel.guild_id as u64, panel.id)
        .await?
        .unwrap();

    assert_eq!(loaded.panel.id, panel.id);
    assert_eq!(loaded.buttons.len(), 2);
    assert_eq!(loaded.buttons[1].label, "Report");
    assert_eq!(loaded.buttons[1].support_roles, vec![111]);
    assert_eq!(loaded.menus.len(), 1);
    assert_eq!(loaded.menus[0].options.len(), 1);
    assert_eq!(loaded.menus[0].options[0].support_roles, vec![222]);

    Ok(())
}

/// Tests that a panel from another guild is not returned.
///
/// Expected: Ok(None)
#[tokio::test]
async fn ignores_panel_of_other_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (panel, _) = factory::helpers::create_panel_with_button(db).await?;

    let loaded = TicketPanelRepository::new(db)
        .get_with_components(panel.guild_id as u64 + 1, panel.id)
        .await?;

    assert!(loaded.is_none());

    Ok(())
}

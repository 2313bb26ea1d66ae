use super::*;

/// Tests that only reminders at or before now are due, soonest first.
///
/// Expected: Ok with the two past reminders ordered by time
#[tokio::test]
async fn returns_due_reminders_soonest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Reminder)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let later_due = factory::create_reminder(db, 10, now - Duration::minutes(1)).await?;
    let first_due = factory::create_reminder(db, 11, now - Duration::minutes(5)).await?;
    factory::create_reminder(db, 10, now + Duration::hours(1)).await?;

    let due = ReminderRepository::new(db).get_due(now).await?;
    let ids: Vec<i32> = due.iter().map(|r| r.id).collect();

    assert_eq!(ids, vec![first_due.id, later_due.id]);

    Ok(())
}

/// Tests that a delivered reminder is deleted and no longer listed for the user.
///
/// Expected: Ok(true) then an empty listing
#[tokio::test]
async fn deletes_delivered_reminder() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Reminder)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ReminderRepository::new(db);
    let reminder = repo
        .create(CreateReminderParam {
            user_id: 10,
            channel_id: 20,
            guild_id: None,
            message: "Stretch".to_string(),
            is_private: true,
            remind_at: Utc::now() + Duration::minutes(10),
        })
        .await?;

    assert_eq!(repo.get_by_user(10).await?.len(), 1);
    assert!(repo.delete(reminder.id).await?);
    assert!(repo.get_by_user(10).await?.is_empty());

    Ok(())
}

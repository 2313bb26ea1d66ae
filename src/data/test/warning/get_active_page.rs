use super::*;

/// Tests paging through active warnings newest first.
///
/// Verifies the page size, totals and that the newest warning comes first.
///
/// Expected: Ok with 2 pages, first holding the two newest warnings
#[tokio::test]
async fn pages_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    for (hours_ago, reason) in [(3, "oldest"), (2, "middle"), (1, "newest")] {
        factory::warning::WarningFactory::new(db, 1, 10)
            .reason(reason)
            .created_at(now - Duration::hours(hours_ago))
            .build()
            .await?;
    }

    let repo = WarningRepository::new(db);
    let page = repo.get_active_page(1, 10, 0, 2).await?;

    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.warnings.len(), 2);
    assert_eq!(page.warnings[0].reason.as_deref(), Some("newest"));
    assert_eq!(page.warnings[1].reason.as_deref(), Some("middle"));

    let last = repo.get_active_page(1, 10, 1, 2).await?;
    assert_eq!(last.warnings.len(), 1);
    assert_eq!(last.warnings[0].reason.as_deref(), Some("oldest"));

    Ok(())
}

/// Tests an empty warn log.
///
/// Expected: Ok with no warnings and zero totals
#[tokio::test]
async fn returns_empty_page_without_warnings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarningRepository::new(db);
    let page = repo.get_active_page(1, 10, 0, 10).await?;

    assert!(page.warnings.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);

    Ok(())
}

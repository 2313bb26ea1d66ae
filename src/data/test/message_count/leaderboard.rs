use super::*;

/// Tests that the leaderboard sums channels per member and sorts descending.
///
/// Expected: Ok with user 11 (6) before user 10 (4), limited to 2 entries
#[tokio::test]
async fn ranks_members_by_total() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MessageCount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MessageCountRepository::new(db);
    repo.apply_increments(&[
        (key(100, 10), pending(1)),
        (key(200, 10), pending(3)),
        (key(100, 11), pending(6)),
        (key(100, 12), pending(2)),
    ])
    .await?;

    let board = repo.leaderboard(1, 2).await?;

    assert_eq!(board.len(), 2);
    assert_eq!((board[0].user_id, board[0].count), (11, 6));
    assert_eq!((board[1].user_id, board[1].count), (10, 4));

    Ok(())
}

use sea_orm::DatabaseConnection;

use crate::data::ticket::TicketRepository;
use crate::data::ticket_case::TicketCaseRepository;
use crate::error::AppError;
use crate::model::ticket::{CreateTicketCaseParam, TicketCase, TicketCaseWithTickets};

pub struct TicketCaseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketCaseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateTicketCaseParam) -> Result<TicketCase, AppError> {
        if param.title.trim().is_empty() {
            return Err(AppError::BadRequest("A case needs a title".to_string()));
        }

        let case = TicketCaseRepository::new(self.db).create(param).await?;

        tracing::info!("Created ticket case {} in guild {}", case.id, case.guild_id);

        Ok(case)
    }

    /// Links the ticket living in `channel_id` to an open case of the same guild.
    pub async fn link_ticket(
        &self,
        guild_id: u64,
        case_id: i32,
        channel_id: u64,
    ) -> Result<TicketCase, AppError> {
        let case = self.get_case(guild_id, case_id).await?;
        if case.closed_at.is_some() {
            return Err(AppError::BadRequest(format!("Case #{} is closed", case.id)));
        }

        let ticket_repo = TicketRepository::new(self.db);
        let ticket = ticket_repo
            .get_by_channel(channel_id)
            .await?
            .filter(|ticket| ticket.guild_id == guild_id)
            .ok_or_else(|| AppError::NotFound("This channel is not a ticket".to_string()))?;

        ticket_repo.set_case(ticket.id, Some(case.id)).await?;

        Ok(case)
    }

    pub async fn unlink_ticket(&self, guild_id: u64, channel_id: u64) -> Result<(), AppError> {
        let ticket_repo = TicketRepository::new(self.db);
        let ticket = ticket_repo
            .get_by_channel(channel_id)
            .await?
            .filter(|ticket| ticket.guild_id == guild_id)
            .ok_or_else(|| AppError::NotFound("This channel is not a ticket".to_string()))?;

        if ticket.case_id.is_none() {
            return Err(AppError::BadRequest(
                "This ticket is not linked to a case".to_string(),
            ));
        }

        ticket_repo.set_case(ticket.id, None).await?;

        Ok(())
    }

    pub async fn close(&self, guild_id: u64, case_id: i32) -> Result<TicketCase, AppError> {
        let case = self.get_case(guild_id, case_id).await?;
        if case.closed_at.is_some() {
            return Err(AppError::BadRequest(format!(
                "Case #{} is already closed",
                case.id
            )));
        }

        TicketCaseRepository::new(self.db)
            .close(guild_id, case_id)
            .await?
            .ok_or_else(case_not_found)
    }

    pub async fn list(&self, guild_id: u64, include_closed: bool) -> Result<Vec<TicketCase>, AppError> {
        Ok(TicketCaseRepository::new(self.db)
            .get_all(guild_id, include_closed)
            .await?)
    }

    pub async fn get_with_tickets(
        &self,
        guild_id: u64,
        case_id: i32,
    ) -> Result<TicketCaseWithTickets, AppError> {
        TicketCaseRepository::new(self.db)
            .get_with_tickets(guild_id, case_id)
            .await?
            .ok_or_else(case_not_found)
    }

    async fn get_case(&self, guild_id: u64, case_id: i32) -> Result<TicketCase, AppError> {
        TicketCaseRepository::new(self.db)
            .get_by_id(guild_id, case_id)
            .await?
            .ok_or_else(case_not_found)
    }
}

fn case_not_found() -> AppError {
    AppError::NotFound("Case not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::builder::TestBuilder;
    use test_utils::factory::ticket::TicketFactory;

    fn case_param(title: &str) -> CreateTicketCaseParam {
        CreateTicketCaseParam {
            guild_id: 1,
            title: title.to_string(),
            description: None,
            created_by: 9,
        }
    }

    /// Tests linking a ticket to a case and reading it back.
    ///
    /// Expected: the case lists the linked ticket
    #[tokio::test]
    async fn linked_tickets_show_on_case() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_ticket_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        TicketFactory::new(db, 1, 3).channel_id(100).build().await?;

        let service = TicketCaseService::new(db);
        let case = service.create(case_param("Raid report")).await?;
        service.link_ticket(1, case.id, 100).await?;

        let with_tickets = service.get_with_tickets(1, case.id).await?;
        assert_eq!(with_tickets.tickets.len(), 1);
        assert_eq!(with_tickets.tickets[0].channel_id, 100);

        Ok(())
    }

    /// Tests that closed cases accept no further tickets.
    ///
    /// Expected: Err(BadRequest)
    #[tokio::test]
    async fn closed_case_rejects_links() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_ticket_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        TicketFactory::new(db, 1, 3).channel_id(100).build().await?;

        let service = TicketCaseService::new(db);
        let case = service.create(case_param("Spam")).await?;
        service.close(1, case.id).await?;

        let result = service.link_ticket(1, case.id, 100).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        Ok(())
    }

    /// Tests that cases of another guild are not visible.
    ///
    /// Expected: Err(NotFound)
    #[tokio::test]
    async fn cases_are_scoped_to_guild() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_ticket_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let service = TicketCaseService::new(db);
        let case = service.create(case_param("Appeal")).await?;

        let result = service.close(2, case.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        Ok(())
    }
}

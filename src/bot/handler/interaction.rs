//! Component and modal interactions.
//!
//! Slash commands are dispatched by poise; this handler only sees the ticket panel
//! buttons and menus, the controls posted in ticket channels and the button wizard.
//! Custom ids that do not parse as [`TicketComponent`] are ignored.

use serenity::all::{
    ComponentInteraction, ComponentInteractionDataKind, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, EditInteractionResponse,
    Interaction, ModalInteraction, RoleId,
};

use crate::bot::handler::wizard;
use crate::error::AppError;
use crate::model::ticket::TicketSource;
use crate::service::ticket::component::TicketComponent;
use crate::service::ticket::ticket::TicketService;
use crate::state::AppState;
use crate::util::embed;

/// Handles the interaction_create event for components and modal submits
pub async fn handle_interaction(state: &AppState, ctx: Context, interaction: Interaction) {
    match interaction {
        Interaction::Component(component) => {
            let Some(action) = TicketComponent::parse(&component.data.custom_id) else {
                return;
            };

            if let Err(e) = handle_component(state, &ctx, &component, action).await {
                tracing::error!(
                    "Failed to handle {} for {}: {:?}",
                    action,
                    component.user.id,
                    e
                );
                report_component_error(&ctx, &component, &e).await;
            }
        }
        Interaction::Modal(modal) => {
            if TicketComponent::parse(&modal.data.custom_id) != Some(TicketComponent::WizardDetails) {
                return;
            }

            if let Err(e) = wizard::handle_details(state, &ctx, &modal).await {
                tracing::error!("Failed to handle wizard details of {}: {:?}", modal.user.id, e);
                report_modal_error(&ctx, &modal, &e).await;
            }
        }
        _ => {}
    }
}

async fn handle_component(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
    action: TicketComponent,
) -> Result<(), AppError> {
    match action {
        TicketComponent::Open(button_id) => {
            let guild_id = guild_of(component)?;
            let source = TicketService::new(&state.db, &ctx.http)
                .source_for_button(guild_id, button_id)
                .await?;
            open_ticket(state, ctx, component, guild_id, source).await
        }
        TicketComponent::Select(_) => {
            let guild_id = guild_of(component)?;
            let option_id = match &component.data.kind {
                ComponentInteractionDataKind::StringSelect { values } => {
                    values.first().and_then(|value| value.parse::<i32>().ok())
                }
                _ => None,
            }
            .ok_or_else(|| AppError::BadRequest("Pick a ticket type".to_string()))?;

            let source = TicketService::new(&state.db, &ctx.http)
                .source_for_option(guild_id, option_id)
                .await?;
            open_ticket(state, ctx, component, guild_id, source).await
        }
        TicketComponent::Close => close_ticket(state, ctx, component).await,
        TicketComponent::Claim => claim_ticket(state, ctx, component).await,
        TicketComponent::WizardDetails => Ok(()),
        step => wizard::handle_step(state, ctx, component, step).await,
    }
}

async fn open_ticket(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
    guild_id: u64,
    source: TicketSource,
) -> Result<(), AppError> {
    // Creating the channel can take longer than the 3 second response window.
    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true)),
        )
        .await?;

    let bot_id = ctx.cache.current_user().id.get();

    let result = TicketService::new(&state.db, &ctx.http)
        .open(
            guild_id,
            bot_id,
            component.user.id.get(),
            &component.user.name,
            &source,
        )
        .await;

    let reply = match result {
        Ok(ticket) => embed::success_embed()
            .description(format!("Your ticket is open: <#{}>", ticket.channel_id)),
        Err(e) => {
            tracing::warn!("Failed to open ticket for {}: {:?}", component.user.id, e);
            embed::error_embed().description(e.user_message())
        }
    };

    component
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(reply))
        .await?;

    Ok(())
}

async fn close_ticket(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
) -> Result<(), AppError> {
    let service = TicketService::new(&state.db, &ctx.http);
    let channel_id = component.channel_id.get();

    let ticket = service
        .get_by_channel(channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("This channel is not a ticket".to_string()))?;

    let user_id = component.user.id.get();
    let allowed = ticket.creator_id == user_id
        || can_manage_channels(component)
        || service.is_support(&ticket, &member_roles(component)).await?;
    if !allowed {
        return Err(AppError::PermissionDenied(
            "Only the ticket creator or support staff can close this ticket".to_string(),
        ));
    }

    // Respond before the channel may disappear.
    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed::warning_embed().description(format!("Ticket closed by <@{}>", user_id))),
            ),
        )
        .await?;

    service.close(channel_id, user_id).await?;

    Ok(())
}

async fn claim_ticket(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
) -> Result<(), AppError> {
    let service = TicketService::new(&state.db, &ctx.http);
    let channel_id = component.channel_id.get();

    let ticket = service
        .get_by_channel(channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("This channel is not a ticket".to_string()))?;

    if !can_manage_channels(component)
        && !service.is_support(&ticket, &member_roles(component)).await?
    {
        return Err(AppError::PermissionDenied(
            "Only support staff can claim tickets".to_string(),
        ));
    }

    service.claim(channel_id, component.user.id.get()).await?;

    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().embed(
                    embed::info_embed()
                        .description(format!("<@{}> will handle this ticket", component.user.id)),
                ),
            ),
        )
        .await?;

    Ok(())
}

fn guild_of(component: &ComponentInteraction) -> Result<u64, AppError> {
    component
        .guild_id
        .map(|id| id.get())
        .ok_or_else(|| AppError::BadRequest("Tickets only work inside a server".to_string()))
}

fn member_roles(component: &ComponentInteraction) -> Vec<RoleId> {
    component
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default()
}

fn can_manage_channels(component: &ComponentInteraction) -> bool {
    component
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.manage_channels())
}

async fn report_component_error(ctx: &Context, component: &ComponentInteraction, error: &AppError) {
    let embed = embed::error_embed().description(error.user_message());

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed.clone())
            .ephemeral(true),
    );

    // Already acknowledged interactions only accept followups.
    if component.create_response(&ctx.http, response).await.is_err() {
        if let Err(e) = component
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new().embed(embed).ephemeral(true),
            )
            .await
        {
            tracing::debug!("Failed to report interaction error: {:?}", e);
        }
    }
}

async fn report_modal_error(ctx: &Context, modal: &ModalInteraction, error: &AppError) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed::error_embed().description(error.user_message()))
            .ephemeral(true),
    );

    if let Err(e) = modal.create_response(&ctx.http, response).await {
        tracing::debug!("Failed to report modal error: {:?}", e);
    }
}

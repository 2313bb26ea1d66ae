//! Ticket button creation wizard.
//!
//! `/ticket button add` starts a draft and opens the details modal. Every later step
//! is an ephemeral message whose components carry the wizard custom ids; each
//! interaction applies its step to the user's [`ButtonDraft`] and swaps the message to
//! the next step.

use chrono::Utc;
use serenity::all::{
    ButtonStyle, ChannelType, ComponentInteraction, ComponentInteractionDataKind, Context,
    CreateActionRow, CreateButton, CreateInputText, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateModal, CreateSelectMenu, CreateSelectMenuKind,
    CreateSelectMenuOption, InputTextStyle, ModalInteraction,
};

use crate::error::AppError;
use crate::model::ticket::TicketButtonStyle;
use crate::service::ticket::component::TicketComponent;
use crate::service::ticket::draft::ButtonDraft;
use crate::service::ticket::panel::TicketPanelService;
use crate::state::AppState;
use crate::util::embed;
use crate::util::text::truncate;

const LABEL_INPUT: &str = "label";
const EMOJI_INPUT: &str = "emoji";
const MESSAGE_INPUT: &str = "open_message";

/// Discord's limit for button labels.
const LABEL_LIMIT: u16 = 80;

/// Most support roles one button can ping.
const MAX_SUPPORT_ROLES: u8 = 10;

/// Modal asking for the button label, emoji and open message.
pub fn details_modal() -> CreateModal {
    CreateModal::new(TicketComponent::WizardDetails.custom_id(), "New ticket button").components(
        vec![
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Label", LABEL_INPUT)
                    .max_length(LABEL_LIMIT)
                    .required(true),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Emoji", EMOJI_INPUT)
                    .placeholder("🎫")
                    .required(false),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Paragraph, "Open message", MESSAGE_INPUT)
                    .placeholder("Shown in the ticket when it is opened")
                    .max_length(2000)
                    .required(false),
            ),
        ],
    )
}

/// One line per filled in field of the draft.
pub fn draft_summary(draft: &ButtonDraft) -> String {
    let mut lines = vec![format!(
        "**Label:** {}",
        draft.label.as_deref().unwrap_or("not set")
    )];

    if let Some(emoji) = &draft.emoji {
        lines.push(format!("**Emoji:** {}", emoji));
    }
    if let Some(style) = draft.style {
        lines.push(format!("**Style:** {}", style.as_str()));
    }
    if let Some(category_id) = draft.category_id {
        lines.push(format!("**Category:** <#{}>", category_id));
    }
    if !draft.support_roles.is_empty() {
        let roles = draft
            .support_roles
            .iter()
            .map(|id| format!("<@&{}>", id))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("**Support roles:** {}", roles));
    }
    if let Some(message) = &draft.open_message {
        lines.push(format!("**Open message:** {}", truncate(message, 200)));
    }

    lines.join("\n")
}

fn cancel_button() -> CreateButton {
    CreateButton::new(TicketComponent::WizardCancel.custom_id())
        .label("Cancel")
        .style(ButtonStyle::Secondary)
}

fn confirm_button() -> CreateButton {
    CreateButton::new(TicketComponent::WizardConfirm.custom_id())
        .label("Create button")
        .style(ButtonStyle::Success)
}

fn step_message(draft: &ButtonDraft, prompt: &str, rows: Vec<CreateActionRow>) -> CreateInteractionResponseMessage {
    CreateInteractionResponseMessage::new()
        .embed(
            embed::info_embed()
                .title("New ticket button")
                .description(format!("{}\n\n{}", draft_summary(draft), prompt)),
        )
        .components(rows)
}

fn style_step(draft: &ButtonDraft) -> CreateInteractionResponseMessage {
    let options = TicketButtonStyle::ALL
        .iter()
        .map(|style| CreateSelectMenuOption::new(style.as_str(), style.as_str()))
        .collect();

    step_message(
        draft,
        "Pick the button colour.",
        vec![
            CreateActionRow::SelectMenu(CreateSelectMenu::new(
                TicketComponent::WizardStyle.custom_id(),
                CreateSelectMenuKind::String { options },
            )),
            CreateActionRow::Buttons(vec![cancel_button()]),
        ],
    )
}

fn category_step(draft: &ButtonDraft) -> CreateInteractionResponseMessage {
    step_message(
        draft,
        "Pick the category new tickets are created in.",
        vec![
            CreateActionRow::SelectMenu(CreateSelectMenu::new(
                TicketComponent::WizardCategory.custom_id(),
                CreateSelectMenuKind::Channel {
                    channel_types: Some(vec![ChannelType::Category]),
                    default_channels: None,
                },
            )),
            CreateActionRow::Buttons(vec![cancel_button()]),
        ],
    )
}

fn roles_step(draft: &ButtonDraft) -> CreateInteractionResponseMessage {
    step_message(
        draft,
        "Pick the support roles that can see these tickets, or create the button right away.",
        vec![
            CreateActionRow::SelectMenu(
                CreateSelectMenu::new(
                    TicketComponent::WizardRoles.custom_id(),
                    CreateSelectMenuKind::Role {
                        default_roles: None,
                    },
                )
                .min_values(1)
                .max_values(MAX_SUPPORT_ROLES),
            ),
            CreateActionRow::Buttons(vec![confirm_button(), cancel_button()]),
        ],
    )
}

fn confirm_step(draft: &ButtonDraft) -> CreateInteractionResponseMessage {
    step_message(
        draft,
        "Create the button?",
        vec![CreateActionRow::Buttons(vec![confirm_button(), cancel_button()])],
    )
}

fn input_value(modal: &ModalInteraction, custom_id: &str) -> Option<String> {
    modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            serenity::all::ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.clone()
            }
            _ => None,
        })
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Applies the details modal and shows the style step.
pub async fn handle_details(
    state: &AppState,
    ctx: &Context,
    modal: &ModalInteraction,
) -> Result<(), AppError> {
    let label = input_value(modal, LABEL_INPUT);
    let emoji = input_value(modal, EMOJI_INPUT);
    let open_message = input_value(modal, MESSAGE_INPUT);

    let draft = state.drafts.update(modal.user.id.get(), Utc::now(), |draft| {
        draft.label = label;
        draft.emoji = emoji;
        draft.open_message = open_message;
    })?;

    modal
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(style_step(&draft).ephemeral(true)),
        )
        .await?;

    Ok(())
}

/// Applies one of the select/button steps and moves the message on.
pub async fn handle_step(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
    step: TicketComponent,
) -> Result<(), AppError> {
    let user_id = component.user.id.get();
    let now = Utc::now();

    let next = match (step, &component.data.kind) {
        (TicketComponent::WizardStyle, ComponentInteractionDataKind::StringSelect { values }) => {
            let style = values
                .first()
                .and_then(|value| value.parse::<TicketButtonStyle>().ok())
                .ok_or_else(|| AppError::BadRequest("Pick a button style".to_string()))?;

            let draft = state.drafts.update(user_id, now, |draft| draft.style = Some(style))?;
            category_step(&draft)
        }
        (TicketComponent::WizardCategory, ComponentInteractionDataKind::ChannelSelect { values }) => {
            let category_id = values
                .first()
                .map(|id| id.get())
                .ok_or_else(|| AppError::BadRequest("Pick a category".to_string()))?;

            let draft = state
                .drafts
                .update(user_id, now, |draft| draft.category_id = Some(category_id))?;
            roles_step(&draft)
        }
        (TicketComponent::WizardRoles, ComponentInteractionDataKind::RoleSelect { values }) => {
            let roles: Vec<u64> = values.iter().map(|id| id.get()).collect();

            let draft = state
                .drafts
                .update(user_id, now, |draft| draft.support_roles = roles)?;
            confirm_step(&draft)
        }
        (TicketComponent::WizardConfirm, _) => {
            return confirm(state, ctx, component).await;
        }
        (TicketComponent::WizardCancel, _) => {
            state.drafts.discard(user_id);

            CreateInteractionResponseMessage::new()
                .embed(embed::warning_embed().description("Ticket button setup cancelled."))
                .components(Vec::new())
        }
        _ => {
            tracing::warn!(
                "Unexpected wizard interaction {} from {}",
                component.data.custom_id,
                user_id
            );
            return Ok(());
        }
    };

    component
        .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(next))
        .await?;

    Ok(())
}

async fn confirm(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
) -> Result<(), AppError> {
    let guild_id = component
        .guild_id
        .ok_or_else(|| AppError::BadRequest("Ticket buttons can only be created in a server".to_string()))?
        .get();

    let user_id = component.user.id.get();

    // The draft stays in place until the button exists, so a missing step can still
    // be completed after a validation error.
    let draft = state.drafts.get(user_id, Utc::now())?;
    let params = draft.build()?;

    let button = TicketPanelService::new(&state.db, &ctx.http)
        .add_button(guild_id, params)
        .await?;

    state.drafts.discard(user_id);

    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .embed(embed::success_embed().description(format!(
                        "Added **{}** (button #{}) to panel #{}.",
                        button.label, button.id, button.panel_id
                    )))
                    .components(Vec::new()),
            ),
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_only_filled_fields() {
        let mut draft = ButtonDraft::new(1, Utc::now());
        draft.label = Some("Support".to_string());
        draft.style = Some(TicketButtonStyle::Success);
        draft.support_roles = vec![5, 6];

        let summary = draft_summary(&draft);

        assert!(summary.contains("**Label:** Support"));
        assert!(summary.contains("**Style:** success"));
        assert!(summary.contains("<@&5>, <@&6>"));
        assert!(!summary.contains("Category"));
        assert!(!summary.contains("Emoji"));
    }

    #[test]
    fn summary_of_fresh_draft_marks_label_missing() {
        let draft = ButtonDraft::new(1, Utc::now());

        assert_eq!(draft_summary(&draft), "**Label:** not set");
    }
}

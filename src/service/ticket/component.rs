//! Custom ids of ticket message components and modals.
//!
//! Ids are `ticket:<action>[:<id>]`. Anything else belongs to another feature and
//! parses to `None`.

use std::fmt;

const PREFIX: &str = "ticket";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketComponent {
    /// Panel button opening a ticket, carries the button id.
    Open(i32),
    /// Panel select menu, carries the menu id. The selected value is the option id.
    Select(i32),
    Close,
    Claim,
    WizardDetails,
    WizardStyle,
    WizardCategory,
    WizardRoles,
    WizardConfirm,
    WizardCancel,
}

impl TicketComponent {
    pub fn custom_id(&self) -> String {
        self.to_string()
    }

    pub fn parse(custom_id: &str) -> Option<Self> {
        let mut parts = custom_id.split(':');
        if parts.next()? != PREFIX {
            return None;
        }

        let action = parts.next()?;
        let id = parts.next();

        let component = match (action, id) {
            ("open", Some(id)) => Self::Open(id.parse().ok()?),
            ("select", Some(id)) => Self::Select(id.parse().ok()?),
            ("close", None) => Self::Close,
            ("claim", None) => Self::Claim,
            ("wizard-details", None) => Self::WizardDetails,
            ("wizard-style", None) => Self::WizardStyle,
            ("wizard-category", None) => Self::WizardCategory,
            ("wizard-roles", None) => Self::WizardRoles,
            ("wizard-confirm", None) => Self::WizardConfirm,
            ("wizard-cancel", None) => Self::WizardCancel,
            _ => return None,
        };

        if parts.next().is_some() {
            return None;
        }

        Some(component)
    }
}

impl fmt::Display for TicketComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(id) => write!(f, "{}:open:{}", PREFIX, id),
            Self::Select(id) => write!(f, "{}:select:{}", PREFIX, id),
            Self::Close => write!(f, "{}:close", PREFIX),
            Self::Claim => write!(f, "{}:claim", PREFIX),
            Self::WizardDetails => write!(f, "{}:wizard-details", PREFIX),
            Self::WizardStyle => write!(f, "{}:wizard-style", PREFIX),
            Self::WizardCategory => write!(f, "{}:wizard-category", PREFIX),
            Self::WizardRoles => write!(f, "{}:wizard-roles", PREFIX),
            Self::WizardConfirm => write!(f, "{}:wizard-confirm", PREFIX),
            Self::WizardCancel => write!(f, "{}:wizard-cancel", PREFIX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_its_own_ids() {
        for component in [
            TicketComponent::Open(12),
            TicketComponent::Select(3),
            TicketComponent::Close,
            TicketComponent::WizardRoles,
        ] {
            assert_eq!(TicketComponent::parse(&component.custom_id()), Some(component));
        }
    }

    #[test]
    fn ignores_foreign_ids() {
        assert_eq!(TicketComponent::parse("music:skip"), None);
        assert_eq!(TicketComponent::parse("ticket"), None);
        assert_eq!(TicketComponent::parse("ticket:open"), None);
        assert_eq!(TicketComponent::parse("ticket:open:abc"), None);
        assert_eq!(TicketComponent::parse("ticket:close:1"), None);
    }
}

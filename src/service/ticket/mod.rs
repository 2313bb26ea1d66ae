//! Support tickets: panels, the button wizard, ticket channels and cases.

pub mod case;
pub mod component;
pub mod draft;
pub mod panel;
pub mod ticket;

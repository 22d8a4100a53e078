pub mod settings;
pub mod ticket_attachments;
pub mod tickets;
pub mod user;

pub use settings::Entity as Setting;
pub use ticket_attachments::Entity as TicketAttachment;
pub use tickets::Entity as Ticket;
pub use user::Entity as User;

//! 饭局域：已确认饭局、开放饭局看板与流程服务

pub mod events;
pub mod models;
pub mod service;

pub use events::{EventParticipant, OpenDiningEvent, OpenEventBoard};
pub use models::{DiningSession, DiningView, Participant};
pub use service::{DatingFlow, DiningService};

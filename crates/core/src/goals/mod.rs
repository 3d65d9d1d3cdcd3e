//! Goals module - savings goals, their schedules and transfer history.

mod goals_model;
mod goals_service;
mod goals_traits;
mod schedule_model;



pub use goals_model::{RecurringSavingsSetup, SavingsGoal, Transfer, TransferStatus, TransferType};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
pub use schedule_model::{ScheduleCadence, ScheduleDescriptor, ScheduleInterval};

//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod apartment;
pub mod expense;
pub mod maintenance;
mod maintenance_integration_tests;
pub mod member;

pub use apartment::{ApartmentChanges, ApartmentError, ApartmentRepository, CreateApartmentInput};
pub use expense::{CreateExpenseInput, ExpenseRepository};
pub use maintenance::{FundDashboard, MaintenanceRepository, PeriodFund, PostChargeInput};
pub use member::{CreateMemberInput, MemberChanges, MemberError, MemberRepository};

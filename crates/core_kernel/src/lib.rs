//! Core Kernel - Foundational types and utilities for the contract billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Temporal types for billing periods and rental windows
//! - Common identifiers and value objects
//! - Port infrastructure shared by all collaborator interfaces

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, Rate, MoneyError};
pub use temporal::{DateRange, TimeWindow, TemporalError};
pub use identifiers::{
    ContractId, ContractLineId, InvoiceId, OrderId, OrderLineId,
    SubcontractId, SubcontractTypeId, PartnerId, CompanyId,
    ProductId, PricelistId, JournalId, UserId,
};
pub use error::CoreError;
pub use ports::{PortError, DomainPort};

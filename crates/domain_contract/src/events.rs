//! Contract domain events
//!
//! Events are accumulated on the aggregate as actions succeed and drained
//! by the caller with `take_events()`, typically to feed an audit trail or
//! notification pipeline in the host system.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ContractId, InvoiceId};

/// Events emitted by the contract aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Confirmed {
        contract_id: ContractId,
        timestamp: DateTime<Utc>,
    },
    MarkedDone {
        contract_id: ContractId,
        timestamp: DateTime<Utc>,
    },
    Cancelled {
        contract_id: ContractId,
        timestamp: DateTime<Utc>,
    },
    ReturnedToDraft {
        contract_id: ContractId,
        timestamp: DateTime<Utc>,
    },
    InvoiceGenerated {
        contract_id: ContractId,
        invoice_id: InvoiceId,
        timestamp: DateTime<Utc>,
    },
    NextDateAdvanced {
        contract_id: ContractId,
        from: Option<NaiveDate>,
        to: NaiveDate,
        timestamp: DateTime<Utc>,
    },
}

//! Pending tab closures
//!
//! Closing a tab does not destroy it right away. The tab leaves the live list
//! and waits in a [`PendingClosureLedger`] until the host reports it ready to
//! commit, or the user undoes the close. The ledger keeps a [`RewoundView`]
//! of the list with every pending closure undone, which is where cancelled
//! tabs are reinserted from.

mod event;
mod ledger;
mod observer;
mod rewound;

pub use event::{ClosureEvent, UndoAction};
pub use ledger::PendingClosureLedger;
pub use observer::{LedgerEvent, PendingClosureObserver, RecordingObserver};
pub use rewound::RewoundView;

//! Call signaling: blobs are relayed verbatim to the addressed user, no
//! participant lookup involved.

use serde_json::Value;

use matchwire_core::error::Result;
use matchwire_core::protocol::server::{now_millis, PreparedFrame, ServerFrame};
use matchwire_core::types::UserId;

use crate::dispatch::Dispatcher;

pub(crate) fn relay_signal(
    d: &Dispatcher,
    sender: &UserId,
    to: &UserId,
    data: Value,
) -> Result<()> {
    let frame = PreparedFrame::encode(&ServerFrame::CallSignal {
        sender_id: sender.clone(),
        data,
        timestamp: now_millis(),
    })?;
    let delivered = d.registry.send_to(to, &frame);
    d.metrics.note_delivery(usize::from(delivered), 1);
    Ok(())
}

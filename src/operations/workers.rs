//! Worker operations: blocking, unblocking, notifying and listing blocks.

use serde::Serialize;

use crate::clients::{
    InvalidArgumentError, MturkClient, MturkError, OperationCall, OperationError, OperationResult,
    XmlNode,
};
use crate::operations::Operation;

/// Longest notification subject, in characters.
pub const MAX_SUBJECT_LENGTH: usize = 200;

/// Longest notification body, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// A worker, known by id.
///
/// Block state is only known once a call has touched the worker: it is
/// `None` for a fresh `Worker::new`, and set by [`block`](Self::block),
/// [`unblock`](Self::unblock) or when read from a block listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Worker {
    id: String,
    blocked: Option<bool>,
    block_reason: Option<String>,
}

impl Worker {
    /// Creates a worker handle from its id.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::EmptyValue`] if `id` is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidArgumentError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(InvalidArgumentError::EmptyValue { field: "worker id" });
        }
        Ok(Self {
            id,
            blocked: None,
            block_reason: None,
        })
    }

    /// Returns the worker id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns whether the worker is blocked, if known.
    #[must_use]
    pub const fn is_blocked(&self) -> Option<bool> {
        self.blocked
    }

    /// Returns the reason recorded for the block, if known.
    #[must_use]
    pub fn block_reason(&self) -> Option<&str> {
        self.block_reason.as_deref()
    }

    /// Blocks the worker. The worker never sees `reason`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::EmptyValue`] for an empty reason, and
    /// [`MturkError`] if the call fails at either tier.
    pub async fn block(&mut self, client: &MturkClient, reason: &str) -> Result<(), MturkError> {
        if reason.is_empty() {
            return Err(InvalidArgumentError::EmptyValue { field: "reason" }.into());
        }
        let call = OperationCall::builder(Operation::BlockWorker.name())
            .param("WorkerId", self.id.as_str())
            .param("Reason", reason)
            .build()?;
        run(client, Operation::BlockWorker, &call).await?;

        self.blocked = Some(true);
        self.block_reason = Some(reason.to_string());
        Ok(())
    }

    /// Lifts a block. `reason` is optional and only kept by the provider.
    ///
    /// # Errors
    ///
    /// Returns [`MturkError`] if the call fails at either tier.
    pub async fn unblock(
        &mut self,
        client: &MturkClient,
        reason: Option<&str>,
    ) -> Result<(), MturkError> {
        let call = OperationCall::builder(Operation::UnblockWorker.name())
            .param("WorkerId", self.id.as_str())
            .param_opt("Reason", reason)
            .build()?;
        run(client, Operation::UnblockWorker, &call).await?;

        self.blocked = Some(false);
        self.block_reason = None;
        Ok(())
    }

    /// Emails the worker. HTML is not allowed in `message`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::LengthOutOfRange`] unless `subject` has
    /// 1 to [`MAX_SUBJECT_LENGTH`] characters and `message` 1 to
    /// [`MAX_MESSAGE_LENGTH`], [`OperationError::Rejected`] if the provider
    /// reports a delivery failure for this worker (typically because they
    /// never worked for the requester), and [`MturkError`] if the call fails
    /// at either tier.
    pub async fn notify(
        &self,
        client: &MturkClient,
        subject: &str,
        message: &str,
    ) -> Result<(), MturkError> {
        check_length("subject", subject, MAX_SUBJECT_LENGTH)?;
        check_length("message", message, MAX_MESSAGE_LENGTH)?;

        let call = OperationCall::builder(Operation::NotifyWorkers.name())
            .param("WorkerId.1", self.id.as_str())
            .param("Subject", subject)
            .param("MessageText", message)
            .build()?;

        match run(client, Operation::NotifyWorkers, &call).await? {
            OperationResult::Payload(result) => match result.child("NotifyWorkersFailureStatus") {
                Some(failure) => Err(delivery_failure(failure).into()),
                None => Ok(()),
            },
            OperationResult::Empty => Ok(()),
        }
    }

    /// Returns blocked workers, at most `max` of them when set.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::NegativeMaxRecords`] for a negative
    /// `max`, and [`MturkError`] from the first page that fails.
    pub async fn blocked(client: &MturkClient, max: Option<i64>) -> Result<Vec<Self>, MturkError> {
        let call = OperationCall::builder(Operation::GetBlockedWorkers.name()).build()?;
        let mut pages = client.paginate(call);
        pages.set_max_records(max)?;

        let blocks = pages.collect_all("WorkerBlock").await?;
        Ok(blocks.iter().map(Self::from_block).collect())
    }

    /// Looks `id` up among blocked workers, stopping at the first match.
    ///
    /// Returns `Ok(None)` if the worker is not blocked.
    ///
    /// # Errors
    ///
    /// Returns [`MturkError`] from the first page that fails.
    pub async fn find_blocked(client: &MturkClient, id: &str) -> Result<Option<Self>, MturkError> {
        let call = OperationCall::builder(Operation::GetBlockedWorkers.name()).build()?;
        let mut pages = client.paginate(call);

        while let Some(page) = pages.fetch_next_page().await? {
            if let Some(block) = page
                .result
                .children_named("WorkerBlock")
                .find(|block| block.child_text("WorkerId") == Some(id))
            {
                return Ok(Some(Self::from_block(block)));
            }
        }
        Ok(None)
    }

    fn from_block(block: &XmlNode) -> Self {
        Self {
            id: block.child_text("WorkerId").unwrap_or_default().to_string(),
            blocked: Some(true),
            block_reason: block.child_text("Reason").map(str::to_string),
        }
    }
}

async fn run(
    client: &MturkClient,
    operation: Operation,
    call: &OperationCall,
) -> Result<OperationResult, MturkError> {
    let envelope = client.execute(call).await?;
    Ok(envelope.retrieve_result(&operation.result_name())?)
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), InvalidArgumentError> {
    let actual = value.chars().count();
    if (1..=max).contains(&actual) {
        Ok(())
    } else {
        Err(InvalidArgumentError::LengthOutOfRange {
            field,
            min: 1,
            max,
            actual,
        })
    }
}

fn delivery_failure(failure: &XmlNode) -> OperationError {
    let reason = failure
        .child_text("NotifyWorkersFailureMessage")
        .unwrap_or("unknown reason");
    OperationError::Rejected {
        message: format!("It was impossible to send the message: {reason}"),
        code: failure
            .child_text("NotifyWorkersFailureCode")
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_worker_has_unknown_block_state() {
        let worker = Worker::new("A3D9BS7QW6ORGG").unwrap();
        assert_eq!(worker.id(), "A3D9BS7QW6ORGG");
        assert_eq!(worker.is_blocked(), None);
        assert_eq!(worker.block_reason(), None);
    }

    #[test]
    fn test_new_worker_rejects_blank_id() {
        assert_eq!(
            Worker::new(" "),
            Err(InvalidArgumentError::EmptyValue { field: "worker id" })
        );
    }

    #[test]
    fn test_check_length_counts_characters() {
        assert!(check_length("subject", "é".repeat(200).as_str(), MAX_SUBJECT_LENGTH).is_ok());
        assert_eq!(
            check_length("subject", "", MAX_SUBJECT_LENGTH),
            Err(InvalidArgumentError::LengthOutOfRange {
                field: "subject",
                min: 1,
                max: 200,
                actual: 0,
            })
        );
        assert!(check_length("message", &"x".repeat(4097), MAX_MESSAGE_LENGTH).is_err());
        assert!(check_length("message", &"x".repeat(4096), MAX_MESSAGE_LENGTH).is_ok());
    }

    #[test]
    fn test_from_block_reads_id_and_reason() {
        let block = XmlNode::parse(
            "<WorkerBlock><WorkerId>W1</WorkerId><Reason>Spam</Reason></WorkerBlock>",
        )
        .unwrap();
        let worker = Worker::from_block(&block);
        assert_eq!(worker.id(), "W1");
        assert_eq!(worker.is_blocked(), Some(true));
        assert_eq!(worker.block_reason(), Some("Spam"));
    }

    #[test]
    fn test_delivery_failure_message_and_code() {
        let failure = XmlNode::parse(
            "<NotifyWorkersFailureStatus>\
             <NotifyWorkersFailureCode>HardFailure</NotifyWorkersFailureCode>\
             <NotifyWorkersFailureMessage>Cannot send</NotifyWorkersFailureMessage>\
             <WorkerId>W1</WorkerId></NotifyWorkersFailureStatus>",
        )
        .unwrap();
        let error = delivery_failure(&failure);
        assert_eq!(error.code(), Some("HardFailure"));
        assert!(error.to_string().ends_with("Cannot send"));
    }
}

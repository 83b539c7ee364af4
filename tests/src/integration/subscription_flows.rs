//! # Subscription Lifecycle Flows
//!
//! RIC Subscription Create and Delete driven end to end: the manager sends
//! through the in-process transport, the test plays the node, and every
//! answer goes back through the dispatcher.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use kpm_01_subscription::{
        DeletionApi, ExpiryCleanup, FailureReason, LifecycleConfigBuilder, LifecycleError,
        ProcedureState, SubscriptionApi, SubscriptionCodec, TimerOutcome,
    };
    use shared_types::{MessageType, NodeIdentity};
    use xapp_runtime::adapters::SerdeCodec;
    use xapp_runtime::DispatchOutcome;

    use crate::integration::{Harness, FUNC_ID};

    const RAN: &str = "gnb_734_733_b5c67788";

    // =========================================================================
    // CREATE: first answer wins
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_response_confirms_and_cancels_timer() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();
        assert_eq!(armed.attempts, 1);

        let requests = h.sent_of(MessageType::SubscriptionRequest);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].sub_id, -1);

        let params = h.codec.decode_subscription_request(&requests[0].payload).unwrap();
        assert_eq!(params.func_id, FUNC_ID);
        assert_eq!(params.actions.len(), params.subsequent_actions.len());
        let trigger = h.codec.decode_event_trigger(&params.event_trigger).unwrap();
        assert!(trigger.count >= 1);

        let outcome = dispatcher
            .dispatch(h.subscription_response(RAN, 1001, vec![1]))
            .await;
        assert_eq!(outcome, DispatchOutcome::Handled(MessageType::SubscriptionResponse));
        assert_eq!(armed.timer.await.unwrap(), TimerOutcome::Cancelled);

        let record = h.context.subscriptions.record(RAN).unwrap();
        assert_eq!(record.state, ProcedureState::Confirmed);
        assert_eq!(record.sub_id, 1001);
        assert_eq!(record.response.unwrap().admitted, vec![1]);
        assert!(h.context.subscriptions.answered_table().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_answer_is_ignored() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();

        let first = dispatcher
            .dispatch(h.subscription_response(RAN, 1001, vec![1]))
            .await;
        let second = dispatcher
            .dispatch(h.answer(MessageType::SubscriptionFailure, RAN, 1001))
            .await;
        assert_eq!(first, DispatchOutcome::Handled(MessageType::SubscriptionResponse));
        assert_eq!(second, DispatchOutcome::Ignored(MessageType::SubscriptionFailure));

        armed.timer.await.unwrap();
        assert_eq!(
            h.context.subscriptions.record(RAN).unwrap().state,
            ProcedureState::Confirmed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_message_rejects() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();
        let outcome = dispatcher
            .dispatch(h.answer(MessageType::SubscriptionFailure, RAN, 1001))
            .await;
        assert_eq!(outcome, DispatchOutcome::Handled(MessageType::SubscriptionFailure));
        assert_eq!(armed.timer.await.unwrap(), TimerOutcome::Cancelled);

        let record = h.context.subscriptions.record(RAN).unwrap();
        assert_eq!(record.state, ProcedureState::Failed);
        assert_eq!(record.failure, Some(FailureReason::Rejected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_after_expiry_is_late() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();
        assert_eq!(armed.timer.await.unwrap(), TimerOutcome::Expired);
        assert_eq!(
            h.context.subscriptions.record(RAN).unwrap().state,
            ProcedureState::Expired
        );

        let outcome = dispatcher
            .dispatch(h.subscription_response(RAN, 1001, vec![1]))
            .await;
        assert_eq!(outcome, DispatchOutcome::Ignored(MessageType::SubscriptionResponse));
        assert_eq!(
            h.context.subscriptions.record(RAN).unwrap().state,
            ProcedureState::Expired
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_response_cancels_procedure() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();
        let outcome = dispatcher
            .dispatch(h.answer(MessageType::SubscriptionResponse, RAN, 1001))
            .await;
        assert_eq!(outcome, DispatchOutcome::Failed(MessageType::SubscriptionResponse));
        assert_eq!(armed.timer.await.unwrap(), TimerOutcome::Cancelled);
        assert_eq!(
            h.context.subscriptions.record(RAN).unwrap().state,
            ProcedureState::Cancelled
        );
    }

    // =========================================================================
    // CREATE: send retries
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_refused_sends_retry_then_arm_one_timer() {
        let lifecycle = LifecycleConfigBuilder::new()
            .max_send_attempts(5)
            .retry_delay(Duration::from_secs(1))
            .build()
            .unwrap();
        let h = Harness::new(&[RAN], lifecycle);
        h.transport.fail_next(2);

        let start = tokio::time::Instant::now();
        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();

        assert_eq!(armed.attempts, 3);
        assert_eq!(h.transport.attempts(), 3);
        assert_eq!(h.transport.sent_count(), 1);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3));
        assert_eq!(h.context.subscriptions.answered_table().len(), 1);
        assert_eq!(h.context.subscriptions.record(RAN).unwrap().send_attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_sends_fail_without_timer() {
        let lifecycle = LifecycleConfigBuilder::new()
            .max_send_attempts(3)
            .retry_delay(Duration::from_millis(100))
            .build()
            .unwrap();
        let h = Harness::new(&[RAN], lifecycle);
        h.transport.set_fail_always(true);

        let err = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LifecycleError::SendAttemptsExhausted { attempts: 3, .. }
        ));
        assert_eq!(h.transport.attempts(), 3);
        assert!(h.context.subscriptions.answered_table().is_empty());

        let record = h.context.subscriptions.record(RAN).unwrap();
        assert_eq!(record.state, ProcedureState::Failed);
        assert_eq!(
            record.failure,
            Some(FailureReason::SendAttemptsExhausted { attempts: 3 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_while_pending_is_rejected() {
        let h = Harness::with_defaults(&[RAN]);

        let _armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();
        let err = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::AlreadyPending { .. }));
        assert_eq!(h.transport.sent_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nodes_are_independent() {
        let h = Harness::with_defaults(&["gnb_a", "gnb_b"]);
        let dispatcher = h.context.dispatcher();

        let a = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named("gnb_a"), FUNC_ID)
            .await
            .unwrap();
        let b = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named("gnb_b"), FUNC_ID)
            .await
            .unwrap();

        dispatcher
            .dispatch(h.subscription_response("gnb_a", 1, vec![1]))
            .await;

        assert_eq!(a.timer.await.unwrap(), TimerOutcome::Cancelled);
        assert_eq!(b.timer.await.unwrap(), TimerOutcome::Expired);
        assert_eq!(
            h.context.subscriptions.record("gnb_a").unwrap().state,
            ProcedureState::Confirmed
        );
        assert_eq!(
            h.context.subscriptions.record("gnb_b").unwrap().state,
            ProcedureState::Expired
        );
    }

    // =========================================================================
    // DELETE and expiry cleanup
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_delete_confirmed_through_dispatcher() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let armed = h
            .context
            .deletions
            .start_deletion(NodeIdentity::named(RAN), 1001, FUNC_ID)
            .await
            .unwrap();

        let requests = h.sent_of(MessageType::SubscriptionDeleteRequest);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].sub_id, 1001);
        let params = h.codec.decode_subscription_delete(&requests[0].payload).unwrap();
        assert_eq!(params.func_id, FUNC_ID);

        let outcome = dispatcher
            .dispatch(h.answer(MessageType::SubscriptionDeleteResponse, RAN, 1001))
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled(MessageType::SubscriptionDeleteResponse)
        );
        assert_eq!(armed.timer.await.unwrap(), TimerOutcome::Cancelled);
        assert_eq!(
            h.context.deletions.record(RAN).unwrap().state,
            ProcedureState::Confirmed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_is_not_retried() {
        let h = Harness::with_defaults(&[RAN]);
        h.transport.fail_next(1);

        let err = h
            .context
            .deletions
            .start_deletion(NodeIdentity::named(RAN), 1001, FUNC_ID)
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::Transport(_)));
        assert_eq!(h.transport.attempts(), 1);
        assert!(h.context.deletions.answered_table().is_empty());
        assert_eq!(
            h.context.deletions.record(RAN).unwrap().state,
            ProcedureState::Failed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_cleanup_sends_delete() {
        let lifecycle = LifecycleConfigBuilder::new()
            .expiry_cleanup(ExpiryCleanup::SendDelete)
            .build()
            .unwrap();
        let h = Harness::new(&[RAN], lifecycle);
        let dispatcher = h.context.dispatcher();

        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();
        assert_eq!(armed.timer.await.unwrap(), TimerOutcome::Expired);

        let deletes = h.sent_of(MessageType::SubscriptionDeleteRequest);
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].ran_name(), RAN);
        assert_eq!(
            h.context.deletions.record(RAN).unwrap().state,
            ProcedureState::Pending
        );

        let outcome = dispatcher
            .dispatch(h.answer(MessageType::SubscriptionDeleteResponse, RAN, -1))
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled(MessageType::SubscriptionDeleteResponse)
        );
        assert_eq!(
            h.context.deletions.record(RAN).unwrap().state,
            ProcedureState::Confirmed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_without_cleanup_sends_nothing() {
        let h = Harness::with_defaults(&[RAN]);

        let armed = h
            .context
            .subscriptions
            .start_subscription(NodeIdentity::named(RAN), FUNC_ID)
            .await
            .unwrap();
        assert_eq!(armed.timer.await.unwrap(), TimerOutcome::Expired);

        assert!(h.sent_of(MessageType::SubscriptionDeleteRequest).is_empty());
        assert!(h.context.deletions.record(RAN).is_none());
    }

    #[test]
    fn test_codec_rejects_zero_report_count() {
        let codec = SerdeCodec::new();
        assert!(codec.encode_event_trigger(0, 10).is_err());
        assert!(codec.encode_event_trigger(1, 10).is_ok());
    }
}

//! End-to-end payment flow tests against the service facade

use aliaspay_core::{
    Alias, AliasPay, Amount, Direction, LatencyProfile, TeamMember, TxStatus,
};

fn service() -> AliasPay {
    AliasPay::with_seed(Alias::parse("me@example.com").unwrap(), 99)
}

fn addr(tag: u8) -> String {
    format!("0x{}", hex_bytes(tag))
}

fn hex_bytes(tag: u8) -> String {
    [tag; 20].iter().map(|b| format!("{b:02x}")).collect()
}

#[tokio::test]
async fn test_send_and_read_back_history() {
    let service = service();

    let receipt = service
        .send_payment("alice@example.com", "100.00", Some("Lunch payment"))
        .await
        .expect("send failed");
    assert!(receipt.ok);
    assert!(receipt.tx_hash.is_some());

    let history = service.history("alice@example.com").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].direction, Direction::In);
    assert_eq!(history[0].status, TxStatus::Success);
    assert_eq!(history[0].amount, Amount::parse("100.00").unwrap());
    assert_eq!(history[0].note.as_deref(), Some("Lunch payment"));

    let sent = service.history("me@example.com").await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].direction, Direction::Out);
    assert_eq!(sent[0].counterparty, "alice@example.com");
}

#[tokio::test]
async fn test_history_is_newest_first_and_sliceable() {
    let service = service();

    for amount in ["1.00", "2.00", "3.00"] {
        let receipt = service
            .send_payment("bob@example.com", amount, None)
            .await
            .unwrap();
        assert!(receipt.ok);
    }

    let history = service.history("bob@example.com").await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].amount, Amount::parse("3.00").unwrap());
    assert_eq!(history[2].amount, Amount::parse("1.00").unwrap());

    // Callers page by index
    let page = &history[..2];
    assert_eq!(page.len(), 2);
}

#[tokio::test]
async fn test_team_split_end_to_end() {
    let service = service();

    let members = vec![
        TeamMember::new(addr(0xaa), 60).with_alias("a@example.com"),
        TeamMember::new(addr(0xbb), 40).with_alias("b@example.com"),
    ];
    assert!(service
        .set_routing_rule("@hack-team", members)
        .await
        .unwrap());

    let receipt = service
        .send_payment("anyone@example.com", "1.00", None)
        .await
        .unwrap();
    assert!(receipt.ok);

    let receipt = service.send_payment("@hack-team", "10.00", None).await.unwrap();
    assert!(receipt.ok);

    let a = service.history("a@example.com").await.unwrap();
    let b = service.history("b@example.com").await.unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(a[0].direction, Direction::In);
    assert_eq!(b[0].direction, Direction::In);
    assert_eq!(a[0].amount, Amount::parse("6.00").unwrap());
    assert_eq!(b[0].amount, Amount::parse("4.00").unwrap());

    let total = a[0].amount.saturating_add(&b[0].amount);
    assert_eq!(total, Amount::parse("10.00").unwrap());
}

#[tokio::test]
async fn test_uneven_split_reconciles_exactly() {
    let service = service();

    let members = vec![
        TeamMember::new(addr(1), 33).with_alias("x@example.com"),
        TeamMember::new(addr(2), 33).with_alias("y@example.com"),
        TeamMember::new(addr(3), 34).with_alias("z@example.com"),
    ];
    assert!(service.set_routing_rule("@trio", members).await.unwrap());

    let receipt = service.send_payment("@trio", "100.00", None).await.unwrap();
    assert!(receipt.ok);

    let mut total = Amount::zero();
    for key in ["x@example.com", "y@example.com", "z@example.com"] {
        let history = service.history(key).await.unwrap();
        assert_eq!(history.len(), 1);
        total = total.saturating_add(&history[0].amount);
    }
    assert_eq!(total, Amount::parse("100.00").unwrap());
}

#[tokio::test]
async fn test_simulated_failure_is_atomic() {
    let service = AliasPay::with_seed(Alias::parse("me@example.com").unwrap(), 7)
        .with_failure_rate(1.0)
        .with_latency(LatencyProfile::none());

    let members = vec![
        TeamMember::new(addr(1), 50).with_alias("p@example.com"),
        TeamMember::new(addr(2), 50).with_alias("q@example.com"),
    ];
    assert!(service.set_routing_rule("@duo", members).await.unwrap());

    let receipt = service.send_payment("@duo", "50.00", None).await.unwrap();
    assert!(!receipt.ok);
    assert!(receipt.tx_hash.is_none());

    // No orphan legs anywhere
    assert!(service.history("me@example.com").await.unwrap().is_empty());
    assert!(service.history("@duo").await.unwrap().is_empty());
    assert!(service.history("p@example.com").await.unwrap().is_empty());
    assert!(service.history("q@example.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_failures_do_not_mutate() {
    let service = service();

    assert!(service
        .send_payment("carol@example.com", "12.345", None)
        .await
        .is_err());
    assert!(service
        .send_payment("carol@example.com", "-5", None)
        .await
        .is_err());
    assert!(service
        .send_payment("carol@example.com", "1000000", None)
        .await
        .is_err());
    let long_note = "n".repeat(121);
    assert!(service
        .send_payment("carol@example.com", "1.00", Some(&long_note))
        .await
        .is_err());
    assert!(service.send_payment("junk", "1.00", None).await.is_err());

    assert!(service.history("carol@example.com").await.unwrap().is_empty());
    assert!(service.history("me@example.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resubmission_creates_new_transaction() {
    let service = service();

    let first = service
        .send_payment("dan@example.com", "5.00", None)
        .await
        .unwrap();
    let second = service
        .send_payment("dan@example.com", "5.00", None)
        .await
        .unwrap();
    assert!(first.ok && second.ok);
    assert_ne!(first.tx_hash, second.tx_hash);

    let history = service.history("dan@example.com").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_ne!(history[0].id, history[1].id);
}

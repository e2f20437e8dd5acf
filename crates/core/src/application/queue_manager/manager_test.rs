//! Unit tests for the queue manager

use super::*;
use crate::port::time_provider::mocks::ManualTimeProvider;
use std::collections::HashSet;

const START: i64 = 1_700_000_000_000;

fn manager() -> (QueueManager, Arc<ManualTimeProvider>) {
    let clock = Arc::new(ManualTimeProvider::new(START));
    let manager = QueueManager::from_config(&QueueConfig::default(), clock.clone()).unwrap();
    (manager, clock)
}

fn assert_consistent(manager: &QueueManager) {
    manager.state().check_invariants().unwrap();
}

#[test]
fn test_birth_certificate_scenario() {
    let (mut qm, clock) = manager();

    let first = qm.enqueue("civil-registration", "Birth Certificate").unwrap();
    assert_eq!(first.token, "A01");
    assert_eq!(first.status, TicketStatus::Waiting);
    clock.advance_minutes(1);
    let second = qm.enqueue("civil-registration", "Birth Certificate").unwrap();
    assert_eq!(second.token, "A02");

    let called = qm.call_next("counter-1").unwrap();
    assert_eq!(called.token, "A01");
    assert_eq!(called.status, TicketStatus::InProgress);
    assert_consistent(&qm);

    clock.advance_minutes(9);
    let done = qm.complete_service("counter-1").unwrap();
    assert_eq!(done.token, "A01");
    assert_eq!(done.status, TicketStatus::Completed);
    assert_eq!(done.wait_minutes(), Some(10));
    assert_eq!(qm.state().history().len(), 1);
    assert_eq!(qm.state().history()[0].status, TicketStatus::Completed);
    assert!(qm.counter("counter-1").unwrap().current_token.is_none());

    assert_eq!(
        qm.position_of("A02").unwrap(),
        TicketPosition::Waiting {
            position: 1,
            estimated_wait_minutes: 15
        }
    );
    assert_consistent(&qm);
}

#[test]
fn test_enqueue_invalid_department() {
    let (mut qm, _) = manager();
    assert_eq!(
        qm.enqueue("passport-office", "Passport"),
        Err(QueueError::InvalidDepartment("passport-office".to_string()))
    );
    assert_eq!(qm.count(TicketStatus::Waiting), 0);
}

#[test]
fn test_call_next_is_fifo_within_department() {
    let (mut qm, clock) = manager();
    qm.enqueue("treasury", "Tax Payment").unwrap(); // C01
    clock.advance_millis(10);
    qm.enqueue("civil-registration", "Death Certificate").unwrap(); // A01
    clock.advance_millis(10);
    qm.enqueue("treasury", "Property Tax").unwrap(); // C02

    // counter-3 serves treasury
    assert_eq!(qm.call_next("counter-3").unwrap().token, "C01");
    qm.complete_service("counter-3").unwrap();
    assert_eq!(qm.call_next("counter-3").unwrap().token, "C02");
    // civil registration ticket untouched
    assert_eq!(qm.pending_for(Department::CivilRegistration).len(), 1);
    assert_consistent(&qm);
}

#[test]
fn test_call_next_on_busy_counter() {
    let (mut qm, _) = manager();
    qm.enqueue("civil-registration", "Birth Certificate").unwrap();
    qm.enqueue("civil-registration", "Marriage Certificate").unwrap();

    qm.call_next("counter-1").unwrap();
    assert_eq!(
        qm.call_next("counter-1"),
        Err(QueueError::CounterBusy {
            counter_id: "counter-1".to_string(),
            token: "A01".to_string(),
        })
    );
    // A02 still waiting at the head
    assert_eq!(qm.position_of("A02").unwrap().position(), 1);
    assert_consistent(&qm);
}

#[test]
fn test_call_next_empty_department() {
    let (mut qm, _) = manager();
    qm.enqueue("treasury", "Tax Payment").unwrap();
    assert_eq!(
        qm.call_next("counter-1"),
        Err(QueueError::QueueEmpty(Department::CivilRegistration))
    );
}

#[test]
fn test_unknown_counter() {
    let (mut qm, _) = manager();
    assert_eq!(
        qm.call_next("counter-42"),
        Err(QueueError::UnknownCounter("counter-42".to_string()))
    );
    assert_eq!(
        qm.complete_service("counter-42"),
        Err(QueueError::UnknownCounter("counter-42".to_string()))
    );
}

#[test]
fn test_finish_without_active_service() {
    let (mut qm, _) = manager();
    assert_eq!(
        qm.complete_service("counter-2"),
        Err(QueueError::NoActiveService("counter-2".to_string()))
    );
    assert_eq!(
        qm.mark_no_show("counter-2"),
        Err(QueueError::NoActiveService("counter-2".to_string()))
    );
}

#[test]
fn test_mark_no_show() {
    let (mut qm, clock) = manager();
    qm.enqueue("driver-services", "License Renewal").unwrap();
    qm.call_next("counter-4").unwrap();
    clock.advance_minutes(3);

    let ticket = qm.mark_no_show("counter-4").unwrap();
    assert_eq!(ticket.token, "D01");
    assert_eq!(ticket.status, TicketStatus::NoShow);
    assert!(ticket.wait_duration_ms.is_none());
    assert_eq!(ticket.completed_at, Some(START + 3 * 60_000));
    assert_eq!(qm.count(TicketStatus::NoShow), 1);
    assert!(!qm.counter("counter-4").unwrap().is_busy());
    assert_consistent(&qm);
}

#[test]
fn test_position_of_being_served_and_missing() {
    let (mut qm, _) = manager();
    qm.enqueue("vehicle-services", "Vehicle Registration").unwrap();
    qm.call_next("counter-5").unwrap();

    let position = qm.position_of("V01").unwrap();
    assert_eq!(
        position,
        TicketPosition::BeingServed {
            counter_id: "counter-5".to_string()
        }
    );
    assert_eq!(position.position(), 0);

    assert_eq!(
        qm.position_of("V02"),
        Err(QueueError::NotFound("V02".to_string()))
    );

    qm.complete_service("counter-5").unwrap();
    // Terminal tickets have no position
    assert_eq!(
        qm.position_of("V01"),
        Err(QueueError::NotFound("V01".to_string()))
    );
}

#[test]
fn test_position_counts_only_same_department() {
    let (mut qm, _) = manager();
    qm.enqueue("treasury", "Tax Payment").unwrap();
    qm.enqueue("treasury", "Tax Clearance").unwrap();
    qm.enqueue("licenses-permits", "Business Permit").unwrap();
    qm.enqueue("treasury", "Property Tax").unwrap();

    assert_eq!(qm.position_of("B01").unwrap().position(), 1);
    assert_eq!(
        qm.position_of("C03").unwrap(),
        TicketPosition::Waiting {
            position: 3,
            estimated_wait_minutes: 45
        }
    );
}

#[test]
fn test_active_tokens_stay_unique_across_cycles() {
    let (mut qm, clock) = manager();

    for round in 0..250 {
        clock.advance_millis(1);
        qm.enqueue("civil-registration", format!("Service {}", round))
            .unwrap();
        // Hold 50 tickets active, then serve one per arrival so tokens wrap
        if round >= 50 {
            qm.call_next("counter-1").unwrap();
            if round % 2 == 0 {
                qm.complete_service("counter-1").unwrap();
            } else {
                qm.mark_no_show("counter-1").unwrap();
            }
        }

        let active = qm.active_tokens();
        let unique: HashSet<&Token> = active.iter().collect();
        assert_eq!(unique.len(), active.len(), "duplicate token in round {}", round);
    }
    assert_consistent(&qm);
}

#[test]
fn test_token_space_exhausted() {
    let (mut qm, _) = manager();
    for _ in 0..99 {
        qm.enqueue("treasury", "Tax Payment").unwrap();
    }
    assert_eq!(
        qm.enqueue("treasury", "Tax Payment"),
        Err(QueueError::TokenSpaceExhausted(Department::Treasury))
    );

    // Freeing one token makes room again
    qm.call_next("counter-3").unwrap();
    qm.complete_service("counter-3").unwrap();
    assert_eq!(qm.enqueue("treasury", "Tax Payment").unwrap().token, "C01");
    assert_consistent(&qm);
}

#[test]
fn test_issuance_never_goes_backwards() {
    let (mut qm, clock) = manager();
    qm.enqueue("treasury", "Tax Payment").unwrap();
    clock.set(START - 60_000);
    let late = qm.enqueue("treasury", "Tax Payment").unwrap();
    assert_eq!(late.issued_at, START);
    assert_consistent(&qm);
}

#[test]
fn test_find_ticket_prefers_active_then_latest_history() {
    let (mut qm, _) = manager();
    qm.enqueue("civil-registration", "Birth Certificate").unwrap();
    qm.call_next("counter-1").unwrap();

    assert_eq!(
        qm.find_ticket("A01").unwrap().status,
        TicketStatus::InProgress
    );
    qm.mark_no_show("counter-1").unwrap();
    assert_eq!(qm.find_ticket("A01").unwrap().status, TicketStatus::NoShow);
    assert!(qm.find_ticket("A99").is_none());
}

#[test]
fn test_add_counter_duplicate() {
    let (mut qm, _) = manager();
    assert_eq!(
        qm.add_counter("counter-1", "Again", Department::Treasury),
        Err(QueueError::DuplicateCounter("counter-1".to_string()))
    );
    qm.add_counter("counter-6", "Counter 6", Department::CivilRegistration)
        .unwrap();

    qm.enqueue("civil-registration", "Birth Certificate").unwrap();
    qm.enqueue("civil-registration", "Birth Certificate").unwrap();
    assert_eq!(qm.call_next("counter-1").unwrap().token, "A01");
    assert_eq!(qm.call_next("counter-6").unwrap().token, "A02");
    assert_consistent(&qm);
}

#[test]
fn test_from_config_rejects_invalid() {
    let config = QueueConfig {
        per_ticket_estimate_minutes: 0,
        ..QueueConfig::default()
    };
    let clock = Arc::new(ManualTimeProvider::new(START));
    assert!(QueueManager::from_config(&config, clock).is_err());
}

#[test]
fn test_snapshot_is_detached_copy() {
    let (mut qm, clock) = manager();
    qm.enqueue("civil-registration", "Birth Certificate").unwrap();
    clock.advance_millis(500);

    let snapshot = qm.snapshot();
    assert_eq!(snapshot.taken_at, START + 500);
    qm.call_next("counter-1").unwrap();

    assert_eq!(snapshot.state.pending().count(), 1);
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["state"]["pending"][0]["token"], "A01");
    assert_eq!(json["takenAt"], START + 500);
}

#[test]
fn test_position_serialization() {
    let json = serde_json::to_value(TicketPosition::Waiting {
        position: 2,
        estimated_wait_minutes: 30,
    })
    .unwrap();
    assert_eq!(json["state"], "waiting");
    assert_eq!(json["estimatedWaitMinutes"], 30);

    let json = serde_json::to_value(TicketPosition::BeingServed {
        counter_id: "counter-1".to_string(),
    })
    .unwrap();
    assert_eq!(json["state"], "being-served");
    assert_eq!(json["counterId"], "counter-1");
}

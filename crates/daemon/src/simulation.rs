//! Simulated intake and counter operators
//!
//! Drives a `SharedQueueManager` the way a lobby would: citizens take tickets
//! at random, operators call, serve, or give up on the citizen in front of them.
//! The queue core does not know it is being simulated.

use crate::settings::SimulationConfig;
use queuedesk_core::application::ShutdownToken;
use queuedesk_core::domain::{Department, Ticket};
use queuedesk_core::{QueueError, SharedQueueManager};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{info, warn};

/// Services offered per department
pub fn service_catalog(department: Department) -> &'static [&'static str] {
    match department {
        Department::CivilRegistration => {
            &["Birth Certificate", "Death Certificate", "Marriage Certificate"]
        }
        Department::LicensesPermits => &["Business Permit", "Building Permit", "Trade License"],
        Department::Treasury => &["Property Tax Payment", "Tax Clearance", "Fee Refund"],
        Department::DriverServices => &["License Renewal", "Learner Permit", "Driving Test Booking"],
        Department::VehicleServices => &["Vehicle Registration", "Ownership Transfer", "Plate Replacement"],
    }
}

/// What an operator did on a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorAction {
    Called { counter_id: String, token: String },
    Completed { counter_id: String, token: String },
    NoShow { counter_id: String, token: String },
}

pub struct Simulation {
    queue: SharedQueueManager,
    config: SimulationConfig,
    rng: StdRng,
}

impl Simulation {
    pub fn new(queue: SharedQueueManager, config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { queue, config, rng }
    }

    /// Maybe issue one ticket for a department that has a counter
    pub fn intake_tick(&mut self) -> Option<Ticket> {
        if !self.rng.gen_bool(self.config.arrival_probability) {
            return None;
        }

        let mut staffed: Vec<Department> = self
            .queue
            .counters()
            .into_iter()
            .map(|(_, dept, _)| dept)
            .collect();
        staffed.sort();
        staffed.dedup();

        let department = *staffed.choose(&mut self.rng)?;
        let service = *service_catalog(department).choose(&mut self.rng)?;

        match self.queue.enqueue_for(department, service) {
            Ok(ticket) => {
                info!(
                    token = %ticket.token,
                    department = %department,
                    service = %service,
                    "New ticket joined the queue"
                );
                Some(ticket)
            }
            Err(e) => {
                warn!(department = %department, error = %e, "Ticket issuance refused");
                None
            }
        }
    }

    /// Let every counter act once
    pub fn operator_tick(&mut self) -> Vec<OperatorAction> {
        let mut actions = Vec::new();

        for (counter_id, _, busy) in self.queue.counters() {
            let action = if busy {
                if self.rng.gen_bool(self.config.no_show_probability) {
                    self.queue
                        .mark_no_show(&counter_id)
                        .map(|t| OperatorAction::NoShow {
                            counter_id: counter_id.clone(),
                            token: t.token,
                        })
                } else {
                    self.queue
                        .complete_service(&counter_id)
                        .map(|t| OperatorAction::Completed {
                            counter_id: counter_id.clone(),
                            token: t.token,
                        })
                }
            } else {
                self.queue
                    .call_next(&counter_id)
                    .map(|t| OperatorAction::Called {
                        counter_id: counter_id.clone(),
                        token: t.token,
                    })
            };

            match action {
                Ok(action) => {
                    info!(?action, "Operator action");
                    actions.push(action);
                }
                Err(QueueError::QueueEmpty(_)) => {}
                Err(e) => warn!(counter_id = %counter_id, error = %e, "Operator action failed"),
            }
        }

        actions
    }

    /// Tick until shutdown
    pub async fn run(mut self, mut shutdown: ShutdownToken) {
        let period = Duration::from_secs(self.config.tick_interval_secs);
        let mut interval = tokio::time::interval(period);
        info!(interval_secs = self.config.tick_interval_secs, "Simulation started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.intake_tick();
                    self.operator_tick();

                    let stats = self.queue.stats();
                    info!(
                        waiting = stats.waiting,
                        in_service = stats.in_service,
                        completed = stats.completed,
                        no_show = stats.no_show,
                        average_wait_minutes = ?stats.average_wait_minutes,
                        "Queue status"
                    );
                }
                _ = shutdown.wait() => {
                    info!("Simulation interrupted");
                    break;
                }
            }
        }

        info!("Simulation stopped");
    }
}

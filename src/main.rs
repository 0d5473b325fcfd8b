//! Replica convergence demo for the RGA tree list.
//!
//! Simulates a handful of replicas editing the same array without seeing each
//! other's edits, ships every edit as a JSON encoded [`Operation`], and then
//! lets each replica replay the full log in its own delivery order on a worker
//! thread. All replicas must end up with the same array.
//!
//! The demo runs two rounds: concurrent inserts and removals, then concurrent
//! moves to the front of the synchronized array.
//!
//! Environment:
//! - `RUST_LOG`: log filter (default `info`)
//! - `RGA_DEMO_REPLICAS`: number of replicas (default 3)
//! - `RGA_DEMO_OPS`: local edits per replica and round (default 8)

use std::env;
use std::error::Error;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rga_tree_list::{Element, Operation, Primitive, RgaTreeList, Ticket, TicketClock};

type DemoResult<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Debug, Clone, Copy)]
enum Round {
    Edit,
    Move,
}

/// One collaborator: its clock, its copy of the array and the edits it made.
struct Replica {
    clock: TicketClock,
    list: RgaTreeList<Primitive>,
    outbox: Vec<String>,
}

impl Replica {
    fn new(actor_id: u64) -> Self {
        Replica {
            clock: TicketClock::new(actor_id),
            list: RgaTreeList::new(),
            outbox: Vec::new(),
        }
    }

    /// Makes one local edit and records it for the other replicas.
    fn edit(&mut self, round: Round, step: usize) -> DemoResult<()> {
        let len = self.list.len();
        let actor = self.clock.actor_id();

        let op = match round {
            Round::Edit if len == 0 || step % 3 != 2 => {
                let pos = (step * 7 + actor as usize) % (len + 1);
                let prev_created_at = if pos == 0 {
                    Ticket::INITIAL
                } else {
                    self.list.get(pos - 1)?.created_at()
                };
                Operation::Add {
                    prev_created_at,
                    element: Primitive::new(format!("r{actor}-{step}"), self.clock.tick()),
                }
            }
            Round::Edit => Operation::Remove {
                created_at: self.list.get((step + actor as usize) % len)?.created_at(),
                executed_at: self.clock.tick(),
            },
            Round::Move if len == 0 => return Ok(()),
            Round::Move => Operation::Move {
                prev_created_at: Ticket::INITIAL,
                created_at: self.list.get((step * 5 + actor as usize) % len)?.created_at(),
                executed_at: self.clock.tick(),
            },
        };

        op.execute(&mut self.list)?;
        self.outbox.push(serde_json::to_string(&op)?);
        Ok(())
    }

    /// Applies a batch of encoded operations from some replica.
    fn receive(&mut self, batch: &[String]) -> DemoResult<()> {
        for encoded in batch {
            let op: Operation = serde_json::from_str(encoded)?;
            self.clock.update(&op.executed_at());
            op.execute(&mut self.list)?;
        }
        Ok(())
    }
}

/// Runs one round: local edits everywhere, then every replica receives every
/// batch, its own included, starting from a different sender.
fn run_round(replicas: &[Arc<Mutex<Replica>>], round: Round, ops: usize) -> DemoResult<()> {
    for replica in replicas {
        let mut replica = replica.lock();
        replica.outbox.clear();
        for step in 0..ops {
            replica.edit(round, step)?;
        }
        info!(
            ?round,
            actor = replica.clock.actor_id(),
            local = %replica.list,
            "local edits done"
        );
    }

    let outboxes: Arc<Vec<Vec<String>>> =
        Arc::new(replicas.iter().map(|r| r.lock().outbox.clone()).collect());

    let handles: Vec<_> = replicas
        .iter()
        .enumerate()
        .map(|(i, replica)| {
            let replica = Arc::clone(replica);
            let outboxes = Arc::clone(&outboxes);
            thread::spawn(move || -> DemoResult<()> {
                let mut replica = replica.lock();
                for k in 0..outboxes.len() {
                    let sender = (i + k) % outboxes.len();
                    debug!(receiver = i, sender, "delivering batch");
                    replica.receive(&outboxes[sender])?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| "replica thread panicked")??;
    }
    Ok(())
}

fn env_or(key: &str, default: usize) -> usize {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(%key, %raw, default, "invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

fn main() -> DemoResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let replica_count = env_or("RGA_DEMO_REPLICAS", 3).max(1);
    let ops_per_replica = env_or("RGA_DEMO_OPS", 8);
    info!(replica_count, ops_per_replica, "starting RGA tree list demo");

    let replicas: Vec<Arc<Mutex<Replica>>> = (1..=replica_count as u64)
        .map(|actor| Arc::new(Mutex::new(Replica::new(actor))))
        .collect();

    run_round(&replicas, Round::Edit, ops_per_replica)?;
    run_round(&replicas, Round::Move, ops_per_replica)?;

    let renderings: Vec<String> = replicas.iter().map(|r| r.lock().list.marshal()).collect();
    for (i, rendering) in renderings.iter().enumerate() {
        info!(replica = i, %rendering, "final state");
    }

    if renderings.windows(2).all(|w| w[0] == w[1]) {
        info!("all replicas converged");
        Ok(())
    } else {
        Err("replicas diverged".into())
    }
}
